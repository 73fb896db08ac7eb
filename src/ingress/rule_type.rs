use std::str::FromStr;

use strum::{Display, EnumString};

use super::{
    annotations::{Annotations, REQUEST_MODIFIER, RULE_TYPE},
    error::ConvertError,
};

/// Legacy `rule-type` annotation values.
#[derive(Debug, Default, EnumString, Display, Clone, Copy, PartialEq, Eq)]
pub enum LegacyRuleType {
    Path,
    #[default]
    PathPrefix,
    PathStrip,
    PathPrefixStrip,
    ReplacePath,
}

/// Matcher a legacy rule type resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
    Path,
    PathPrefix,
    ReplacePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRuleType {
    pub rule_type: RuleType,
    pub strip_prefix: bool,
}

impl From<LegacyRuleType> for ResolvedRuleType {
    fn from(value: LegacyRuleType) -> Self {
        let (rule_type, strip_prefix) = match value {
            LegacyRuleType::Path => (RuleType::Path, false),
            LegacyRuleType::PathPrefix => (RuleType::PathPrefix, false),
            LegacyRuleType::PathStrip => (RuleType::Path, true),
            LegacyRuleType::PathPrefixStrip => (RuleType::PathPrefix, true),
            LegacyRuleType::ReplacePath => (RuleType::ReplacePath, false),
        };

        Self {
            rule_type,
            strip_prefix,
        }
    }
}

impl ResolvedRuleType {
    pub fn from_annotations(annotations: &Annotations) -> Result<Self, ConvertError> {
        let Some(value) = annotations.get(RULE_TYPE) else {
            return Ok(LegacyRuleType::default().into());
        };

        let rule_type = LegacyRuleType::from_str(value)
            .map_err(|_| ConvertError::InvalidRuleType(value.to_string()))?;

        if rule_type == LegacyRuleType::ReplacePath {
            log::warn!(
                "Using {rule_type} as {RULE_TYPE} will be deprecated in the future. Please use the {REQUEST_MODIFIER} annotation instead"
            );
        }

        Ok(rule_type.into())
    }
}
