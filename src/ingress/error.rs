use thiserror::Error;

use super::annotations::{REWRITE_TARGET, RULE_TYPE};

/// Failures that abort the conversion of a single Ingress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("cannot use non-matcher rule: {0:?}")]
    InvalidRuleType(String),

    #[error(
        "{} must not be used together with annotation {:?} set to ReplacePath",
        REWRITE_TARGET,
        RULE_TYPE
    )]
    RewriteTargetWithReplacePath,
}
