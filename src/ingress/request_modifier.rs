use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, opt, rest, value},
    error::{Error, ParseError},
    sequence::{delimited, preceded, separated_pair},
    IResult, Parser,
};

use super::middleware::{AddPrefix, MiddlewareKind, ReplacePath, ReplacePathRegex};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestModifierError {
    #[error("request modifier is empty")]
    Empty,
    #[error("cannot parse request modifier: {0:?}")]
    Syntax(String),
    #[error("rule {0} has no value")]
    MissingValue(String),
    #[error("rule {0} requires a regex and a replacement separated by a space: {1:?}")]
    MissingReplacement(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
enum ModifierType {
    AddPrefix,
    ReplacePath,
    ReplacePathRegex,
}

fn modifier_type<'a, E: ParseError<&'a str>>(s: &'a str) -> IResult<&'a str, ModifierType, E> {
    // ReplacePathRegexはReplacePathより先に試す
    alt((
        value(ModifierType::ReplacePathRegex, tag("ReplacePathRegex")),
        value(ModifierType::ReplacePath, tag("ReplacePath")),
        value(ModifierType::AddPrefix, tag("AddPrefix")),
    ))
    .parse(s)
}

/// `<type> [: <value>]`
fn modifier<'a, E: ParseError<&'a str>>(
    s: &'a str,
) -> IResult<&'a str, (ModifierType, Option<&'a str>), E> {
    all_consuming((
        delimited(multispace0, modifier_type, multispace0),
        opt(preceded(char(':'), rest)),
    ))
    .parse(s)
}

/// `<regex> <replacement>`
fn regex_replacement<'a, E: ParseError<&'a str>>(
    s: &'a str,
) -> IResult<&'a str, (&'a str, &'a str), E> {
    all_consuming(separated_pair(is_not(" \t"), multispace1, rest)).parse(s)
}

/// Parses the `request-modifier` annotation.
///
/// ```text
/// AddPrefix: /prefix
/// ReplacePath: /path
/// ReplacePathRegex: ^/api/(.*) /$1
/// ```
pub fn parse_request_modifier(input: &str) -> Result<MiddlewareKind, RequestModifierError> {
    let trimmed = input.trim_end_matches([' ', ':']).trim_start();

    if trimmed.is_empty() {
        return Err(RequestModifierError::Empty);
    }

    let (_, (modifier_type, raw_value)) = modifier::<Error<&str>>(trimmed)
        .map_err(|_| RequestModifierError::Syntax(trimmed.to_string()))?;

    let value = raw_value.map(str::trim).unwrap_or_default();

    if value.is_empty() {
        return Err(RequestModifierError::MissingValue(modifier_type.to_string()));
    }

    let kind = match modifier_type {
        ModifierType::AddPrefix => MiddlewareKind::AddPrefix(AddPrefix {
            prefix: value.to_string(),
        }),
        ModifierType::ReplacePath => MiddlewareKind::ReplacePath(ReplacePath {
            path: value.to_string(),
        }),
        ModifierType::ReplacePathRegex => {
            let (_, (regex, replacement)) = regex_replacement::<Error<&str>>(value).map_err(
                |_| {
                    RequestModifierError::MissingReplacement(
                        modifier_type.to_string(),
                        value.to_string(),
                    )
                },
            )?;

            MiddlewareKind::ReplacePathRegex(ReplacePathRegex {
                regex: regex.to_string(),
                replacement: replacement.trim().to_string(),
            })
        }
    };

    Ok(kind)
}
