//! `key=value` list parsing for parameters and tags.

use std::collections::BTreeMap;

use crate::cloudformation::{Parameter, ParameterSet, Tag};
use crate::error::{ConfigError, Result};

/// Parses a whitespace-separated `key=value` list into parameters.
///
/// # Errors
///
/// Returns an error for a token without `=` or with an empty key.
pub fn parse_parameters(input: &str) -> Result<ParameterSet> {
    Ok(parse_pairs("parameter", input)?
        .into_iter()
        .map(|(key, value)| Parameter::new(key, value))
        .collect())
}

/// Parses a whitespace-separated `key=value` list into tags.
///
/// # Errors
///
/// Returns an error for a token without `=` or with an empty key.
pub fn parse_tags(input: &str) -> Result<Vec<Tag>> {
    Ok(parse_pairs("tag", input)?
        .into_iter()
        .map(|(key, value)| Tag::new(key, value))
        .collect())
}

/// Merges default tags with command-line tags.
///
/// Defaults come first in key order; a command-line tag replaces the default
/// with the same key.
#[must_use]
pub fn merge_tags(defaults: &BTreeMap<String, String>, tags: Vec<Tag>) -> Vec<Tag> {
    let mut merged: Vec<Tag> = defaults.iter().map(|(k, v)| Tag::new(k, v)).collect();

    for tag in tags {
        match merged.iter_mut().find(|t| t.key == tag.key) {
            Some(existing) => existing.value = tag.value,
            None => merged.push(tag),
        }
    }

    merged
}

/// Splits tokens on the first `=`; a repeated key keeps its first position
/// and takes the last value.
fn parse_pairs(flag: &str, input: &str) -> Result<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = Vec::new();

    for token in input.split_whitespace() {
        let (key, value) = token
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| ConfigError::InvalidKeyValue {
                flag: flag.to_string(),
                input: token.to_string(),
            })?;

        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value.to_string(),
            None => pairs.push((key.to_string(), value.to_string())),
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GiffError;

    #[test]
    fn test_parse_parameters() {
        let parameters = parse_parameters("Size=m4.tiny  Url=https://x?a=b").expect("valid");

        assert_eq!(
            parameters.as_slice(),
            &[
                Parameter::new("Size", "m4.tiny"),
                Parameter::new("Url", "https://x?a=b"),
            ]
        );
    }

    #[test]
    fn test_empty_input_is_empty_list() {
        assert!(parse_parameters("").expect("valid").is_empty());
        assert!(parse_tags("   ").expect("valid").is_empty());
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let tags = parse_tags("owner=").expect("valid");
        assert_eq!(tags, vec![Tag::new("owner", "")]);
    }

    #[test]
    fn test_invalid_tokens() {
        for input in ["novalue", "=value", "a=1 broken"] {
            let err = parse_tags(input).unwrap_err();
            assert!(
                matches!(err, GiffError::Config(ConfigError::InvalidKeyValue { .. })),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let parameters = parse_parameters("a=1 b=2 a=3").expect("valid");

        assert_eq!(
            parameters.as_slice(),
            &[Parameter::new("a", "3"), Parameter::new("b", "2")]
        );
    }

    #[test]
    fn test_merge_tags_cli_wins() {
        let defaults = BTreeMap::from([
            (String::from("team"), String::from("platform")),
            (String::from("env"), String::from("dev")),
        ]);

        let merged = merge_tags(&defaults, vec![Tag::new("env", "prod"), Tag::new("app", "web")]);

        assert_eq!(
            merged,
            vec![
                Tag::new("env", "prod"),
                Tag::new("team", "platform"),
                Tag::new("app", "web"),
            ]
        );
    }
}
