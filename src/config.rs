//! Configuration management for the deeplink cache

use std::env;

use serde::Deserialize;
use thiserror::Error;

use crate::path::RangeDelimiter;

/// Environment variable selecting the range delimiter (`colon` or `hyphen`)
pub const RANGE_DELIMITER_VAR: &str = "DEEPLINK_RANGE_DELIMITER";
/// Environment variable toggling removal of empty values from results
pub const DROP_EMPTY_VALUES_VAR: &str = "DEEPLINK_DROP_EMPTY_VALUES";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Delimiter between the two ends of a range token
    pub range_delimiter: RangeDelimiter,
    /// Leave values with an empty text payload out of fetch results
    pub drop_empty_values: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            range_delimiter: RangeDelimiter::Colon,
            drop_empty_values: true,
        }
    }
}

impl CacheConfig {
    /// Load settings from the process environment, reading `.env` first
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CacheConfig::default();

        let range_delimiter = match lookup(RANGE_DELIMITER_VAR) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: RANGE_DELIMITER_VAR,
                    value,
                })?,
            None => defaults.range_delimiter,
        };

        let drop_empty_values = match lookup(DROP_EMPTY_VALUES_VAR) {
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue {
                var: DROP_EMPTY_VALUES_VAR,
                value,
            })?,
            None => defaults.drop_empty_values,
        };

        Ok(CacheConfig {
            range_delimiter,
            drop_empty_values,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CacheConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CacheConfig::default());
        assert_eq!(config.range_delimiter, RangeDelimiter::Colon);
        assert!(config.drop_empty_values);
    }

    #[test]
    fn test_overrides() {
        let config = CacheConfig::from_lookup(lookup(&[
            (RANGE_DELIMITER_VAR, "hyphen"),
            (DROP_EMPTY_VALUES_VAR, "0"),
        ]))
        .unwrap();
        assert_eq!(config.range_delimiter, RangeDelimiter::Hyphen);
        assert!(!config.drop_empty_values);
    }

    #[test]
    fn test_invalid_delimiter() {
        let result = CacheConfig::from_lookup(lookup(&[(RANGE_DELIMITER_VAR, "semicolon")]));
        assert_eq!(
            result,
            Err(ConfigError::InvalidValue {
                var: RANGE_DELIMITER_VAR,
                value: "semicolon".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_flag() {
        let result = CacheConfig::from_lookup(lookup(&[(DROP_EMPTY_VALUES_VAR, "maybe")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CacheConfig = serde_json::from_str(r#"{"range_delimiter": "hyphen"}"#).unwrap();
        assert_eq!(config.range_delimiter, RangeDelimiter::Hyphen);
        assert!(config.drop_empty_values);
    }
}
