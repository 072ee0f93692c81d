//! Environment configuration

use std::env;
use std::time::Duration;

use crate::error::CliError;

pub const URL_VAR: &str = "HUBTREE_URL";
pub const TOKEN_VAR: &str = "HUBTREE_TOKEN";
pub const PREFIX_VAR: &str = "HUBTREE_API_PREFIX";
pub const TIMEOUT_VAR: &str = "HUBTREE_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "HUBTREE_CONNECT_TIMEOUT_SECS";

/// Connection settings for the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub url: String,
    pub token: String,
    /// `None` keeps the client's default prefix.
    pub api_prefix: Option<String>,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Config {
    /// Reads the configuration from the process environment, after loading
    /// a `.env` file if one exists.
    pub fn from_env() -> Result<Self, CliError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(CliError::MissingEnv(key))
        };
        let seconds = |key: &str| {
            lookup(key)
                .and_then(|secs| secs.parse().ok())
                .map(Duration::from_secs)
        };
        Ok(Self {
            url: required(URL_VAR)?,
            token: required(TOKEN_VAR)?,
            api_prefix: lookup(PREFIX_VAR),
            timeout: seconds(TIMEOUT_VAR),
            connect_timeout: seconds(CONNECT_TIMEOUT_VAR),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup<'a>(vars: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn test_required_and_optional() {
        let vars = HashMap::from([
            (URL_VAR, "http://localhost:8080"),
            (TOKEN_VAR, "abc"),
            (TIMEOUT_VAR, "30"),
            (CONNECT_TIMEOUT_VAR, "5"),
        ]);

        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.url, "http://localhost:8080");
        assert_eq!(config.token, "abc");
        assert_eq!(config.api_prefix, None);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_token() {
        let vars = HashMap::from([(URL_VAR, "http://localhost:8080"), (TOKEN_VAR, "")]);

        let err = Config::from_lookup(lookup(&vars)).unwrap_err();

        assert!(matches!(err, CliError::MissingEnv(TOKEN_VAR)));
    }
}
