//! Client configuration.
//!
//! Defaults target the public restful-booker deployment with its documented
//! admin account. Any field can be overridden from the environment with the
//! `BOOKER_` prefix (`BOOKER_BASE_URL`, `BOOKER_USERNAME`, `BOOKER_PASSWORD`).
//! Environment values are taken verbatim: `BOOKER_PASSWORD=007` is the
//! string `"007"`, not the number 7.

use std::collections::BTreeMap;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://restful-booker.herokuapp.com";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password123";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookerConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl Default for BookerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl BookerConfig {
    /// Config with defaults except for `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
        .normalized()
    }

    /// Defaults merged with `BOOKER_*` environment variables.
    pub fn figment() -> Figment {
        // Raw strings; the `Env` provider would type `123456` as an integer.
        let overrides: BTreeMap<String, String> = Env::prefixed("BOOKER_")
            .iter()
            .map(|(key, value)| (key.as_str().to_ascii_lowercase(), value))
            .collect();
        Figment::from(Serialized::defaults(Self::default())).merge(Serialized::defaults(overrides))
    }

    pub fn load() -> Result<Self, ApiError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ApiError> {
        let config: Self = figment
            .extract()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        config.normalized()
    }

    fn normalized(mut self) -> Result<Self, ApiError> {
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            return Err(ApiError::Config("base_url must not be empty".to_string()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn defaults_target_public_service() {
        Jail::expect_with(|_jail| {
            let config = BookerConfig::load().unwrap();
            assert_eq!(config, BookerConfig::default());
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("BOOKER_BASE_URL", "http://127.0.0.1:3001/");
            jail.set_env("BOOKER_PASSWORD", "hunter2");
            let config = BookerConfig::load().unwrap();
            assert_eq!(config.base_url, "http://127.0.0.1:3001");
            assert_eq!(config.username, DEFAULT_USERNAME);
            assert_eq!(config.password, "hunter2");
            Ok(())
        });
    }

    #[test]
    fn empty_base_url_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("BOOKER_BASE_URL", "/");
            let err = BookerConfig::load().unwrap_err();
            assert!(matches!(err, ApiError::Config(_)));
            Ok(())
        });
    }

    #[test]
    fn numeric_and_boolean_values_stay_strings() {
        Jail::expect_with(|jail| {
            jail.set_env("BOOKER_PASSWORD", "123456");
            jail.set_env("BOOKER_USERNAME", "true");
            let config = BookerConfig::load().unwrap();
            assert_eq!(config.password, "123456");
            assert_eq!(config.username, "true");
            Ok(())
        });
    }

    #[test]
    fn leading_zeros_survive() {
        Jail::expect_with(|jail| {
            jail.set_env("BOOKER_PASSWORD", "007");
            assert_eq!(BookerConfig::load().unwrap().password, "007");
            Ok(())
        });
    }

    #[test]
    fn with_base_url_strips_trailing_slash() {
        let config = BookerConfig::with_base_url("http://localhost:3001/").unwrap();
        assert_eq!(config.base_url, "http://localhost:3001");
        assert_eq!(config.username, DEFAULT_USERNAME);
    }

    #[test]
    fn with_base_url_rejects_empty_url() {
        for url in ["", "/"] {
            let err = BookerConfig::with_base_url(url).unwrap_err();
            assert!(matches!(err, ApiError::Config(_)));
        }
    }
}
