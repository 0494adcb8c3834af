use std::env;

use serde::{Deserialize, Serialize};

use self::backend::BackendConfig;
use self::log::LogConfig;
use self::review::ReviewConfig;
use self::srs::SrsConfig;
use self::store::StoreConfig;

pub mod backend;
pub mod log;
pub mod review;
pub mod srs;
pub mod store;

fn default_user_id() -> String {
    "local".to_string()
}

fn default_language() -> String {
    "es".to_string()
}

fn default_native_language() -> String {
    "en".to_string()
}

fn default_channel_capacity() -> usize {
    64
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid language code '{0}', expected letters, digits, '-' or '_'")]
    InvalidLanguage(String),

    #[error("User id must not be empty")]
    EmptyUserId,
}

/// Language codes double as document id prefixes, so `:` and other
/// punctuation are rejected
fn check_language(code: &str) -> Result<(), ConfigError> {
    let valid = !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidLanguage(code.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub backend: BackendConfig,
    pub review: ReviewConfig,
    pub srs: SrsConfig,
    pub log: LogConfig,

    /// User whose collections are read and written
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Target language code
    #[serde(default = "default_language")]
    pub language: String,
    /// Language translations are requested in
    #[serde(default = "default_native_language")]
    pub native_language: String,
    /// Capacity of the input -> event loop channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            backend: BackendConfig::default(),
            review: ReviewConfig::default(),
            srs: SrsConfig::default(),
            log: LogConfig::default(),
            user_id: default_user_id(),
            language: default_language(),
            native_language: default_native_language(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let user_id = env::var("INTONGUES_USER").unwrap_or_else(|_| default_user_id());

        let language = env::var("INTONGUES_LANGUAGE").unwrap_or_else(|_| default_language());

        Config {
            store: StoreConfig::new(),
            backend: BackendConfig::new(),
            log: LogConfig::new(),
            user_id,
            language,
            ..Config::default()
        }
    }

    /// Re-apply environment overrides on top of a loaded profile
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(user_id) = env::var("INTONGUES_USER") {
            self.user_id = user_id;
        }
        if let Ok(language) = env::var("INTONGUES_LANGUAGE") {
            self.language = language;
        }
        if let Ok(data_dir) = env::var("INTONGUES_DATA_DIR") {
            self.store.data_dir = Some(data_dir);
        }
        if let Ok(base_url) = env::var("INTONGUES_BACKEND_URL") {
            self.backend.base_url = base_url;
        }
        if let Some(json) = env::var("INTONGUES_LOG_JSON").ok().and_then(|v| v.parse().ok()) {
            self.log.json = json;
        }
        self
    }

    /// Check the values that end up in store paths and document ids
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_id.trim().is_empty() {
            return Err(ConfigError::EmptyUserId);
        }
        check_language(&self.language)?;
        check_language(&self.native_language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_profile_fills_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "language": "fr", "srs": { "startingEase": 3.0, "min_ease": 1.5 } }"#,
        )
        .unwrap();

        assert_eq!(config.language, "fr");
        assert_eq!(config.user_id, "local");
        // field names are snake_case, unknown keys are ignored
        assert_eq!(config.srs.starting_ease, 2.5);
        assert_eq!(config.srs.min_ease, 1.5);
        assert_eq!(config.review.default_deck, "core:any");
        assert!(config.backend.enabled);
    }

    #[test]
    fn language_codes_are_validated() {
        assert_eq!(Config::default().validate(), Ok(()));

        for code in ["pt-BR", "zh_Hans", "es"] {
            let config = Config {
                language: code.to_string(),
                ..Config::default()
            };
            assert_eq!(config.validate(), Ok(()), "{code} should be accepted");
        }

        for code in ["es:x", "", "en us", "../fr"] {
            let config = Config {
                language: code.to_string(),
                ..Config::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidLanguage(code.to_string()))
            );
        }

        let native = Config {
            native_language: "en:gb".to_string(),
            ..Config::default()
        };
        assert!(matches!(native.validate(), Err(ConfigError::InvalidLanguage(_))));

        let nobody = Config {
            user_id: "  ".to_string(),
            ..Config::default()
        };
        assert_eq!(nobody.validate(), Err(ConfigError::EmptyUserId));
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let backend = BackendConfig {
            base_url: "http://localhost:4000/".to_string(),
            ..BackendConfig::default()
        };
        assert_eq!(
            backend.endpoint("/api/translatePhrase"),
            "http://localhost:4000/api/translatePhrase"
        );
    }
}
