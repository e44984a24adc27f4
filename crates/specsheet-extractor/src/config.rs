//! Configuration for attribute extraction

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the attribute extractors of one run are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One request at a time, in roster order
    Sequential,

    /// Concurrent requests, at most `max_in_flight` at once
    Bounded {
        /// Concurrency limit
        max_in_flight: usize,
    },
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Sequential
    }
}

/// Configuration for attribute extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Leading characters of the corpus sent with each request
    pub max_corpus_chars: usize,

    /// Maximum time for a single completion call (seconds)
    pub request_timeout_secs: u64,

    /// Scheduling of the attribute extractors
    pub execution: ExecutionMode,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_corpus_chars == 0 {
            return Err("max_corpus_chars must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if let ExecutionMode::Bounded { max_in_flight: 0 } = self.execution {
            return Err("execution.max_in_flight must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_corpus_chars: 30_000,
            request_timeout_secs: 30,
            execution: ExecutionMode::Sequential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.execution, ExecutionMode::Sequential);
    }

    #[test]
    fn test_invalid_values() {
        let mut config = ExtractorConfig::default();
        config.max_corpus_chars = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.execution = ExecutionMode::Bounded { max_in_flight: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bounded_mode_from_toml() {
        let config = ExtractorConfig::from_toml(
            r#"
            request_timeout_secs = 10

            [execution]
            mode = "bounded"
            max_in_flight = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.max_corpus_chars, 30_000);
        assert_eq!(config.execution, ExecutionMode::Bounded { max_in_flight: 4 });
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ExtractorConfig::default();
        config.execution = ExecutionMode::Bounded { max_in_flight: 6 };
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
