//! Agent configuration.
//!
//! The gateway binary fills this from CLI flags; library consumers can use
//! `OracleConfig::from_env` as a fallback path.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_ORACLE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_API_KEY_ENV: &str = "AIPROXY_TOKEN";

/// Configuration for the oracle transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    pub base_url: String,
    pub model: String,
    pub embedding_model: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub timeout_seconds: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORACLE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key: None,
            max_tokens: Some(64),
            temperature: Some(0.0),
            timeout_seconds: 30,
        }
    }
}

impl OracleConfig {
    /// Create a configuration from environment variables. The credential is
    /// read from `AIPROXY_TOKEN` unless `key_env` names another variable.
    pub fn from_env(key_env: Option<&str>) -> Self {
        let mut config = OracleConfig::default();

        if let Ok(url) = std::env::var("DATAWORKS_ORACLE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("DATAWORKS_MODEL") {
            config.model = model;
        }
        if let Ok(model) = std::env::var("DATAWORKS_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }
        if let Ok(timeout) = std::env::var("DATAWORKS_ORACLE_TIMEOUT_SECONDS") {
            if let Ok(seconds) = timeout.parse() {
                config.timeout_seconds = seconds;
            }
        }
        config.api_key = std::env::var(key_env.unwrap_or(DEFAULT_API_KEY_ENV)).ok();
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("oracle base_url must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("oracle model must not be empty".to_string());
        }
        if self.embedding_model.trim().is_empty() {
            return Err("oracle embedding_model must not be empty".to_string());
        }
        if self.timeout_seconds == 0 {
            return Err("oracle timeout_seconds must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Top-level agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub bind_addr: String,
    pub data_root: PathBuf,
    pub oracle: OracleConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".to_string(),
            data_root: PathBuf::from("./data"),
            oracle: OracleConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.bind_addr.trim().is_empty() {
            return Err("bind_addr must not be empty".to_string());
        }
        self.oracle.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = OracleConfig {
            timeout_seconds: 0,
            ..OracleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_model_is_rejected() {
        let config = OracleConfig {
            model: "  ".to_string(),
            ..OracleConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
