//! Configuration loading

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::policy::{ProbePolicy, DEFAULT_ATTEMPT_COUNT, DEFAULT_ATTEMPT_TIMEOUT_MS, ECHO_PORT};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub check: CheckConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Number of reachability attempts
    #[serde(default = "default_attempt_count")]
    pub attempt_count: u32,
    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            attempt_count: default_attempt_count(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_attempt_count() -> u32 {
    DEFAULT_ATTEMPT_COUNT
}

fn default_timeout_ms() -> u64 {
    DEFAULT_ATTEMPT_TIMEOUT_MS
}

/// How a single reachability check is performed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMethod {
    /// TCP connect to the echo port
    #[default]
    Tcp,
    /// ICMP echo request (needs raw socket privileges)
    Icmp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConfig {
    #[serde(default)]
    pub method: CheckMethod,
    /// TCP port used by the `tcp` method
    #[serde(default = "default_echo_port")]
    pub port: u16,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            method: CheckMethod::default(),
            port: default_echo_port(),
        }
    }
}

fn default_echo_port() -> u16 {
    ECHO_PORT
}

impl Config {
    /// Convert to the policy handed to a probe
    pub fn to_policy(&self) -> ProbePolicy {
        ProbePolicy::new(self.probe.attempt_count, self.probe.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe.attempt_count == 0 {
            return Err(ConfigError::Invalid(
                "probe.attempt_count must be at least 1".to_string(),
            ));
        }
        if self.probe.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "probe.timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}
