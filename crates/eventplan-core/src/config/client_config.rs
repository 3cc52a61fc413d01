use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults;
use crate::error::{AppError, Result};

/// Client configuration
///
/// Defaults come from [`defaults`]; `from_env` layers the environment on
/// top, and the builder methods let the CLI apply its own flags last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base address, e.g. `http://localhost:3001`
    pub base_url: String,

    /// Per-request timeout (milliseconds)
    pub timeout_ms: u64,

    /// Directory holding the session database
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::DEFAULT_API_BASE.to_string(),
            timeout_ms: defaults::DEFAULT_TIMEOUT_MS,
            data_dir: default_data_dir(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `EVENTPLAN_API_BASE` wins over `EVENTPLAN_BACKEND_URL`; blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(base) = get(defaults::ENV_API_BASE).or_else(|| get(defaults::ENV_BACKEND_URL)) {
            config.base_url = base;
        }
        if let Some(dir) = get(defaults::ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Path of the sled database holding the session
    pub fn session_db_path(&self) -> PathBuf {
        self.data_dir.join("session")
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(AppError::ConfigError("base URL cannot be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(AppError::ConfigError(
                "timeout must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(defaults::APP_DIR_NAME)
}
