//! Resolver configuration
//!
//! Loaded from YAML, with environment overrides applied on top:
//!
//! ```yaml
//! source:
//!   base_url: https://ownership.internal/api
//!   timeout_secs: 30
//! limits:
//!   max_paths: 10000
//!   max_path_length: 32
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use ubo_core::ResolveOptions;

use crate::error::ConfigError;

/// Config file path override.
pub const CONFIG_PATH_ENV: &str = "UBO_RESOLVER_CONFIG";

/// Ownership source base URL override.
pub const SOURCE_URL_ENV: &str = "UBO_SOURCE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub limits: ResolveOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ResolverConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `UBO_SOURCE_URL` if set.
    pub fn apply_env(self) -> Self {
        self.with_base_url_override(std::env::var(SOURCE_URL_ENV).ok())
    }

    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.source.base_url = url;
        }
        self
    }
}
