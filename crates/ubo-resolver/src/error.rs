//! Error taxonomy for fetching and resolving.
//!
//! ```text
//! fetch    → FetchError      (source unreachable, not found, bad payload)
//! resolve  → ResolveError    (cancelled mid-traversal)
//! config   → ConfigError     (unreadable or invalid configuration)
//! ```
//!
//! Truncation and data inconsistencies are not errors; they travel on
//! `ubo_core::Resolution` with the partial results.

use std::path::PathBuf;

use ubo_core::ResolveError;

/// The ownership data source could not supply a graph.
///
/// Always distinct from an empty graph, which is a successful fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Entity not found in ownership source: {entity_id}")]
    NotFound { entity_id: String },

    #[error("Ownership source returned HTTP {status} for {entity_id}")]
    Status { entity_id: String, status: u16 },

    #[error("Ownership source unreachable: {0}")]
    Transport(String),

    #[error("Malformed ownership graph payload: {0}")]
    Malformed(String),

    #[error("Fetch cancelled")]
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Resolution worker failed: {0}")]
    Worker(String),
}

impl ResolverError {
    /// Cancelled during either the fetch or the traversal.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ResolverError::Fetch(FetchError::Cancelled)
                | ResolverError::Resolve(ResolveError::Cancelled { .. })
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid ownership source URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}
