use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failures of the resolution engine itself.
///
/// Bad data never shows up here: malformed or conflicting records are
/// recovered from and reported in [`crate::DataIssues`], and hitting a
/// traversal limit is reported in [`crate::Truncation`] alongside partial
/// results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "error_kind", rename_all = "snake_case")]
pub enum ResolveError {
    /// The caller cancelled the traversal before it finished.
    #[error("Resolution cancelled after exploring {explored} paths")]
    Cancelled { explored: usize },
}
