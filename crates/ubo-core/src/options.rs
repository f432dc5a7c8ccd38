//! Traversal limits
//!
//! Path enumeration is exponential in dense graphs. These bounds cap the
//! work done per request; hitting one stops exploration and marks the
//! result truncated rather than failing.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_PATHS: usize = 10_000;
pub const DEFAULT_MAX_PATH_LENGTH: usize = 32;
pub const DEFAULT_CANCEL_CHECK_INTERVAL: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Maximum number of partial paths dequeued by the traversal.
    #[serde(alias = "maxPaths")]
    pub max_paths: usize,
    /// Maximum path length, counted in ownership links.
    #[serde(alias = "maxPathLength")]
    pub max_path_length: usize,
    /// The cancel flag is polled once every this many dequeued paths.
    pub cancel_check_interval: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_PATHS,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            cancel_check_interval: DEFAULT_CANCEL_CHECK_INTERVAL,
        }
    }
}

impl ResolveOptions {
    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }

    pub fn with_max_path_length(mut self, max_path_length: usize) -> Self {
        self.max_path_length = max_path_length;
        self
    }

    pub fn with_cancel_check_interval(mut self, interval: usize) -> Self {
        self.cancel_check_interval = interval;
        self
    }
}
