//! UBO Resolver
//!
//! Async boundary around `ubo_core`: fetch an ownership graph snapshot from
//! a source, then resolve ultimate owners off the async runtime.
//!
//! ```text
//! caller ──► UboResolver ──► OwnershipGraphSource ──► OwnershipGraph
//!                 │            (HTTP / in-memory)
//!                 └──► spawn_blocking(resolve_ultimate_owners) ──► Resolution
//! ```
//!
//! Fetch failures, cancellation and worker failures are errors. Truncated
//! traversals and bad records are not: they are reported on the
//! `Resolution` next to the partial results.

pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod source;

pub use config::{ResolverConfig, SourceConfig};
pub use error::{ConfigError, FetchError, ResolverError};
pub use http::HttpGraphSource;
pub use service::UboResolver;
pub use source::{fetch_with_cancel, InMemoryGraphSource, OwnershipGraphSource};
