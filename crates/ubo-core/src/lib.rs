//! Ultimate Beneficial Owner Resolution
//!
//! Given a percentage-weighted ownership graph and an entity in it, find the
//! ultimate owners of that entity and the effective stake each one holds.
//!
//! ## Pipeline
//!
//! ```text
//! OwnershipGraph ─► OwnershipIndex ─► TerminalClassifier ─► PathEnumerator
//!                   (owned→owners)    (who is ultimate)     (BFS, per-path
//!                                                            cycle guard)
//!                                                                 │
//!      Resolution ◄── aggregate ◄── effective_ownership ◄─────────┘
//!   (ranked owners,   (best path     (product of stakes,
//!    truncation,       per terminal)  unknown poisons chain)
//!    data issues)
//! ```
//!
//! ## Rules
//!
//! - Pure and synchronous. No I/O, no process-wide caches.
//! - Bad data is recovered from and reported, never an error.
//! - Limits truncate and report, never an error.
//! - Stakes are `Known(pct) | Unknown`; zero is never treated as unknown.

pub mod aggregate;
pub mod cancel;
pub mod classify;
pub mod effective;
pub mod enumerate;
pub mod error;
pub mod index;
pub mod model;
pub mod options;
pub mod resolve;

pub use aggregate::{PathStep, UltimateOwnerResult};
pub use cancel::CancelFlag;
pub use classify::{TerminalClassifier, TerminalKind};
pub use effective::effective_ownership;
pub use enumerate::{PathEnumerator, Truncation, TruncationReason};
pub use error::ResolveError;
pub use index::{DataIssues, OwnershipIndex};
pub use model::{NodeId, OwnershipEdge, OwnershipGraph, OwnershipNode, Stake};
pub use options::ResolveOptions;
pub use resolve::{resolve_ultimate_owners, resolve_ultimate_owners_with_cancel, Resolution};
