//! Resolution entry point
//!
//! `(graph, start) -> Resolution`. Pure, synchronous and deterministic for a
//! given input: every derived structure is built here and dropped on return.

use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, AnnotatedPath, UltimateOwnerResult};
use crate::cancel::CancelFlag;
use crate::classify::TerminalClassifier;
use crate::effective::effective_ownership;
use crate::enumerate::{PathEnumerator, Truncation};
use crate::error::{ResolveError, Result};
use crate::index::{DataIssues, OwnershipIndex};
use crate::model::{NodeId, OwnershipGraph};
use crate::options::ResolveOptions;

/// Ultimate owners of one entity, plus what the caller needs to know about
/// how complete they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub start_id: NodeId,
    pub owners: Vec<UltimateOwnerResult>,
    /// Set when a traversal limit was hit; `owners` may be incomplete.
    pub truncation: Option<Truncation>,
    pub data_issues: DataIssues,
    pub explored_paths: usize,
    pub completed_paths: usize,
}

impl Resolution {
    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }

    pub fn has_data_issues(&self) -> bool {
        self.data_issues.any()
    }

    /// Any result stops at a dead end rather than a genuine ultimate owner.
    pub fn has_incomplete_chains(&self) -> bool {
        self.owners.iter().any(|o| !o.terminal_kind.is_genuine())
    }
}

/// Resolve the ultimate owners of `start_id`.
///
/// Never fails: an empty graph or an unknown start id yields no owners, and
/// bad records are skipped and counted in [`Resolution::data_issues`].
pub fn resolve_ultimate_owners(
    graph: &OwnershipGraph,
    start_id: &str,
    options: &ResolveOptions,
) -> Resolution {
    let (resolution, _) = run(graph, start_id, options, None);
    resolution
}

/// As [`resolve_ultimate_owners`], stopping early when `cancel` is set.
pub fn resolve_ultimate_owners_with_cancel(
    graph: &OwnershipGraph,
    start_id: &str,
    options: &ResolveOptions,
    cancel: &CancelFlag,
) -> Result<Resolution> {
    match run(graph, start_id, options, Some(cancel)) {
        (resolution, false) => Ok(resolution),
        (resolution, true) => Err(ResolveError::Cancelled {
            explored: resolution.explored_paths,
        }),
    }
}

fn run(
    graph: &OwnershipGraph,
    start_id: &str,
    options: &ResolveOptions,
    cancel: Option<&CancelFlag>,
) -> (Resolution, bool) {
    let index = OwnershipIndex::build(graph);
    let classifier = TerminalClassifier::new(&index, start_id);

    let mut enumerator = PathEnumerator::new(&index, classifier, options);
    if let Some(cancel) = cancel {
        enumerator = enumerator.with_cancel(cancel);
    }
    let enumeration = enumerator.run(start_id);

    let completed_paths = enumeration.paths.len();
    let annotated = enumeration
        .paths
        .into_iter()
        .map(|path| AnnotatedPath {
            effective: effective_ownership(&index, &path.nodes),
            path,
        })
        .collect();
    let owners = aggregate(&index, annotated);

    tracing::debug!(
        start = start_id,
        owners = owners.len(),
        explored = enumeration.explored,
        completed = completed_paths,
        truncated = enumeration.truncation.is_some(),
        cancelled = enumeration.cancelled,
        "Resolved ultimate owners"
    );

    let resolution = Resolution {
        start_id: start_id.to_string(),
        owners,
        truncation: enumeration.truncation,
        data_issues: index.issues().clone(),
        explored_paths: enumeration.explored,
        completed_paths,
    };
    (resolution, enumeration.cancelled)
}
