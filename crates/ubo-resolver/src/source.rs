//! Ownership graph sources
//!
//! `OwnershipGraphSource` is the one boundary between the resolver and
//! wherever ownership data lives. Implementations return the snapshot of
//! the graph above an entity, or a [`FetchError`] that is never confused
//! with an empty graph.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use ubo_core::{CancelFlag, OwnershipGraph};

use crate::error::FetchError;

/// How often a pending fetch polls the cancel flag.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[async_trait]
pub trait OwnershipGraphSource: Send + Sync {
    /// Nodes and edges reachable upward (owners, their owners, ...) from
    /// `entity_id`, including the entity itself.
    async fn fetch_ownership_graph_above(&self, entity_id: &str)
        -> Result<OwnershipGraph, FetchError>;
}

/// Fetch, abandoning the request as soon as `cancel` is set.
///
/// Nothing has been resolved yet at this point, so dropping the pending
/// request has no side effects.
pub async fn fetch_with_cancel<S>(
    source: &S,
    entity_id: &str,
    cancel: &CancelFlag,
) -> Result<OwnershipGraph, FetchError>
where
    S: OwnershipGraphSource + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    tokio::select! {
        result = source.fetch_ownership_graph_above(entity_id) => result,
        _ = cancelled(cancel) => {
            tracing::info!(entity_id, "Ownership graph fetch cancelled");
            Err(FetchError::Cancelled)
        }
    }
}

async fn cancelled(cancel: &CancelFlag) {
    while !cancel.is_cancelled() {
        tokio::time::sleep(CANCEL_POLL_INTERVAL).await;
    }
}

// ============================================================================
// IN-MEMORY SOURCE
// ============================================================================

/// Fixed snapshots keyed by entity id. Used for offline snapshots and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphSource {
    graphs: HashMap<String, OwnershipGraph>,
}

impl InMemoryGraphSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_graph(mut self, entity_id: impl Into<String>, graph: OwnershipGraph) -> Self {
        self.insert(entity_id, graph);
        self
    }

    pub fn insert(&mut self, entity_id: impl Into<String>, graph: OwnershipGraph) {
        self.graphs.insert(entity_id.into(), graph);
    }
}

#[async_trait]
impl OwnershipGraphSource for InMemoryGraphSource {
    async fn fetch_ownership_graph_above(
        &self,
        entity_id: &str,
    ) -> Result<OwnershipGraph, FetchError> {
        self.graphs
            .get(entity_id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                entity_id: entity_id.to_string(),
            })
    }
}
