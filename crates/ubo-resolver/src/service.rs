//! UBO resolution service
//!
//! Fetch the graph above an entity, then run the pure engine on a blocking
//! worker. One cancel flag covers both phases. Dropping the returned future
//! also stops the worker.

use std::time::Instant;

use ubo_core::{resolve_ultimate_owners_with_cancel, CancelFlag, Resolution, ResolveOptions};

use crate::error::ResolverError;
use crate::source::{fetch_with_cancel, OwnershipGraphSource};

pub struct UboResolver<S> {
    source: S,
    options: ResolveOptions,
}

/// Cancels the blocking worker once the resolve future completes or is dropped.
struct CancelOnDrop(CancelFlag);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

impl<S: OwnershipGraphSource> UboResolver<S> {
    pub fn new(source: S, options: ResolveOptions) -> Self {
        Self { source, options }
    }

    pub async fn resolve(&self, entity_id: &str) -> Result<Resolution, ResolverError> {
        self.resolve_with_cancel(entity_id, &CancelFlag::new()).await
    }

    pub async fn resolve_with_cancel(
        &self,
        entity_id: &str,
        cancel: &CancelFlag,
    ) -> Result<Resolution, ResolverError> {
        let started = Instant::now();

        let graph = fetch_with_cancel(&self.source, entity_id, cancel).await?;
        tracing::debug!(
            entity_id,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Fetched ownership graph"
        );

        let start_id = entity_id.to_string();
        let options = self.options.clone();
        // A child flag, so abandoning this call never cancels the caller's flag.
        let worker_cancel = cancel.child();
        let _abandon = CancelOnDrop(worker_cancel.clone());
        let resolution = tokio::task::spawn_blocking(move || {
            resolve_ultimate_owners_with_cancel(&graph, &start_id, &options, &worker_cancel)
        })
        .await
        .map_err(|e| ResolverError::Worker(e.to_string()))??;

        tracing::info!(
            entity_id,
            owners = resolution.owners.len(),
            truncated = resolution.is_truncated(),
            data_issues = resolution.has_data_issues(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Resolved ultimate owners"
        );

        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::error::FetchError;
    use crate::source::InMemoryGraphSource;
    use ubo_core::{OwnershipEdge, OwnershipGraph, ResolveError};

    /// Six layers of twelve holdcos above `S`, each owned by every node of
    /// the layer above. Far more paths than a test can walk to completion.
    fn dense_source() -> InMemoryGraphSource {
        const LAYERS: usize = 6;
        const WIDTH: usize = 12;

        let mut edges = Vec::new();
        for i in 0..WIDTH {
            edges.push(OwnershipEdge::new(format!("L0-{i}"), "S", 100.0 / WIDTH as f64));
        }
        for layer in 1..LAYERS {
            for owner in 0..WIDTH {
                for owned in 0..WIDTH {
                    edges.push(OwnershipEdge::new(
                        format!("L{layer}-{owner}"),
                        format!("L{}-{owned}", layer - 1),
                        100.0 / WIDTH as f64,
                    ));
                }
            }
        }
        InMemoryGraphSource::new().with_graph("S", OwnershipGraph::new(vec![], edges))
    }

    fn unbounded_options() -> ResolveOptions {
        ResolveOptions::default()
            .with_max_paths(usize::MAX)
            .with_cancel_check_interval(1)
    }

    fn chain_source() -> InMemoryGraphSource {
        let graph = OwnershipGraph::new(
            vec![],
            vec![
                OwnershipEdge::new("HOLD", "OPCO", 75.0),
                OwnershipEdge::new("FAMILY", "HOLD", 100.0),
            ],
        );
        InMemoryGraphSource::new().with_graph("OPCO", graph)
    }

    #[tokio::test]
    async fn test_resolve_via_source() {
        let resolver = UboResolver::new(chain_source(), ResolveOptions::default());
        let resolution = resolver.resolve("OPCO").await.unwrap();

        assert_eq!(resolution.start_id, "OPCO");
        assert_eq!(resolution.owners.len(), 1);
        assert_eq!(resolution.owners[0].terminal_id, "FAMILY");
        assert_eq!(resolution.owners[0].path_length, 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_distinct_from_empty() {
        let resolver = UboResolver::new(chain_source(), ResolveOptions::default());
        let err = resolver.resolve("UNKNOWN").await.unwrap_err();
        assert!(matches!(err, ResolverError::Fetch(FetchError::NotFound { .. })));

        let resolver = UboResolver::new(
            InMemoryGraphSource::new().with_graph("EMPTY", OwnershipGraph::default()),
            ResolveOptions::default(),
        );
        let resolution = resolver.resolve("EMPTY").await.unwrap();
        assert!(resolution.owners.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_fetch() {
        let resolver = UboResolver::new(chain_source(), ResolveOptions::default());
        let cancel = CancelFlag::new();
        cancel.cancel();

        let err = resolver.resolve_with_cancel("OPCO", &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
        assert!(matches!(err, ResolverError::Fetch(FetchError::Cancelled)));
    }

    #[test]
    fn test_traversal_cancel_maps_to_resolve_error() {
        let err = ResolverError::from(ResolveError::Cancelled { explored: 3 });
        assert!(err.is_cancelled());
        assert!(!ResolverError::Worker("panic".into()).is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_during_traversal() {
        let resolver = UboResolver::new(dense_source(), unbounded_options());
        let cancel = CancelFlag::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = resolver.resolve_with_cancel("S", &cancel).await.unwrap_err();
        assert!(matches!(
            err,
            ResolverError::Resolve(ResolveError::Cancelled { .. })
        ));
    }

    #[test]
    fn test_dropped_resolve_stops_worker() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let resolver = UboResolver::new(dense_source(), unbounded_options());

        let outcome = runtime.block_on(async {
            tokio::time::timeout(Duration::from_millis(50), resolver.resolve("S")).await
        });
        assert!(outcome.is_err());

        // Runtime shutdown waits for blocking workers still running.
        let dropped_at = Instant::now();
        drop(runtime);
        assert!(dropped_at.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_completed_resolve_leaves_caller_flag_untouched() {
        let resolver = UboResolver::new(chain_source(), ResolveOptions::default());
        let cancel = CancelFlag::new();
        resolver.resolve_with_cancel("OPCO", &cancel).await.unwrap();
        assert!(!cancel.is_cancelled());
    }
}
