//! Path enumeration
//!
//! Breadth-first search over a queue of partial paths, walking upward from
//! the start node toward its owners.
//!
//! The cycle guard is per path, not global: an owner already on the current
//! path is skipped, but the same owner may be reached again on a sibling
//! branch. That is what lets both arms of a diamond
//!
//! ```text
//!        A
//!       / \
//!      B   C
//!       \ /
//!        D   (start)
//! ```
//!
//! reach `A` as two separate paths. Path length is bounded by the number of
//! distinct nodes; path count is not, hence [`ResolveOptions`] limits.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::cancel::CancelFlag;
use crate::classify::{TerminalClassifier, TerminalKind};
use crate::index::OwnershipIndex;
use crate::options::ResolveOptions;

/// Path from the start node up to the node it stopped at.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedPath<'a> {
    /// Node ids, start first. No id repeats.
    pub nodes: Vec<&'a str>,
    pub kind: TerminalKind,
}

impl<'a> CompletedPath<'a> {
    pub fn terminal(&self) -> &'a str {
        self.nodes.last().copied().unwrap_or_default()
    }

    /// Number of ownership links.
    pub fn length(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    /// Stopped after `max_paths` dequeued paths.
    MaxPaths,
    /// At least one path was dropped at `max_path_length` links.
    MaxPathLength,
}

/// Traversal stopped short of exhausting the graph. Results are partial.
///
/// `MaxPaths` takes precedence as `reason` when both limits were hit;
/// `length_capped` still records that long chains were dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truncation {
    pub reason: TruncationReason,
    /// Limit named by `reason`.
    pub limit: usize,
    pub explored: usize,
    /// At least one path was dropped at `max_path_length` links.
    #[serde(default)]
    pub length_capped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enumeration<'a> {
    pub paths: Vec<CompletedPath<'a>>,
    /// Partial paths dequeued.
    pub explored: usize,
    pub truncation: Option<Truncation>,
    /// The cancel flag was observed set; `paths` is incomplete.
    pub cancelled: bool,
}

pub struct PathEnumerator<'a> {
    index: &'a OwnershipIndex<'a>,
    classifier: TerminalClassifier<'a>,
    options: &'a ResolveOptions,
    cancel: Option<&'a CancelFlag>,
}

impl<'a> PathEnumerator<'a> {
    pub fn new(
        index: &'a OwnershipIndex<'a>,
        classifier: TerminalClassifier<'a>,
        options: &'a ResolveOptions,
    ) -> Self {
        Self {
            index,
            classifier,
            options,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: &'a CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn run(&self, start: &'a str) -> Enumeration<'a> {
        let check_every = self.options.cancel_check_interval.max(1);

        let mut completed = Vec::new();
        let mut explored = 0usize;
        let mut length_capped = false;
        let mut truncation = None;
        let mut cancelled = false;

        let mut queue: VecDeque<Vec<&'a str>> = VecDeque::new();
        queue.push_back(vec![start]);

        loop {
            if explored >= self.options.max_paths && !queue.is_empty() {
                truncation = Some(Truncation {
                    reason: TruncationReason::MaxPaths,
                    limit: self.options.max_paths,
                    explored,
                    length_capped,
                });
                break;
            }

            let Some(path) = queue.pop_front() else {
                break;
            };
            explored += 1;

            if explored % check_every == 0 && self.cancel.is_some_and(CancelFlag::is_cancelled) {
                cancelled = true;
                break;
            }

            let Some(&current) = path.last() else {
                continue;
            };

            if let Some(kind) = self.classifier.classify(current) {
                completed.push(CompletedPath { nodes: path, kind });
                continue;
            }

            let next: Vec<&'a str> = self
                .index
                .owners_of(current)
                .iter()
                .map(|link| link.owner)
                .filter(|owner| !path.contains(owner))
                .collect();

            if next.is_empty() {
                if current != start {
                    completed.push(CompletedPath {
                        nodes: path,
                        kind: TerminalKind::DeadEnd,
                    });
                }
                continue;
            }

            if path.len() > self.options.max_path_length {
                length_capped = true;
                continue;
            }

            for owner in next {
                let mut extended = Vec::with_capacity(path.len() + 1);
                extended.extend_from_slice(&path);
                extended.push(owner);
                queue.push_back(extended);
            }
        }

        if truncation.is_none() && length_capped {
            truncation = Some(Truncation {
                reason: TruncationReason::MaxPathLength,
                limit: self.options.max_path_length,
                explored,
                length_capped: true,
            });
        }

        if let Some(t) = &truncation {
            tracing::warn!(
                start,
                reason = ?t.reason,
                limit = t.limit,
                length_capped = t.length_capped,
                explored,
                "Ownership traversal truncated, results may be incomplete"
            );
        }

        Enumeration {
            paths: completed,
            explored,
            truncation,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OwnershipEdge, OwnershipGraph};

    fn enumerate<'a>(
        index: &'a OwnershipIndex<'a>,
        options: &'a ResolveOptions,
        start: &'a str,
    ) -> Enumeration<'a> {
        let classifier = TerminalClassifier::new(index, start);
        PathEnumerator::new(index, classifier, options).run(start)
    }

    #[test]
    fn test_diamond_yields_both_paths() {
        let graph = OwnershipGraph::new(
            vec![],
            vec![
                OwnershipEdge::new("A", "B", 50.0),
                OwnershipEdge::new("A", "C", 50.0),
                OwnershipEdge::new("B", "D", 60.0),
                OwnershipEdge::new("C", "D", 40.0),
            ],
        );
        let index = OwnershipIndex::build(&graph);
        let options = ResolveOptions::default();
        let result = enumerate(&index, &options, "D");

        let paths: Vec<_> = result.paths.iter().map(|p| p.nodes.clone()).collect();
        assert_eq!(paths, vec![vec!["D", "B", "A"], vec!["D", "C", "A"]]);
        assert!(result.truncation.is_none());
        assert!(!result.cancelled);
    }

    #[test]
    fn test_two_node_cycle_terminates_with_dead_end() {
        let graph = OwnershipGraph::new(
            vec![],
            vec![
                OwnershipEdge::new("A", "B", 100.0),
                OwnershipEdge::new("B", "A", 100.0),
            ],
        );
        let index = OwnershipIndex::build(&graph);
        let options = ResolveOptions::default();
        let result = enumerate(&index, &options, "B");

        assert_eq!(result.paths.len(), 1);
        assert_eq!(result.paths[0].nodes, vec!["B", "A"]);
        assert_eq!(result.paths[0].kind, TerminalKind::DeadEnd);
        assert_eq!(result.paths[0].terminal(), "A");
        assert_eq!(result.paths[0].length(), 1);
    }

    #[test]
    fn test_start_without_owners_yields_nothing() {
        let graph = OwnershipGraph::default();
        let index = OwnershipIndex::build(&graph);
        let options = ResolveOptions::default();
        let result = enumerate(&index, &options, "X");

        assert!(result.paths.is_empty());
        assert_eq!(result.explored, 1);
    }

    #[test]
    fn test_max_path_length_drops_long_chains() {
        // E -> D -> C -> B -> A (start A)
        let graph = OwnershipGraph::new(
            vec![],
            vec![
                OwnershipEdge::new("B", "A", 100.0),
                OwnershipEdge::new("C", "B", 100.0),
                OwnershipEdge::new("D", "C", 100.0),
                OwnershipEdge::new("E", "D", 100.0),
            ],
        );
        let index = OwnershipIndex::build(&graph);

        let options = ResolveOptions::default().with_max_path_length(2);
        let result = enumerate(&index, &options, "A");
        assert!(result.paths.is_empty());
        let truncation = result.truncation.unwrap();
        assert_eq!(truncation.reason, TruncationReason::MaxPathLength);
        assert_eq!(truncation.limit, 2);
        assert!(truncation.length_capped);

        let options = ResolveOptions::default().with_max_path_length(4);
        let result = enumerate(&index, &options, "A");
        assert_eq!(result.paths.len(), 1);
        assert_eq!(result.paths[0].length(), 4);
        assert!(result.truncation.is_none());
    }

    #[test]
    fn test_max_paths_stops_exploration() {
        // Start S owned by 5 independent owners.
        let edges = (0..5)
            .map(|i| OwnershipEdge::new(format!("O{i}"), "S", 20.0))
            .collect();
        let graph = OwnershipGraph::new(vec![], edges);
        let index = OwnershipIndex::build(&graph);
        let options = ResolveOptions::default().with_max_paths(3);
        let result = enumerate(&index, &options, "S");

        assert_eq!(result.explored, 3);
        assert_eq!(result.paths.len(), 2);
        let truncation = result.truncation.unwrap();
        assert_eq!(truncation.reason, TruncationReason::MaxPaths);
        assert_eq!(truncation.explored, 3);
        assert!(!truncation.length_capped);
    }

    #[test]
    fn test_both_limits_keep_length_cap() {
        // S <- M1 <- {A, B, C}, S <- M2 <- {D, E}; one link allowed.
        let graph = OwnershipGraph::new(
            vec![],
            vec![
                OwnershipEdge::new("M1", "S", 50.0),
                OwnershipEdge::new("M2", "S", 50.0),
                OwnershipEdge::new("A", "M1", 30.0),
                OwnershipEdge::new("B", "M1", 30.0),
                OwnershipEdge::new("C", "M1", 40.0),
                OwnershipEdge::new("D", "M2", 50.0),
                OwnershipEdge::new("E", "M2", 50.0),
            ],
        );
        let index = OwnershipIndex::build(&graph);
        let options = ResolveOptions::default()
            .with_max_path_length(1)
            .with_max_paths(2);
        let result = enumerate(&index, &options, "S");

        let truncation = result.truncation.unwrap();
        assert_eq!(truncation.reason, TruncationReason::MaxPaths);
        assert_eq!(truncation.limit, 2);
        assert!(truncation.length_capped);
    }

    #[test]
    fn test_self_held_owner_is_not_a_dead_end() {
        let graph = OwnershipGraph::new(
            vec![],
            vec![
                OwnershipEdge::new("A", "A", 100.0),
                OwnershipEdge::new("A", "S", 50.0),
            ],
        );
        let index = OwnershipIndex::build(&graph);
        let options = ResolveOptions::default();
        let result = enumerate(&index, &options, "S");

        assert_eq!(result.paths.len(), 1);
        assert_eq!(result.paths[0].nodes, vec!["S", "A"]);
        assert_eq!(result.paths[0].kind, TerminalKind::Ultimate);
    }

    #[test]
    fn test_cancel_stops_traversal() {
        let edges = (0..10)
            .map(|i| OwnershipEdge::new(format!("O{i}"), "S", 10.0))
            .collect();
        let graph = OwnershipGraph::new(vec![], edges);
        let index = OwnershipIndex::build(&graph);
        let options = ResolveOptions::default().with_cancel_check_interval(1);
        let cancel = CancelFlag::new();
        cancel.cancel();

        let classifier = TerminalClassifier::new(&index, "S");
        let result = PathEnumerator::new(&index, classifier, &options)
            .with_cancel(&cancel)
            .run("S");

        assert!(result.cancelled);
        assert_eq!(result.explored, 1);
        assert!(result.paths.is_empty());
    }
}
