//! Result aggregation
//!
//! One result per terminal node. Within a terminal's group the best path
//! wins; across groups results are ordered the same way.
//!
//! ## Ranking
//!
//! 1. Quantified ownership before unknown (`None`)
//! 2. Higher effective percentage first
//! 3. Fewer links first
//! 4. Earlier discovery first (BFS order, a function of input order only)

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::classify::TerminalKind;
use crate::enumerate::CompletedPath;
use crate::index::OwnershipIndex;
use crate::model::NodeId;

/// A completed path with its computed effective ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPath<'a> {
    pub path: CompletedPath<'a>,
    pub effective: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub id: NodeId,
    pub name: String,
}

/// An ultimate owner of the queried entity and its best ownership chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UltimateOwnerResult {
    pub terminal_id: NodeId,
    pub name: String,
    /// `None` when any link on the best chain is unknown.
    pub effective_ownership: Option<f64>,
    /// Links on the best chain.
    pub path_length: usize,
    /// Best chain, queried entity first.
    pub path: Vec<PathStep>,
    pub terminal_kind: TerminalKind,
    /// Distinct paths that reached this terminal.
    pub path_count: usize,
}

/// `Less` when `a` ranks ahead of `b`.
fn compare_rank(a: (Option<f64>, usize), b: (Option<f64>, usize)) -> Ordering {
    match (a.0, b.0) {
        (Some(x), Some(y)) => y.total_cmp(&x).then(a.1.cmp(&b.1)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.1.cmp(&b.1),
    }
}

pub fn aggregate(
    index: &OwnershipIndex<'_>,
    paths: Vec<AnnotatedPath<'_>>,
) -> Vec<UltimateOwnerResult> {
    let mut groups: Vec<(AnnotatedPath<'_>, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for candidate in paths {
        let terminal = candidate.path.terminal();
        match positions.get(terminal) {
            Some(&pos) => {
                let (best, count) = &mut groups[pos];
                *count += 1;
                let rank = compare_rank(
                    (candidate.effective, candidate.path.length()),
                    (best.effective, best.path.length()),
                );
                if rank == Ordering::Less {
                    *best = candidate;
                }
            }
            None => {
                positions.insert(terminal, groups.len());
                groups.push((candidate, 1));
            }
        }
    }

    let mut results: Vec<UltimateOwnerResult> = groups
        .into_iter()
        .map(|(best, path_count)| {
            let terminal = best.path.terminal();
            UltimateOwnerResult {
                terminal_id: terminal.to_string(),
                name: index.display_name(terminal),
                effective_ownership: best.effective,
                path_length: best.path.length(),
                path: best
                    .path
                    .nodes
                    .iter()
                    .map(|id| PathStep {
                        id: id.to_string(),
                        name: index.display_name(id),
                    })
                    .collect(),
                terminal_kind: best.path.kind,
                path_count,
            }
        })
        .collect();

    // Stable: equal ranks keep discovery order.
    results.sort_by(|a, b| {
        compare_rank(
            (a.effective_ownership, a.path_length),
            (b.effective_ownership, b.path_length),
        )
    });

    results
}
