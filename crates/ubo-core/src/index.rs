//! Ownership index
//!
//! Reverse adjacency (owned -> owners) built in one pass over the edge list.
//! Built fresh for every resolution request and dropped with it.
//!
//! Upstream data is expected to be imperfect. Nothing here fails:
//! - edges with a missing endpoint are skipped and counted
//! - repeated edges for the same `(owner, owned)` pair keep the first value
//! - owners referenced only by edges (no node record) are indexed normally
//! - a self-holding (`A -> A`, e.g. treasury shares) is indexed but does not
//!   count as an owner above `A`

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{OwnershipGraph, OwnershipNode, Stake};

/// Data quality problems recovered from while indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataIssues {
    /// Edges without a usable `source` or `target`.
    pub malformed_edges: usize,
    /// Edges repeating an already indexed `(owner, owned)` pair.
    pub duplicate_edges: usize,
    /// Subset of `duplicate_edges` whose value differs from the first edge.
    pub conflicting_duplicate_edges: usize,
    /// Node records repeating an id already seen.
    pub duplicate_nodes: usize,
    /// Owner ids that appear only on edges. Informational, not an issue.
    pub owners_without_records: usize,
}

impl DataIssues {
    /// True when any inconsistency was recovered from.
    pub fn any(&self) -> bool {
        self.malformed_edges > 0 || self.duplicate_edges > 0 || self.duplicate_nodes > 0
    }
}

/// One direct owner of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerLink<'g> {
    pub owner: &'g str,
    pub stake: Stake,
}

/// Reverse adjacency over one graph snapshot.
#[derive(Debug)]
pub struct OwnershipIndex<'g> {
    owners: HashMap<&'g str, Vec<OwnerLink<'g>>>,
    nodes: HashMap<&'g str, &'g OwnershipNode>,
    issues: DataIssues,
}

impl<'g> OwnershipIndex<'g> {
    pub fn build(graph: &'g OwnershipGraph) -> Self {
        let mut issues = DataIssues::default();

        let mut nodes: HashMap<&'g str, &'g OwnershipNode> = HashMap::new();
        for node in &graph.nodes {
            if nodes.contains_key(node.id.as_str()) {
                issues.duplicate_nodes += 1;
                continue;
            }
            nodes.insert(node.id.as_str(), node);
        }

        let mut owners: HashMap<&'g str, Vec<OwnerLink<'g>>> = HashMap::new();

        for (position, edge) in graph.edges.iter().enumerate() {
            let Some((owner, owned)) = edge.endpoints() else {
                issues.malformed_edges += 1;
                tracing::warn!(position, "Skipping ownership edge with missing endpoint");
                continue;
            };

            let links = owners.entry(owned).or_default();
            if let Some(existing) = links.iter().find(|l| l.owner == owner) {
                issues.duplicate_edges += 1;
                if existing.stake != edge.value {
                    issues.conflicting_duplicate_edges += 1;
                    tracing::warn!(
                        owner,
                        owned,
                        kept = ?existing.stake,
                        ignored = ?edge.value,
                        "Conflicting duplicate ownership edge, keeping first"
                    );
                }
                continue;
            }

            links.push(OwnerLink {
                owner,
                stake: edge.value,
            });
        }

        issues.owners_without_records = owners
            .values()
            .flatten()
            .map(|l| l.owner)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|id| !nodes.contains_key(id))
            .count();

        tracing::debug!(
            nodes = nodes.len(),
            owned = owners.len(),
            malformed = issues.malformed_edges,
            duplicates = issues.duplicate_edges,
            "Built ownership index"
        );

        Self {
            owners,
            nodes,
            issues,
        }
    }

    /// Direct owners of `id`, in edge order.
    pub fn owners_of(&self, id: &str) -> &[OwnerLink<'g>] {
        self.owners.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when someone other than `id` itself holds a stake in `id`.
    pub fn has_owners(&self, id: &str) -> bool {
        self.owners_of(id).iter().any(|l| l.owner != id)
    }

    /// Stake `owner` holds in `owned`, first edge wins.
    pub fn stake(&self, owner: &str, owned: &str) -> Option<Stake> {
        self.owners_of(owned)
            .iter()
            .find(|l| l.owner == owner)
            .map(|l| l.stake)
    }

    pub fn node(&self, id: &str) -> Option<&'g OwnershipNode> {
        self.nodes.get(id).copied()
    }

    /// True when the source data flags `id` as an ultimate owner.
    pub fn is_flagged_terminal(&self, id: &str) -> bool {
        self.node(id).is_some_and(|n| n.is_terminal)
    }

    /// Display name, falling back to the id when there is no usable record.
    pub fn display_name(&self, id: &str) -> String {
        match self.node(id) {
            Some(node) if !node.name.is_empty() => node.name.clone(),
            _ => id.to_string(),
        }
    }

    pub fn issues(&self) -> &DataIssues {
        &self.issues
    }
}
