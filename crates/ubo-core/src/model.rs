//! Ownership graph model
//!
//! Immutable snapshot of entities and the percentage-weighted edges between
//! them, as supplied by the ownership data source for one resolution request.
//!
//! Edges point from owner (`source`) to owned (`target`). The engine walks
//! them in reverse, from the queried entity up toward its owners.
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "nodes": [{ "id": "A", "name": "Alpha Holdings", "isTerminal": true }],
//!   "edges": [{ "source": "A", "target": "B", "value": 50.0 }]
//! }
//! ```
//!
//! `value` is a number, `null` or absent. The latter two mean the stake is
//! disclosed but unquantified and map to [`Stake::Unknown`].

use serde::{Deserialize, Serialize};

/// Entity identifier. Identity is the id alone; names are display-only.
pub type NodeId = String;

// ============================================================================
// STAKE
// ============================================================================

/// Ownership percentage carried by one edge.
///
/// `Known(0.0)` is a real, quantified zero stake and is not the same thing
/// as `Unknown`. Callers match on the variant instead of testing for a falsy
/// number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Stake {
    /// Percentage, conceptually in `[0, 100]`.
    Known(f64),
    /// Disclosed but unquantified stake.
    #[default]
    Unknown,
}

impl Stake {
    /// Fraction in `(0, 1]` usable in an ownership product.
    ///
    /// Returns `None` for `Unknown`, for non-positive values and for NaN.
    pub fn as_fraction(&self) -> Option<f64> {
        match *self {
            Stake::Known(pct) if pct > 0.0 => Some(pct / 100.0),
            Stake::Known(_) | Stake::Unknown => None,
        }
    }
}

impl From<Option<f64>> for Stake {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(pct) => Stake::Known(pct),
            None => Stake::Unknown,
        }
    }
}

impl From<Stake> for Option<f64> {
    fn from(stake: Stake) -> Self {
        match stake {
            Stake::Known(pct) => Some(pct),
            Stake::Unknown => None,
        }
    }
}

impl From<f64> for Stake {
    fn from(pct: f64) -> Self {
        Stake::Known(pct)
    }
}

// ============================================================================
// NODES AND EDGES
// ============================================================================

/// An entity or asset in the ownership graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipNode {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    /// Source data marks this node as an ultimate owner regardless of
    /// any owners recorded above it.
    #[serde(default)]
    pub is_terminal: bool,
}

impl OwnershipNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_terminal: false,
        }
    }

    /// Same node, flagged terminal by the source.
    pub fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }
}

/// Directed ownership edge, owner (`source`) to owned (`target`).
///
/// Endpoints are optional so that malformed records from upstream can be
/// carried into the snapshot and skipped by the indexer rather than
/// failing deserialization of the whole graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipEdge {
    #[serde(default)]
    pub source: Option<NodeId>,
    #[serde(default)]
    pub target: Option<NodeId>,
    #[serde(default)]
    pub value: Stake,
}

impl OwnershipEdge {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        value: impl Into<Stake>,
    ) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            value: value.into(),
        }
    }

    /// Edge with an unquantified stake.
    pub fn unknown(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::new(source, target, Stake::Unknown)
    }

    /// `(owner, owned)` when both endpoints are present and non-empty.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        match (self.source.as_deref(), self.target.as_deref()) {
            (Some(source), Some(target)) if !source.is_empty() && !target.is_empty() => {
                Some((source, target))
            }
            _ => None,
        }
    }
}

// ============================================================================
// GRAPH
// ============================================================================

/// Snapshot of the ownership graph above one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnershipGraph {
    #[serde(default)]
    pub nodes: Vec<OwnershipNode>,
    #[serde(default)]
    pub edges: Vec<OwnershipEdge>,
}

impl OwnershipGraph {
    pub fn new(nodes: Vec<OwnershipNode>, edges: Vec<OwnershipEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Parse a snapshot from its JSON wire form.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stake_fraction() {
        assert_eq!(Stake::Known(50.0).as_fraction(), Some(0.5));
        assert_eq!(Stake::Known(0.0).as_fraction(), None);
        assert_eq!(Stake::Known(-5.0).as_fraction(), None);
        assert_eq!(Stake::Known(f64::NAN).as_fraction(), None);
        assert_eq!(Stake::Unknown.as_fraction(), None);
    }

    #[test]
    fn test_zero_is_not_unknown() {
        assert!(matches!(Stake::Known(0.0), Stake::Known(_)));
        assert_ne!(Stake::Known(0.0), Stake::Unknown);
    }

    #[test]
    fn test_graph_from_json() {
        let graph = OwnershipGraph::from_json(
            r#"{
                "nodes": [
                    { "id": "A", "name": "Alpha", "isTerminal": true },
                    { "id": "B", "name": "Beta" }
                ],
                "edges": [
                    { "source": "A", "target": "B", "value": 50 },
                    { "source": "C", "target": "B", "value": null },
                    { "source": "D", "target": "B" },
                    { "target": "B", "value": 10 }
                ]
            }"#,
        )
        .unwrap();

        assert!(graph.nodes[0].is_terminal);
        assert!(!graph.nodes[1].is_terminal);
        assert_eq!(graph.edges[0].value, Stake::Known(50.0));
        assert_eq!(graph.edges[1].value, Stake::Unknown);
        assert_eq!(graph.edges[2].value, Stake::Unknown);
        assert_eq!(graph.edges[3].endpoints(), None);
    }

    #[test]
    fn test_empty_endpoint_is_malformed() {
        let edge = OwnershipEdge::new("", "B", 10.0);
        assert_eq!(edge.endpoints(), None);
        let edge = OwnershipEdge::new("A", "B", 10.0);
        assert_eq!(edge.endpoints(), Some(("A", "B")));
    }

    #[test]
    fn test_stake_serializes_as_number_or_null() {
        let edge = OwnershipEdge::unknown("A", "B");
        let json = serde_json::to_value(&edge).unwrap();
        assert!(json["value"].is_null());

        let edge = OwnershipEdge::new("A", "B", 25.0);
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["value"], 25.0);
    }
}
