//! Terminal classification
//!
//! A node is an ultimate owner when the source flags it terminal, or when
//! nothing other than itself owns it. The queried start node is never classified terminal:
//! it has no self-ownership entry and is always expanded.

use serde::{Deserialize, Serialize};

use crate::index::OwnershipIndex;

/// Why a path stopped at its last node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalKind {
    /// No owners recorded above this node.
    Ultimate,
    /// Source data marks this node terminal. Takes precedence over owners.
    Flagged,
    /// Every remaining owner is already on the path. The chain closes a
    /// cycle and the data cannot be followed further.
    DeadEnd,
}

impl TerminalKind {
    /// Genuine ultimate owner, as opposed to a chain the data cut short.
    pub fn is_genuine(&self) -> bool {
        !matches!(self, TerminalKind::DeadEnd)
    }
}

pub struct TerminalClassifier<'a> {
    index: &'a OwnershipIndex<'a>,
    start: &'a str,
}

impl<'a> TerminalClassifier<'a> {
    pub fn new(index: &'a OwnershipIndex<'a>, start: &'a str) -> Self {
        Self { index, start }
    }

    /// Structural classification of a single node. Dead ends depend on the
    /// path and are detected by the enumerator instead.
    pub fn classify(&self, id: &str) -> Option<TerminalKind> {
        if id == self.start {
            None
        } else if self.index.is_flagged_terminal(id) {
            Some(TerminalKind::Flagged)
        } else if !self.index.has_owners(id) {
            Some(TerminalKind::Ultimate)
        } else {
            None
        }
    }
}
