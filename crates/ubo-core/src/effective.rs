//! Effective ownership along one path
//!
//! The product of every link's stake, taken as a fraction, walking from the
//! owner end down to the queried entity. One unknown or non-positive link
//! makes the whole chain unquantifiable: there is no partial product.

use crate::index::OwnershipIndex;

/// Effective percentage held by the last node of `path` in its first node.
///
/// `path` is in traversal order, owned entity first. Returns `None` when any
/// link is unknown, non-positive or missing from the index.
pub fn effective_ownership(index: &OwnershipIndex<'_>, path: &[&str]) -> Option<f64> {
    let mut product = 1.0_f64;

    for link in path.windows(2).rev() {
        let (owned, owner) = (link[0], link[1]);
        let fraction = index.stake(owner, owned)?.as_fraction()?;
        product *= fraction;
    }

    Some(product * 100.0)
}
