//! Cooperative cancellation shared between a caller and a running fetch or
//! traversal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    flag: Arc<AtomicBool>,
    parent: Option<Box<CancelFlag>>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag that observes this one but can be cancelled on its own without
    /// touching it.
    pub fn child(&self) -> Self {
        Self {
            flag: Arc::default(),
            parent: Some(Box::new(self.clone())),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }
}
