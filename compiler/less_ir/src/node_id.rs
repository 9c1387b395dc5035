//! Process-unique node identities.
//!
//! Every node instance carries a [`NodeId`]. Ids back the evaluator's
//! recursion guard (a set of in-flight ids) and the non-owning parent links
//! used for diagnostics, so they must never be reused within a process.
//! Cloning a node keeps its id: a clone is the same logical instance.
//! Evaluation results get fresh ids through [`NodeMeta::derive`].
//!
//! [`NodeMeta::derive`]: crate::NodeMeta::derive

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate an id no other node in this process has.
    #[inline]
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}
