use core::convert::TryInto;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A stable index addressing a simplex graph node within a triangulation.
///
/// Handles stay valid for the lifetime of their triangulation: nodes are
/// never removed from the underlying arena, they are only retired by
/// acquiring children. Neighbor and history bookkeeping store handles instead
/// of references, which keeps the cyclic adjacency graph free of lifetime
/// concerns while preserving O(1) rewiring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde")
)]
pub struct FixedNodeHandle {
    index: u32,
}

impl FixedNodeHandle {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index: index
                .try_into()
                .expect("Index too big - at most 2^32 elements supported"),
        }
    }

    /// Returns the arena index addressed by this handle.
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl core::fmt::Debug for FixedNodeHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FixedNodeHandle")
            .field("index", &self.index)
            .finish()
    }
}
