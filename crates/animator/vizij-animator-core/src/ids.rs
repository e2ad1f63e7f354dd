//! Identifiers for property tree nodes.

use serde::{Deserialize, Serialize};

/// Stable handle of one node in a [`PropertyTree`](crate::PropertyTree).
///
/// Ids are dense pre-order positions assigned once when the tree is built;
/// the tree shape never changes afterwards, so an id stays valid for the
/// lifetime of its tree and pairs nodes of identically shaped trees.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub u32);

impl PropertyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Monotonic allocator for PropertyId.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_property: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_property(&mut self) -> PropertyId {
        let id = PropertyId(self.next_property);
        self.next_property = self.next_property.wrapping_add(1);
        id
    }

    /// Number of ids handed out so far.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.next_property as usize
    }
}
