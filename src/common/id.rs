// Copyright (c) 2016-2021 Fabian Schuiki

//! Node identifiers.

use std::cell::Cell;
use std::fmt;

/// A positive number that uniquely identifies a node in a syntax tree.
///
/// IDs are allocated in ascending order from a thread-local counter. An ID
/// never identifies more than one node, even across trees.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node ID from a raw index.
    pub fn new(x: usize) -> NodeId {
        assert!(x < (std::u32::MAX as usize));
        NodeId(x as u32)
    }

    /// Allocate a fresh, unused node ID.
    pub fn alloc() -> NodeId {
        NEXT_ID.with(|c| {
            let id = c.get();
            c.set(id + 1);
            NodeId(id)
        })
    }

    /// Return the raw index of this ID.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

thread_local! {
    static NEXT_ID: Cell<u32> = Cell::new(1);
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}
