mod node;
mod tree;
mod tree_iter;

pub use tree::{NodeRef, TwoFourTree};
pub use tree_iter::TreeIter;

// A node holds at most this many keys
const MAX_ITEMS: usize = 3;

// ... and at most one more child than keys
const MAX_CHILDREN: usize = MAX_ITEMS + 1;

/// Position of a node inside the tree arena.
/// Only the parent's child list owns a node: other copies of the id are back-references
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct NodeId(usize);
