use super::*;
use arrayvec::ArrayVec;

#[derive(Clone, Debug)]
pub(super) struct Node<T> {
    pub(super) items: ArrayVec<[T; MAX_ITEMS]>,
    pub(super) children: ArrayVec<[NodeId; MAX_CHILDREN]>,
    pub(super) parent: Option<NodeId>,
}

impl<T: Ord> Node<T> {
    /// Build an empty leaf, not yet attached to any parent
    pub(super) fn new() -> Self {
        Node {
            items: ArrayVec::new(),
            children: ArrayVec::new(),
            parent: None,
        }
    }

    /// Build a detached leaf holding a single item
    pub(super) fn with_item(item: T) -> Self {
        let mut node = Node::new();
        node.items.push(item);
        node
    }

    /// Return the total number of items in this node
    pub(super) fn len(&self) -> usize {
        self.items.len()
    }

    /// Return whether the node is a leaf
    pub(super) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Return whether the node has no room for another item
    pub(super) fn is_full(&self) -> bool {
        self.items.is_full()
    }

    /// Look for `key` in this node.
    /// Returns `Ok(index)` on an exact match, otherwise `Err(slot)` with the child slot
    /// whose key range contains `key`
    pub(super) fn search(&self, key: &T) -> Result<usize, usize> {
        for (i, item) in self.items.iter().enumerate() {
            if *key < *item {
                return Err(i);
            }
            if *key == *item {
                return Ok(i);
            }
        }
        Err(self.items.len())
    }

    /// Return the child that should be descended into to reach `key`.
    /// Panics if this is a leaf
    pub(super) fn next_child(&self, key: &T) -> NodeId {
        let slot = self
            .items
            .iter()
            .position(|item| *key < *item)
            .unwrap_or_else(|| self.items.len());
        self.children[slot]
    }

    /// Return the slot in which `child` is linked
    pub(super) fn child_slot(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&id| id == child)
    }

    /// Insert `item` at its sorted position, shifting greater items right.
    /// Returns the index it landed on. Panics if the node is full
    pub(super) fn insert_item(&mut self, item: T) -> usize {
        assert!(!self.is_full(), "insert_item on a full node");
        let index = match self.search(&item) {
            Ok(index) | Err(index) => index,
        };
        self.items.insert(index, item);
        index
    }

    /// Pop the largest item. Panics if the node is empty
    pub(super) fn remove_item(&mut self) -> T {
        match self.items.pop() {
            Some(item) => item,
            None => panic!("remove_item on an empty node"),
        }
    }

    /// Remove `key` from this leaf, shifting the greater items left
    pub(super) fn delete_item(&mut self, key: &T) -> Option<T> {
        debug_assert!(self.is_leaf());
        match self.search(key) {
            Ok(index) => Some(self.items.remove(index)),
            Err(_) => None,
        }
    }
}
