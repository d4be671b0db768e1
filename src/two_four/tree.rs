use super::node::Node;
use super::*;
use crate::error::{Error, Result};
use log::{debug, trace};
use std::fmt;

/// An order-4 search tree: every node holds 1 to 3 ordered keys, every internal node
/// has one more child than keys and all leaves sit at the same depth.
///
/// Nodes live in an arena owned by the tree. A node's child list is the only owning
/// edge; the parent link is a plain id used to walk back up while rebalancing.
#[derive(Clone)]
pub struct TwoFourTree<T: Ord> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<NodeId>,
    pub(super) root: NodeId,
    len: usize,
}

/// Read-only handle to a node of the tree, as returned by `TwoFourTree::find`
pub struct NodeRef<'a, T: Ord> {
    tree: &'a TwoFourTree<T>,
    id: NodeId,
}

impl<T: Ord> TwoFourTree<T> {
    /// Create an empty tree: a single empty leaf acting as root
    pub fn new() -> Self {
        TwoFourTree {
            nodes: vec![Some(Node::new())],
            free: vec![],
            root: NodeId(0),
            len: 0,
        }
    }

    /// Insert `key` into the tree. Returns `false` (leaving the tree untouched) if it
    /// was already present.
    ///
    /// Full nodes met on the way down are split before descending, so the leaf reached
    /// at the end always has room for one more item.
    pub fn insert(&mut self, key: T) -> bool {
        // Looked up before descending: the splitting pass below would reshape the tree
        // even when the key turns out to be a duplicate
        if self.contains(&key) {
            return false;
        }

        let mut current = self.root;
        loop {
            if self.node(current).is_full() {
                let parent = self.split(current);
                current = self.node(parent).next_child(&key);
            } else if self.node(current).is_leaf() {
                break;
            } else {
                current = self.node(current).next_child(&key);
            }
        }

        self.node_mut(current).insert_item(key);
        self.len += 1;
        true
    }

    /// Return the node holding `key`, if any
    pub fn find(&self, key: &T) -> Option<NodeRef<T>> {
        self.locate(key).map(|(id, _)| NodeRef { tree: self, id })
    }

    /// Return whether `key` is stored in the tree
    pub fn contains(&self, key: &T) -> bool {
        self.locate(key).is_some()
    }

    /// Remove `key` from the tree.
    /// Fails with `Error::NotFound` if it is absent, in which case nothing changes
    pub fn delete(&mut self, key: &T) -> Result<()> {
        let (target, index) = match self.locate(key) {
            Some(found) => found,
            None => {
                debug!("delete: key not present, tree left unchanged");
                return Err(Error::NotFound);
            }
        };

        let leaf = if self.node(target).is_leaf() {
            self.node_mut(target).delete_item(key);
            target
        } else {
            // Swap in the in-order successor: the smallest key of the right subtree,
            // which always lives in a leaf
            let mut leaf = self.node(target).children[index + 1];
            while !self.node(leaf).is_leaf() {
                leaf = self.node(leaf).children[0];
            }
            let successor = self.node_mut(leaf).items.remove(0);
            self.node_mut(target).items[index] = successor;
            leaf
        };
        self.len -= 1;

        self.rebalance(leaf);
        Ok(())
    }

    /// Return the total number of keys in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return whether the tree holds no key
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every key, going back to a single empty root leaf
    pub fn clear(&mut self) {
        *self = TwoFourTree::new();
    }

    /// Return the number of levels in the tree. The empty tree has height 1
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = self.node(self.root);
        while !node.is_leaf() {
            node = self.node(node.children[0]);
            height += 1;
        }
        height
    }

    /// Return the smallest key
    pub fn first(&self) -> Option<&T> {
        let mut node = self.node(self.root);
        while !node.is_leaf() {
            node = self.node(node.children[0]);
        }
        node.items.first()
    }

    /// Return the largest key
    pub fn last(&self) -> Option<&T> {
        let mut node = self.node(self.root);
        while !node.is_leaf() {
            node = self.node(node.children[node.children.len() - 1]);
        }
        node.items.last()
    }

    /// Return a sorted iterator over references to the keys in the tree
    pub fn iter(&self) -> TreeIter<T> {
        TreeIter::new(self)
    }

    /// Return the keys, in ascending order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Return a handle to the root node
    pub fn root(&self) -> NodeRef<T> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    /// Walk the whole tree and check the structural invariants:
    /// - keys strictly increase in-order and respect the separators of their ancestors
    /// - every non-root node holds 1 to 3 keys
    /// - internal nodes have exactly one more child than keys
    /// - parent links mirror the child lists
    /// - all leaves are at the same depth
    /// - the arena holds no unreachable node and `len()` matches the stored keys
    pub fn validate(&self) -> Result<()> {
        let violation = |reason: String| Err(Error::InvariantViolation(reason));

        if self.node(self.root).parent.is_some() {
            return violation("root has a parent".to_string());
        }

        let mut leaf_depth = None;
        let mut num_items = 0;
        let mut num_nodes = 0;
        // (node, depth, exclusive lower bound, exclusive upper bound)
        let mut pending: Vec<(NodeId, usize, Option<&T>, Option<&T>)> =
            vec![(self.root, 0, None, None)];

        while let Some((id, depth, lower, upper)) = pending.pop() {
            let node = match self.nodes.get(id.0).and_then(Option::as_ref) {
                Some(node) => node,
                None => return violation(format!("{:?} points to a vacant slot", id)),
            };
            num_nodes += 1;
            num_items += node.len();

            if id != self.root && node.items.is_empty() {
                return violation(format!("{:?} is an empty non-root node", id));
            }
            if node.items.windows(2).any(|pair| pair[0] >= pair[1]) {
                return violation(format!("{:?} holds unordered keys", id));
            }
            let below_lower = match (lower, node.items.first()) {
                (Some(lower), Some(first)) => *first <= *lower,
                _ => false,
            };
            let above_upper = match (upper, node.items.last()) {
                (Some(upper), Some(last)) => *last >= *upper,
                _ => false,
            };
            if below_lower || above_upper {
                return violation(format!("{:?} holds keys outside its parent range", id));
            }

            if node.is_leaf() {
                match leaf_depth {
                    None => leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return violation(format!(
                            "{:?} is a leaf at depth {}, expected {}",
                            id, depth, expected
                        ))
                    }
                    _ => {}
                }
                continue;
            }

            if node.items.is_empty() {
                return violation(format!("{:?} is an internal node without keys", id));
            }
            if node.children.len() != node.len() + 1 {
                return violation(format!(
                    "{:?} has {} keys but {} children",
                    id,
                    node.len(),
                    node.children.len()
                ));
            }
            for (slot, &child) in node.children.iter().enumerate() {
                let child_parent = self.nodes.get(child.0).and_then(Option::as_ref);
                if child_parent.map(|child| child.parent) != Some(Some(id)) {
                    return violation(format!("{:?} does not link back to {:?}", child, id));
                }
                let child_lower = if slot == 0 {
                    lower
                } else {
                    Some(&node.items[slot - 1])
                };
                let child_upper = node.items.get(slot).or(upper);
                pending.push((child, depth + 1, child_lower, child_upper));
            }
        }

        if num_items != self.len {
            return violation(format!(
                "tree holds {} keys but len() is {}",
                num_items, self.len
            ));
        }
        let allocated = self.nodes.len() - self.free.len();
        if num_nodes != allocated {
            return violation(format!(
                "{} nodes reachable but {} allocated",
                num_nodes, allocated
            ));
        }
        Ok(())
    }

    /// Return the node holding `key` and the index of the key in it
    fn locate(&self, key: &T) -> Option<(NodeId, usize)> {
        let mut current = self.root;
        loop {
            let node = self.node(current);
            match node.search(key) {
                Ok(index) => return Some((current, index)),
                Err(_) if node.is_leaf() => return None,
                Err(slot) => current = node.children[slot],
            }
        }
    }

    /// Split a full node in two, pushing its middle item into the parent (a new root
    /// is created when splitting the root). Returns the parent.
    /// The parent must not be full: the top-down insertion guarantees that
    fn split(&mut self, id: NodeId) -> NodeId {
        let (middle, right_item, is_leaf) = {
            let node = self.node_mut(id);
            let right_item = node.remove_item();
            let middle = node.remove_item();
            (middle, right_item, node.is_leaf())
        };
        let right_children = if is_leaf {
            None
        } else {
            let child3 = self.disconnect_child(id, 3);
            let child2 = self.disconnect_child(id, 2);
            Some((child2, child3))
        };

        let parent = match self.node(id).parent {
            Some(parent) => parent,
            None => {
                let new_root = self.alloc(Node::new());
                self.connect_child(new_root, 0, id);
                self.root = new_root;
                trace!("split: grew a new root {:?}", new_root);
                new_root
            }
        };

        let index = self.node_mut(parent).insert_item(middle);
        let sibling = self.alloc(Node::with_item(right_item));
        self.connect_child(parent, index + 1, sibling);
        if let Some((child2, child3)) = right_children {
            self.connect_child(sibling, 0, child2);
            self.connect_child(sibling, 1, child3);
        }
        trace!(
            "split: {:?} gave its right half to {:?} under {:?}",
            id,
            sibling,
            parent
        );

        parent
    }

    /// Restore the invariants after `id` may have lost its last item.
    /// Each step either borrows from a sibling (done) or merges with one, which takes
    /// an item from the parent and may underflow it: the walk then moves one level up
    fn rebalance(&mut self, mut id: NodeId) {
        while self.node(id).items.is_empty() {
            let parent = match self.node(id).parent {
                Some(parent) => parent,
                None => {
                    self.collapse_root();
                    return;
                }
            };
            let slot = match self.node(parent).child_slot(id) {
                Some(slot) => slot,
                None => panic!("{:?} is not linked from its parent {:?}", id, parent),
            };

            if self.borrow_from_left(parent, slot) || self.borrow_from_right(parent, slot) {
                return;
            }
            self.merge(parent, slot);
            id = parent;
        }
    }

    /// Rotate the largest item of the left sibling through the parent into the
    /// underflowing child at `slot`. Returns `false` if that sibling cannot lend
    fn borrow_from_left(&mut self, parent: NodeId, slot: usize) -> bool {
        if slot == 0 {
            return false;
        }
        let (left, id) = {
            let parent = self.node(parent);
            (parent.children[slot - 1], parent.children[slot])
        };
        if self.node(left).len() < 2 {
            return false;
        }

        let lent = self.node_mut(left).remove_item();
        let separator = std::mem::replace(&mut self.node_mut(parent).items[slot - 1], lent);
        self.node_mut(id).items.insert(0, separator);
        if !self.node(left).is_leaf() {
            let last = self.node(left).children.len() - 1;
            let child = self.disconnect_child(left, last);
            self.connect_child(id, 0, child);
        }
        trace!("borrow: {:?} lent to its right sibling {:?}", left, id);
        true
    }

    /// Rotate the smallest item of the right sibling through the parent into the
    /// underflowing child at `slot`. Returns `false` if that sibling cannot lend
    fn borrow_from_right(&mut self, parent: NodeId, slot: usize) -> bool {
        let (right, id) = {
            let parent = self.node(parent);
            match parent.children.get(slot + 1) {
                Some(&right) => (right, parent.children[slot]),
                None => return false,
            }
        };
        if self.node(right).len() < 2 {
            return false;
        }

        let lent = self.node_mut(right).items.remove(0);
        let separator = std::mem::replace(&mut self.node_mut(parent).items[slot], lent);
        self.node_mut(id).items.push(separator);
        if !self.node(right).is_leaf() {
            let child = self.disconnect_child(right, 0);
            let end = self.node(id).children.len();
            self.connect_child(id, end, child);
        }
        trace!("borrow: {:?} lent to its left sibling {:?}", right, id);
        true
    }

    /// Fuse the underflowing child at `slot` with a sibling (the left one if any) and
    /// the separator between them. The right node of the pair is released
    fn merge(&mut self, parent: NodeId, slot: usize) {
        let left_slot = if slot > 0 { slot - 1 } else { slot };
        let left = self.node(parent).children[left_slot];
        let separator = self.node_mut(parent).items.remove(left_slot);
        let right = self.disconnect_child(parent, left_slot + 1);
        let right_node = self.release(right);

        let left_node = self.node_mut(left);
        left_node.items.push(separator);
        left_node.items.extend(right_node.items);
        for child in right_node.children {
            let end = self.node(left).children.len();
            self.connect_child(left, end, child);
        }
        trace!("merge: {:?} absorbed {:?} under {:?}", left, right, parent);
    }

    /// Once the root has run out of items, its only child (if any) takes its place
    fn collapse_root(&mut self) {
        let root = self.root;
        if !self.node(root).items.is_empty() || self.node(root).is_leaf() {
            return;
        }
        let child = self.disconnect_child(root, 0);
        self.release(root);
        self.root = child;
        trace!("merge: {:?} became the root, height decreased", child);
    }

    /// Link `child` into `parent` at `slot`, shifting the later children right
    fn connect_child(&mut self, parent: NodeId, slot: usize, child: NodeId) {
        self.node_mut(parent).children.insert(slot, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Unlink the child at `slot`, shifting the later children left
    fn disconnect_child(&mut self, parent: NodeId, slot: usize) -> NodeId {
        let child = self.node_mut(parent).children.remove(slot);
        self.node_mut(child).parent = None;
        child
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = Some(node);
                id
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<T> {
        match self.nodes[id.0].take() {
            Some(node) => {
                self.free.push(id);
                node
            }
            None => panic!("{:?} released twice", id),
        }
    }

    pub(super) fn node(&self, id: NodeId) -> &Node<T> {
        match &self.nodes[id.0] {
            Some(node) => node,
            None => panic!("{:?} points to a vacant slot", id),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match &mut self.nodes[id.0] {
            Some(node) => node,
            None => panic!("{:?} points to a vacant slot", id),
        }
    }
}

impl<'a, T: Ord> NodeRef<'a, T> {
    /// Return the keys stored in this node, in ascending order
    pub fn items(&self) -> &'a [T] {
        self.tree.node(self.id).items.as_slice()
    }

    /// Return the number of keys in this node
    pub fn len(&self) -> usize {
        self.tree.node(self.id).len()
    }

    /// Return whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.tree.node(self.id).is_leaf()
    }

    /// Return whether this node is the root of the tree
    pub fn is_root(&self) -> bool {
        self.id == self.tree.root
    }

    /// Return the parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        self.tree.node(self.id).parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// Return the children of this node, empty for a leaf
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, T>> + 'a {
        let tree = self.tree;
        tree.node(self.id)
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Return the distance to the root (the root is at depth 0)
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = *self;
        while let Some(parent) = node.parent() {
            depth += 1;
            node = parent;
        }
        depth
    }
}

impl<'a, T: Ord> Clone for NodeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: Ord> Copy for NodeRef<'a, T> {}

impl<'a, T: Ord + fmt::Debug> fmt::Debug for NodeRef<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items()).finish()
    }
}

impl<T: Ord> Default for TwoFourTree<T> {
    fn default() -> Self {
        TwoFourTree::new()
    }
}

impl<T: Ord> std::iter::FromIterator<T> for TwoFourTree<T> {
    /// Create a tree from an iterator. Repeated keys are stored once
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = TwoFourTree::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for TwoFourTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, T: Ord> IntoIterator for &'a TwoFourTree<T> {
    type Item = &'a T;
    type IntoIter = TreeIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Ord + fmt::Debug> fmt::Debug for TwoFourTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord + fmt::Display> fmt::Display for TwoFourTree<T> {
    /// One line per node, indented by depth, children listed after their parent
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TwoFourTree")?;
        let mut pending = vec![(self.root, 0)];
        while let Some((id, level)) = pending.pop() {
            let node = self.node(id);
            write!(f, "{}", "    ".repeat(level))?;
            for (i, item) in node.items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", item)?;
            }
            writeln!(f)?;
            pending.extend(node.children.iter().rev().map(|&child| (child, level + 1)));
        }
        Ok(())
    }
}
