use super::node::Node;
use super::TwoFourTree;

struct TreeIterState<'a, T> {
    node: &'a Node<T>,
    pos: usize,
}

// Derived impls would require `T: Copy`
impl<'a, T> Clone for TreeIterState<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for TreeIterState<'a, T> {}

pub struct TreeIter<'a, T: Ord> {
    tree: &'a TwoFourTree<T>,
    /// List of parent nodes and current child position in them
    tail_states: Vec<TreeIterState<'a, T>>,
    /// The current node and the next element position to return
    head_state: TreeIterState<'a, T>,
    len: usize,
}

impl<'a, T: Ord> TreeIter<'a, T> {
    pub(super) fn new(tree: &'a TwoFourTree<T>) -> Self {
        // Create initial state, by recursing into child at the bottom
        let root = tree.node(tree.root);
        let mut iter = TreeIter {
            tree,
            tail_states: vec![],
            head_state: TreeIterState { node: root, pos: 0 },
            len: tree.len(),
        };
        iter.prepare_state_from(root);
        iter
    }

    fn prepare_state_from(&mut self, mut node: &'a Node<T>) {
        self.head_state = TreeIterState { node, pos: 0 };
        while !node.is_leaf() {
            node = self.tree.node(node.children[0]);
            let next_state = TreeIterState { node, pos: 0 };
            self.tail_states
                .push(std::mem::replace(&mut self.head_state, next_state));
        }
    }
}

impl<'a, T: Ord> Iterator for TreeIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let TreeIterState { node, pos } = self.head_state;
            if pos < node.len() {
                // Iterate in node
                let res = &node.items[pos];
                self.head_state.pos += 1;
                if !node.is_leaf() {
                    self.tail_states.push(self.head_state);
                    self.prepare_state_from(self.tree.node(node.children[pos + 1]));
                }
                self.len -= 1;
                return Some(res);
            }

            // Walk back up the chain
            self.head_state = self.tail_states.pop()?;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T: Ord> ExactSizeIterator for TreeIter<'a, T> {}
impl<'a, T: Ord> std::iter::FusedIterator for TreeIter<'a, T> {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn iter() {
        fn check<T: Ord + Clone + std::fmt::Debug>(mut values: Vec<T>) {
            let mut tree: TwoFourTree<T> = TwoFourTree::new();
            for i in values.iter() {
                tree.insert(i.clone());
            }

            values.sort();
            values.dedup();
            let iter = tree.iter();
            assert_eq!(iter.len(), values.len());
            let tree_collected = iter.cloned().collect::<Vec<_>>();

            assert_eq!(values, tree_collected);
        }

        // Empty tree
        check::<i32>(vec![]);

        // Leaf tree
        check((0..3).collect::<Vec<_>>());

        // Tree with two levels
        check((0..8).collect::<Vec<_>>());

        // Tree with several levels
        check((0..1000).rev().collect::<Vec<_>>());

        // Pi
        check(vec![
            31, 41, 59, 26, 53, 58, 97, 93, 23, 84, 62, 64, 33, 83, 27, 95, 2, 88, 41, 97, 16, 93,
            99, 37, 51, 5, 82, 9, 74, 94, 45, 92, 30, 78, 16, 40, 62, 86, 20, 89, 98, 62, 80, 34,
            82, 53, 42, 11, 70, 67, 98, 21, 48, 8, 65, 13, 28, 23, 6, 64, 70, 93, 84, 46, 9, 55, 5,
            82, 23, 17, 25, 35, 94, 8, 12, 84, 81, 11, 74, 50, 28, 41, 2, 70, 19, 38, 52, 11, 5,
            55, 96, 44, 62, 29, 48, 95, 49, 30, 38, 19, 64, 42, 88, 10, 97, 56, 65, 93, 34, 46, 12,
            84, 75, 64, 82, 33, 78, 67, 83, 16, 52, 71, 20, 19, 9, 14, 56, 48, 56, 69, 23, 46, 3,
            48, 61, 4, 54, 32, 66, 48, 21, 33, 93, 60, 72, 60, 24, 91, 41, 27, 37, 24, 58, 70, 6,
            60, 63, 15, 58, 81, 74, 88, 15, 20, 92, 9, 62, 82, 92, 54, 9, 17, 15, 36, 43, 67, 89,
            25, 90, 36, 0, 11, 33, 5, 30, 54, 88, 20, 46, 65, 21, 38, 41, 46, 95, 19, 41, 51, 16,
        ]);
    }

    #[test]
    fn iter_after_deletes() {
        let mut tree: TwoFourTree<i32> = (0..200).collect();
        for x in (0..200).filter(|x| x % 3 != 0) {
            tree.delete(&x).unwrap();
        }
        let expected = (0..200).filter(|x| x % 3 == 0).collect::<Vec<_>>();
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
        assert_eq!((&tree).into_iter().len(), expected.len());
    }

    #[test]
    fn fused() {
        let tree: TwoFourTree<i32> = (0..5).collect();
        let mut iter = tree.iter();
        assert_eq!(iter.by_ref().count(), 5);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }
}
