use crate::{Error, TwoFourTree};
use proptest::collection::{hash_set, vec};
use proptest::prelude::*;

/// Distinct keys, in two independent orders: one to insert them and one to delete them
fn insert_and_delete_orders() -> impl Strategy<Value = (Vec<i32>, Vec<i32>)> {
    hash_set(-1000i32..1000, 0..300).prop_flat_map(|keys| {
        let keys: Vec<i32> = keys.into_iter().collect();
        (Just(keys.clone()).prop_shuffle(), Just(keys).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn round_trip((inserts, deletes) in insert_and_delete_orders()) {
        let mut tree = TwoFourTree::new();
        for &key in &inserts {
            prop_assert!(tree.insert(key));
        }
        prop_assert_eq!(tree.len(), inserts.len());
        prop_assert_eq!(tree.validate(), Ok(()));

        for key in &deletes {
            prop_assert_eq!(tree.delete(key), Ok(()));
            prop_assert_eq!(tree.validate(), Ok(()));
        }

        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), 1);
        prop_assert_eq!(tree.root().len(), 0);
    }

    #[test]
    fn membership(keys in vec(-500i32..500, 0..200), probes in vec(-600i32..600, 0..100)) {
        let tree: TwoFourTree<i32> = keys.iter().copied().collect();
        for probe in probes.iter().chain(keys.iter()) {
            prop_assert_eq!(tree.find(probe).is_some(), keys.contains(probe));
        }
    }

    #[test]
    fn in_order_traversal(keys in vec(any::<i64>(), 0..300)) {
        let tree: TwoFourTree<i64> = keys.iter().copied().collect();
        let mut expected = keys.clone();
        expected.sort();
        expected.dedup();

        let collected: Vec<i64> = tree.iter().copied().collect();
        prop_assert_eq!(collected, expected.clone());
        prop_assert_eq!(tree.first(), expected.first());
        prop_assert_eq!(tree.last(), expected.last());
    }

    #[test]
    fn delete_absent_leaves_tree_unchanged(
        keys in hash_set(0i32..1000, 0..200),
        absent in 1000i32..2000,
    ) {
        let mut tree: TwoFourTree<i32> = keys.iter().copied().collect();
        let before = tree.to_string();
        prop_assert_eq!(tree.delete(&absent), Err(Error::NotFound));
        prop_assert_eq!(tree.to_string(), before);
        prop_assert_eq!(tree.len(), keys.len());
    }

    #[test]
    fn partial_deletes_keep_invariants(
        (inserts, deletes) in insert_and_delete_orders(),
        keep in 0usize..300,
    ) {
        let mut tree: TwoFourTree<i32> = inserts.iter().copied().collect();
        let keep = keep.min(deletes.len());
        let (kept, deleted) = deletes.split_at(keep);
        for key in deleted {
            tree.delete(key).unwrap();
        }
        prop_assert_eq!(tree.validate(), Ok(()));

        let mut expected = kept.to_vec();
        expected.sort();
        prop_assert_eq!(tree.to_vec(), expected);
        for key in deleted {
            prop_assert!(!tree.contains(key));
        }
    }
}
