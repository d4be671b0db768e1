use crate::TwoFourTree;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn shuffled(num: i64, seed: u64) -> Vec<i64> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut keys: Vec<i64> = (0..num).collect();
    keys.shuffle(&mut rng);
    keys
}

#[test]
fn random_workload() {
    for &(num, seed) in &[(1, 1), (10, 2), (100, 3), (1_000, 4), (5_000, 5)] {
        let inserts = shuffled(num, seed);
        let deletes = shuffled(num, seed + 100);

        let mut tree: TwoFourTree<i64> = inserts.iter().copied().collect();
        tree.validate().unwrap();
        assert_eq!(tree.len(), num as usize);

        for (i, key) in deletes.iter().enumerate() {
            tree.delete(key).unwrap();
            if i % 97 == 0 {
                tree.validate().unwrap();
            }
        }
        tree.validate().unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
    }
}

#[test]
fn ascending_and_descending_deletes() {
    let mut ascending: TwoFourTree<i64> = shuffled(2_000, 7).into_iter().collect();
    let mut descending = ascending.clone();

    for key in 0..2_000 {
        ascending.delete(&key).unwrap();
        descending.delete(&(1_999 - key)).unwrap();
        if key % 50 == 0 {
            ascending.validate().unwrap();
            descending.validate().unwrap();
        }
    }
    assert!(ascending.is_empty());
    assert!(descending.is_empty());
}

#[cfg(feature = "key-generator")]
#[test]
fn generated_keys() {
    use crate::key_generator::{SequentialKeys, SequentialOrder, ShuffledKeys};

    let mut tree: TwoFourTree<i64> =
        SequentialKeys::new(1_000, SequentialOrder::Descending).collect();
    tree.validate().unwrap();
    for key in ShuffledKeys::new(1_000, 17) {
        tree.delete(&key).unwrap();
    }
    assert!(tree.is_empty());
    tree.validate().unwrap();
}
