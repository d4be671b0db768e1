use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::iter::{ExactSizeIterator, FusedIterator};

/// An iterator over a random permutation of `0..num`.
/// The same `seed` always yields the same permutation
pub struct ShuffledKeys {
    keys: std::vec::IntoIter<i64>,
}

impl ShuffledKeys {
    pub fn new(num: usize, seed: u64) -> ShuffledKeys {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut keys: Vec<i64> = (0..num as i64).collect();
        keys.shuffle(&mut rng);
        ShuffledKeys {
            keys: keys.into_iter(),
        }
    }
}

impl Iterator for ShuffledKeys {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl FusedIterator for ShuffledKeys {}

impl ExactSizeIterator for ShuffledKeys {}
