//! An order-4 self-balancing search tree.
//!
//! ```
//! use two_four_tree::{Error, TwoFourTree};
//!
//! let mut tree: TwoFourTree<i64> = vec![10, 20, 5, 15].into_iter().collect();
//! assert!(tree.find(&15).is_some());
//! assert!(tree.find(&25).is_none());
//!
//! tree.delete(&15).unwrap();
//! assert_eq!(tree.delete(&15), Err(Error::NotFound));
//! assert_eq!(tree.to_vec(), vec![5, 10, 20]);
//! ```

#[cfg(test)]
mod tests;

pub mod error;

mod two_four;

#[cfg(feature = "key-generator")]
pub mod key_generator;

pub use error::{Error, Result};
pub use two_four::{NodeRef, TreeIter, TwoFourTree};
