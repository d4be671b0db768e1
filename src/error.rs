//! Error types returned by the tree.

use thiserror::Error;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All the errors a tree operation can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The key is not stored in the tree.
    ///
    /// Returned by `delete` for an absent key. The tree is left untouched.
    #[error("key not found")]
    NotFound,

    /// The structure broke one of the 2-4 tree invariants.
    ///
    /// Only `TwoFourTree::validate` reports this. Seeing it means there is a bug
    /// in the rebalancing code, not a condition callers can recover from.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
