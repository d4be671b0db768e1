//! Key sequences used to drive the tree from tests and benchmarks.
//! Every generator yields each key of `0..num` exactly once.

mod sequential;
mod shuffled;

pub use sequential::*;
pub use shuffled::*;
