//! The middle of the pipeline: graph decomposition and operation
//! synthesis.
//!
//! - `partition`: split the graph into maximal linear runs (sequences)
//! - `ops`: turn one sequence into abstract matcher operations, fusing
//!   adjacent compatible steps

mod ops;
mod partition;

#[cfg(test)]
mod ops_tests;

pub use ops::{Op, merge, synthesize};
pub use partition::{Partition, SeqId, Sequence, partition};
