//! Bytecode emission.
//!
//! - `linker` - block placement and byte rendering
//! - `stats` - per-instruction accounting
//!
//! [`link`] renders every sequence of a partition to a block and splices
//! the blocks into one position-independent buffer, the entry point at
//! offset zero.

mod linker;
mod stats;


pub use linker::link;
pub use stats::{CompilerStats, InstrKind, InstrMix, NoStats};
