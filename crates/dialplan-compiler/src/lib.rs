//! Dial-plan compiler: digit automaton in, verified byte program out.
//!
//! The pipeline runs in three stages:
//! - `dfa` - interns a caller's [`Automaton`] into an index-addressed
//!   [`Graph`] and validates it
//! - `compile` - partitions the graph into maximal linear sequences and
//!   synthesizes abstract ops per sequence
//! - `emit` - renders sequences to bytes and links the blocks into one
//!   position-independent buffer, entry point at offset zero
//!
//! [`compile()`] is the whole pipeline behind one call.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod compile;
pub mod dfa;
pub mod emit;

mod error;

#[cfg(test)]
pub mod test_utils;

pub use dfa::{Automaton, Edge, Graph, NodeId};
pub use emit::{CompilerStats, InstrKind, InstrMix, NoStats};
pub use error::CompileError;

pub use dialplan_bytecode::Program;

/// Compile `automaton` into a digit-matching program.
pub fn compile<A: Automaton>(automaton: &A) -> Result<Program, CompileError> {
    compile_with(automaton, &mut NoStats)
}

/// [`compile()`] with an instruction-stats sink.
pub fn compile_with<A: Automaton, S: CompilerStats>(
    automaton: &A,
    stats: &mut S,
) -> Result<Program, CompileError> {
    let graph = Graph::build(automaton)?;
    let partition = compile::partition(&graph);
    let bytes = emit::link(&graph, &partition, stats)?;
    Ok(Program::from_bytes(bytes).expect("linker emits verifiable programs"))
}
