//! The input side of the compiler: the abstract automaton contract and
//! the arena-indexed graph snapshot built from it.
//!
//! [`Graph::build`] is also the precondition gate: everything
//! [`CompileError`](crate::CompileError) can report about the shape of the
//! input is rejected here, before any compilation work happens.

mod automaton;
mod graph;


pub use automaton::Automaton;
pub use graph::{Edge, Graph, NodeId};
