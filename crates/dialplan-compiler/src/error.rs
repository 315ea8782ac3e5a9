//! Compile-time error type.

use dialplan_bytecode::EncodeError;
use dialplan_core::DigitMask;

/// Errors from compiling an automaton.
///
/// Everything here is a precondition or capacity failure detected before
/// or during emission; a malformed intermediate state is a bug and panics
/// instead. Nodes are named by their `Debug` rendering in the source
/// automaton.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("automaton accepts nothing: the initial node has no outgoing edges and cannot terminate")]
    EmptyAutomaton,
    #[error("self-loop on node {node}")]
    SelfLoop { node: String },
    #[error("overlapping digit masks {first} and {second} on node {node}")]
    OverlappingMasks { node: String, first: DigitMask, second: DigitMask },
    #[error("empty digit mask on an edge of node {node}")]
    EmptyMask { node: String },
    #[error("cycle through node {node}: digit plans are bounded, the automaton must be acyclic")]
    CyclicAutomaton { node: String },
    #[error("dead end at node {node}: no outgoing edges and not an accept state")]
    DeadEnd { node: String },
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
