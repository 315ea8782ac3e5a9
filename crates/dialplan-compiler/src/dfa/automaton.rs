//! The abstract automaton the compiler consumes.

use std::fmt;
use std::hash::Hash;

use dialplan_core::DigitMask;

/// A deterministic finite automaton over decimal digits.
///
/// The compiler reads nothing but this interface, so any representation of
/// a digit plan (a range tree, an explicit graph, a trie) can feed it.
///
/// Requirements, all checked by [`Graph::build`](super::Graph::build):
/// - the outgoing masks of a node are pairwise disjoint and nonzero
/// - no self-loops and no cycles: digit sequences are bounded, so the
///   reachable state graph is a DAG
/// - every node without outgoing edges is an accept state
pub trait Automaton {
    /// Node handle. `Debug` is how precondition errors name a node.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// The node matching starts in.
    fn initial(&self) -> Self::Node;

    /// Whether a digit sequence may end at `node`.
    fn can_terminate(&self, node: Self::Node) -> bool;

    /// Outgoing edges of `node`, one entry per distinct target.
    fn edges(&self, node: Self::Node) -> Vec<(DigitMask, Self::Node)>;
}
