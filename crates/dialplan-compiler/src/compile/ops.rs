//! Operation synthesis for one sequence.

use dialplan_bytecode::MAX_RUN_LEN;
use dialplan_core::DigitMask;

use crate::compile::Sequence;
use crate::dfa::{Graph, NodeId};

/// Abstract matcher operation. `Map` and `Term` end a sequence; after
/// [`merge`] they are the only branching ops and always last.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Op {
    /// Consume `count` digits without inspecting them.
    Any { count: usize, accept: bool },
    /// Consume one digit per mask, each checked against its mask.
    Check { masks: Vec<DigitMask>, accept: bool },
    /// Dispatch on one digit to successor sequences.
    Map { arms: Vec<(DigitMask, NodeId)>, accept: bool },
    /// Input must end here.
    Term,
}

impl Op {
    /// The accept-at-entry flag. `Term` carries none: reaching it with
    /// exhausted input is a match by definition.
    pub fn accept(&self) -> bool {
        match self {
            Op::Any { accept, .. } | Op::Check { accept, .. } | Op::Map { accept, .. } => *accept,
            Op::Term => false,
        }
    }

    pub fn is_branching(&self) -> bool {
        matches!(self, Op::Map { .. } | Op::Term)
    }
}

/// Ops for one sequence: a consume step per interior node, then a
/// dispatch or terminator for the last node, merged.
///
/// The accept flag of each step comes from the node whose outgoing digit
/// the step consumes, answering "may the input end just before this
/// step".
pub fn synthesize(graph: &Graph, seq: &Sequence) -> Vec<Op> {
    let nodes = seq.nodes();
    let mut ops = Vec::with_capacity(nodes.len());
    for (i, &node) in nodes.iter().enumerate() {
        let accept = graph.accepts(node);
        if i + 1 < nodes.len() {
            let [edge] = graph.edges(node) else {
                unreachable!("interior sequence node has exactly one edge");
            };
            ops.push(if edge.mask.is_any() {
                Op::Any { count: 1, accept }
            } else {
                Op::Check { masks: vec![edge.mask], accept }
            });
        } else if graph.edges(node).is_empty() {
            ops.push(Op::Term);
        } else {
            let arms = graph.edges(node).iter().map(|e| (e.mask, e.target)).collect();
            ops.push(Op::Map { arms, accept });
        }
    }
    merge(ops)
}

/// Fuse adjacent compatible consume steps. Two steps fuse when they have
/// the same shape, the right one is not an accept boundary, and the fused
/// run still fits one instruction. Idempotent: merging a merged list
/// changes nothing.
pub fn merge(ops: Vec<Op>) -> Vec<Op> {
    let mut out: Vec<Op> = Vec::with_capacity(ops.len());
    for op in ops {
        match (out.last_mut(), op) {
            (Some(Op::Any { count, .. }), Op::Any { count: more, accept: false })
                if *count + more <= MAX_RUN_LEN =>
            {
                *count += more;
            }
            (Some(Op::Check { masks, .. }), Op::Check { masks: more, accept: false })
                if masks.len() + more.len() <= MAX_RUN_LEN =>
            {
                masks.extend(more);
            }
            (_, op) => out.push(op),
        }
    }
    out
}
