//! Arena-indexed snapshot of the input automaton.

use std::fmt;

use dialplan_core::DigitMask;
use indexmap::IndexMap;

use crate::dfa::Automaton;
use crate::error::CompileError;

/// Index of a node in a [`Graph`], in discovery order. The initial node
/// is always index 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub u32);

/// An outgoing edge of a graph node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Edge {
    pub mask: DigitMask,
    pub target: NodeId,
}

#[derive(Debug, Default)]
struct NodeData {
    accepts: bool,
    /// Sorted by lowest accepted digit.
    edges: Vec<Edge>,
    in_degree: u32,
}

/// The compiler's own view of the automaton: dense indices in discovery
/// order, edges sorted by lowest accepted digit, in-degrees precomputed.
/// Holds no borrow of the source automaton.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<NodeData>,
}

impl Graph {
    /// Walk the automaton from its initial node and snapshot every
    /// reachable node, rejecting inputs the matcher encoding cannot
    /// express: overlapping or empty edge masks, self-loops, cycles, and
    /// nodes that accept nothing.
    pub fn build<A: Automaton>(automaton: &A) -> Result<Graph, CompileError> {
        let mut ids: IndexMap<A::Node, NodeId> = IndexMap::new();
        let mut nodes: Vec<NodeData> = Vec::new();

        ids.insert(automaton.initial(), NodeId(0));
        nodes.push(NodeData::default());
        let mut worklist = vec![automaton.initial()];
        while let Some(node) = worklist.pop() {
            let id = ids[&node];
            let mut raw = automaton.edges(node);
            for &(mask, target) in &raw {
                if mask.is_empty() {
                    return Err(CompileError::EmptyMask { node: name(&node) });
                }
                if target == node {
                    return Err(CompileError::SelfLoop { node: name(&node) });
                }
            }
            raw.sort_by_key(|(mask, _)| mask.lowest_digit());

            let mut edges: Vec<Edge> = Vec::with_capacity(raw.len());
            let mut seen = DigitMask::EMPTY;
            for (mask, target) in raw {
                if seen.intersects(mask) {
                    let first = edges
                        .iter()
                        .find(|e| e.mask.intersects(mask))
                        .map(|e| e.mask)
                        .expect("accumulated mask intersection has a witness");
                    return Err(CompileError::OverlappingMasks {
                        node: name(&node),
                        first,
                        second: mask,
                    });
                }
                seen |= mask;

                let next = NodeId(ids.len() as u32);
                let target_id = *ids.entry(target).or_insert_with(|| {
                    nodes.push(NodeData::default());
                    worklist.push(target);
                    next
                });
                edges.push(Edge { mask, target: target_id });
            }
            nodes[id.0 as usize].accepts = automaton.can_terminate(node);
            nodes[id.0 as usize].edges = edges;
        }

        let mut in_degrees = vec![0u32; nodes.len()];
        for data in &nodes {
            for edge in &data.edges {
                in_degrees[edge.target.0 as usize] += 1;
            }
        }
        for (data, in_degree) in nodes.iter_mut().zip(in_degrees) {
            data.in_degree = in_degree;
        }

        if let Some(on_cycle) = find_cycle(&nodes) {
            let (node, _) = ids.get_index(on_cycle).expect("cycle node was interned");
            return Err(CompileError::CyclicAutomaton { node: name(node) });
        }
        // Acyclic and all-reachable leaves nothing pointing back at the
        // entry, which is what lets the linker put it at offset 0.
        debug_assert_eq!(nodes[0].in_degree, 0);

        for (index, data) in nodes.iter().enumerate() {
            if data.edges.is_empty() && !data.accepts {
                if index == 0 {
                    return Err(CompileError::EmptyAutomaton);
                }
                let (node, _) = ids.get_index(index).expect("node was interned");
                return Err(CompileError::DeadEnd { node: name(node) });
            }
        }

        Ok(Graph { nodes })
    }

    pub fn initial(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn accepts(&self, node: NodeId) -> bool {
        self.nodes[node.0 as usize].accepts
    }

    pub fn edges(&self, node: NodeId) -> &[Edge] {
        &self.nodes[node.0 as usize].edges
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.edges(node).len()
    }

    pub fn in_degree(&self, node: NodeId) -> u32 {
        self.nodes[node.0 as usize].in_degree
    }
}

fn name<N: fmt::Debug>(node: &N) -> String {
    format!("{node:?}")
}

/// Iterative three-state depth-first search; returns the index of a node
/// a back edge points at, if any.
fn find_cycle(nodes: &[NodeData]) -> Option<usize> {
    const NEW: u8 = 0;
    const OPEN: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![NEW; nodes.len()];
    let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
    state[0] = OPEN;
    while let Some((node, cursor)) = stack.last_mut() {
        let node = *node;
        if let Some(edge) = nodes[node].edges.get(*cursor) {
            *cursor += 1;
            let target = edge.target.0 as usize;
            match state[target] {
                NEW => {
                    state[target] = OPEN;
                    stack.push((target, 0));
                }
                OPEN => return Some(target),
                _ => {}
            }
        } else {
            state[node] = DONE;
            stack.pop();
        }
    }
    None
}
