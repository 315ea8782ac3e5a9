//! Sequence partitioning.
//!
//! A sequence is a maximal linear run: the run extends past a node only
//! while that node has exactly one outgoing edge and the successor has
//! exactly one incoming edge. Branching and merging therefore happen only
//! at sequence boundaries, and every branch target is the first node of
//! some sequence.

use indexmap::IndexMap;

use crate::dfa::{Graph, NodeId};

/// Index of a sequence in a [`Partition`], in discovery order. The
/// initial node's sequence is always index 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SeqId(pub u32);

/// A maximal linear run of graph nodes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Sequence {
    nodes: Vec<NodeId>,
}

impl Sequence {
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn first(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn last(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether execution ends inside this sequence: its last node has no
    /// outgoing edges.
    pub fn is_final(&self, graph: &Graph) -> bool {
        graph.edges(self.last()).is_empty()
    }

    /// A one-node final sequence. Its whole rendering is a bare
    /// terminator, which referrers may replace with the termination
    /// sentinel instead of a jump.
    pub fn is_trivial_terminator(&self, graph: &Graph) -> bool {
        self.nodes.len() == 1 && self.is_final(graph)
    }
}

/// All sequences of a graph plus the first-node index.
pub struct Partition {
    seqs: Vec<Sequence>,
    by_first: IndexMap<NodeId, SeqId>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn get(&self, id: SeqId) -> &Sequence {
        &self.seqs[id.0 as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeqId, &Sequence)> {
        self.seqs.iter().enumerate().map(|(i, seq)| (SeqId(i as u32), seq))
    }

    /// The sequence starting at `first`, if `first` heads one.
    pub fn starting_at(&self, first: NodeId) -> Option<SeqId> {
        self.by_first.get(&first).copied()
    }

    /// Successor sequences of `id`: one per outgoing edge of its last
    /// node, in sorted-edge order.
    pub fn successors<'a>(
        &'a self,
        graph: &'a Graph,
        id: SeqId,
    ) -> impl Iterator<Item = SeqId> + 'a {
        graph.edges(self.get(id).last()).iter().map(|edge| {
            self.starting_at(edge.target)
                .expect("branch target heads a sequence")
        })
    }
}

/// Decompose the reachable graph into sequences. Every reachable node
/// lands in exactly one sequence; discovery follows sorted-edge order
/// from the initial node.
pub fn partition(graph: &Graph) -> Partition {
    let mut seqs = Vec::new();
    let mut by_first = IndexMap::new();
    let mut worklist = vec![graph.initial()];
    while let Some(start) = worklist.pop() {
        if by_first.contains_key(&start) {
            continue;
        }
        let mut nodes = vec![start];
        let mut current = start;
        while let [edge] = graph.edges(current)
            && graph.in_degree(edge.target) == 1
        {
            current = edge.target;
            nodes.push(current);
        }
        by_first.insert(start, SeqId(seqs.len() as u32));
        seqs.push(Sequence { nodes });
        // Reversed push so the sorted-first successor pops first.
        for edge in graph.edges(current).iter().rev() {
            worklist.push(edge.target);
        }
    }
    Partition { seqs, by_first }
}
