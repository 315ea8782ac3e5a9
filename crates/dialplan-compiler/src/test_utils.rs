//! Test helpers: hand-built automatons and language enumeration.

use dialplan_core::DigitMask;

use crate::dfa::Automaton;

/// Shorthand for [`DigitMask::from_digits`].
pub fn mask(digits: impl IntoIterator<Item = u8>) -> DigitMask {
    DigitMask::from_digits(digits)
}

/// An explicit automaton over small integer node ids, built edge by edge.
/// Node 0 is the initial node and exists from the start.
pub struct TestDfa {
    nodes: Vec<TestNode>,
}

#[derive(Default)]
struct TestNode {
    accepts: bool,
    edges: Vec<(DigitMask, usize)>,
}

impl TestDfa {
    pub fn new() -> TestDfa {
        TestDfa { nodes: vec![TestNode::default()] }
    }

    /// Add a node, returning its id.
    pub fn add(&mut self, accepts: bool) -> usize {
        self.nodes.push(TestNode { accepts, edges: Vec::new() });
        self.nodes.len() - 1
    }

    /// Mark an existing node as accepting.
    pub fn accept(&mut self, node: usize) {
        self.nodes[node].accepts = true;
    }

    pub fn edge(&mut self, from: usize, mask: DigitMask, to: usize) {
        self.nodes[from].edges.push((mask, to));
    }
}

impl Default for TestDfa {
    fn default() -> TestDfa {
        TestDfa::new()
    }
}

impl Automaton for TestDfa {
    type Node = usize;

    fn initial(&self) -> usize {
        0
    }

    fn can_terminate(&self, node: usize) -> bool {
        self.nodes[node].accepts
    }

    fn edges(&self, node: usize) -> Vec<(DigitMask, usize)> {
        self.nodes[node].edges.clone()
    }
}

/// Every digit string the automaton accepts, in depth-first order with
/// digits ascending inside each mask. Finite because valid automatons
/// are acyclic.
pub fn enumerate_language(dfa: &TestDfa) -> Vec<String> {
    let mut out = Vec::new();
    walk(dfa, 0, &mut String::new(), &mut out);
    out
}

fn walk(dfa: &TestDfa, node: usize, path: &mut String, out: &mut Vec<String>) {
    if dfa.nodes[node].accepts {
        out.push(path.clone());
    }
    for &(mask, target) in &dfa.nodes[node].edges {
        for digit in mask.digits() {
            path.push(char::from(b'0' + digit));
            walk(dfa, target, path, out);
            path.pop();
        }
    }
}
