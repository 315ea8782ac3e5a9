//! Unit tests for op synthesis and fusion.

use dialplan_core::DigitMask;

use crate::compile::{Op, SeqId, merge, partition, synthesize};
use crate::dfa::{Graph, NodeId};
use crate::test_utils::{TestDfa, mask};

#[test]
fn chain_synthesizes_to_fused_check_and_term() {
    let mut dfa = TestDfa::new();
    let a = dfa.add(false);
    let b = dfa.add(true);
    dfa.edge(0, mask([1]), a);
    dfa.edge(a, mask([2, 3]), b);
    let graph = Graph::build(&dfa).unwrap();
    let part = partition(&graph);

    let ops = synthesize(&graph, part.get(SeqId(0)));

    assert_eq!(
        ops,
        vec![
            Op::Check { masks: vec![mask([1]), mask([2, 3])], accept: false },
            Op::Term,
        ]
    );
    assert!(ops[1].is_branching());
    assert!(!ops[0].is_branching());
}

#[test]
fn wildcard_edges_synthesize_to_seeks() {
    let mut dfa = TestDfa::new();
    let a = dfa.add(false);
    let b = dfa.add(true);
    dfa.edge(0, DigitMask::ANY, a);
    dfa.edge(a, DigitMask::ANY, b);
    let graph = Graph::build(&dfa).unwrap();
    let part = partition(&graph);

    let ops = synthesize(&graph, part.get(SeqId(0)));

    assert_eq!(ops, vec![Op::Any { count: 2, accept: false }, Op::Term]);
}

#[test]
fn accept_boundary_blocks_fusion() {
    // The middle node accepts, so ending the input between the two
    // consume steps must stay observable.
    let mut dfa = TestDfa::new();
    let a = dfa.add(true);
    let b = dfa.add(true);
    dfa.edge(0, DigitMask::ANY, a);
    dfa.edge(a, DigitMask::ANY, b);
    let graph = Graph::build(&dfa).unwrap();
    let part = partition(&graph);

    let ops = synthesize(&graph, part.get(SeqId(0)));

    assert_eq!(
        ops,
        vec![
            Op::Any { count: 1, accept: false },
            Op::Any { count: 1, accept: true },
            Op::Term,
        ]
    );
    assert!(ops[1].accept());
}

#[test]
fn branching_node_synthesizes_to_map() {
    let mut dfa = TestDfa::new();
    let fork = dfa.add(false);
    let x = dfa.add(true);
    let y = dfa.add(true);
    dfa.edge(0, mask([5]), fork);
    dfa.edge(fork, mask([1]), x);
    dfa.edge(fork, mask([2]), y);
    let graph = Graph::build(&dfa).unwrap();
    let part = partition(&graph);

    let ops = synthesize(&graph, part.get(SeqId(0)));

    assert_eq!(
        ops,
        vec![
            Op::Check { masks: vec![mask([5])], accept: false },
            Op::Map {
                arms: vec![(mask([1]), NodeId(2)), (mask([2]), NodeId(3))],
                accept: false,
            },
        ]
    );
}

#[test]
fn lone_accept_node_synthesizes_to_term() {
    let mut dfa = TestDfa::new();
    dfa.accept(0);
    let graph = Graph::build(&dfa).unwrap();
    let part = partition(&graph);

    let ops = synthesize(&graph, part.get(SeqId(0)));

    assert_eq!(ops, vec![Op::Term]);
}

#[test]
fn merge_caps_runs_at_instruction_capacity() {
    let ops: Vec<Op> = (0..20).map(|_| Op::Any { count: 1, accept: false }).collect();

    let merged = merge(ops);

    assert_eq!(
        merged,
        vec![
            Op::Any { count: 15, accept: false },
            Op::Any { count: 5, accept: false },
        ]
    );
}

#[test]
fn merge_concatenates_check_masks() {
    let ops: Vec<Op> = (0..=9u8)
        .map(|d| Op::Check { masks: vec![mask([d])], accept: false })
        .collect();

    let merged = merge(ops);

    assert_eq!(
        merged,
        vec![Op::Check { masks: (0..=9u8).map(|d| mask([d])).collect(), accept: false }]
    );
}

#[test]
fn merge_keeps_left_accept_flag() {
    let ops = vec![
        Op::Any { count: 1, accept: true },
        Op::Any { count: 1, accept: false },
    ];

    let merged = merge(ops);

    assert_eq!(merged, vec![Op::Any { count: 2, accept: true }]);
}

#[test]
fn merge_never_fuses_across_shapes() {
    let ops = vec![
        Op::Any { count: 2, accept: false },
        Op::Check { masks: vec![mask([7])], accept: false },
        Op::Any { count: 1, accept: false },
    ];

    let merged = merge(ops.clone());

    assert_eq!(merged, ops);
}

#[test]
fn merge_is_idempotent() {
    let ops = vec![
        Op::Any { count: 1, accept: false },
        Op::Any { count: 1, accept: true },
        Op::Any { count: 1, accept: false },
        Op::Check { masks: vec![mask([1])], accept: false },
        Op::Check { masks: vec![mask([2])], accept: false },
        Op::Term,
    ];

    let once = merge(ops);
    let twice = merge(once.clone());

    assert_eq!(once, twice);
    assert_eq!(
        once,
        vec![
            Op::Any { count: 1, accept: false },
            Op::Any { count: 2, accept: true },
            Op::Check { masks: vec![mask([1]), mask([2])], accept: false },
            Op::Term,
        ]
    );
}
