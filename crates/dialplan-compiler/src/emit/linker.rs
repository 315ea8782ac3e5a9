//! Block placement and byte rendering.
//!
//! Blocks render in dependency order, jump destinations first, and the
//! buffer is laid out in *reverse* render order. Every jump therefore
//! lands forward, and the initial sequence, which renders last, sits at
//! offset zero.

use std::cmp::Reverse;

use dialplan_bytecode::{EncodeError, MapTarget, encode};
use dialplan_core::DigitMask;
use indexmap::IndexSet;

use crate::compile::{Op, Partition, SeqId, merge, synthesize};
use crate::dfa::{Graph, NodeId};
use crate::emit::{CompilerStats, InstrKind};
use crate::error::CompileError;

/// Render every sequence of `partition` and splice the blocks into one
/// program buffer.
///
/// Final sequences carry no jumps and render up front, largest deepest;
/// that leaves the one-byte terminators shallow, where the next block
/// rendered is likely to fall through into them. Every other sequence
/// renders once all of its successors are placed, scanned in discovery
/// order.
pub fn link<S: CompilerStats>(
    graph: &Graph,
    partition: &Partition,
    stats: &mut S,
) -> Result<Vec<u8>, CompileError> {
    let mut list = RenderList::new(partition);

    let mut finals: Vec<(SeqId, Vec<u8>)> = Vec::new();
    for (id, seq) in partition.iter() {
        if seq.is_final(graph) {
            finals.push((id, render_block(graph, partition, &list, id, stats)?));
        }
    }
    finals.sort_by_key(|(_, block)| Reverse(block.len()));
    for (id, block) in finals {
        list.place(id, block);
    }

    let mut pending: IndexSet<SeqId> = partition
        .iter()
        .map(|(id, _)| id)
        .filter(|&id| !list.is_placed(id))
        .collect();
    while !pending.is_empty() {
        let id = pending
            .iter()
            .copied()
            .find(|&id| {
                partition
                    .successors(graph, id)
                    .all(|succ| list.is_placed(succ))
            })
            .expect("acyclic graph always has a renderable sequence");
        pending.shift_remove(&id);
        let block = render_block(graph, partition, &list, id, stats)?;
        list.place(id, block);
    }

    let initial = partition
        .starting_at(graph.initial())
        .expect("initial node heads a sequence");
    debug_assert_eq!(
        list.placed[initial.0 as usize],
        Some(list.blocks.len() - 1),
        "initial sequence renders last"
    );
    Ok(list.into_buffer())
}

/// Placement state while rendering.
struct RenderList {
    /// Rendered blocks, in render order.
    blocks: Vec<Vec<u8>>,
    /// Render slot per sequence, indexed by [`SeqId`].
    placed: Vec<Option<usize>>,
    /// Cumulative byte count through each slot.
    through: Vec<usize>,
    /// Bytes rendered so far.
    total: usize,
}

impl RenderList {
    fn new(partition: &Partition) -> RenderList {
        RenderList {
            blocks: Vec::with_capacity(partition.len()),
            placed: vec![None; partition.len()],
            through: Vec::with_capacity(partition.len()),
            total: 0,
        }
    }

    fn is_placed(&self, id: SeqId) -> bool {
        self.placed[id.0 as usize].is_some()
    }

    /// Bytes rendered strictly after `id`'s block. Jump instructions end
    /// a block, so this is exactly the forward distance from the jump to
    /// the block's first instruction.
    fn gap_to(&self, id: SeqId) -> usize {
        let slot = self.placed[id.0 as usize].expect("jump to an unplaced sequence");
        self.total - self.through[slot]
    }

    fn place(&mut self, id: SeqId, block: Vec<u8>) {
        debug_assert!(!self.is_placed(id), "sequence rendered twice");
        self.placed[id.0 as usize] = Some(self.blocks.len());
        self.total += block.len();
        self.through.push(self.total);
        self.blocks.push(block);
    }

    fn into_buffer(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total);
        for block in self.blocks.into_iter().rev() {
            out.extend_from_slice(&block);
        }
        out
    }
}

/// Terminal jump of a block, encoded after its consume ops.
enum Tail {
    /// The block falls through or ends in [`Op::Term`].
    None,
    Branch {
        mask: DigitMask,
        offset: u32,
        accept: bool,
    },
    Map {
        arms: Vec<(DigitMask, MapTarget)>,
        accept: bool,
    },
}

/// Render one sequence: synthesized ops, the trailing dispatch lowered
/// against the current placement, one instruction per op.
fn render_block<S: CompilerStats>(
    graph: &Graph,
    partition: &Partition,
    list: &RenderList,
    id: SeqId,
    stats: &mut S,
) -> Result<Vec<u8>, CompileError> {
    let mut ops = synthesize(graph, partition.get(id));
    let tail = match ops.pop() {
        Some(Op::Map { arms, accept }) => lower(graph, partition, list, &mut ops, arms, accept)?,
        Some(op) => {
            ops.push(op);
            Tail::None
        }
        None => unreachable!("sequence synthesizes at least one op"),
    };
    let ops = merge(ops);

    let mut out = Vec::new();
    for op in &ops {
        match op {
            Op::Any { count, accept } => {
                encode::seek(&mut out, *count as u8, *accept);
                stats.record(InstrKind::Seek);
            }
            Op::Check { masks, accept } => {
                encode::check(&mut out, masks, *accept);
                stats.record(InstrKind::Check);
            }
            Op::Term => {
                encode::term(&mut out);
                stats.record(InstrKind::Term);
            }
            Op::Map { .. } => unreachable!("a map only ends a sequence"),
        }
    }
    match tail {
        Tail::None => {}
        Tail::Branch { mask, offset, accept } => {
            let width = encode::branch(&mut out, mask, offset, accept)?;
            stats.record(InstrKind::branch(width));
        }
        Tail::Map { arms, accept } => {
            let width = encode::map(&mut out, &arms, accept)?;
            stats.record(InstrKind::map(width));
        }
    }
    Ok(out)
}

/// Lower a trailing dispatch. Arms are resolved against the current
/// placement and regrouped by destination; distinct terminators all
/// resolve to the shared sentinel, so grouping runs after resolution.
///
/// A dispatch left with a single destination sheds the MAP encoding:
/// gap zero means the destination physically follows and the dispatch
/// becomes a plain consume step; a terminator destination becomes a
/// consume step plus an inline TERM; anything else becomes a BRANCH.
fn lower(
    graph: &Graph,
    partition: &Partition,
    list: &RenderList,
    ops: &mut Vec<Op>,
    arms: Vec<(DigitMask, NodeId)>,
    accept: bool,
) -> Result<Tail, CompileError> {
    let mut grouped: Vec<(DigitMask, MapTarget)> = Vec::new();
    for (mask, node) in arms {
        let target = resolve(graph, partition, list, node)?;
        match grouped.iter_mut().find(|(_, seen)| *seen == target) {
            Some((union, _)) => *union |= mask,
            None => grouped.push((mask, target)),
        }
    }

    if let [(mask, target)] = grouped[..] {
        match target {
            MapTarget::Offset(0) => ops.push(consume(mask, accept)),
            MapTarget::Offset(offset) => {
                return Ok(Tail::Branch { mask, offset, accept });
            }
            MapTarget::Terminate => {
                ops.push(consume(mask, accept));
                ops.push(Op::Term);
            }
        }
        return Ok(Tail::None);
    }
    Ok(Tail::Map { arms: grouped, accept })
}

/// Where a jump to `node`'s sequence lands, given everything placed so
/// far.
fn resolve(
    graph: &Graph,
    partition: &Partition,
    list: &RenderList,
    node: NodeId,
) -> Result<MapTarget, CompileError> {
    let dest = partition
        .starting_at(node)
        .expect("branch target heads a sequence");
    let gap = list.gap_to(dest);
    if gap != 0 && partition.get(dest).is_trivial_terminator(graph) {
        return Ok(MapTarget::Terminate);
    }
    let offset = u32::try_from(gap).map_err(|_| EncodeError::OffsetOverflow {
        offset: gap as u64,
        max: u64::from(u32::MAX) - 1,
    })?;
    Ok(MapTarget::Offset(offset))
}

fn consume(mask: DigitMask, accept: bool) -> Op {
    if mask.is_any() {
        Op::Any { count: 1, accept }
    } else {
        Op::Check { masks: vec![mask], accept }
    }
}
