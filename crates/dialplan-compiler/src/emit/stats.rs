//! Instruction statistics.

use dialplan_bytecode::OffsetWidth;

/// Category of one emitted instruction. BRANCH and MAP are split by the
/// offset width the linker managed to use; the spread across the
/// short/medium/long tiers is what the block-ordering heuristics are
/// trying to push toward the narrow end.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum InstrKind {
    Seek,
    Check,
    Term,
    BranchShort,
    BranchMedium,
    MapShort,
    MapMedium,
    MapLong,
}

impl InstrKind {
    pub(crate) fn branch(width: OffsetWidth) -> InstrKind {
        match width {
            OffsetWidth::One => InstrKind::BranchShort,
            OffsetWidth::Two => InstrKind::BranchMedium,
            OffsetWidth::Four => unreachable!("branch offsets are at most two bytes"),
        }
    }

    pub(crate) fn map(width: OffsetWidth) -> InstrKind {
        match width {
            OffsetWidth::One => InstrKind::MapShort,
            OffsetWidth::Two => InstrKind::MapMedium,
            OffsetWidth::Four => InstrKind::MapLong,
        }
    }
}

/// Sink for per-instruction records during emission.
///
/// `record` takes `&mut self`; sharing one collector across parallel
/// compilations needs external synchronization, compilation itself never
/// spawns any.
pub trait CompilerStats {
    fn record(&mut self, kind: InstrKind);
}

/// Discards every record. The default collector.
#[derive(Clone, Copy, Default, Debug)]
pub struct NoStats;

impl CompilerStats for NoStats {
    fn record(&mut self, _kind: InstrKind) {}
}

/// Counts emitted instructions by kind. Serializes to a flat object for
/// reporting.
#[derive(Clone, Default, PartialEq, Eq, Debug, serde::Serialize)]
pub struct InstrMix {
    pub seek: u32,
    pub check: u32,
    pub term: u32,
    pub branch_short: u32,
    pub branch_medium: u32,
    pub map_short: u32,
    pub map_medium: u32,
    pub map_long: u32,
}

impl InstrMix {
    pub fn new() -> InstrMix {
        InstrMix::default()
    }

    pub fn total(&self) -> u32 {
        self.seek
            + self.check
            + self.term
            + self.branch_short
            + self.branch_medium
            + self.map_short
            + self.map_medium
            + self.map_long
    }
}

impl CompilerStats for InstrMix {
    fn record(&mut self, kind: InstrKind) {
        let slot = match kind {
            InstrKind::Seek => &mut self.seek,
            InstrKind::Check => &mut self.check,
            InstrKind::Term => &mut self.term,
            InstrKind::BranchShort => &mut self.branch_short,
            InstrKind::BranchMedium => &mut self.branch_medium,
            InstrKind::MapShort => &mut self.map_short,
            InstrKind::MapMedium => &mut self.map_medium,
            InstrKind::MapLong => &mut self.map_long,
        };
        *slot += 1;
    }
}
