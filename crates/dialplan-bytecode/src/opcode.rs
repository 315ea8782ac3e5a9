//! Opcode byte layout and shared encoding vocabulary.

/// Accept-at-entry flag, bit 7 of the opcode byte.
pub(crate) const ACCEPT_BIT: u8 = 0x80;

/// Family field, bits 6..4 of the opcode byte.
pub(crate) const FAMILY_SHIFT: u32 = 4;
pub(crate) const FAMILY_BITS: u8 = 0x07;

/// Argument field, bits 3..0 of the opcode byte.
pub(crate) const ARG_BITS: u8 = 0x0F;

/// Longest digit run a single SEEK or CHECK can consume (the capacity of
/// the 4-bit argument field).
pub const MAX_RUN_LEN: usize = 15;

/// Most arms a MAP can carry: one per distinct digit.
pub const MAX_MAP_ARMS: usize = 10;

/// Instruction family, bits 6..4 of the opcode byte.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Family {
    Term = 0,
    Seek = 1,
    Check = 2,
    Branch = 3,
    Map = 4,
}

impl Family {
    /// Extract the family from an opcode byte, `None` for the reserved
    /// encodings 5..=7.
    pub fn from_opcode(byte: u8) -> Option<Family> {
        match (byte >> FAMILY_SHIFT) & FAMILY_BITS {
            0 => Some(Family::Term),
            1 => Some(Family::Seek),
            2 => Some(Family::Check),
            3 => Some(Family::Branch),
            4 => Some(Family::Map),
            _ => None,
        }
    }
}

/// Assemble an opcode byte.
pub(crate) fn pack(family: Family, arg: u8, accept: bool) -> u8 {
    debug_assert!(arg <= ARG_BITS);
    let accept = if accept { ACCEPT_BIT } else { 0 };
    accept | ((family as u8) << FAMILY_SHIFT) | arg
}

/// Byte width of an encoded branch offset. The compiler picks the smallest
/// width that fits every real offset of the instruction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum OffsetWidth {
    One,
    Two,
    Four,
}

impl OffsetWidth {
    pub fn byte_len(self) -> usize {
        match self {
            OffsetWidth::One => 1,
            OffsetWidth::Two => 2,
            OffsetWidth::Four => 4,
        }
    }

    /// The all-ones offset of this width: the termination sentinel in MAP
    /// arms. A real offset must stay strictly below it.
    pub fn sentinel(self) -> u32 {
        match self {
            OffsetWidth::One => 0xFF,
            OffsetWidth::Two => 0xFFFF,
            OffsetWidth::Four => u32::MAX,
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Option<OffsetWidth> {
        match byte {
            1 => Some(OffsetWidth::One),
            2 => Some(OffsetWidth::Two),
            4 => Some(OffsetWidth::Four),
            _ => None,
        }
    }

    pub(crate) fn read(self, bytes: &[u8]) -> u32 {
        match self {
            OffsetWidth::One => bytes[0] as u32,
            OffsetWidth::Two => u16::from_le_bytes([bytes[0], bytes[1]]) as u32,
            OffsetWidth::Four => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }

    pub(crate) fn write(self, out: &mut Vec<u8>, value: u32) {
        debug_assert!(value <= self.sentinel());
        match self {
            OffsetWidth::One => out.push(value as u8),
            OffsetWidth::Two => out.extend_from_slice(&(value as u16).to_le_bytes()),
            OffsetWidth::Four => out.extend_from_slice(&value.to_le_bytes()),
        }
    }
}

/// Resolved destination of a MAP arm.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MapTarget {
    /// Jump this many bytes past the end of the instruction.
    Offset(u32),
    /// The match ends on this arm: behave like an inline TERM.
    Terminate,
}
