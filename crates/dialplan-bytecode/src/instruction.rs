//! Instruction decoding: borrowed views over raw bytecode.

use dialplan_core::DigitMask;

use crate::opcode::{ACCEPT_BIT, ARG_BITS, Family, MAX_MAP_ARMS, MapTarget, OffsetWidth};

/// Errors from decoding a single instruction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("pc {pc} is out of bounds (program is {len} bytes)")]
    OutOfBounds { pc: usize, len: usize },
    #[error("invalid opcode {byte:#04x} at pc {pc}")]
    InvalidOpcode { pc: usize, byte: u8 },
    #[error("instruction at pc {pc} is truncated")]
    Truncated { pc: usize },
    #[error("invalid digit mask {bits:#06x} at pc {pc}")]
    InvalidMask { pc: usize, bits: u16 },
    #[error("invalid offset width {byte} at pc {pc}")]
    InvalidWidth { pc: usize, byte: u8 },
}

/// One decoded instruction. Operand views borrow the program bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Instruction<'a> {
    /// Input must be exhausted here.
    Term,
    /// Consume `count` digits without inspecting them.
    Seek { count: u8, accept: bool },
    /// Consume one digit per mask, each checked against its mask in order.
    Check { masks: Masks<'a>, accept: bool },
    /// Consume one digit in `mask`, then jump `offset` bytes past the end
    /// of the instruction.
    Branch { mask: DigitMask, offset: u32, width: OffsetWidth, accept: bool },
    /// Consume one digit and dispatch through the first arm whose mask
    /// contains it. Arm masks are disjoint.
    Map { arms: Arms<'a>, accept: bool },
}

impl<'a> Instruction<'a> {
    /// Decode the instruction at `pc`, returning it with its total encoded
    /// length.
    pub fn decode(buf: &'a [u8], pc: usize) -> Result<(Instruction<'a>, usize), DecodeError> {
        let &byte = buf.get(pc).ok_or(DecodeError::OutOfBounds { pc, len: buf.len() })?;
        let accept = byte & ACCEPT_BIT != 0;
        let arg = byte & ARG_BITS;
        let family =
            Family::from_opcode(byte).ok_or(DecodeError::InvalidOpcode { pc, byte })?;
        match family {
            Family::Term => {
                if accept || arg != 0 {
                    return Err(DecodeError::InvalidOpcode { pc, byte });
                }
                Ok((Instruction::Term, 1))
            }
            Family::Seek => {
                if arg == 0 {
                    return Err(DecodeError::InvalidOpcode { pc, byte });
                }
                Ok((Instruction::Seek { count: arg, accept }, 1))
            }
            Family::Check => {
                if arg == 0 {
                    return Err(DecodeError::InvalidOpcode { pc, byte });
                }
                let raw = operands(buf, pc, 1, arg as usize * 2)?;
                for i in 0..arg as usize {
                    decode_mask(raw, i * 2, pc)?;
                }
                Ok((Instruction::Check { masks: Masks { raw }, accept }, 1 + arg as usize * 2))
            }
            Family::Branch => {
                let width = match arg {
                    1 => OffsetWidth::One,
                    2 => OffsetWidth::Two,
                    _ => return Err(DecodeError::InvalidOpcode { pc, byte }),
                };
                let raw = operands(buf, pc, 1, 2 + width.byte_len())?;
                let mask = decode_mask(raw, 0, pc)?;
                let offset = width.read(&raw[2..]);
                Ok((Instruction::Branch { mask, offset, width, accept }, 3 + width.byte_len()))
            }
            Family::Map => {
                let count = arg as usize;
                if !(2..=MAX_MAP_ARMS).contains(&count) {
                    return Err(DecodeError::InvalidOpcode { pc, byte });
                }
                let &width_byte =
                    buf.get(pc + 1).ok_or(DecodeError::Truncated { pc })?;
                let width = OffsetWidth::from_byte(width_byte)
                    .ok_or(DecodeError::InvalidWidth { pc, byte: width_byte })?;
                let arm_len = 2 + width.byte_len();
                let raw = operands(buf, pc, 2, count * arm_len)?;
                for i in 0..count {
                    decode_mask(raw, i * arm_len, pc)?;
                }
                Ok((Instruction::Map { arms: Arms { raw, width }, accept }, 2 + count * arm_len))
            }
        }
    }

    /// Whether execution can continue into the next instruction in the
    /// buffer. BRANCH and MAP always jump; TERM always stops.
    pub fn falls_through(&self) -> bool {
        matches!(self, Instruction::Seek { .. } | Instruction::Check { .. })
    }
}

/// Operand slice of `len` bytes starting `skip` bytes past the opcode.
fn operands(buf: &[u8], pc: usize, skip: usize, len: usize) -> Result<&[u8], DecodeError> {
    buf.get(pc + skip..pc + skip + len).ok_or(DecodeError::Truncated { pc })
}

/// Read and validate the little-endian mask at `at`. Zero masks never
/// appear in well-formed code: every instruction that carries a mask
/// consumes a digit through it.
fn decode_mask(raw: &[u8], at: usize, pc: usize) -> Result<DigitMask, DecodeError> {
    let bits = u16::from_le_bytes([raw[at], raw[at + 1]]);
    match DigitMask::try_from_bits(bits) {
        Some(mask) if !mask.is_empty() => Ok(mask),
        _ => Err(DecodeError::InvalidMask { pc, bits }),
    }
}

/// The mask run of a CHECK instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Masks<'a> {
    raw: &'a [u8],
}

impl<'a> Masks<'a> {
    pub fn len(&self) -> usize {
        self.raw.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn get(&self, index: usize) -> DigitMask {
        let at = index * 2;
        DigitMask::from_bits(u16::from_le_bytes([self.raw[at], self.raw[at + 1]]))
    }

    pub fn iter(&self) -> impl Iterator<Item = DigitMask> + 'a {
        let raw = self.raw;
        (0..raw.len() / 2)
            .map(move |i| DigitMask::from_bits(u16::from_le_bytes([raw[i * 2], raw[i * 2 + 1]])))
    }
}

/// The arm table of a MAP instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Arms<'a> {
    raw: &'a [u8],
    width: OffsetWidth,
}

impl<'a> Arms<'a> {
    pub fn len(&self) -> usize {
        self.raw.len() / (2 + self.width.byte_len())
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn width(&self) -> OffsetWidth {
        self.width
    }

    pub fn get(&self, index: usize) -> (DigitMask, MapTarget) {
        let at = index * (2 + self.width.byte_len());
        let mask = DigitMask::from_bits(u16::from_le_bytes([self.raw[at], self.raw[at + 1]]));
        let offset = self.width.read(&self.raw[at + 2..]);
        let target = if offset == self.width.sentinel() {
            MapTarget::Terminate
        } else {
            MapTarget::Offset(offset)
        };
        (mask, target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DigitMask, MapTarget)> + 'a {
        let arms = *self;
        (0..arms.len()).map(move |i| arms.get(i))
    }
}
