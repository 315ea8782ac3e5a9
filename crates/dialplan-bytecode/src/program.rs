//! Verified program container.
//!
//! [`Program::from_bytes`] is the only way to obtain a `Program`, so every
//! instruction downstream code decodes out of one is known to be
//! well-formed: the buffer decodes cleanly end to end, every jump lands on
//! an instruction start, and the last instruction cannot fall off the end.

use dialplan_core::DigitMask;

use crate::instruction::{DecodeError, Instruction};
use crate::opcode::MapTarget;

/// Errors from verifying a byte buffer as a matcher program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    #[error("program is empty")]
    Empty,
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("jump from pc {pc} lands at {target}, not an instruction start")]
    BadJump { pc: usize, target: usize },
    #[error("instruction at pc {pc} falls through the end of the program")]
    TrailingFallthrough { pc: usize },
    #[error("map at pc {pc} has overlapping arm masks")]
    OverlappingArms { pc: usize },
}

/// A structurally verified matcher program.
#[derive(Clone, PartialEq, Eq)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Verify `bytes` and wrap them. Walks the whole buffer once, then
    /// checks every collected jump against the instruction starts.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Program, ProgramError> {
        if bytes.is_empty() {
            return Err(ProgramError::Empty);
        }

        // Sorted by construction: the walk is front to back.
        let mut starts = Vec::new();
        let mut jumps = Vec::new();
        let mut pc = 0;
        let mut falls_through = false;
        while pc < bytes.len() {
            let (insn, len) = Instruction::decode(&bytes, pc)?;
            let end = pc + len;
            match insn {
                Instruction::Branch { offset, .. } => {
                    jumps.push((pc, end + offset as usize));
                }
                Instruction::Map { arms, .. } => {
                    let mut seen = DigitMask::EMPTY;
                    for (mask, target) in arms.iter() {
                        if seen.intersects(mask) {
                            return Err(ProgramError::OverlappingArms { pc });
                        }
                        seen |= mask;
                        if let MapTarget::Offset(offset) = target {
                            jumps.push((pc, end + offset as usize));
                        }
                    }
                }
                Instruction::Term | Instruction::Seek { .. } | Instruction::Check { .. } => {}
            }
            falls_through = insn.falls_through();
            starts.push(pc);
            pc = end;
        }

        if falls_through {
            let &last = starts.last().expect("non-empty program has instructions");
            return Err(ProgramError::TrailingFallthrough { pc: last });
        }
        for (pc, target) in jumps {
            if starts.binary_search(&target).is_err() {
                return Err(ProgramError::BadJump { pc, target });
            }
        }
        Ok(Program { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the instruction at `pc`, which must be an instruction start
    /// of this program. Verification makes this infallible; a panic here
    /// is a bug in whoever produced the pc.
    pub fn decode_at(&self, pc: usize) -> (Instruction<'_>, usize) {
        Instruction::decode(&self.bytes, pc).expect("invalid pc in verified program")
    }

    /// Iterate `(pc, instruction)` pairs front to back.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions { program: self, pc: 0 }
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Program({} bytes)", self.bytes.len())
    }
}

/// Iterator over the instructions of a [`Program`].
pub struct Instructions<'a> {
    program: &'a Program,
    pc: usize,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = (usize, Instruction<'a>);

    fn next(&mut self) -> Option<(usize, Instruction<'a>)> {
        if self.pc >= self.program.len() {
            return None;
        }
        let at = self.pc;
        let (insn, len) = self.program.decode_at(at);
        self.pc = at + len;
        Some((at, insn))
    }
}
