#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Matcher bytecode format for dialplan.
//!
//! A compiled matcher is a flat byte buffer of variable-length instructions
//! executed front to back, jumping only forward. Each instruction starts
//! with one opcode byte:
//!
//! - bit 7: accept-at-entry flag (`A`) — input may end just before this
//!   instruction
//! - bits 6..4: instruction family
//! - bits 3..0: family-specific argument (`X`)
//!
//! | family | name   | `X`                  | operands                          |
//! |--------|--------|----------------------|-----------------------------------|
//! | 0      | TERM   | 0 (`A` must be 0)    | none                              |
//! | 1      | SEEK   | digit count 1..=15   | none                              |
//! | 2      | CHECK  | digit count 1..=15   | `X` × u16 mask                    |
//! | 3      | BRANCH | offset width 1 or 2  | u16 mask, `X`-byte offset         |
//! | 4      | MAP    | arm count 2..=10     | width byte, `X` × (mask + offset) |
//!
//! All multi-byte operands are little-endian. Offsets are unsigned forward
//! distances from the end of the instruction; in MAP arms the all-ones
//! offset is a sentinel meaning "terminate here" instead of a jump. The
//! buffer is position independent: execution always begins at offset 0.
//!
//! This crate contains:
//! - Instruction encode/decode (`encode`, [`Instruction`])
//! - The verified program container ([`Program`])
//! - A text disassembler ([`dump`])

mod dump;
pub mod encode;
mod instruction;
mod opcode;
mod program;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod encode_tests;

pub use dump::dump;
pub use encode::EncodeError;
pub use instruction::{Arms, DecodeError, Instruction, Masks};
pub use opcode::{Family, MAX_MAP_ARMS, MAX_RUN_LEN, MapTarget, OffsetWidth};
pub use program::{Instructions, Program, ProgramError};
