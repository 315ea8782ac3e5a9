//! Human-readable program listing for debugging and snapshot tests.

use std::fmt::Write as _;

use crate::instruction::Instruction;
use crate::opcode::MapTarget;
use crate::program::Program;

/// Render `program` one instruction per line:
///
/// ```text
/// 0000   map.1 [1] -> 0014, [3] -> 0008
/// 0008   check [4] [3-4]
/// 0013   term
/// 0014  *check [2] [3-4]
/// 0019   term
/// ```
///
/// The leading number is the instruction's byte offset; `*` marks the
/// accept-at-entry flag; `.1`/`.2`/`.4` is the encoded offset width; arm
/// and branch targets are shown as resolved byte offsets, with `term` for
/// the termination sentinel.
pub fn dump(program: &Program) -> String {
    let mut out = String::new();
    let mut pc = 0;
    while pc < program.len() {
        let (insn, len) = program.decode_at(pc);
        let end = pc + len;
        let marker = if accept_of(&insn) { '*' } else { ' ' };
        write!(out, "{pc:04}  {marker}").unwrap();
        match insn {
            Instruction::Term => writeln!(out, "term").unwrap(),
            Instruction::Seek { count, .. } => writeln!(out, "seek {count}").unwrap(),
            Instruction::Check { masks, .. } => {
                write!(out, "check").unwrap();
                for mask in masks.iter() {
                    write!(out, " {mask}").unwrap();
                }
                writeln!(out).unwrap();
            }
            Instruction::Branch { mask, offset, width, .. } => {
                writeln!(
                    out,
                    "branch.{} {mask} -> {:04}",
                    width.byte_len(),
                    end + offset as usize
                )
                .unwrap();
            }
            Instruction::Map { arms, .. } => {
                write!(out, "map.{}", arms.width().byte_len()).unwrap();
                for (i, (mask, target)) in arms.iter().enumerate() {
                    if i > 0 {
                        write!(out, ",").unwrap();
                    }
                    match target {
                        MapTarget::Offset(offset) => {
                            write!(out, " {mask} -> {:04}", end + offset as usize).unwrap()
                        }
                        MapTarget::Terminate => write!(out, " {mask} -> term").unwrap(),
                    }
                }
                writeln!(out).unwrap();
            }
        }
        pc = end;
    }
    out
}

fn accept_of(insn: &Instruction<'_>) -> bool {
    match insn {
        Instruction::Term => false,
        Instruction::Seek { accept, .. }
        | Instruction::Check { accept, .. }
        | Instruction::Branch { accept, .. }
        | Instruction::Map { accept, .. } => *accept,
    }
}
