//! The matcher interpreter.

use dialplan_bytecode::{Instruction, MapTarget, Program};
use dialplan_core::DigitSequence;

/// How a digit sequence relates to the language of a compiled matcher.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    /// The sequence is in the language.
    Matched,
    /// A proper prefix of some sequence in the language.
    TooShort,
    /// A sequence in the language extended by extra digits.
    TooLong,
    /// Diverged from the language: no continuation can ever match.
    Invalid,
}

/// Interpreter over a verified matcher program.
///
/// Execution begins at offset 0. Every instruction except TERM consumes at
/// least one digit and jumps only forward, so a run takes at most one
/// instruction per input digit plus the trailing terminator; there is no
/// fuel accounting.
///
/// The accept-at-entry flag answers "may the input end just before this
/// instruction": if the digits run out at an instruction entry, the flag
/// decides between [`MatchResult::Matched`] and [`MatchResult::TooShort`].
#[derive(Clone, Copy, Debug)]
pub struct DigitMatcher<'p> {
    program: &'p Program,
}

impl<'p> DigitMatcher<'p> {
    pub fn new(program: &'p Program) -> DigitMatcher<'p> {
        DigitMatcher { program }
    }

    /// Classify `input` against the compiled language.
    pub fn run(&self, input: &DigitSequence) -> MatchResult {
        let digits = input.as_slice();
        let mut pos = 0;
        let mut pc = 0;
        loop {
            let (insn, len) = self.program.decode_at(pc);
            let end = pc + len;
            match insn {
                Instruction::Term => {
                    return if pos == digits.len() {
                        MatchResult::Matched
                    } else {
                        MatchResult::TooLong
                    };
                }
                Instruction::Seek { count, accept } => {
                    if pos == digits.len() {
                        return exhausted(accept);
                    }
                    if digits.len() - pos < count as usize {
                        return MatchResult::TooShort;
                    }
                    pos += count as usize;
                    pc = end;
                }
                Instruction::Check { masks, accept } => {
                    if pos == digits.len() {
                        return exhausted(accept);
                    }
                    for mask in masks.iter() {
                        let Some(&digit) = digits.get(pos) else {
                            return MatchResult::TooShort;
                        };
                        if !mask.contains(digit) {
                            return MatchResult::Invalid;
                        }
                        pos += 1;
                    }
                    pc = end;
                }
                Instruction::Branch { mask, offset, accept, .. } => {
                    if pos == digits.len() {
                        return exhausted(accept);
                    }
                    if !mask.contains(digits[pos]) {
                        return MatchResult::Invalid;
                    }
                    pos += 1;
                    pc = end + offset as usize;
                }
                Instruction::Map { arms, accept } => {
                    if pos == digits.len() {
                        return exhausted(accept);
                    }
                    let digit = digits[pos];
                    let Some((_, target)) = arms.iter().find(|(mask, _)| mask.contains(digit))
                    else {
                        return MatchResult::Invalid;
                    };
                    pos += 1;
                    match target {
                        MapTarget::Offset(offset) => pc = end + offset as usize,
                        MapTarget::Terminate => {
                            return if pos == digits.len() {
                                MatchResult::Matched
                            } else {
                                MatchResult::TooLong
                            };
                        }
                    }
                }
            }
        }
    }
}

fn exhausted(accept: bool) -> MatchResult {
    if accept { MatchResult::Matched } else { MatchResult::TooShort }
}
