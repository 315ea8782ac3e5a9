#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core digit vocabulary shared by the dialplan compiler and interpreter.
//!
//! Two types:
//! - **`DigitMask`**: a set of decimal digits packed into the low 10 bits of
//!   a `u16`, used as the label on automaton edges and as the guard operand
//!   of matcher instructions
//! - **`DigitSequence`**: a bounded, inline-stored digit string, the input
//!   the compiled matcher classifies

use std::fmt;
use std::str::FromStr;


// ============================================================================
// Digit Masks
// ============================================================================

/// A set of decimal digits, one bit per digit in the low 10 bits.
///
/// Bit `d` set means digit `d` is in the set. Edge labels must be nonzero,
/// but the type itself permits [`DigitMask::EMPTY`] so unions can be built
/// up incrementally.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitMask(u16);

impl DigitMask {
    /// The set containing no digits.
    pub const EMPTY: DigitMask = DigitMask(0);

    /// The set containing all ten digits.
    pub const ANY: DigitMask = DigitMask(0x3FF);

    /// The set containing exactly `digit`.
    pub fn single(digit: u8) -> DigitMask {
        assert!(digit <= 9, "digit out of range: {digit}");
        DigitMask(1 << digit)
    }

    /// The set containing every digit yielded by `digits`.
    pub fn from_digits(digits: impl IntoIterator<Item = u8>) -> DigitMask {
        digits.into_iter().map(DigitMask::single).fold(DigitMask::EMPTY, DigitMask::union)
    }

    /// Wrap a raw bit pattern. Panics if any bit above the ten digit bits
    /// is set.
    pub fn from_bits(bits: u16) -> DigitMask {
        assert!(bits <= Self::ANY.0, "digit mask overflow: {bits:#06x}");
        DigitMask(bits)
    }

    /// Wrap a raw bit pattern, `None` if any non-digit bit is set.
    /// Decoders use this to reject malformed operands.
    pub fn try_from_bits(bits: u16) -> Option<DigitMask> {
        (bits <= Self::ANY.0).then_some(DigitMask(bits))
    }

    /// The raw bit pattern.
    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, digit: u8) -> bool {
        digit <= 9 && self.0 & (1 << digit) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_any(self) -> bool {
        self == Self::ANY
    }

    pub fn union(self, other: DigitMask) -> DigitMask {
        DigitMask(self.0 | other.0)
    }

    pub fn intersects(self, other: DigitMask) -> bool {
        self.0 & other.0 != 0
    }

    /// The smallest digit in the set, `None` when empty. This is the sort
    /// key wherever edges or branch arms are ordered.
    pub fn lowest_digit(self) -> Option<u8> {
        (!self.is_empty()).then(|| self.0.trailing_zeros() as u8)
    }

    /// Iterate the digits in the set in ascending order.
    pub fn digits(self) -> impl Iterator<Item = u8> {
        (0..=9u8).filter(move |&d| self.contains(d))
    }
}

impl std::ops::BitOr for DigitMask {
    type Output = DigitMask;

    fn bitor(self, rhs: DigitMask) -> DigitMask {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for DigitMask {
    fn bitor_assign(&mut self, rhs: DigitMask) {
        *self = self.union(rhs);
    }
}

/// Character-class style rendering: `[2]`, `[3-4]`, `[0-35-9]`, `[0-9]`.
impl fmt::Display for DigitMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut d = 0u8;
        while d <= 9 {
            if self.contains(d) {
                let start = d;
                while d < 9 && self.contains(d + 1) {
                    d += 1;
                }
                if d == start {
                    write!(f, "{start}")?;
                } else {
                    write!(f, "{start}-{d}")?;
                }
            }
            d += 1;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for DigitMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigitMask({self})")
    }
}

// ============================================================================
// Digit Sequences
// ============================================================================

/// Maximum number of digits in a [`DigitSequence`]. E.164 numbers top out
/// at 15 digits; the slack covers non-conforming national plans.
pub const MAX_DIGITS: usize = 19;

/// A digit string stored inline, at most [`MAX_DIGITS`] long.
///
/// This is the input type of the matcher interpreter. Digits are stored as
/// values `0..=9`, not ASCII.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DigitSequence {
    len: u8,
    digits: [u8; MAX_DIGITS],
}

impl DigitSequence {
    pub fn new() -> DigitSequence {
        DigitSequence::default()
    }

    /// Append a digit. Panics on a non-digit value or overflow; parsing
    /// untrusted input goes through [`FromStr`] instead.
    pub fn push(&mut self, digit: u8) {
        assert!(digit <= 9, "digit out of range: {digit}");
        assert!((self.len as usize) < MAX_DIGITS, "digit sequence overflow");
        self.digits[self.len as usize] = digit;
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.digits[..self.len as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.as_slice().iter().copied()
    }
}

/// Errors from parsing a digit string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDigitsError {
    #[error("digit string is {len} digits long, maximum is {MAX_DIGITS}")]
    TooLong { len: usize },
    #[error("invalid digit {ch:?} at position {pos}")]
    InvalidDigit { ch: char, pos: usize },
}

impl FromStr for DigitSequence {
    type Err = ParseDigitsError;

    fn from_str(s: &str) -> Result<DigitSequence, ParseDigitsError> {
        if s.chars().count() > MAX_DIGITS {
            return Err(ParseDigitsError::TooLong { len: s.chars().count() });
        }
        let mut seq = DigitSequence::new();
        for (pos, ch) in s.chars().enumerate() {
            match ch.to_digit(10) {
                Some(d) => seq.push(d as u8),
                None => return Err(ParseDigitsError::InvalidDigit { ch, pos }),
            }
        }
        Ok(seq)
    }
}

impl fmt::Display for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.iter() {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigitSequence(\"{self}\")")
    }
}
