//! Instruction encoding.
//!
//! Free functions appending one instruction each to a byte buffer.
//! Argument ranges are asserted (callers own those invariants); running
//! out of offset capacity is the only recoverable failure.

use dialplan_core::DigitMask;

use crate::opcode::{self, Family, MAX_MAP_ARMS, MAX_RUN_LEN, MapTarget, OffsetWidth};

/// Errors from encoding an instruction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("branch offset {offset} exceeds the widest encodable offset {max}")]
    OffsetOverflow { offset: u64, max: u64 },
}

/// Append a TERM instruction.
pub fn term(out: &mut Vec<u8>) {
    out.push(opcode::pack(Family::Term, 0, false));
}

/// Append a SEEK consuming `count` unchecked digits.
pub fn seek(out: &mut Vec<u8>, count: u8, accept: bool) {
    assert!(
        (1..=MAX_RUN_LEN).contains(&(count as usize)),
        "seek count out of range: {count}"
    );
    out.push(opcode::pack(Family::Seek, count, accept));
}

/// Append a CHECK consuming one digit per mask.
pub fn check(out: &mut Vec<u8>, masks: &[DigitMask], accept: bool) {
    assert!(
        (1..=MAX_RUN_LEN).contains(&masks.len()),
        "check run length out of range: {}",
        masks.len()
    );
    out.push(opcode::pack(Family::Check, masks.len() as u8, accept));
    for mask in masks {
        assert!(!mask.is_empty(), "empty mask in check");
        out.extend_from_slice(&mask.bits().to_le_bytes());
    }
}

/// Append a BRANCH consuming one digit in `mask` and jumping `offset`
/// bytes past the instruction end. Returns the offset width used.
pub fn branch(
    out: &mut Vec<u8>,
    mask: DigitMask,
    offset: u32,
    accept: bool,
) -> Result<OffsetWidth, EncodeError> {
    assert!(!mask.is_empty(), "empty mask in branch");
    let width = if offset <= 0xFF {
        OffsetWidth::One
    } else if offset <= 0xFFFF {
        OffsetWidth::Two
    } else {
        return Err(EncodeError::OffsetOverflow { offset: offset as u64, max: 0xFFFF });
    };
    out.push(opcode::pack(Family::Branch, width.byte_len() as u8, accept));
    out.extend_from_slice(&mask.bits().to_le_bytes());
    width.write(out, offset);
    Ok(width)
}

/// Append a MAP dispatching through `arms`. Picks the smallest offset
/// width whose all-ones sentinel stays above every real offset; returns it.
pub fn map(
    out: &mut Vec<u8>,
    arms: &[(DigitMask, MapTarget)],
    accept: bool,
) -> Result<OffsetWidth, EncodeError> {
    assert!(
        (2..=MAX_MAP_ARMS).contains(&arms.len()),
        "map arm count out of range: {}",
        arms.len()
    );
    let mut seen = DigitMask::EMPTY;
    for &(mask, _) in arms {
        assert!(!mask.is_empty(), "empty mask in map arm");
        assert!(!seen.intersects(mask), "overlapping map arms");
        seen |= mask;
    }

    let max_real = arms
        .iter()
        .filter_map(|&(_, target)| match target {
            MapTarget::Offset(offset) => Some(offset),
            MapTarget::Terminate => None,
        })
        .max();
    let width = match max_real {
        None => OffsetWidth::One,
        Some(max) => [OffsetWidth::One, OffsetWidth::Two, OffsetWidth::Four]
            .into_iter()
            .find(|w| max < w.sentinel())
            .ok_or(EncodeError::OffsetOverflow {
                offset: max as u64,
                max: (OffsetWidth::Four.sentinel() - 1) as u64,
            })?,
    };

    out.push(opcode::pack(Family::Map, arms.len() as u8, accept));
    out.push(width.byte_len() as u8);
    for &(mask, target) in arms {
        out.extend_from_slice(&mask.bits().to_le_bytes());
        let raw = match target {
            MapTarget::Offset(offset) => offset,
            MapTarget::Terminate => width.sentinel(),
        };
        width.write(out, raw);
    }
    Ok(width)
}
