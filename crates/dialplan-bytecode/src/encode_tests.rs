use dialplan_core::DigitMask;

use crate::encode;
use crate::{EncodeError, MapTarget, OffsetWidth};

fn m(digits: &[u8]) -> DigitMask {
    DigitMask::from_digits(digits.iter().copied())
}

#[test]
fn term_encoding() {
    let mut out = Vec::new();
    encode::term(&mut out);
    assert_eq!(out, vec![0x00]);
}

#[test]
fn seek_encoding() {
    let mut out = Vec::new();
    encode::seek(&mut out, 3, false);
    encode::seek(&mut out, 2, true);
    encode::seek(&mut out, 15, false);
    assert_eq!(out, vec![0x13, 0x92, 0x1F]);
}

#[test]
fn check_encoding() {
    let mut out = Vec::new();
    encode::check(&mut out, &[m(&[2]), m(&[3, 4])], false);
    assert_eq!(out, vec![0x22, 0x04, 0x00, 0x18, 0x00]);

    let mut out = Vec::new();
    encode::check(&mut out, &[DigitMask::ANY], true);
    assert_eq!(out, vec![0xA1, 0xFF, 0x03]);
}

#[test]
fn branch_picks_smallest_width() {
    let mut out = Vec::new();
    let w = encode::branch(&mut out, DigitMask::ANY, 5, false).unwrap();
    assert_eq!(w, OffsetWidth::One);
    assert_eq!(out, vec![0x31, 0xFF, 0x03, 0x05]);

    let mut out = Vec::new();
    let w = encode::branch(&mut out, m(&[2]), 255, false).unwrap();
    assert_eq!(w, OffsetWidth::One);
    assert_eq!(out, vec![0x31, 0x04, 0x00, 0xFF]);

    let mut out = Vec::new();
    let w = encode::branch(&mut out, m(&[2]), 256, true).unwrap();
    assert_eq!(w, OffsetWidth::Two);
    assert_eq!(out, vec![0xB2, 0x04, 0x00, 0x00, 0x01]);
}

#[test]
fn branch_offset_overflow() {
    let mut out = Vec::new();
    let err = encode::branch(&mut out, m(&[2]), 65536, false).unwrap_err();
    assert_eq!(err, EncodeError::OffsetOverflow { offset: 65536, max: 65535 });
}

#[test]
fn map_encoding() {
    let mut out = Vec::new();
    let arms = [(m(&[1]), MapTarget::Offset(6)), (m(&[3]), MapTarget::Terminate)];
    let w = encode::map(&mut out, &arms, false).unwrap();
    assert_eq!(w, OffsetWidth::One);
    assert_eq!(out, vec![0x42, 0x01, 0x02, 0x00, 0x06, 0x08, 0x00, 0xFF]);
}

#[test]
fn map_width_tiers() {
    // A real offset equal to a width's sentinel must take the next tier up.
    let cases = [
        (254, OffsetWidth::One),
        (255, OffsetWidth::Two),
        (65534, OffsetWidth::Two),
        (65535, OffsetWidth::Four),
    ];
    for (offset, want) in cases {
        let mut out = Vec::new();
        let arms = [(m(&[0]), MapTarget::Offset(offset)), (m(&[1]), MapTarget::Terminate)];
        let w = encode::map(&mut out, &arms, false).unwrap();
        assert_eq!(w, want, "offset {offset}");
    }
}

#[test]
fn map_of_only_sentinels_uses_narrowest_width() {
    let mut out = Vec::new();
    let arms = [(m(&[0]), MapTarget::Terminate), (m(&[9]), MapTarget::Terminate)];
    let w = encode::map(&mut out, &arms, false).unwrap();
    assert_eq!(w, OffsetWidth::One);
    assert_eq!(out, vec![0x42, 0x01, 0x01, 0x00, 0xFF, 0x00, 0x02, 0xFF]);
}

#[test]
fn map_offset_overflow() {
    let mut out = Vec::new();
    let arms = [(m(&[0]), MapTarget::Offset(u32::MAX)), (m(&[1]), MapTarget::Terminate)];
    let err = encode::map(&mut out, &arms, false).unwrap_err();
    assert_eq!(
        err,
        EncodeError::OffsetOverflow { offset: u32::MAX as u64, max: u32::MAX as u64 - 1 }
    );
}

#[test]
#[should_panic(expected = "seek count out of range")]
fn seek_count_zero_panics() {
    encode::seek(&mut Vec::new(), 0, false);
}

#[test]
#[should_panic(expected = "seek count out of range")]
fn seek_count_overflow_panics() {
    encode::seek(&mut Vec::new(), 16, false);
}

#[test]
#[should_panic(expected = "check run length out of range")]
fn check_empty_run_panics() {
    encode::check(&mut Vec::new(), &[], false);
}

#[test]
#[should_panic(expected = "empty mask in check")]
fn check_empty_mask_panics() {
    encode::check(&mut Vec::new(), &[DigitMask::EMPTY], false);
}

#[test]
#[should_panic(expected = "map arm count out of range")]
fn map_single_arm_panics() {
    let arms = [(DigitMask::ANY, MapTarget::Terminate)];
    let _ = encode::map(&mut Vec::new(), &arms, false);
}

#[test]
#[should_panic(expected = "overlapping map arms")]
fn map_overlapping_arms_panic() {
    let arms = [(m(&[1]), MapTarget::Terminate), (m(&[0, 1, 2]), MapTarget::Terminate)];
    let _ = encode::map(&mut Vec::new(), &arms, false);
}
