use dialplan_core::DigitMask;

use crate::{MapTarget, Program, dump, encode};

fn m(digits: &[u8]) -> DigitMask {
    DigitMask::from_digits(digits.iter().copied())
}

#[test]
fn dump_branching_program() {
    // Two alternatives sharing a terminal block: "12[34]" and "34[34]".
    let mut bytes = Vec::new();
    encode::map(
        &mut bytes,
        &[(m(&[1]), MapTarget::Offset(6)), (m(&[3]), MapTarget::Offset(0))],
        false,
    )
    .unwrap();
    encode::check(&mut bytes, &[m(&[4]), m(&[3, 4])], false);
    encode::term(&mut bytes);
    encode::check(&mut bytes, &[m(&[2]), m(&[3, 4])], false);
    encode::term(&mut bytes);
    let program = Program::from_bytes(bytes).unwrap();

    insta::assert_snapshot!(dump(&program), @r"
    0000   map.1 [1] -> 0014, [3] -> 0008
    0008   check [4] [3-4]
    0013   term
    0014   check [2] [3-4]
    0019   term
    ");
}

#[test]
fn dump_accept_and_widths() {
    let mut bytes = Vec::new();
    encode::seek(&mut bytes, 3, false);
    encode::check(&mut bytes, &[m(&[0, 8])], true);
    encode::branch(&mut bytes, DigitMask::ANY, 0, false).unwrap();
    encode::map(
        &mut bytes,
        &[(m(&[0, 1, 2, 3, 4]), MapTarget::Offset(256)), (m(&[7]), MapTarget::Terminate)],
        true,
    )
    .unwrap();
    encode::term(&mut bytes);
    for _ in 0..256 {
        bytes.push(0x00);
    }
    let program = Program::from_bytes(bytes).unwrap();

    // The padding terms that give the map a two-byte offset are all
    // identical; only the head of the listing is interesting.
    let listing = dump(&program).lines().take(5).collect::<Vec<_>>().join("\n");
    insta::assert_snapshot!(listing, @r"
    0000   seek 3
    0001  *check [08]
    0004   branch.1 [0-9] -> 0008
    0008  *map.2 [0-4] -> 0274, [7] -> term
    0018   term
    ");
}
