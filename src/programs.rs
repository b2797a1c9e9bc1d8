//! Pre-encoded sample programs.
//!
//! These are the two classic DCPU-16 1.1 programs, kept as raw words so
//! they can be loaded without an assembler.

use crate::word::Word;

/// Copies "Hello world!" into display memory at 0x8000, then spins on
/// `SUB PC, 1` at address 32.
pub const HELLO_WORLD: [Word; 33] = [
    0x7c01, 0xbeef, // 0:  SET A, 0xbeef
    0x01e1, 0x1000, // 2:  SET [0x1000], A
    0x780d, 0x1000, // 4:  IFN A, [0x1000]
    0x7dc1, 0x0020, // 6:      SET PC, end
    0x8061, //         8:  SET I, 0
    0x816c, 0x0013, // 9:  :nextchar IFE [data+I], 0
    0x7dc1, 0x0020, // 11:     SET PC, end
    0x5961, 0x8000, 0x0013, // 13: SET [0x8000+I], [data+I]
    0x8462, //         16: ADD I, 1
    0x7dc1, 0x0009, // 17: SET PC, nextchar
    // 19: :data "Hello world!", 0
    b'H' as Word, b'e' as Word, b'l' as Word, b'l' as Word, b'o' as Word, b' ' as Word,
    b'w' as Word, b'o' as Word, b'r' as Word, b'l' as Word, b'd' as Word, b'!' as Word, 0,
    0x85c3, //         32: :end SUB PC, 1
];

/// Address of the display region [`HELLO_WORLD`] writes to.
pub const DISPLAY_START: Word = 0x8000;

/// The example program from the DCPU-16 1.1 architecture document.
///
/// It does some arithmetic, runs a ten-iteration copy loop, calls a
/// subroutine that shifts X left by 4 and ends spinning on `SET PC, crash`
/// at address 26 with X = 0x40.
pub const SAMPLE_PROGRAM: [Word; 32] = [
    0x7c01, 0x0030, 0x7de1, 0x1000, 0x0020, 0x7803, 0x1000, 0xc00d,
    0x7dc1, 0x001a, 0xa861, 0x7c01, 0x2000, 0x2161, 0x2000, 0x8463,
    0x806d, 0x7dc1, 0x000d, 0x9031, 0x7c10, 0x0018, 0x7dc1, 0x001a,
    0x9037, 0x61c1, 0x7dc1, 0x001a, 0x0000, 0x0000, 0x0000, 0x0000,
];
