//! Word arithmetic with DCPU-16 overflow semantics.
//!
//! Each operation returns `(result, o)` where `result` is truncated to
//! 16 bits and `o` is the value the instruction stores into the O register.

use crate::word::Word;

/// Add two words, returning (sum, carry). Carry is 1 on unsigned overflow.
pub fn add(a: Word, b: Word) -> (Word, Word) {
    let (sum, carry) = a.overflowing_add(b);
    (sum, carry as Word)
}

/// Subtract `b` from `a`, returning (difference, borrow).
/// Borrow is 0xffff on underflow.
pub fn sub(a: Word, b: Word) -> (Word, Word) {
    let (diff, borrow) = a.overflowing_sub(b);
    (diff, if borrow { 0xffff } else { 0 })
}

/// Multiply two words, returning (low 16 bits, high 16 bits).
pub fn mul(a: Word, b: Word) -> (Word, Word) {
    let product = a as u32 * b as u32;
    (product as Word, (product >> 16) as Word)
}

/// Divide `a` by `b`, returning (quotient, fractional bits).
///
/// Division by zero yields `(0, 0)`.
pub fn div(a: Word, b: Word) -> (Word, Word) {
    if b == 0 {
        return (0, 0);
    }
    let fraction = ((a as u32) << 16) / b as u32;
    (a / b, fraction as Word)
}

/// `a mod b`; zero when `b` is zero. MOD leaves O untouched.
pub fn modulo(a: Word, b: Word) -> Word {
    if b == 0 {
        0
    } else {
        a % b
    }
}

/// Shift `a` left by `b` bits, returning (result, bits shifted out).
pub fn shl(a: Word, b: Word) -> (Word, Word) {
    let shifted = (a as u64).checked_shl(b as u32).unwrap_or(0);
    (shifted as Word, (shifted >> 16) as Word)
}

/// Shift `a` right by `b` bits, returning (result, bits shifted out).
///
/// The shifted-out bits land in the high end of O.
pub fn shr(a: Word, b: Word) -> (Word, Word) {
    let shifted = ((a as u64) << 16).checked_shr(b as u32).unwrap_or(0);
    ((shifted >> 16) as Word, shifted as Word)
}
