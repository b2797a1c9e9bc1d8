//! The DCPU-16 machine word.
//!
//! Everything the CPU touches is a 16-bit unsigned word:
//! - memory cells and instruction words
//! - registers (A, B, C, X, Y, Z, I, J, PC, SP, O)
//! - addresses, which wrap around the 64K word address space

pub mod arith;

pub use arith::{add, sub, mul, div, modulo, shl, shr};

/// A 16-bit DCPU-16 word.
pub type Word = u16;

/// Number of addressable words.
pub const ADDRESS_SPACE: usize = 1 << 16;
