//! DCPU-16 registers.
//!
//! The DCPU-16 has 8 general-purpose registers (A, B, C, X, Y, Z, I, J)
//! plus three special ones:
//! - PC: program counter
//! - SP: stack pointer, the stack grows down from 0xffff
//! - O: overflow, catches carries, high product bits and shifted-out bits

use crate::word::Word;
use serde::{Serialize, Deserialize};
use std::fmt;

/// A general-purpose register, in encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reg {
    A,
    B,
    C,
    X,
    Y,
    Z,
    I,
    J,
}

impl Reg {
    /// All general-purpose registers, in encoding order.
    pub const ALL: [Reg; 8] = [Reg::A, Reg::B, Reg::C, Reg::X, Reg::Y, Reg::Z, Reg::I, Reg::J];

    /// Register from the low 3 bits of an operand field.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index & 0x7) as usize]
    }

    /// Index of the register in the register file.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg::A => "A",
            Reg::B => "B",
            Reg::C => "C",
            Reg::X => "X",
            Reg::Y => "Y",
            Reg::Z => "Z",
            Reg::I => "I",
            Reg::J => "J",
        };
        f.write_str(name)
    }
}

/// The DCPU-16 register file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// A, B, C, X, Y, Z, I, J
    pub gp: [Word; 8],

    /// Program counter
    pub pc: Word,

    /// Stack pointer. Push decrements first, pop increments after.
    pub sp: Word,

    /// Overflow register
    pub o: Word,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all registers to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn get(&self, reg: Reg) -> Word {
        self.gp[reg.index()]
    }

    #[inline]
    pub fn set(&mut self, reg: Reg, value: Word) {
        self.gp[reg.index()] = value;
    }

    /// Return PC and advance it by one word.
    pub fn next_pc(&mut self) -> Word {
        let pc = self.pc;
        self.pc = pc.wrapping_add(1);
        pc
    }

    /// Reserve a stack slot, returning its address.
    pub fn push(&mut self) -> Word {
        self.sp = self.sp.wrapping_sub(1);
        self.sp
    }

    /// Release the top stack slot, returning its address.
    pub fn pop(&mut self) -> Word {
        let sp = self.sp;
        self.sp = sp.wrapping_add(1);
        sp
    }
}
