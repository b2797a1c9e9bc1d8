//! Operand resolution.
//!
//! A decoded [`Operand`] is resolved exactly once per execution into a
//! [`Location`]. Resolving performs the operand's side effects: consuming
//! the next word (advancing PC) and adjusting SP for stack operands. The
//! resulting location can then be read and written any number of times.

use crate::cpu::decode::Operand;
use crate::cpu::registers::{Reg, Registers};
use crate::cpu::Memory;
use crate::word::Word;

/// Where an operand sits in the instruction.
///
/// Stack operands 0x18 and 0x1a pop when read as a source and push when
/// written as a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Destination,
    Source,
}

/// A resolved operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Register(Reg),
    Sp,
    Pc,
    O,
    Memory(Word),
    /// Read-only value; writes are dropped.
    Literal(Word),
}

/// Resolve `operand`, consuming operand words from PC and touching SP as
/// the addressing mode requires.
pub fn resolve(operand: Operand, position: Position, regs: &mut Registers, mem: &Memory) -> Location {
    match operand {
        Operand::Register(r) => Location::Register(r),
        Operand::Indirect(r) => Location::Memory(regs.get(r)),
        Operand::Indexed(r) => {
            let base = mem.get_word(regs.next_pc());
            Location::Memory(base.wrapping_add(regs.get(r)))
        }
        Operand::Pop | Operand::Push => match position {
            Position::Source => Location::Memory(regs.pop()),
            Position::Destination => Location::Memory(regs.push()),
        },
        Operand::Peek => Location::Memory(regs.sp),
        Operand::Sp => Location::Sp,
        Operand::Pc => Location::Pc,
        Operand::O => Location::O,
        Operand::IndirectNext => Location::Memory(mem.get_word(regs.next_pc())),
        Operand::LiteralNext => Location::Literal(mem.get_word(regs.next_pc())),
        Operand::Literal(v) => Location::Literal(v),
    }
}

impl Location {
    pub fn read(self, regs: &Registers, mem: &Memory) -> Word {
        match self {
            Location::Register(r) => regs.get(r),
            Location::Sp => regs.sp,
            Location::Pc => regs.pc,
            Location::O => regs.o,
            Location::Memory(addr) => mem.get_word(addr),
            Location::Literal(v) => v,
        }
    }

    pub fn write(self, regs: &mut Registers, mem: &mut Memory, value: Word) {
        match self {
            Location::Register(r) => regs.set(r, value),
            Location::Sp => regs.sp = value,
            Location::Pc => regs.pc = value,
            Location::O => regs.o = value,
            Location::Memory(addr) => mem.set_word(addr, value),
            Location::Literal(_) => {}
        }
    }
}
