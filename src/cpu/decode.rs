//! Instruction decoder for the DCPU-16.
//!
//! Instructions are one word, optionally followed by up to two operand
//! words. The instruction word is laid out as `bbbbbbaaaaaaoooo`:
//! - Bits 0-3: basic opcode (0 marks a non-basic instruction)
//! - Bits 4-9: operand a (the destination)
//! - Bits 10-15: operand b (the source)
//!
//! Non-basic instructions are laid out as `aaaaaaoooooo0000`, with the
//! non-basic opcode in bits 4-9 and their single operand in bits 10-15.

use crate::cpu::registers::Reg;
use crate::word::Word;
use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

/// A decoded 6-bit operand field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// 0x00-0x07: register
    Register(Reg),
    /// 0x08-0x0f: [register]
    Indirect(Reg),
    /// 0x10-0x17: [next word + register]
    Indexed(Reg),
    /// 0x18: POP / [SP++] as a source, PUSH / [--SP] as a destination
    Pop,
    /// 0x19: PEEK / [SP]
    Peek,
    /// 0x1a: PUSH / [--SP] as a destination, POP / [SP++] as a source
    Push,
    /// 0x1b: SP
    Sp,
    /// 0x1c: PC
    Pc,
    /// 0x1d: O
    O,
    /// 0x1e: [next word]
    IndirectNext,
    /// 0x1f: next word (literal)
    LiteralNext,
    /// 0x20-0x3f: literal value 0x00-0x1f
    Literal(Word),
}

impl Operand {
    /// Decode a 6-bit operand field.
    pub fn decode(field: u8) -> Self {
        match field & 0x3f {
            f @ 0x00..=0x07 => Operand::Register(Reg::from_index(f)),
            f @ 0x08..=0x0f => Operand::Indirect(Reg::from_index(f)),
            f @ 0x10..=0x17 => Operand::Indexed(Reg::from_index(f)),
            0x18 => Operand::Pop,
            0x19 => Operand::Peek,
            0x1a => Operand::Push,
            0x1b => Operand::Sp,
            0x1c => Operand::Pc,
            0x1d => Operand::O,
            0x1e => Operand::IndirectNext,
            0x1f => Operand::LiteralNext,
            f => Operand::Literal((f - 0x20) as Word),
        }
    }

    /// Encode back to a 6-bit operand field.
    ///
    /// Inline literals above 0x1f can't be encoded and are masked.
    pub fn encode(self) -> u8 {
        match self {
            Operand::Register(r) => r.index() as u8,
            Operand::Indirect(r) => 0x08 + r.index() as u8,
            Operand::Indexed(r) => 0x10 + r.index() as u8,
            Operand::Pop => 0x18,
            Operand::Peek => 0x19,
            Operand::Push => 0x1a,
            Operand::Sp => 0x1b,
            Operand::Pc => 0x1c,
            Operand::O => 0x1d,
            Operand::IndirectNext => 0x1e,
            Operand::LiteralNext => 0x1f,
            Operand::Literal(v) => 0x20 + (v & 0x1f) as u8,
        }
    }

    /// Whether resolving this operand consumes the next word.
    pub fn uses_next_word(self) -> bool {
        matches!(
            self,
            Operand::Indexed(_) | Operand::IndirectNext | Operand::LiteralNext
        )
    }
}

/// Two-operand opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BasicOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    And,
    Bor,
    Xor,
    Ife,
    Ifn,
    Ifg,
    Ifb,
}

impl BasicOp {
    /// Decode the 4-bit opcode field. Zero is the non-basic escape.
    pub fn from_code(code: u8) -> Option<Self> {
        let op = match code & 0xf {
            0x1 => BasicOp::Set,
            0x2 => BasicOp::Add,
            0x3 => BasicOp::Sub,
            0x4 => BasicOp::Mul,
            0x5 => BasicOp::Div,
            0x6 => BasicOp::Mod,
            0x7 => BasicOp::Shl,
            0x8 => BasicOp::Shr,
            0x9 => BasicOp::And,
            0xa => BasicOp::Bor,
            0xb => BasicOp::Xor,
            0xc => BasicOp::Ife,
            0xd => BasicOp::Ifn,
            0xe => BasicOp::Ifg,
            0xf => BasicOp::Ifb,
            _ => return None,
        };
        Some(op)
    }

    pub fn code(self) -> u8 {
        self as u8 + 1
    }

    /// Base cycle cost, before operand lookups.
    pub fn cycles(self) -> u8 {
        match self {
            BasicOp::Set | BasicOp::And | BasicOp::Bor | BasicOp::Xor => 1,
            BasicOp::Add | BasicOp::Sub | BasicOp::Mul | BasicOp::Shl | BasicOp::Shr => 2,
            BasicOp::Div | BasicOp::Mod => 3,
            BasicOp::Ife | BasicOp::Ifn | BasicOp::Ifg | BasicOp::Ifb => 2,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            BasicOp::Set => "SET",
            BasicOp::Add => "ADD",
            BasicOp::Sub => "SUB",
            BasicOp::Mul => "MUL",
            BasicOp::Div => "DIV",
            BasicOp::Mod => "MOD",
            BasicOp::Shl => "SHL",
            BasicOp::Shr => "SHR",
            BasicOp::And => "AND",
            BasicOp::Bor => "BOR",
            BasicOp::Xor => "XOR",
            BasicOp::Ife => "IFE",
            BasicOp::Ifn => "IFN",
            BasicOp::Ifg => "IFG",
            BasicOp::Ifb => "IFB",
        }
    }
}

/// Single-operand opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonBasicOp {
    /// Push the address of the next instruction, then jump.
    Jsr,
}

impl NonBasicOp {
    const JSR: u8 = 0x01;

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            Self::JSR => Some(NonBasicOp::Jsr),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            NonBasicOp::Jsr => Self::JSR,
        }
    }

    pub fn cycles(self) -> u8 {
        match self {
            NonBasicOp::Jsr => 2,
        }
    }
}

/// Decoded DCPU-16 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// `op a, b`: a := op(a, b)
    Basic { op: BasicOp, a: Operand, b: Operand },
    /// `op a`
    NonBasic { op: NonBasicOp, a: Operand },
}

impl Instruction {
    /// Number of extra words following the instruction word.
    pub fn extra_words(&self) -> u16 {
        match self {
            Instruction::Basic { a, b, .. } => a.uses_next_word() as u16 + b.uses_next_word() as u16,
            Instruction::NonBasic { a, .. } => a.uses_next_word() as u16,
        }
    }

    /// Cycle cost when executed, including operand lookups.
    ///
    /// A failed IFx test costs one more cycle on top of this.
    pub fn cycles(&self) -> u8 {
        let base = match self {
            Instruction::Basic { op, .. } => op.cycles(),
            Instruction::NonBasic { op, .. } => op.cycles(),
        };
        base + self.extra_words() as u8
    }
}

/// Decode an instruction word.
pub fn decode(word: Word) -> Result<Instruction, DecodeError> {
    let opcode = (word & 0xf) as u8;
    let a = ((word >> 4) & 0x3f) as u8;
    let b = ((word >> 10) & 0x3f) as u8;

    match BasicOp::from_code(opcode) {
        Some(op) => Ok(Instruction::Basic {
            op,
            a: Operand::decode(a),
            b: Operand::decode(b),
        }),
        None => {
            let op = NonBasicOp::from_code(a).ok_or(DecodeError::ReservedOpcode { opcode: a, word })?;
            Ok(Instruction::NonBasic {
                op,
                a: Operand::decode(b),
            })
        }
    }
}

/// Length in words of the instruction starting with `word`, operand words
/// included.
///
/// Works for reserved opcodes too, so a skipped word never faults.
pub fn instruction_len(word: Word) -> Word {
    let a = Operand::decode(((word >> 4) & 0x3f) as u8);
    let b = Operand::decode(((word >> 10) & 0x3f) as u8);
    if word & 0xf == 0 {
        1 + b.uses_next_word() as Word
    } else {
        1 + a.uses_next_word() as Word + b.uses_next_word() as Word
    }
}

/// Encode an instruction back to its first word.
///
/// Operand words (for `[next + reg]`, `[next]` and `next`) are not part of
/// the result; the caller places them after it.
pub fn encode(instr: &Instruction) -> Word {
    match instr {
        Instruction::Basic { op, a, b } => {
            op.code() as Word | (a.encode() as Word) << 4 | (b.encode() as Word) << 10
        }
        Instruction::NonBasic { op, a } => (op.code() as Word) << 4 | (a.encode() as Word) << 10,
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(r) => write!(f, "{}", r),
            Operand::Indirect(r) => write!(f, "[{}]", r),
            Operand::Indexed(r) => write!(f, "[next+{}]", r),
            Operand::Pop => f.write_str("POP"),
            Operand::Peek => f.write_str("PEEK"),
            Operand::Push => f.write_str("PUSH"),
            Operand::Sp => f.write_str("SP"),
            Operand::Pc => f.write_str("PC"),
            Operand::O => f.write_str("O"),
            Operand::IndirectNext => f.write_str("[next]"),
            Operand::LiteralNext => f.write_str("next"),
            Operand::Literal(v) => write!(f, "{:#x}", v),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Basic { op, a, b } => write!(f, "{} {}, {}", op.mnemonic(), a, b),
            Instruction::NonBasic { op: NonBasicOp::Jsr, a } => write!(f, "JSR {}", a),
        }
    }
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("reserved non-basic opcode {opcode:#04x} in word {word:#06x}")]
    ReservedOpcode { opcode: u8, word: Word },
}
