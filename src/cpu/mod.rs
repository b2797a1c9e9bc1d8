//! CPU emulation for the DCPU-16.
//!
//! This module implements the DCPU-16 1.1 architecture:
//! - 0x10000 sixteen-bit memory words
//! - 8 general-purpose registers plus PC, SP and O
//! - 15 basic two-operand instructions and JSR
//! - per-instruction cycle costs, clocked one cycle at a time

pub mod memory;
pub mod registers;
pub mod decode;
pub mod operand;
pub mod execute;

pub use memory::{Memory, LoadError};
pub use registers::{Reg, Registers};
pub use decode::{Instruction, Operand, BasicOp, NonBasicOp, DecodeError};
pub use execute::{Cpu, CpuError, CpuState, Snapshot};
