//! # DCPU-16 Emulator
//!
//! An emulator of the DCPU-16 (version 1.1), the fictional 16-bit CPU of
//! the game 0x10c, driven by a real-time clock.
//!
//! The [`Cpu`] is a plain state machine clocked one cycle at a time. A
//! [`Machine`] owns a CPU and clocks it from a background thread at a fixed
//! period, with blocking `stop` and non-blocking `has_error` controls.
//!
//! ```
//! use dcpu::{Cpu, programs::HELLO_WORLD};
//!
//! let mut cpu = Cpu::new();
//! cpu.load_program(&HELLO_WORLD, 0, true).unwrap();
//! cpu.start().unwrap();
//! cpu.step_instruction().unwrap();
//! assert_eq!(cpu.a(), 0xbeef);
//! ```

pub mod word;
pub mod cpu;
pub mod machine;
pub mod image;
pub mod programs;

// Re-export commonly used types
pub use word::Word;
pub use cpu::{Cpu, CpuState, CpuError, Memory, Registers, Reg, Instruction, LoadError, Snapshot};
pub use machine::{Machine, MachineError, MachineState};
pub use image::{load_image, ByteOrder, ImageError};
