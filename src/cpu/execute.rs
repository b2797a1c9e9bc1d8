//! CPU execution engine for the DCPU-16.
//!
//! Implements the clocked fetch-decode-execute cycle and all instruction
//! behaviors. An instruction executes in full on the first cycle it is
//! clocked in, then the CPU stalls for the rest of its cycle cost.

use crate::cpu::decode::{self, BasicOp, DecodeError, Instruction, NonBasicOp};
use crate::cpu::memory::LoadError;
use crate::cpu::operand::{self, Location, Position};
use crate::cpu::{Memory, Reg, Registers};
use crate::word::{arith, Word};
use log::{debug, trace};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// CPU lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// Not started, or stopped cleanly. Can be started.
    Stopped,
    /// Accepting clock cycles.
    Running,
    /// An instruction failed. The CPU can't be restarted.
    Faulted,
}

/// Register and clock state, for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub registers: Registers,
    pub cycles: u64,
    pub state: CpuState,
}

/// The DCPU-16 CPU.
#[derive(Clone)]
pub struct Cpu {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    state: CpuState,
    /// Clock cycles elapsed while running.
    cycles: u64,
    /// Set by a failed IFx; suppresses the next instruction.
    skip: bool,
    /// Cycles left before the current instruction retires.
    stall: u8,
    halt_on_spin: bool,
}

impl Cpu {
    /// Create a new CPU with zeroed state.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            state: CpuState::Stopped,
            cycles: 0,
            skip: false,
            stall: 0,
            halt_on_spin: false,
        }
    }

    /// Fault with [`CpuError::Spin`] when an instruction jumps to itself.
    ///
    /// Programs end by spinning (`SUB PC, 1`); this turns that idiom into
    /// a halt a scheduler can observe.
    pub fn with_halt_on_spin(mut self, enabled: bool) -> Self {
        self.halt_on_spin = enabled;
        self
    }

    /// Reset the CPU to initial state.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.state = CpuState::Stopped;
        self.cycles = 0;
        self.skip = false;
        self.stall = 0;
    }

    /// Copy a program into memory at `offset`.
    ///
    /// With `expect_clean` the target region must be all zeros.
    pub fn load_program(&mut self, program: &[Word], offset: Word, expect_clean: bool) -> Result<(), LoadError> {
        self.mem.load_program(program, offset, expect_clean)?;
        debug!("loaded {} words at {:#06x}", program.len(), offset);
        Ok(())
    }

    /// Arm the CPU so it accepts clock cycles.
    pub fn start(&mut self) -> Result<(), CpuError> {
        match self.state {
            CpuState::Running => Err(CpuError::AlreadyRunning),
            CpuState::Faulted => Err(CpuError::Faulted),
            CpuState::Stopped => {
                self.state = CpuState::Running;
                debug!("cpu started at PC={:#06x}", self.regs.pc);
                Ok(())
            }
        }
    }

    /// Disarm the CPU.
    pub fn stop(&mut self) -> Result<(), CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning);
        }
        self.state = CpuState::Stopped;
        debug!("cpu stopped after {} cycles", self.cycles);
        Ok(())
    }

    /// Advance the clock by one cycle.
    ///
    /// On an instruction boundary this fetches and executes the next
    /// instruction; otherwise it burns one cycle of the current one.
    /// Any error faults the CPU for good.
    pub fn step_cycle(&mut self) -> Result<(), CpuError> {
        match self.state {
            CpuState::Running => {}
            CpuState::Faulted => return Err(CpuError::Faulted),
            CpuState::Stopped => return Err(CpuError::NotRunning),
        }

        self.cycles += 1;
        if self.stall > 0 {
            self.stall -= 1;
            return Ok(());
        }

        match self.execute_next() {
            Ok(cost) => {
                self.stall = cost - 1;
                Ok(())
            }
            Err(e) => {
                self.state = CpuState::Faulted;
                Err(e)
            }
        }
    }

    /// Clock the CPU until the current instruction has retired.
    ///
    /// From an instruction boundary this runs exactly one instruction (or
    /// one skip) including its stall cycles.
    pub fn step_instruction(&mut self) -> Result<(), CpuError> {
        loop {
            self.step_cycle()?;
            if self.stall == 0 {
                return Ok(());
            }
        }
    }

    /// Clock the CPU for `count` cycles.
    pub fn run_cycles(&mut self, count: u64) -> Result<(), CpuError> {
        for _ in 0..count {
            self.step_cycle()?;
        }
        Ok(())
    }

    /// Fetch, decode and execute the instruction at PC, returning its cost.
    fn execute_next(&mut self) -> Result<u8, CpuError> {
        let pc = self.regs.next_pc();
        let word = self.mem.get_word(pc);

        if self.skip {
            self.skip = false;
            self.regs.pc = pc.wrapping_add(decode::instruction_len(word));
            trace!("{:#06x}: skipped {:#06x}", pc, word);
            return Ok(1);
        }

        let instr = decode::decode(word)?;
        trace!("{:#06x}: {}", pc, instr);
        self.execute(instr);

        if self.halt_on_spin && self.regs.pc == pc {
            return Err(CpuError::Spin { pc });
        }

        Ok(instr.cycles())
    }

    /// Execute a decoded instruction whose word has been fetched.
    fn execute(&mut self, instr: Instruction) {
        match instr {
            Instruction::Basic { op, a, b } => {
                let dst = operand::resolve(a, Position::Destination, &mut self.regs, &self.mem);
                let src = operand::resolve(b, Position::Source, &mut self.regs, &self.mem);
                let x = dst.read(&self.regs, &self.mem);
                let y = src.read(&self.regs, &self.mem);

                let (result, overflow) = match op {
                    BasicOp::Set => (y, None),
                    BasicOp::Add => with_overflow(arith::add(x, y)),
                    BasicOp::Sub => with_overflow(arith::sub(x, y)),
                    BasicOp::Mul => with_overflow(arith::mul(x, y)),
                    BasicOp::Div => with_overflow(arith::div(x, y)),
                    BasicOp::Mod => (arith::modulo(x, y), None),
                    BasicOp::Shl => with_overflow(arith::shl(x, y)),
                    BasicOp::Shr => with_overflow(arith::shr(x, y)),
                    BasicOp::And => (x & y, None),
                    BasicOp::Bor => (x | y, None),
                    BasicOp::Xor => (x ^ y, None),
                    BasicOp::Ife => return self.test(x == y),
                    BasicOp::Ifn => return self.test(x != y),
                    BasicOp::Ifg => return self.test(x > y),
                    BasicOp::Ifb => return self.test(x & y != 0),
                };

                self.write(dst, result);
                if let Some(o) = overflow {
                    self.regs.o = o;
                }
            }

            Instruction::NonBasic { op: NonBasicOp::Jsr, a } => {
                let target = operand::resolve(a, Position::Source, &mut self.regs, &self.mem)
                    .read(&self.regs, &self.mem);
                let slot = self.regs.push();
                self.mem.set_word(slot, self.regs.pc);
                self.regs.pc = target;
            }
        }
    }

    /// A failed test skips the next instruction.
    fn test(&mut self, pass: bool) {
        self.skip = !pass;
    }

    fn write(&mut self, location: Location, value: Word) {
        location.write(&mut self.regs, &mut self.mem, value);
    }

    // ==================== Inspection ====================

    pub fn a(&self) -> Word { self.regs.get(Reg::A) }
    pub fn b(&self) -> Word { self.regs.get(Reg::B) }
    pub fn c(&self) -> Word { self.regs.get(Reg::C) }
    pub fn x(&self) -> Word { self.regs.get(Reg::X) }
    pub fn y(&self) -> Word { self.regs.get(Reg::Y) }
    pub fn z(&self) -> Word { self.regs.get(Reg::Z) }
    pub fn i(&self) -> Word { self.regs.get(Reg::I) }
    pub fn j(&self) -> Word { self.regs.get(Reg::J) }
    pub fn pc(&self) -> Word { self.regs.pc }
    pub fn sp(&self) -> Word { self.regs.sp }
    pub fn o(&self) -> Word { self.regs.o }

    pub fn register(&self, reg: Reg) -> Word {
        self.regs.get(reg)
    }

    pub fn get_word(&self, addr: Word) -> Word {
        self.mem.get_word(addr)
    }

    /// Read-only view of memory `lo..=hi`.
    pub fn get_slice(&self, lo: Word, hi: Word) -> &[Word] {
        self.mem.get_slice(lo, hi)
    }

    /// Clock cycles elapsed while running.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn state(&self) -> CpuState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }

    /// Whether the next instruction will be skipped.
    pub fn skip_pending(&self) -> bool {
        self.skip
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registers: self.regs.clone(),
            cycles: self.cycles,
            state: self.state,
        }
    }
}

fn with_overflow((value, o): (Word, Word)) -> (Word, Option<Word>) {
    (value, Some(o))
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("skip", &self.skip)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU is already running")]
    AlreadyRunning,

    #[error("CPU is not running")]
    NotRunning,

    #[error("CPU has faulted and cannot run again")]
    Faulted,

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("program spins at {pc:#06x}")]
    Spin { pc: Word },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::{encode, Operand};
    use crate::programs::{DISPLAY_START, HELLO_WORLD, SAMPLE_PROGRAM};

    fn basic(op: BasicOp, a: Operand, b: Operand) -> Word {
        encode(&Instruction::Basic { op, a, b })
    }

    fn jsr(a: Operand) -> Word {
        encode(&Instruction::NonBasic { op: NonBasicOp::Jsr, a })
    }

    fn lit(v: Word) -> Operand {
        Operand::Literal(v)
    }

    fn reg(r: Reg) -> Operand {
        Operand::Register(r)
    }

    fn running(program: &[Word]) -> Cpu {
        let mut cpu = Cpu::new();
        cpu.load_program(program, 0, true).unwrap();
        cpu.start().unwrap();
        cpu
    }

    /// Whether PC sits on `SET PC, <own address>`.
    fn at_self_jump(cpu: &Cpu) -> bool {
        cpu.get_word(cpu.pc()) == 0x7dc1 && cpu.get_word(cpu.pc().wrapping_add(1)) == cpu.pc()
    }

    #[test]
    fn test_set_and_store() {
        let mut cpu = running(&HELLO_WORLD);

        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();

        assert_eq!(cpu.a(), 0xbeef);
        assert_eq!(cpu.get_word(0x1000), 0xbeef);
        assert_eq!(cpu.pc(), 4);
        assert_eq!(cpu.cycles(), 4);
    }

    #[test]
    fn test_hello_world() {
        let mut cpu = running(&HELLO_WORLD);

        for _ in 0..1000 {
            cpu.step_instruction().unwrap();
            if cpu.get_word(cpu.pc()) == 0x85c3 {
                break;
            }
        }

        assert_eq!(cpu.pc(), 32);
        assert_eq!(cpu.i(), 12);
        let expected: Vec<Word> = "Hello world!\0".bytes().map(Word::from).collect();
        assert_eq!(cpu.get_slice(DISPLAY_START, DISPLAY_START + 12), expected.as_slice());
        cpu.stop().unwrap();
    }

    #[test]
    fn test_sample_program_cycle_counts() {
        let mut cpu = running(&SAMPLE_PROGRAM);

        cpu.run_cycles(11).unwrap();
        assert_eq!(cpu.a(), 0x10);
        assert_eq!(cpu.pc(), 10);

        // partway into the loop
        cpu.run_cycles(23).unwrap();
        assert_eq!(cpu.i(), 7);

        // loop finished
        cpu.run_cycles(59).unwrap();
        assert_eq!(cpu.i(), 0);
        assert_eq!(cpu.pc(), 19);
        assert_eq!(cpu.sp(), 0);

        // into the subroutine
        cpu.run_cycles(4).unwrap();
        assert_eq!(cpu.x(), 4);
        assert_eq!(cpu.pc(), 24);
        assert_eq!(cpu.sp(), 0xffff);
        assert_eq!(cpu.get_word(0xffff), 22);

        let mut spun = false;
        for _ in 0..1000 {
            cpu.step_cycle().unwrap();
            if at_self_jump(&cpu) {
                spun = true;
                break;
            }
        }
        assert!(spun, "program exceeded 1000 cycles");
        assert_eq!(cpu.x(), 0x40);
        assert_eq!(cpu.pc(), 26);
        cpu.stop().unwrap();
    }

    #[test]
    fn test_failed_test_skips_next_instruction() {
        let program = [
            basic(BasicOp::Ife, reg(Reg::A), lit(1)),
            basic(BasicOp::Set, Operand::IndirectNext, Operand::LiteralNext),
            0x1000,
            0x1234,
            basic(BasicOp::Set, reg(Reg::B), lit(1)),
        ];
        let mut cpu = running(&program);

        cpu.step_instruction().unwrap();
        assert!(cpu.skip_pending());
        assert_eq!(cpu.cycles(), 2);

        cpu.step_instruction().unwrap();
        assert!(!cpu.skip_pending());
        assert_eq!(cpu.pc(), 4);
        assert_eq!(cpu.get_word(0x1000), 0);
        assert_eq!(cpu.cycles(), 3);

        cpu.step_instruction().unwrap();
        assert_eq!(cpu.b(), 1);
    }

    #[test]
    fn test_skipped_instruction_has_no_stack_effect() {
        let program = [
            basic(BasicOp::Ifn, reg(Reg::A), reg(Reg::A)),
            jsr(Operand::Pop),
            basic(BasicOp::Set, reg(Reg::C), lit(3)),
        ];
        let mut cpu = running(&program);

        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();
        assert_eq!(cpu.sp(), 0);
        assert_eq!(cpu.pc(), 2);
        assert_eq!(cpu.get_word(0xffff), 0);

        cpu.step_instruction().unwrap();
        assert_eq!(cpu.c(), 3);
    }

    #[test]
    fn test_passing_tests_fall_through() {
        let program = [
            basic(BasicOp::Set, reg(Reg::A), lit(6)),
            basic(BasicOp::Ifg, reg(Reg::A), lit(5)),
            basic(BasicOp::Set, reg(Reg::B), lit(1)),
            basic(BasicOp::Ifb, reg(Reg::A), lit(2)),
            basic(BasicOp::Set, reg(Reg::C), lit(1)),
            basic(BasicOp::Ifb, reg(Reg::A), lit(1)),
            basic(BasicOp::Set, reg(Reg::X), lit(1)),
        ];
        let mut cpu = running(&program);

        // SET, IFG, SET, IFB, SET, IFB (fails), skip
        for _ in 0..7 {
            cpu.step_instruction().unwrap();
        }
        assert_eq!((cpu.b(), cpu.c(), cpu.x()), (1, 1, 0));
        assert_eq!(cpu.pc(), 7);
    }

    #[test]
    fn test_jsr_pushes_return_address() {
        let mut program = vec![
            jsr(Operand::LiteralNext),
            0x0010,
            basic(BasicOp::Set, reg(Reg::J), lit(9)),
        ];
        program.resize(0x10, 0);
        program.push(basic(BasicOp::Set, Operand::Pc, Operand::Pop));
        let mut cpu = running(&program);

        cpu.step_instruction().unwrap();
        assert_eq!(cpu.pc(), 0x10);
        assert_eq!(cpu.sp(), 0xffff);
        assert_eq!(cpu.get_word(0xffff), 2);
        assert_eq!(cpu.cycles(), 3);

        cpu.step_instruction().unwrap();
        assert_eq!(cpu.pc(), 2);
        assert_eq!(cpu.sp(), 0);

        cpu.step_instruction().unwrap();
        assert_eq!(cpu.j(), 9);
    }

    #[test]
    fn test_cycle_costs() {
        let cases: [(&[Word], u64); 8] = [
            (&[basic(BasicOp::Set, reg(Reg::A), lit(1))], 1),
            (&[basic(BasicOp::Xor, reg(Reg::A), Operand::LiteralNext), 7], 2),
            (&[basic(BasicOp::Add, reg(Reg::A), Operand::IndirectNext), 0x100], 3),
            (&[basic(BasicOp::Mul, Operand::Indexed(Reg::I), Operand::LiteralNext), 0x100, 2], 4),
            (&[basic(BasicOp::Div, reg(Reg::A), lit(2))], 3),
            (&[basic(BasicOp::Mod, reg(Reg::A), Operand::LiteralNext), 2], 4),
            (&[basic(BasicOp::Ife, reg(Reg::A), reg(Reg::A))], 2),
            (&[jsr(reg(Reg::B))], 2),
        ];

        for (program, expected) in cases {
            let mut cpu = running(program);
            cpu.step_instruction().unwrap();
            assert_eq!(cpu.cycles(), expected, "program {:04x?}", program);
        }
    }

    #[test]
    fn test_instruction_executes_on_first_cycle() {
        let program = [basic(BasicOp::Div, reg(Reg::A), lit(2)), basic(BasicOp::Set, reg(Reg::B), lit(1))];
        let mut cpu = running(&program);
        cpu.regs.set(Reg::A, 10);

        cpu.step_cycle().unwrap();
        assert_eq!(cpu.a(), 5);
        assert_eq!(cpu.pc(), 1);

        cpu.run_cycles(2).unwrap();
        assert_eq!(cpu.b(), 0);

        cpu.step_cycle().unwrap();
        assert_eq!(cpu.b(), 1);
    }

    #[test]
    fn test_arithmetic_sets_overflow() {
        let program = [
            basic(BasicOp::Set, reg(Reg::A), Operand::LiteralNext),
            0xffff,
            basic(BasicOp::Add, reg(Reg::A), lit(2)),
            basic(BasicOp::Sub, reg(Reg::B), lit(1)),
            basic(BasicOp::Set, reg(Reg::C), Operand::LiteralNext),
            0x8000,
            basic(BasicOp::Shl, reg(Reg::C), lit(1)),
            basic(BasicOp::Div, reg(Reg::X), lit(0)),
        ];
        let mut cpu = running(&program);

        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();
        assert_eq!((cpu.a(), cpu.o()), (1, 1));

        cpu.step_instruction().unwrap();
        assert_eq!((cpu.b(), cpu.o()), (0xffff, 0xffff));

        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();
        assert_eq!((cpu.c(), cpu.o()), (0, 1));

        cpu.step_instruction().unwrap();
        assert_eq!((cpu.x(), cpu.o()), (0, 0));
    }

    #[test]
    fn test_bitwise_and_mod() {
        let program = [
            basic(BasicOp::Set, reg(Reg::A), lit(0x1c)),
            basic(BasicOp::And, reg(Reg::A), lit(0x0f)),
            basic(BasicOp::Bor, reg(Reg::A), lit(0x10)),
            basic(BasicOp::Xor, reg(Reg::A), lit(0x01)),
            basic(BasicOp::Mod, reg(Reg::A), lit(5)),
        ];
        let mut cpu = running(&program);

        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();
        assert_eq!(cpu.a(), 0x0c);
        cpu.step_instruction().unwrap();
        assert_eq!(cpu.a(), 0x1c);
        cpu.step_instruction().unwrap();
        assert_eq!(cpu.a(), 0x1d);
        cpu.step_instruction().unwrap();
        assert_eq!(cpu.a(), 0x1d % 5);
        assert_eq!(cpu.o(), 0);
    }

    #[test]
    fn test_write_to_literal_is_discarded() {
        let program = [basic(BasicOp::Set, Operand::LiteralNext, lit(5)), 0x0042];
        let mut cpu = running(&program);

        cpu.step_instruction().unwrap();

        assert_eq!(cpu.get_slice(0, 1), &program);
        assert_eq!(cpu.pc(), 2);
        assert_eq!(cpu.regs, Registers { pc: 2, ..Registers::new() });
    }

    #[test]
    fn test_push_and_pop() {
        let program = [
            basic(BasicOp::Set, Operand::Push, lit(1)),
            basic(BasicOp::Set, Operand::Push, lit(2)),
            basic(BasicOp::Set, reg(Reg::A), Operand::Peek),
            basic(BasicOp::Set, reg(Reg::B), Operand::Pop),
            basic(BasicOp::Set, reg(Reg::C), Operand::Pop),
        ];
        let mut cpu = running(&program);

        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();
        assert_eq!(cpu.sp(), 0xfffe);
        assert_eq!(cpu.get_slice(0xfffe, 0xffff), &[2, 1]);

        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();
        assert_eq!((cpu.a(), cpu.b(), cpu.c()), (2, 2, 1));
        assert_eq!(cpu.sp(), 0);
    }

    #[test]
    fn test_self_modifying_code() {
        let patched = basic(BasicOp::Set, reg(Reg::B), lit(1));
        let program = [
            basic(BasicOp::Set, Operand::IndirectNext, Operand::LiteralNext),
            0x0003,
            patched,
            basic(BasicOp::Set, reg(Reg::A), lit(1)),
        ];
        let mut cpu = running(&program);

        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();

        assert_eq!((cpu.a(), cpu.b()), (0, 1));
    }

    #[test]
    fn test_reserved_opcode_faults() {
        let mut cpu = running(&[basic(BasicOp::Set, reg(Reg::A), lit(1))]);

        cpu.step_instruction().unwrap();
        let err = cpu.step_cycle().unwrap_err();

        assert!(matches!(err, CpuError::Decode(DecodeError::ReservedOpcode { opcode: 0, .. })));
        assert_eq!(cpu.state(), CpuState::Faulted);
        assert_eq!(cpu.step_cycle(), Err(CpuError::Faulted));
        assert_eq!(cpu.start(), Err(CpuError::Faulted));
        assert_eq!(cpu.stop(), Err(CpuError::NotRunning));
    }

    #[test]
    fn test_skipping_reserved_word_is_harmless() {
        let program = [basic(BasicOp::Ife, reg(Reg::A), lit(1)), 0x0000, basic(BasicOp::Set, reg(Reg::A), lit(2))];
        let mut cpu = running(&program);

        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();
        cpu.step_instruction().unwrap();
        assert_eq!(cpu.a(), 2);
    }

    #[test]
    fn test_halt_on_spin() {
        let mut cpu = Cpu::new().with_halt_on_spin(true);
        cpu.load_program(&HELLO_WORLD, 0, true).unwrap();
        cpu.start().unwrap();

        let err = loop {
            if let Err(e) = cpu.step_cycle() {
                break e;
            }
        };

        assert_eq!(err, CpuError::Spin { pc: 32 });
        assert_eq!(cpu.get_word(DISPLAY_START), b'H' as Word);
    }

    #[test]
    fn test_spin_without_halt_keeps_running() {
        let mut cpu = running(&[0x85c3]);
        cpu.run_cycles(10).unwrap();
        assert_eq!(cpu.pc(), 0);
        assert!(cpu.is_running());
    }

    #[test]
    fn test_lifecycle() {
        let mut cpu = Cpu::new();

        assert_eq!(cpu.step_cycle(), Err(CpuError::NotRunning));
        assert_eq!(cpu.stop(), Err(CpuError::NotRunning));

        cpu.start().unwrap();
        assert_eq!(cpu.start(), Err(CpuError::AlreadyRunning));

        cpu.stop().unwrap();
        assert_eq!(cpu.stop(), Err(CpuError::NotRunning));

        // A clean stop can be restarted
        cpu.start().unwrap();
        assert!(cpu.is_running());
    }

    #[test]
    fn test_reset() {
        let mut cpu = running(&HELLO_WORLD);
        cpu.run_cycles(5).unwrap();

        cpu.reset();

        assert_eq!(cpu.snapshot(), Snapshot {
            registers: Registers::new(),
            cycles: 0,
            state: CpuState::Stopped,
        });
        assert_eq!(cpu.mem.non_zero_cells(), 0);
    }
}
