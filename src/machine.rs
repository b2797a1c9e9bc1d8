//! Clock-driven scheduler for a DCPU-16.
//!
//! A [`Machine`] owns one [`Cpu`]. While running, the CPU is moved into a
//! stepping thread that clocks it once per period; the controller talks to
//! that thread only through a stop channel and the thread's join handle,
//! which hands the CPU back together with the error that ended the run, if
//! any.

use crate::cpu::{Cpu, CpuError};
use log::{debug, info, warn};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Machine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    /// Never started.
    NotStarted,
    /// A stepping thread is alive.
    Running,
    /// Stopped by request or by a halting error.
    Stopped,
}

/// What the stepping thread hands back when it exits.
struct Halt {
    cpu: Cpu,
    error: Option<CpuError>,
}

/// The live stepping thread.
struct Stepper {
    stop: Sender<()>,
    handle: JoinHandle<Halt>,
}

/// A DCPU-16 clocked by a background thread.
pub struct Machine {
    /// `None` while the stepping thread owns the CPU.
    cpu: Option<Cpu>,
    stepper: Option<Stepper>,
    state: MachineState,
}

impl Machine {
    /// Wrap a CPU, typically one with a program already loaded.
    pub fn new(cpu: Cpu) -> Self {
        Self {
            cpu: Some(cpu),
            stepper: None,
            state: MachineState::NotStarted,
        }
    }

    /// Boot the machine with a clock rate of `1 / period`.
    ///
    /// 100kHz is `Duration::from_micros(10)`. A zero period runs the CPU as
    /// fast as the host allows.
    pub fn start(&mut self, period: Duration) -> Result<(), MachineError> {
        let mut cpu = self.cpu.take().ok_or(CpuError::AlreadyRunning)?;
        if let Err(e) = cpu.start() {
            self.cpu = Some(cpu);
            return Err(e.into());
        }

        let (stop, stop_requested) = mpsc::channel();
        let handle = thread::spawn(move || run(cpu, period, stop_requested));

        self.stepper = Some(Stepper { stop, handle });
        self.state = MachineState::Running;
        info!("machine started, clock period {:?}", period);
        Ok(())
    }

    /// Stop the machine, blocking until the stepping thread has exited.
    ///
    /// If the thread had already halted on an error, that error is
    /// returned as [`MachineError::Halted`].
    pub fn stop(&mut self) -> Result<(), MachineError> {
        let stepper = self.running_stepper()?;
        // The thread may have exited on its own already; then nobody listens.
        let _ = stepper.stop.send(());
        self.join(stepper.handle)?.map_or(Ok(()), |e| Err(MachineError::Halted(e)))
    }

    /// Poll the stepping thread without blocking.
    ///
    /// Returns `Ok(Some(err))` exactly once when the thread has halted on
    /// an error; the machine is stopped as a side effect.
    pub fn has_error(&mut self) -> Result<Option<CpuError>, MachineError> {
        match self.state {
            MachineState::NotStarted => return Err(MachineError::NotStarted),
            MachineState::Stopped => return Err(MachineError::NotRunning),
            MachineState::Running => {}
        }

        let finished = self
            .stepper
            .as_ref()
            .map_or(true, |stepper| stepper.handle.is_finished());
        if !finished {
            return Ok(None);
        }

        let stepper = self.running_stepper()?;
        self.join(stepper.handle)
    }

    fn running_stepper(&mut self) -> Result<Stepper, MachineError> {
        match self.state {
            MachineState::NotStarted => Err(MachineError::NotStarted),
            MachineState::Stopped => Err(MachineError::NotRunning),
            MachineState::Running => self.stepper.take().ok_or(MachineError::NotRunning),
        }
    }

    fn join(&mut self, handle: JoinHandle<Halt>) -> Result<Option<CpuError>, MachineError> {
        self.state = MachineState::Stopped;
        let halt = handle.join().map_err(|_| MachineError::Panicked)?;
        info!("machine stopped after {} cycles", halt.cpu.cycles());
        self.cpu = Some(halt.cpu);
        Ok(halt.error)
    }

    pub fn state(&self) -> MachineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MachineState::Running
    }

    /// The CPU, unless a stepping thread currently owns it.
    pub fn cpu(&self) -> Option<&Cpu> {
        self.cpu.as_ref()
    }

    pub fn cpu_mut(&mut self) -> Option<&mut Cpu> {
        self.cpu.as_mut()
    }

    /// Take the CPU back out of a machine that isn't running.
    pub fn into_cpu(mut self) -> Option<Cpu> {
        self.cpu.take()
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(Cpu::new())
    }
}

impl Drop for Machine {
    fn drop(&mut self) {
        if let Some(stepper) = self.stepper.take() {
            let _ = stepper.stop.send(());
            let _ = stepper.handle.join();
        }
    }
}

/// Stepping thread body: one cycle per tick until stopped or halted.
fn run(mut cpu: Cpu, period: Duration, stop_requested: Receiver<()>) -> Halt {
    let mut next_tick = Instant::now() + period;

    loop {
        let wait = next_tick.saturating_duration_since(Instant::now());
        match stop_requested.recv_timeout(wait) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        if let Err(error) = cpu.step_cycle() {
            warn!("machine halted at PC={:#06x}: {}", cpu.pc(), error);
            return Halt { cpu, error: Some(error) };
        }
        next_tick += period;
    }

    debug!("stop requested at PC={:#06x}", cpu.pc());
    let error = cpu.stop().err();
    Halt { cpu, error }
}

/// Errors from controlling a [`Machine`].
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("machine has not started")]
    NotStarted,

    #[error("machine is not running")]
    NotRunning,

    #[error(transparent)]
    Cpu(#[from] CpuError),

    #[error("machine halted: {0}")]
    Halted(CpuError),

    #[error("stepping thread panicked")]
    Panicked,
}
