//! DCPU-16 Emulator - CLI Entry Point
//!
//! Commands:
//! - `dcpu-emu run <image>` - Load a program image and run it on the clock
//! - `dcpu-emu demo <hello|sample>` - Run one of the built-in sample programs

use clap::{Parser, Subcommand, ValueEnum};
use dcpu::programs::{DISPLAY_START, HELLO_WORLD, SAMPLE_PROGRAM};
use dcpu::{ByteOrder, Cpu, CpuError, Machine, MachineError, Word};
use std::process::exit;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "dcpu-emu")]
#[command(version = "0.1.0")]
#[command(about = "A clock-driven emulator of the DCPU-16 (1.1) CPU")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program image until it spins, faults or times out
    Run {
        /// Path to the image (.hex/.txt hex dump, anything else binary)
        program: String,
        /// Load address
        #[arg(short, long, default_value = "0", value_parser = parse_word)]
        offset: Word,
        #[command(flatten)]
        clock: ClockArgs,
        /// Byte order of binary images
        #[arg(long, value_enum, default_value_t = Endian::Big)]
        endian: Endian,
    },
    /// Run a built-in sample program
    Demo {
        #[arg(value_enum)]
        program: Demo,
        #[command(flatten)]
        clock: ClockArgs,
    },
}

#[derive(clap::Args)]
struct ClockArgs {
    /// Clock period in microseconds (0 runs unthrottled)
    #[arg(short, long, default_value = "10")]
    period_us: u64,
    /// Give up after this many milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,
    /// Keep running past `SUB PC, 1`-style spins
    #[arg(long)]
    no_halt_on_spin: bool,
    /// Print the final register snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Endian {
    Big,
    Little,
}

#[derive(Clone, Copy, ValueEnum)]
enum Demo {
    /// Copy "Hello world!" into display memory
    Hello,
    /// The example program from the DCPU-16 1.1 document
    Sample,
}

fn parse_word(s: &str) -> Result<Word, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => Word::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { program, offset, clock, endian } => {
            let order = match endian {
                Endian::Big => ByteOrder::BigEndian,
                Endian::Little => ByteOrder::LittleEndian,
            };
            let words = match dcpu::load_image(&program, order) {
                Ok(words) => words,
                Err(e) => {
                    eprintln!("❌ Failed to load {}: {}", program, e);
                    exit(1);
                }
            };
            println!("📂 Loaded {} words from {}", words.len(), program);
            run(&words, offset, &clock);
        }
        Commands::Demo { program, clock } => {
            let words: &[Word] = match program {
                Demo::Hello => &HELLO_WORLD,
                Demo::Sample => &SAMPLE_PROGRAM,
            };
            run(words, 0, &clock);
        }
    }
}

fn run(words: &[Word], offset: Word, clock: &ClockArgs) {
    let mut cpu = Cpu::new().with_halt_on_spin(!clock.no_halt_on_spin);
    if let Err(e) = cpu.load_program(words, offset, true) {
        eprintln!("❌ Failed to load program: {}", e);
        exit(1);
    }
    cpu.regs.pc = offset;

    let mut machine = Machine::new(cpu);
    if let Err(e) = machine.start(Duration::from_micros(clock.period_us)) {
        eprintln!("❌ Failed to start: {}", e);
        exit(1);
    }

    let outcome = wait(&mut machine, Duration::from_millis(clock.timeout_ms));

    let Some(cpu) = machine.cpu() else {
        eprintln!("❌ CPU was not returned by the stepping thread");
        exit(1);
    };

    report(cpu, clock.json);

    match outcome {
        Ok(None) => println!("⚠️  Timed out after {} ms", clock.timeout_ms),
        Ok(Some(CpuError::Spin { pc })) => println!("✓ Program ended spinning at {:#06x}", pc),
        Ok(Some(e)) => {
            eprintln!("❌ CPU error: {}", e);
            exit(1);
        }
        Err(e) => {
            eprintln!("❌ Machine error: {}", e);
            exit(1);
        }
    }
}

/// Poll the machine until it halts on its own or `timeout` elapses.
fn wait(machine: &mut Machine, timeout: Duration) -> Result<Option<CpuError>, MachineError> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(err) = machine.has_error()? {
            return Ok(Some(err));
        }
        if Instant::now() >= deadline {
            return match machine.stop() {
                Ok(()) => Ok(None),
                Err(MachineError::Halted(err)) => Ok(Some(err)),
                Err(e) => Err(e),
            };
        }
        thread::sleep(Duration::from_millis(1));
    }
}

fn report(cpu: &Cpu, json: bool) {
    if json {
        match serde_json::to_string_pretty(&cpu.snapshot()) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("❌ Failed to serialize snapshot: {}", e),
        }
        return;
    }

    println!();
    println!("━━━ Result ━━━");
    println!("Cycles: {}", cpu.cycles());
    println!("State:  {:?}", cpu.state());
    println!(
        "A={:04x} B={:04x} C={:04x} X={:04x} Y={:04x} Z={:04x} I={:04x} J={:04x}",
        cpu.a(), cpu.b(), cpu.c(), cpu.x(), cpu.y(), cpu.z(), cpu.i(), cpu.j()
    );
    println!("PC={:04x} SP={:04x} O={:04x}", cpu.pc(), cpu.sp(), cpu.o());

    let display: String = cpu
        .get_slice(DISPLAY_START, DISPLAY_START + 0x1ff)
        .iter()
        .take_while(|&&w| w != 0)
        .map(|&w| (w & 0x7f) as u8 as char)
        .collect();
    if !display.is_empty() {
        println!("Display: {}", display);
    }
}
