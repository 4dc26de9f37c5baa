//! Game Boy CPU runner.
//!
//! Boots a ROM image (or the built-in test program), steps the CPU until it
//! halts or the step limit is reached, then prints the register file.

use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Duration;

use clap::Parser;
use emu_core::Cpu;
use emu_gameboy::{GameBoy, GameBoyConfig, read_rom};
use log::LevelFilter;
use sharp_sm83::StepError;

#[derive(Parser)]
#[command(name = "emu-gameboy", version, about = "Run a Game Boy program on the SM83 interpreter")]
struct Args {
    /// ROM file to load. Without one the built-in test program runs.
    #[arg(value_name = "ROM_FILE")]
    rom_file: Option<PathBuf>,

    /// Maximum number of instructions to execute (0 runs until halt).
    /// Defaults to 3 for the built-in test program and 1000000 for a ROM.
    #[arg(short, long)]
    max_steps: Option<u64>,

    /// Log every instruction with its disassembly
    #[arg(short, long)]
    trace: bool,

    /// Pause between instructions, in milliseconds
    #[arg(long, default_value_t = 0)]
    step_delay_ms: u64,

    /// Run the built-in test program even if a ROM file is given
    #[arg(long)]
    test_program: bool,
}

fn init_logging(trace: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if trace {
        builder
            .filter_module("sharp_sm83", LevelFilter::Trace)
            .filter_module("emu_gameboy", LevelFilter::Trace);
    }
    builder.init();
}

/// Step the machine, sleeping between instructions when a delay is set.
fn run(gb: &mut GameBoy, max_steps: u64, delay: Duration) -> Result<u64, StepError> {
    if delay.is_zero() {
        return gb.run(max_steps).map(|summary| summary.steps);
    }

    let mut steps = 0;
    while !gb.cpu().is_halted() && (max_steps == 0 || steps < max_steps) {
        gb.step()?;
        steps += 1;
        thread::sleep(delay);
    }
    Ok(steps)
}

fn main() {
    let args = Args::parse();
    init_logging(args.trace);

    let rom_path = args.rom_file.as_deref().filter(|_| !args.test_program);
    let config = match rom_path {
        Some(path) => match read_rom(path) {
            Ok(image) => GameBoyConfig::with_rom(image),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => GameBoyConfig::default(),
    };

    let max_steps = args.max_steps.unwrap_or_else(|| config.default_max_steps());
    let mut gb = GameBoy::new(config);
    let delay = Duration::from_millis(args.step_delay_ms);

    match run(&mut gb, max_steps, delay) {
        Ok(steps) => {
            let state = if gb.cpu().is_halted() { "halted" } else { "stopped" };
            log::info!("{state} after {steps} instructions");
            println!("{}", gb.cpu().registers());
        }
        Err(e) => {
            log::error!("{e}");
            println!("{}", gb.cpu().registers());
            process::exit(1);
        }
    }
}
