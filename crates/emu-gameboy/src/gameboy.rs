//! Top-level Game Boy system.
//!
//! Owns one CPU and one memory bus. Construction and `reset()` both run the
//! boot sequence: clear memory, map the program, apply the post-boot I/O
//! values and put the CPU at $0100 with SP at $FFFE.

use emu_core::{Cpu, Observable, Value};
use sharp_sm83::{BOOT_PC, Sm83, StepError, disassemble};

use crate::config::{GameBoyConfig, TEST_PROGRAM};
use crate::memory::Memory;
use crate::post_boot::apply_post_boot;

/// Outcome of [`GameBoy::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Instructions executed by this call.
    pub steps: u64,
    /// True if the run ended because the CPU halted.
    pub halted: bool,
}

/// Game Boy system.
pub struct GameBoy {
    cpu: Sm83,
    memory: Memory,
    /// Image re-mapped on every boot. `None` boots the built-in test program.
    rom: Option<Vec<u8>>,
}

impl GameBoy {
    /// Create a machine and run the boot sequence.
    #[must_use]
    pub fn new(config: GameBoyConfig) -> Self {
        let mut gb = Self {
            cpu: Sm83::new(),
            memory: Memory::new(),
            rom: config.rom,
        };
        gb.boot();
        gb
    }

    fn boot(&mut self) {
        self.memory.reset();
        match &self.rom {
            Some(image) => {
                let mapped = self.memory.load_image(image);
                log::debug!("mapped {mapped} ROM bytes at $0000");
            }
            None => {
                self.memory.load(BOOT_PC, &TEST_PROGRAM);
                log::debug!("no ROM, installed built-in test program at ${BOOT_PC:04X}");
            }
        }
        apply_post_boot(&mut self.memory);
        self.cpu.reset();
    }

    /// Execute one instruction.
    ///
    /// # Errors
    ///
    /// Returns the CPU's [`StepError`] when it hits an invalid opcode.
    pub fn step(&mut self) -> Result<(), StepError> {
        if log::log_enabled!(log::Level::Trace) && !self.cpu.is_halted() {
            let pc = self.cpu.pc();
            let (text, _) = disassemble(&mut self.memory, pc);
            log::trace!("{pc:04X}  {text:<16} {}", self.cpu.registers());
        }
        self.cpu.step(&mut self.memory)
    }

    /// Step until the CPU halts or `max_steps` instructions have run.
    /// A `max_steps` of zero means no limit.
    ///
    /// # Errors
    ///
    /// Returns the CPU's [`StepError`] when it hits an invalid opcode.
    pub fn run(&mut self, max_steps: u64) -> Result<RunSummary, StepError> {
        let mut steps = 0;
        while !self.cpu.is_halted() {
            if max_steps != 0 && steps >= max_steps {
                break;
            }
            self.step()?;
            steps += 1;
        }
        Ok(RunSummary {
            steps,
            halted: self.cpu.is_halted(),
        })
    }

    /// Re-run the boot sequence with the same program.
    pub fn reset(&mut self) {
        self.boot();
    }

    /// Reference to the CPU.
    #[must_use]
    pub fn cpu(&self) -> &Sm83 {
        &self.cpu
    }

    /// Reference to memory.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable reference to memory, for peripherals and debuggers.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }
}

impl Observable for GameBoy {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            let hex = rest
                .strip_prefix("0x")
                .or_else(|| rest.strip_prefix('$'))
                .unwrap_or(rest);
            let addr = u16::from_str_radix(hex, 16).ok()?;
            Some(Value::U8(self.memory.peek(addr)))
        } else {
            None
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &["cpu.<sm83_paths>", "memory.<address>"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boots_to_entry_point() {
        let gb = GameBoy::new(GameBoyConfig::default());
        assert_eq!(gb.cpu().pc(), 0x0100);
        assert_eq!(gb.cpu().registers().sp, 0xFFFE);
        assert_eq!(gb.memory().peek(0x0100), 0x3E);
        assert_eq!(gb.memory().peek(0xFF40), 0x91);
    }

    #[test]
    fn run_stops_at_limit() {
        let mut gb = GameBoy::new(GameBoyConfig::default());
        let summary = gb.run(3).unwrap();
        assert_eq!(summary, RunSummary { steps: 3, halted: false });
        assert_eq!(gb.cpu().registers().a, 0x42);
        assert_eq!(gb.cpu().registers().b, 0x99);
        assert_eq!(gb.cpu().pc(), 0x0105);
    }

    #[test]
    fn run_stops_at_halt() {
        let mut rom = vec![0; 0x0200];
        rom[0x0100] = 0x00; // NOP
        rom[0x0101] = 0x76; // HALT
        let mut gb = GameBoy::new(GameBoyConfig::with_rom(rom));

        let summary = gb.run(0).unwrap();
        assert_eq!(summary, RunSummary { steps: 2, halted: true });

        // Further runs are no-ops
        assert_eq!(gb.run(10).unwrap(), RunSummary { steps: 0, halted: true });
    }

    #[test]
    fn reset_restores_boot_state() {
        let mut gb = GameBoy::new(GameBoyConfig::default());
        gb.run(3).unwrap();
        gb.memory_mut().load(0xC000, &[0xFF]);

        gb.reset();

        assert_eq!(gb.cpu().pc(), 0x0100);
        assert_eq!(gb.cpu().registers().a, 0);
        assert_eq!(gb.memory().peek(0xC000), 0);
        assert_eq!(gb.memory().peek(0x0101), 0x42);
    }

    #[test]
    fn observable_routes_to_components() {
        let gb = GameBoy::new(GameBoyConfig::default());
        assert_eq!(gb.query("cpu.pc"), Some(Value::U16(0x0100)));
        assert_eq!(gb.query("memory.ff40"), Some(Value::U8(0x91)));
        assert_eq!(gb.query("memory.0xFF47"), Some(Value::U8(0xFC)));
        assert_eq!(gb.query("memory.$0100"), Some(Value::U8(0x3E)));
        assert_eq!(gb.query("memory.zz"), None);
        assert_eq!(gb.query("ppu.ly"), None);
    }
}
