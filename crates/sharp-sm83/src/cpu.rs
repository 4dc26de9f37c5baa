//! SM83 CPU core with per-instruction execution.

#![allow(clippy::cast_possible_truncation)] // Intentional truncation for low byte extraction.

mod execute;

use emu_core::{Bus, Cpu, Observable, Value};

use crate::error::StepError;
use crate::flags::{CF, HF, NF, ZF};
use crate::opcodes::decode;
use crate::registers::Registers;

/// SM83 CPU.
///
/// The CPU does not own the bus. Instead, the bus is passed to `step()` for
/// each instruction, so peripherals sharing the address space can be wired
/// in by the machine that owns both.
#[derive(Debug)]
pub struct Sm83 {
    /// Register file.
    pub(crate) regs: Registers,
    /// Set by HALT and STOP. Nothing wakes the CPU except `reset()`.
    halted: bool,
    /// Interrupt master enable, set by EI and RETI, cleared by DI.
    ime: bool,
    /// The error that locked the CPU up, replayed on every later step.
    lockup: Option<StepError>,
    /// Instructions executed since creation or reset.
    instructions: u64,
}

impl Sm83 {
    /// Create a CPU in the post-boot state (PC=0x0100, SP=0xFFFE).
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            halted: false,
            ime: false,
            lockup: None,
            instructions: 0,
        }
    }

    /// Execute exactly one instruction.
    ///
    /// A halted CPU does nothing and reports success. An opcode with no
    /// table entry leaves PC on the offending byte, locks the CPU and
    /// returns [`StepError::InvalidOpcode`]; every later call returns the
    /// same error until `reset()`.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<(), StepError> {
        if let Some(err) = self.lockup {
            return Err(err);
        }
        if self.halted {
            return Ok(());
        }

        let address = self.regs.pc;
        let opcode = self.fetch8(bus);
        let Some(instruction) = decode(opcode) else {
            self.regs.pc = address;
            let err = StepError::InvalidOpcode { opcode, address };
            log::debug!("locked up: {err}");
            self.lockup = Some(err);
            return Err(err);
        };

        (instruction.exec)(self, bus, opcode);
        self.instructions += 1;
        Ok(())
    }

    /// Interrupt master enable flag.
    #[must_use]
    pub const fn ime(&self) -> bool {
        self.ime
    }

    /// True once an invalid opcode has locked the CPU.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.lockup.is_some()
    }

    /// Instructions executed since creation or the last reset.
    #[must_use]
    pub const fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Mutable access to the register file.
    ///
    /// Only available in test builds.
    #[cfg(feature = "test-utils")]
    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    /// Push a byte pair: decrement SP, write `hi`, decrement SP, write `lo`.
    ///
    /// Afterwards `hi` is at SP+1 and `lo` at SP.
    pub fn push(&mut self, bus: &mut (impl Bus + ?Sized), hi: u8, lo: u8) {
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, lo);
    }

    /// Pop a byte pair pushed by [`push`](Self::push), returning `(hi, lo)`.
    ///
    /// Reads mirror the writes: `lo` at SP, then `hi` at SP+1.
    pub fn pop(&mut self, bus: &mut (impl Bus + ?Sized)) -> (u8, u8) {
        let lo = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        (hi, lo)
    }

    fn push16(&mut self, bus: &mut dyn Bus, value: u16) {
        self.push(bus, (value >> 8) as u8, value as u8);
    }

    fn pop16(&mut self, bus: &mut dyn Bus) -> u16 {
        let (hi, lo) = self.pop(bus);
        u16::from(hi) << 8 | u16::from(lo)
    }

    /// Read the byte at PC and advance PC.
    fn fetch8(&mut self, bus: &mut dyn Bus) -> u8 {
        let byte = bus.read(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        byte
    }

    /// Read a little-endian word at PC, advancing PC twice.
    fn fetch16(&mut self, bus: &mut dyn Bus) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from(hi) << 8 | u16::from(lo)
    }
}

impl Default for Sm83 {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu for Sm83 {
    type Registers = Registers;
    type Error = StepError;

    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<(), StepError> {
        Sm83::step(self, bus)
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Observable for Sm83 {
    fn query(&self, path: &str) -> Option<Value> {
        let f = self.regs.f();
        match path {
            "a" => Some(self.regs.a.into()),
            "f" => Some(f.into()),
            "b" => Some(self.regs.b.into()),
            "c" => Some(self.regs.c.into()),
            "d" => Some(self.regs.d.into()),
            "e" => Some(self.regs.e.into()),
            "h" => Some(self.regs.h.into()),
            "l" => Some(self.regs.l.into()),

            "af" => Some(self.regs.af().into()),
            "bc" => Some(self.regs.bc().into()),
            "de" => Some(self.regs.de().into()),
            "hl" => Some(self.regs.hl().into()),

            "sp" => Some(self.regs.sp.into()),
            "pc" => Some(self.regs.pc.into()),

            "flags.z" => Some((f & ZF != 0).into()),
            "flags.n" => Some((f & NF != 0).into()),
            "flags.h" => Some((f & HF != 0).into()),
            "flags.c" => Some((f & CF != 0).into()),

            "halted" => Some(self.halted.into()),
            "ime" => Some(self.ime.into()),
            "locked" => Some(self.lockup.is_some().into()),
            "instructions" => Some(self.instructions.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "a", "f", "b", "c", "d", "e", "h", "l", "af", "bc", "de", "hl", "sp", "pc",
            "flags.z", "flags.n", "flags.h", "flags.c", "halted", "ime", "locked",
            "instructions",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ram([u8; 0x10000]);

    impl Bus for Ram {
        fn read(&mut self, address: u16) -> u8 {
            self.0[address as usize]
        }

        fn write(&mut self, address: u16, value: u8) {
            self.0[address as usize] = value;
        }
    }

    #[allow(clippy::large_stack_arrays)]
    fn ram_with(address: u16, bytes: &[u8]) -> Box<Ram> {
        let mut ram = Box::new(Ram([0; 0x10000]));
        let start = address as usize;
        ram.0[start..start + bytes.len()].copy_from_slice(bytes);
        ram
    }

    #[test]
    fn fetch16_is_little_endian() {
        let mut ram = ram_with(0x0100, &[0x34, 0x12]);
        let mut cpu = Sm83::new();
        assert_eq!(cpu.fetch16(ram.as_mut()), 0x1234);
        assert_eq!(cpu.regs.pc, 0x0102);
    }

    #[test]
    fn fetch_wraps_pc() {
        let mut ram = ram_with(0xFFFF, &[0xAA]);
        let mut cpu = Sm83::new();
        cpu.regs.pc = 0xFFFF;
        assert_eq!(cpu.fetch8(ram.as_mut()), 0xAA);
        assert_eq!(cpu.regs.pc, 0x0000);
    }

    #[test]
    fn push_places_hi_above_lo() {
        let mut ram = ram_with(0, &[]);
        let mut cpu = Sm83::new();
        cpu.push(ram.as_mut(), 0xAB, 0xCD);
        assert_eq!(cpu.regs.sp, 0xFFFC);
        assert_eq!(ram.0[0xFFFD], 0xAB);
        assert_eq!(ram.0[0xFFFC], 0xCD);
        assert_eq!(cpu.pop(ram.as_mut()), (0xAB, 0xCD));
        assert_eq!(cpu.regs.sp, 0xFFFE);
    }

    #[test]
    fn invalid_opcode_locks_the_cpu() {
        let mut ram = ram_with(0x0100, &[0xD3]);
        let mut cpu = Sm83::new();
        let err = StepError::InvalidOpcode {
            opcode: 0xD3,
            address: 0x0100,
        };
        assert_eq!(cpu.step(ram.as_mut()), Err(err));
        assert_eq!(cpu.regs.pc, 0x0100);
        assert!(cpu.is_locked());

        // Patching memory does not unlock it
        ram.0[0x0100] = 0x00;
        assert_eq!(cpu.step(ram.as_mut()), Err(err));

        Cpu::reset(&mut cpu);
        assert!(!cpu.is_locked());
        assert_eq!(cpu.step(ram.as_mut()), Ok(()));
    }

    #[test]
    fn observable_paths_resolve() {
        let cpu = Sm83::new();
        for path in cpu.query_paths() {
            assert!(cpu.query(path).is_some(), "{path} should resolve");
        }
        assert_eq!(cpu.query("pc"), Some(Value::U16(0x0100)));
        assert_eq!(cpu.query("nope"), None);
    }
}
