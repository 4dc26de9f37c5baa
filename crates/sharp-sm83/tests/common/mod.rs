//! Shared helpers for the SM83 integration tests.

#![allow(dead_code)]

use emu_core::Bus;
use sharp_sm83::Sm83;

/// Flat 64KB RAM bus for testing.
pub struct TestBus {
    ram: Box<[u8; 0x10000]>,
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            ram: Box::new([0; 0x10000]),
        }
    }

    pub fn load(&mut self, address: u16, bytes: &[u8]) {
        let start = address as usize;
        self.ram[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn load_ram(&mut self, entries: &[(u16, u8)]) {
        for &(addr, value) in entries {
            self.ram[addr as usize] = value;
        }
    }

    pub fn peek(&self, address: u16) -> u8 {
        self.ram[address as usize]
    }
}

impl Bus for TestBus {
    fn read(&mut self, address: u16) -> u8 {
        self.ram[address as usize]
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[address as usize] = value;
    }
}

/// A CPU at the boot entry point with `program` loaded at 0x0100.
pub fn boot_with(program: &[u8]) -> (Sm83, TestBus) {
    let mut bus = TestBus::new();
    bus.load(0x0100, program);
    (Sm83::new(), bus)
}

/// Step until the CPU halts, returning the number of instructions run.
pub fn run_until_halt(cpu: &mut Sm83, bus: &mut TestBus) -> u64 {
    let mut count = 0;
    while !emu_core::Cpu::is_halted(cpu) && count < 10_000 {
        cpu.step(bus).expect("program should only use valid opcodes");
        count += 1;
    }
    count
}
