//! SM83 register set.

#![allow(clippy::cast_possible_truncation)] // Intentional truncation for low byte extraction.

use std::fmt;

use crate::flags::{CF, FLAG_MASK, Flag, HF, NF, ZF};

/// Program counter value at the point the boot firmware hands over to
/// cartridge code.
pub const BOOT_PC: u16 = 0x0100;

/// Stack pointer value at the point the boot firmware hands over to
/// cartridge code.
pub const BOOT_SP: u16 = 0xFFFE;

/// A 16-bit view over two 8-bit registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pair {
    AF,
    BC,
    DE,
    HL,
}

/// SM83 registers.
///
/// The pairs AF, BC, DE and HL are views composed from the 8-bit fields, not
/// separate storage. F is private so that its low nibble stays zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    /// Registers as the boot firmware leaves them: PC at the cartridge entry
    /// point, SP at the top of high RAM, everything else zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            f: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            sp: BOOT_SP,
            pc: BOOT_PC,
        }
    }

    /// Get the F register.
    #[must_use]
    pub const fn f(&self) -> u8 {
        self.f
    }

    /// Set the F register. Bits 0-3 are discarded.
    pub fn set_f(&mut self, value: u8) {
        self.f = value & FLAG_MASK;
    }

    /// Get AF register pair.
    #[must_use]
    pub const fn af(&self) -> u16 {
        (self.a as u16) << 8 | self.f as u16
    }

    /// Get BC register pair.
    #[must_use]
    pub const fn bc(&self) -> u16 {
        (self.b as u16) << 8 | self.c as u16
    }

    /// Get DE register pair.
    #[must_use]
    pub const fn de(&self) -> u16 {
        (self.d as u16) << 8 | self.e as u16
    }

    /// Get HL register pair.
    #[must_use]
    pub const fn hl(&self) -> u16 {
        (self.h as u16) << 8 | self.l as u16
    }

    /// Set AF register pair. The low nibble of F is forced to zero.
    pub fn set_af(&mut self, value: u16) {
        self.a = (value >> 8) as u8;
        self.set_f(value as u8);
    }

    /// Set BC register pair.
    pub fn set_bc(&mut self, value: u16) {
        self.b = (value >> 8) as u8;
        self.c = value as u8;
    }

    /// Set DE register pair.
    pub fn set_de(&mut self, value: u16) {
        self.d = (value >> 8) as u8;
        self.e = value as u8;
    }

    /// Set HL register pair.
    pub fn set_hl(&mut self, value: u16) {
        self.h = (value >> 8) as u8;
        self.l = value as u8;
    }

    /// Read a register pair by name.
    #[must_use]
    pub const fn pair(&self, pair: Pair) -> u16 {
        match pair {
            Pair::AF => self.af(),
            Pair::BC => self.bc(),
            Pair::DE => self.de(),
            Pair::HL => self.hl(),
        }
    }

    /// Write a register pair by name.
    pub fn set_pair(&mut self, pair: Pair, value: u16) {
        match pair {
            Pair::AF => self.set_af(value),
            Pair::BC => self.set_bc(value),
            Pair::DE => self.set_de(value),
            Pair::HL => self.set_hl(value),
        }
    }

    /// Get the state of a single flag.
    #[must_use]
    pub const fn flag(&self, flag: Flag) -> bool {
        self.f & flag.mask() != 0
    }

    /// Set or clear a single flag, leaving the other three untouched.
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        if value {
            self.f |= flag.mask();
        } else {
            self.f &= !flag.mask();
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |mask: u8, name: char| if self.f & mask != 0 { name } else { '-' };
        write!(
            f,
            "AF={:04X} BC={:04X} DE={:04X} HL={:04X} SP={:04X} PC={:04X} [{}{}{}{}]",
            self.af(),
            self.bc(),
            self.de(),
            self.hl(),
            self.sp,
            self.pc,
            flag(ZF, 'Z'),
            flag(NF, 'N'),
            flag(HF, 'H'),
            flag(CF, 'C'),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_values() {
        let regs = Registers::new();
        assert_eq!(regs.pc, 0x0100);
        assert_eq!(regs.sp, 0xFFFE);
        assert_eq!(regs.af(), 0x0000);
    }

    #[test]
    fn pairs_are_views_over_bytes() {
        let mut regs = Registers::new();
        regs.set_bc(0x1234);
        assert_eq!((regs.b, regs.c), (0x12, 0x34));
        regs.e = 0xCD;
        regs.d = 0xAB;
        assert_eq!(regs.de(), 0xABCD);
        regs.set_pair(Pair::HL, 0xBEEF);
        assert_eq!(regs.pair(Pair::HL), 0xBEEF);
        assert_eq!((regs.h, regs.l), (0xBE, 0xEF));
    }

    #[test]
    fn af_masks_low_nibble() {
        let mut regs = Registers::new();
        regs.set_af(0x12FF);
        assert_eq!(regs.a, 0x12);
        assert_eq!(regs.f(), 0xF0);
        assert_eq!(regs.af(), 0x12F0);

        regs.set_f(0x0F);
        assert_eq!(regs.f(), 0x00);
    }

    #[test]
    fn flags_map_to_upper_bits() {
        let mut regs = Registers::new();
        regs.set_flag(Flag::Z, true);
        assert_eq!(regs.f(), 0x80);
        regs.set_flag(Flag::N, true);
        assert_eq!(regs.f(), 0xC0);
        regs.set_flag(Flag::H, true);
        assert_eq!(regs.f(), 0xE0);
        regs.set_flag(Flag::C, true);
        assert_eq!(regs.f(), 0xF0);

        regs.set_flag(Flag::N, false);
        assert_eq!(regs.f(), 0xB0);
        assert!(regs.flag(Flag::Z));
        assert!(!regs.flag(Flag::N));
        assert!(regs.flag(Flag::H));
        assert!(regs.flag(Flag::C));
    }

    #[test]
    fn display_dumps_pairs_and_flags() {
        let mut regs = Registers::new();
        regs.set_af(0x01B0);
        regs.set_hl(0x014D);
        assert_eq!(
            regs.to_string(),
            "AF=01B0 BC=0000 DE=0000 HL=014D SP=FFFE PC=0100 [Z-HC]"
        );
    }
}
