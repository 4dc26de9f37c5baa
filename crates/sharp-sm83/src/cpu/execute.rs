//! Instruction handlers for the unprefixed opcode table.
//!
//! Every handler has the same shape so it can sit in the dispatch table:
//! it receives the CPU, the bus and the opcode byte, with PC already past
//! the opcode. Grouped handlers decode their operands from the opcode bits:
//!
//! - `r` fields (3 bits): B, C, D, E, H, L, (HL), A
//! - `rr` fields (2 bits at bit 4): BC, DE, HL, SP (or AF for PUSH/POP)
//! - `cc` fields (2 bits at bit 3): NZ, Z, NC, C

#![allow(clippy::unused_self)]

use emu_core::Bus;

use crate::alu;
use crate::flags::{CF, HF, NF, ZF};

use super::Sm83;

/// Base of the high page reached by LDH and LD (C).
const HIGH_PAGE: u16 = 0xFF00;

impl Sm83 {
    fn read_r8(&mut self, bus: &mut dyn Bus, index: u8) -> u8 {
        match index & 7 {
            0 => self.regs.b,
            1 => self.regs.c,
            2 => self.regs.d,
            3 => self.regs.e,
            4 => self.regs.h,
            5 => self.regs.l,
            6 => bus.read(self.regs.hl()),
            _ => self.regs.a,
        }
    }

    fn write_r8(&mut self, bus: &mut dyn Bus, index: u8, value: u8) {
        match index & 7 {
            0 => self.regs.b = value,
            1 => self.regs.c = value,
            2 => self.regs.d = value,
            3 => self.regs.e = value,
            4 => self.regs.h = value,
            5 => self.regs.l = value,
            6 => bus.write(self.regs.hl(), value),
            _ => self.regs.a = value,
        }
    }

    fn read_rr(&self, index: u8) -> u16 {
        match index & 3 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.sp,
        }
    }

    fn write_rr(&mut self, index: u8, value: u16) {
        match index & 3 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.sp = value,
        }
    }

    fn condition(&self, op: u8) -> bool {
        let f = self.regs.f();
        match (op >> 3) & 3 {
            0 => f & ZF == 0,
            1 => f & ZF != 0,
            2 => f & CF == 0,
            _ => f & CF != 0,
        }
    }

    fn jump_relative(&mut self, offset: u8) {
        #[allow(clippy::cast_possible_wrap)]
        let offset = i16::from(offset as i8);
        self.regs.pc = self.regs.pc.wrapping_add_signed(offset);
    }

    /// Apply one of the eight accumulator ALU operations, in opcode order:
    /// ADD, ADC, SUB, SBC, AND, XOR, OR, CP.
    fn alu(&mut self, kind: u8, value: u8) {
        let a = self.regs.a;
        let carry = self.regs.f() & CF != 0;
        let result = match kind & 7 {
            0 => alu::add8(a, value),
            1 => alu::adc8(a, value, carry),
            2 => alu::sub8(a, value),
            3 => alu::sbc8(a, value, carry),
            4 => alu::and8(a, value),
            5 => alu::xor8(a, value),
            6 => alu::or8(a, value),
            _ => alu::cp8(a, value),
        };
        if kind & 7 != 7 {
            self.regs.a = result.value;
        }
        self.regs.set_f(result.flags);
    }

    // === Misc / control ===

    pub(crate) fn nop(&mut self, _bus: &mut dyn Bus, _op: u8) {}

    pub(crate) fn stop(&mut self, bus: &mut dyn Bus, _op: u8) {
        // STOP is two bytes long; the second is padding.
        self.fetch8(bus);
        self.halted = true;
    }

    pub(crate) fn halt(&mut self, _bus: &mut dyn Bus, _op: u8) {
        self.halted = true;
    }

    pub(crate) fn di(&mut self, _bus: &mut dyn Bus, _op: u8) {
        self.ime = false;
    }

    pub(crate) fn ei(&mut self, _bus: &mut dyn Bus, _op: u8) {
        self.ime = true;
    }

    // === 8-bit loads ===

    /// LD r, r'
    pub(crate) fn ld_r_r(&mut self, bus: &mut dyn Bus, op: u8) {
        let value = self.read_r8(bus, op);
        self.write_r8(bus, op >> 3, value);
    }

    /// LD r, d8
    pub(crate) fn ld_r_d8(&mut self, bus: &mut dyn Bus, op: u8) {
        let value = self.fetch8(bus);
        self.write_r8(bus, op >> 3, value);
    }

    /// LD (BC), A / LD (DE), A
    pub(crate) fn ld_rr_ind_a(&mut self, bus: &mut dyn Bus, op: u8) {
        bus.write(self.read_rr(op >> 4), self.regs.a);
    }

    /// LD A, (BC) / LD A, (DE)
    pub(crate) fn ld_a_rr_ind(&mut self, bus: &mut dyn Bus, op: u8) {
        self.regs.a = bus.read(self.read_rr(op >> 4));
    }

    /// LD (HL+), A
    pub(crate) fn ld_hli_a(&mut self, bus: &mut dyn Bus, _op: u8) {
        let hl = self.regs.hl();
        bus.write(hl, self.regs.a);
        self.regs.set_hl(hl.wrapping_add(1));
    }

    /// LD (HL-), A
    pub(crate) fn ld_hld_a(&mut self, bus: &mut dyn Bus, _op: u8) {
        let hl = self.regs.hl();
        bus.write(hl, self.regs.a);
        self.regs.set_hl(hl.wrapping_sub(1));
    }

    /// LD A, (HL+)
    pub(crate) fn ld_a_hli(&mut self, bus: &mut dyn Bus, _op: u8) {
        let hl = self.regs.hl();
        self.regs.a = bus.read(hl);
        self.regs.set_hl(hl.wrapping_add(1));
    }

    /// LD A, (HL-)
    pub(crate) fn ld_a_hld(&mut self, bus: &mut dyn Bus, _op: u8) {
        let hl = self.regs.hl();
        self.regs.a = bus.read(hl);
        self.regs.set_hl(hl.wrapping_sub(1));
    }

    /// LD (a16), A
    pub(crate) fn ld_a16_a(&mut self, bus: &mut dyn Bus, _op: u8) {
        let addr = self.fetch16(bus);
        bus.write(addr, self.regs.a);
    }

    /// LD A, (a16)
    pub(crate) fn ld_a_a16(&mut self, bus: &mut dyn Bus, _op: u8) {
        let addr = self.fetch16(bus);
        self.regs.a = bus.read(addr);
    }

    /// LDH (a8), A
    pub(crate) fn ldh_a8_a(&mut self, bus: &mut dyn Bus, _op: u8) {
        let offset = self.fetch8(bus);
        bus.write(HIGH_PAGE | u16::from(offset), self.regs.a);
    }

    /// LDH A, (a8)
    pub(crate) fn ldh_a_a8(&mut self, bus: &mut dyn Bus, _op: u8) {
        let offset = self.fetch8(bus);
        self.regs.a = bus.read(HIGH_PAGE | u16::from(offset));
    }

    /// LD (C), A
    pub(crate) fn ld_c_ind_a(&mut self, bus: &mut dyn Bus, _op: u8) {
        bus.write(HIGH_PAGE | u16::from(self.regs.c), self.regs.a);
    }

    /// LD A, (C)
    pub(crate) fn ld_a_c_ind(&mut self, bus: &mut dyn Bus, _op: u8) {
        self.regs.a = bus.read(HIGH_PAGE | u16::from(self.regs.c));
    }

    // === 16-bit loads ===

    /// LD rr, d16
    pub(crate) fn ld_rr_d16(&mut self, bus: &mut dyn Bus, op: u8) {
        let value = self.fetch16(bus);
        self.write_rr(op >> 4, value);
    }

    /// LD (a16), SP
    pub(crate) fn ld_a16_sp(&mut self, bus: &mut dyn Bus, _op: u8) {
        let addr = self.fetch16(bus);
        let [lo, hi] = self.regs.sp.to_le_bytes();
        bus.write(addr, lo);
        bus.write(addr.wrapping_add(1), hi);
    }

    /// LD SP, HL
    pub(crate) fn ld_sp_hl(&mut self, _bus: &mut dyn Bus, _op: u8) {
        self.regs.sp = self.regs.hl();
    }

    /// LD HL, SP+r8
    pub(crate) fn ld_hl_sp_r8(&mut self, bus: &mut dyn Bus, _op: u8) {
        let offset = self.fetch8(bus);
        let (result, flags) = alu::add_sp_offset(self.regs.sp, offset);
        self.regs.set_hl(result);
        self.regs.set_f(flags);
    }

    /// PUSH BC/DE/HL/AF
    pub(crate) fn push_rr(&mut self, bus: &mut dyn Bus, op: u8) {
        let value = match (op >> 4) & 3 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => self.regs.hl(),
            _ => self.regs.af(),
        };
        self.push16(bus, value);
    }

    /// POP BC/DE/HL/AF
    pub(crate) fn pop_rr(&mut self, bus: &mut dyn Bus, op: u8) {
        let value = self.pop16(bus);
        match (op >> 4) & 3 {
            0 => self.regs.set_bc(value),
            1 => self.regs.set_de(value),
            2 => self.regs.set_hl(value),
            _ => self.regs.set_af(value),
        }
    }

    // === 8-bit ALU ===

    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A, r
    pub(crate) fn alu_r(&mut self, bus: &mut dyn Bus, op: u8) {
        let value = self.read_r8(bus, op);
        self.alu(op >> 3, value);
    }

    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A, d8
    pub(crate) fn alu_d8(&mut self, bus: &mut dyn Bus, op: u8) {
        let value = self.fetch8(bus);
        self.alu(op >> 3, value);
    }

    /// INC r
    pub(crate) fn inc_r(&mut self, bus: &mut dyn Bus, op: u8) {
        let value = self.read_r8(bus, op >> 3);
        let result = alu::inc8(value);
        self.write_r8(bus, op >> 3, result.value);
        self.regs.set_f((self.regs.f() & CF) | result.flags);
    }

    /// DEC r
    pub(crate) fn dec_r(&mut self, bus: &mut dyn Bus, op: u8) {
        let value = self.read_r8(bus, op >> 3);
        let result = alu::dec8(value);
        self.write_r8(bus, op >> 3, result.value);
        self.regs.set_f((self.regs.f() & CF) | result.flags);
    }

    /// DAA
    pub(crate) fn daa(&mut self, _bus: &mut dyn Bus, _op: u8) {
        let result = alu::daa(self.regs.a, self.regs.f());
        self.regs.a = result.value;
        self.regs.set_f(result.flags);
    }

    /// CPL
    pub(crate) fn cpl(&mut self, _bus: &mut dyn Bus, _op: u8) {
        self.regs.a = !self.regs.a;
        self.regs.set_f((self.regs.f() & (ZF | CF)) | NF | HF);
    }

    /// SCF
    pub(crate) fn scf(&mut self, _bus: &mut dyn Bus, _op: u8) {
        self.regs.set_f((self.regs.f() & ZF) | CF);
    }

    /// CCF
    pub(crate) fn ccf(&mut self, _bus: &mut dyn Bus, _op: u8) {
        let f = self.regs.f();
        self.regs.set_f((f & ZF) | ((f & CF) ^ CF));
    }

    // === Accumulator rotates ===
    // Z is always cleared, unlike the CB-prefixed forms.

    /// RLCA
    pub(crate) fn rlca(&mut self, _bus: &mut dyn Bus, _op: u8) {
        let carry = self.regs.a & 0x80 != 0;
        self.regs.a = self.regs.a.rotate_left(1);
        self.regs.set_f(if carry { CF } else { 0 });
    }

    /// RRCA
    pub(crate) fn rrca(&mut self, _bus: &mut dyn Bus, _op: u8) {
        let carry = self.regs.a & 0x01 != 0;
        self.regs.a = self.regs.a.rotate_right(1);
        self.regs.set_f(if carry { CF } else { 0 });
    }

    /// RLA - rotate left A through carry
    pub(crate) fn rla(&mut self, _bus: &mut dyn Bus, _op: u8) {
        let old_carry = u8::from(self.regs.f() & CF != 0);
        let carry = self.regs.a & 0x80 != 0;
        self.regs.a = (self.regs.a << 1) | old_carry;
        self.regs.set_f(if carry { CF } else { 0 });
    }

    /// RRA - rotate right A through carry
    pub(crate) fn rra(&mut self, _bus: &mut dyn Bus, _op: u8) {
        let old_carry = if self.regs.f() & CF != 0 { 0x80 } else { 0 };
        let carry = self.regs.a & 0x01 != 0;
        self.regs.a = (self.regs.a >> 1) | old_carry;
        self.regs.set_f(if carry { CF } else { 0 });
    }

    // === 16-bit ALU ===

    /// INC rr - no flags
    pub(crate) fn inc_rr(&mut self, _bus: &mut dyn Bus, op: u8) {
        let value = self.read_rr(op >> 4).wrapping_add(1);
        self.write_rr(op >> 4, value);
    }

    /// DEC rr - no flags
    pub(crate) fn dec_rr(&mut self, _bus: &mut dyn Bus, op: u8) {
        let value = self.read_rr(op >> 4).wrapping_sub(1);
        self.write_rr(op >> 4, value);
    }

    /// ADD HL, rr
    pub(crate) fn add_hl_rr(&mut self, _bus: &mut dyn Bus, op: u8) {
        let (result, flags) = alu::add16(self.regs.hl(), self.read_rr(op >> 4));
        self.regs.set_hl(result);
        self.regs.set_f((self.regs.f() & ZF) | flags);
    }

    /// ADD SP, r8
    pub(crate) fn add_sp_r8(&mut self, bus: &mut dyn Bus, _op: u8) {
        let offset = self.fetch8(bus);
        let (result, flags) = alu::add_sp_offset(self.regs.sp, offset);
        self.regs.sp = result;
        self.regs.set_f(flags);
    }

    // === Jumps, calls and returns ===

    /// JR r8
    pub(crate) fn jr(&mut self, bus: &mut dyn Bus, _op: u8) {
        let offset = self.fetch8(bus);
        self.jump_relative(offset);
    }

    /// JR cc, r8
    pub(crate) fn jr_cc(&mut self, bus: &mut dyn Bus, op: u8) {
        let offset = self.fetch8(bus);
        if self.condition(op) {
            self.jump_relative(offset);
        }
    }

    /// JP a16
    pub(crate) fn jp(&mut self, bus: &mut dyn Bus, _op: u8) {
        self.regs.pc = self.fetch16(bus);
    }

    /// JP cc, a16
    pub(crate) fn jp_cc(&mut self, bus: &mut dyn Bus, op: u8) {
        let addr = self.fetch16(bus);
        if self.condition(op) {
            self.regs.pc = addr;
        }
    }

    /// JP HL
    pub(crate) fn jp_hl(&mut self, _bus: &mut dyn Bus, _op: u8) {
        self.regs.pc = self.regs.hl();
    }

    /// CALL a16
    pub(crate) fn call(&mut self, bus: &mut dyn Bus, _op: u8) {
        let addr = self.fetch16(bus);
        self.push16(bus, self.regs.pc);
        self.regs.pc = addr;
    }

    /// CALL cc, a16
    pub(crate) fn call_cc(&mut self, bus: &mut dyn Bus, op: u8) {
        let addr = self.fetch16(bus);
        if self.condition(op) {
            self.push16(bus, self.regs.pc);
            self.regs.pc = addr;
        }
    }

    /// RET
    pub(crate) fn ret(&mut self, bus: &mut dyn Bus, _op: u8) {
        self.regs.pc = self.pop16(bus);
    }

    /// RET cc
    pub(crate) fn ret_cc(&mut self, bus: &mut dyn Bus, op: u8) {
        if self.condition(op) {
            self.regs.pc = self.pop16(bus);
        }
    }

    /// RETI
    pub(crate) fn reti(&mut self, bus: &mut dyn Bus, _op: u8) {
        self.regs.pc = self.pop16(bus);
        self.ime = true;
    }

    /// RST n - the target is encoded in bits 3-5
    pub(crate) fn rst(&mut self, bus: &mut dyn Bus, op: u8) {
        self.push16(bus, self.regs.pc);
        self.regs.pc = u16::from(op & 0x38);
    }
}
