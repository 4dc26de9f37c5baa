//! The unprefixed opcode table.
//!
//! Decoding is a single index into [`OPCODES`]. Slots with no instruction
//! (the eleven holes in the SM83 map, plus 0xCB whose extended table this
//! core does not implement) are `None`.

use std::fmt;

use emu_core::Bus;

use crate::cpu::Sm83;

/// An instruction handler. PC points past the opcode when it is called.
pub(crate) type Handler = fn(&mut Sm83, &mut dyn Bus, u8);

/// One entry of the dispatch table.
#[derive(Clone, Copy)]
pub struct Instruction {
    /// The opcode byte this entry is indexed by.
    pub opcode: u8,
    /// Mnemonic template. Operand placeholders are `d8`, `d16`, `a8`,
    /// `a16` and `r8`.
    pub mnemonic: &'static str,
    /// Number of operand bytes following the opcode.
    pub operand_bytes: u8,
    pub(crate) exec: Handler,
}

impl Instruction {
    /// Total encoded length in bytes, including the opcode.
    #[must_use]
    pub const fn length(&self) -> u8 {
        1 + self.operand_bytes
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("opcode", &format_args!("{:#04X}", self.opcode))
            .field("mnemonic", &self.mnemonic)
            .field("operand_bytes", &self.operand_bytes)
            .finish_non_exhaustive()
    }
}

/// The dispatch table, indexed by opcode byte.
pub static OPCODES: [Option<Instruction>; 256] = build_table();

/// Look up the instruction for an opcode byte.
#[must_use]
pub fn decode(opcode: u8) -> Option<&'static Instruction> {
    OPCODES[opcode as usize].as_ref()
}

const fn build_table() -> [Option<Instruction>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < 256 {
        #[allow(clippy::cast_possible_truncation)]
        let op = i as u8;
        table[i] = entry(op);
        i += 1;
    }
    table
}

const fn with(exec: Handler, operand_bytes: u8) -> (Handler, u8) {
    (exec, operand_bytes)
}

const fn entry(op: u8) -> Option<Instruction> {
    let (exec, operand_bytes) = match op {
        0x00 => with(Sm83::nop, 0),
        0x10 => with(Sm83::stop, 1),
        0x76 => with(Sm83::halt, 0),
        0xF3 => with(Sm83::di, 0),
        0xFB => with(Sm83::ei, 0),

        // 8-bit loads
        0x40..=0x7F => with(Sm83::ld_r_r, 0),
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => with(Sm83::ld_r_d8, 1),
        0x02 | 0x12 => with(Sm83::ld_rr_ind_a, 0),
        0x0A | 0x1A => with(Sm83::ld_a_rr_ind, 0),
        0x22 => with(Sm83::ld_hli_a, 0),
        0x32 => with(Sm83::ld_hld_a, 0),
        0x2A => with(Sm83::ld_a_hli, 0),
        0x3A => with(Sm83::ld_a_hld, 0),
        0xEA => with(Sm83::ld_a16_a, 2),
        0xFA => with(Sm83::ld_a_a16, 2),
        0xE0 => with(Sm83::ldh_a8_a, 1),
        0xF0 => with(Sm83::ldh_a_a8, 1),
        0xE2 => with(Sm83::ld_c_ind_a, 0),
        0xF2 => with(Sm83::ld_a_c_ind, 0),

        // 16-bit loads
        0x01 | 0x11 | 0x21 | 0x31 => with(Sm83::ld_rr_d16, 2),
        0x08 => with(Sm83::ld_a16_sp, 2),
        0xF9 => with(Sm83::ld_sp_hl, 0),
        0xF8 => with(Sm83::ld_hl_sp_r8, 1),
        0xC5 | 0xD5 | 0xE5 | 0xF5 => with(Sm83::push_rr, 0),
        0xC1 | 0xD1 | 0xE1 | 0xF1 => with(Sm83::pop_rr, 0),

        // 8-bit ALU
        0x80..=0xBF => with(Sm83::alu_r, 0),
        0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE => with(Sm83::alu_d8, 1),
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => with(Sm83::inc_r, 0),
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => with(Sm83::dec_r, 0),
        0x27 => with(Sm83::daa, 0),
        0x2F => with(Sm83::cpl, 0),
        0x37 => with(Sm83::scf, 0),
        0x3F => with(Sm83::ccf, 0),
        0x07 => with(Sm83::rlca, 0),
        0x0F => with(Sm83::rrca, 0),
        0x17 => with(Sm83::rla, 0),
        0x1F => with(Sm83::rra, 0),

        // 16-bit ALU
        0x03 | 0x13 | 0x23 | 0x33 => with(Sm83::inc_rr, 0),
        0x0B | 0x1B | 0x2B | 0x3B => with(Sm83::dec_rr, 0),
        0x09 | 0x19 | 0x29 | 0x39 => with(Sm83::add_hl_rr, 0),
        0xE8 => with(Sm83::add_sp_r8, 1),

        // Jumps, calls and returns
        0x18 => with(Sm83::jr, 1),
        0x20 | 0x28 | 0x30 | 0x38 => with(Sm83::jr_cc, 1),
        0xC3 => with(Sm83::jp, 2),
        0xC2 | 0xCA | 0xD2 | 0xDA => with(Sm83::jp_cc, 2),
        0xE9 => with(Sm83::jp_hl, 0),
        0xCD => with(Sm83::call, 2),
        0xC4 | 0xCC | 0xD4 | 0xDC => with(Sm83::call_cc, 2),
        0xC9 => with(Sm83::ret, 0),
        0xC0 | 0xC8 | 0xD0 | 0xD8 => with(Sm83::ret_cc, 0),
        0xD9 => with(Sm83::reti, 0),
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => with(Sm83::rst, 0),

        // 0xCB prefix, D3 DB DD E3 E4 EB EC ED F4 FC FD
        _ => return None,
    };

    Some(Instruction {
        opcode: op,
        mnemonic: MNEMONICS[op as usize],
        operand_bytes,
        exec,
    })
}

/// Mnemonic templates, indexed by opcode. Empty for unassigned slots.
#[rustfmt::skip]
const MNEMONICS: [&str; 256] = [
    // 0x00
    "NOP", "LD BC,d16", "LD (BC),A", "INC BC", "INC B", "DEC B", "LD B,d8", "RLCA",
    "LD (a16),SP", "ADD HL,BC", "LD A,(BC)", "DEC BC", "INC C", "DEC C", "LD C,d8", "RRCA",
    // 0x10
    "STOP", "LD DE,d16", "LD (DE),A", "INC DE", "INC D", "DEC D", "LD D,d8", "RLA",
    "JR r8", "ADD HL,DE", "LD A,(DE)", "DEC DE", "INC E", "DEC E", "LD E,d8", "RRA",
    // 0x20
    "JR NZ,r8", "LD HL,d16", "LD (HL+),A", "INC HL", "INC H", "DEC H", "LD H,d8", "DAA",
    "JR Z,r8", "ADD HL,HL", "LD A,(HL+)", "DEC HL", "INC L", "DEC L", "LD L,d8", "CPL",
    // 0x30
    "JR NC,r8", "LD SP,d16", "LD (HL-),A", "INC SP", "INC (HL)", "DEC (HL)", "LD (HL),d8", "SCF",
    "JR C,r8", "ADD HL,SP", "LD A,(HL-)", "DEC SP", "INC A", "DEC A", "LD A,d8", "CCF",
    // 0x40
    "LD B,B", "LD B,C", "LD B,D", "LD B,E", "LD B,H", "LD B,L", "LD B,(HL)", "LD B,A",
    "LD C,B", "LD C,C", "LD C,D", "LD C,E", "LD C,H", "LD C,L", "LD C,(HL)", "LD C,A",
    // 0x50
    "LD D,B", "LD D,C", "LD D,D", "LD D,E", "LD D,H", "LD D,L", "LD D,(HL)", "LD D,A",
    "LD E,B", "LD E,C", "LD E,D", "LD E,E", "LD E,H", "LD E,L", "LD E,(HL)", "LD E,A",
    // 0x60
    "LD H,B", "LD H,C", "LD H,D", "LD H,E", "LD H,H", "LD H,L", "LD H,(HL)", "LD H,A",
    "LD L,B", "LD L,C", "LD L,D", "LD L,E", "LD L,H", "LD L,L", "LD L,(HL)", "LD L,A",
    // 0x70
    "LD (HL),B", "LD (HL),C", "LD (HL),D", "LD (HL),E", "LD (HL),H", "LD (HL),L", "HALT", "LD (HL),A",
    "LD A,B", "LD A,C", "LD A,D", "LD A,E", "LD A,H", "LD A,L", "LD A,(HL)", "LD A,A",
    // 0x80
    "ADD A,B", "ADD A,C", "ADD A,D", "ADD A,E", "ADD A,H", "ADD A,L", "ADD A,(HL)", "ADD A,A",
    "ADC A,B", "ADC A,C", "ADC A,D", "ADC A,E", "ADC A,H", "ADC A,L", "ADC A,(HL)", "ADC A,A",
    // 0x90
    "SUB B", "SUB C", "SUB D", "SUB E", "SUB H", "SUB L", "SUB (HL)", "SUB A",
    "SBC A,B", "SBC A,C", "SBC A,D", "SBC A,E", "SBC A,H", "SBC A,L", "SBC A,(HL)", "SBC A,A",
    // 0xA0
    "AND B", "AND C", "AND D", "AND E", "AND H", "AND L", "AND (HL)", "AND A",
    "XOR B", "XOR C", "XOR D", "XOR E", "XOR H", "XOR L", "XOR (HL)", "XOR A",
    // 0xB0
    "OR B", "OR C", "OR D", "OR E", "OR H", "OR L", "OR (HL)", "OR A",
    "CP B", "CP C", "CP D", "CP E", "CP H", "CP L", "CP (HL)", "CP A",
    // 0xC0
    "RET NZ", "POP BC", "JP NZ,a16", "JP a16", "CALL NZ,a16", "PUSH BC", "ADD A,d8", "RST 00H",
    "RET Z", "RET", "JP Z,a16", "", "CALL Z,a16", "CALL a16", "ADC A,d8", "RST 08H",
    // 0xD0
    "RET NC", "POP DE", "JP NC,a16", "", "CALL NC,a16", "PUSH DE", "SUB d8", "RST 10H",
    "RET C", "RETI", "JP C,a16", "", "CALL C,a16", "", "SBC A,d8", "RST 18H",
    // 0xE0
    "LDH (a8),A", "POP HL", "LD (C),A", "", "", "PUSH HL", "AND d8", "RST 20H",
    "ADD SP,r8", "JP HL", "LD (a16),A", "", "", "", "XOR d8", "RST 28H",
    // 0xF0
    "LDH A,(a8)", "POP AF", "LD A,(C)", "DI", "", "PUSH AF", "OR d8", "RST 30H",
    "LD HL,SP+r8", "LD SP,HL", "LD A,(a16)", "EI", "", "", "CP d8", "RST 38H",
];
