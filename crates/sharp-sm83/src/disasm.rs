//! Disassembler for trace output and debugging tools.

use emu_core::Bus;

use crate::opcodes::decode;

/// Disassemble the instruction at `address`.
///
/// Returns the rendered text and the instruction length in bytes. Operand
/// placeholders in the mnemonic are replaced with the bytes that follow the
/// opcode: immediates and absolute addresses in hex, high-page operands as
/// their full address, relative jumps as their target, and SP offsets as a
/// signed decimal. An unassigned opcode renders as a data byte of length 1.
pub fn disassemble<B: Bus + ?Sized>(bus: &mut B, address: u16) -> (String, u8) {
    let opcode = bus.read(address);
    let Some(instruction) = decode(opcode) else {
        return (format!("DB ${opcode:02X}"), 1);
    };

    // Only operand bytes are read; bus reads may have side effects.
    let mut operands = [0u8; 2];
    for (i, byte) in operands
        .iter_mut()
        .take(usize::from(instruction.operand_bytes))
        .enumerate()
    {
        *byte = bus.read(address.wrapping_add(1 + i as u16));
    }
    let [b1, b2] = operands;

    let mnemonic = instruction.mnemonic;
    let word = u16::from(b2) << 8 | u16::from(b1);
    #[allow(clippy::cast_possible_wrap)]
    let signed = b1 as i8;

    let text = if mnemonic.contains("d16") {
        mnemonic.replace("d16", &format!("${word:04X}"))
    } else if mnemonic.contains("a16") {
        mnemonic.replace("a16", &format!("${word:04X}"))
    } else if mnemonic.contains("d8") {
        mnemonic.replace("d8", &format!("${b1:02X}"))
    } else if mnemonic.contains("a8") {
        mnemonic.replace("a8", &format!("${:04X}", 0xFF00 | u16::from(b1)))
    } else if mnemonic.starts_with("JR") {
        let target = address
            .wrapping_add(2)
            .wrapping_add_signed(i16::from(signed));
        mnemonic.replace("r8", &format!("${target:04X}"))
    } else if mnemonic.contains("+r8") {
        mnemonic.replace("+r8", &format!("{signed:+}"))
    } else if mnemonic.contains("r8") {
        mnemonic.replace("r8", &format!("{signed:+}"))
    } else {
        mnemonic.to_string()
    };

    (text, instruction.length())
}
