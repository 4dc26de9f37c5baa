//! I/O register values left behind by the boot firmware.
//!
//! Applied once after memory is cleared and the cartridge is mapped, before
//! the CPU executes anything at $0100.

use emu_core::Bus;

/// Address and value of each I/O register the boot firmware initialises.
pub const POST_BOOT_IO: [(u16, u8); 31] = [
    // Timer
    (0xFF05, 0x00), // TIMA
    (0xFF06, 0x00), // TMA
    (0xFF07, 0x00), // TAC
    // Sound
    (0xFF10, 0x80), // NR10
    (0xFF11, 0xBF), // NR11
    (0xFF12, 0xF3), // NR12
    (0xFF14, 0xBF), // NR14
    (0xFF16, 0x3F), // NR21
    (0xFF17, 0x00), // NR22
    (0xFF19, 0xBF), // NR24
    (0xFF1A, 0x7F), // NR30
    (0xFF1B, 0xFF), // NR31
    (0xFF1C, 0x9F), // NR32
    (0xFF1E, 0xBF), // NR34
    (0xFF20, 0xFF), // NR41
    (0xFF21, 0x00), // NR42
    (0xFF22, 0x00), // NR43
    (0xFF23, 0xBF), // NR44
    (0xFF24, 0x77), // NR50
    (0xFF25, 0xF3), // NR51
    (0xFF26, 0xF1), // NR52
    // Video
    (0xFF40, 0x91), // LCDC
    (0xFF42, 0x00), // SCY
    (0xFF43, 0x00), // SCX
    (0xFF45, 0x00), // LYC
    (0xFF47, 0xFC), // BGP
    (0xFF48, 0xFF), // OBP0
    (0xFF49, 0xFF), // OBP1
    (0xFF4A, 0x00), // WY
    (0xFF4B, 0x00), // WX
    // Interrupts
    (0xFFFF, 0x00), // IE
];

/// Write the post-boot register values to the bus.
pub fn apply_post_boot(bus: &mut impl Bus) {
    for &(address, value) in &POST_BOOT_IO {
        bus.write(address, value);
    }
}
