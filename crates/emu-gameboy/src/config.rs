//! Machine configuration.

/// Program installed at the cartridge entry point when no ROM is given:
/// `LD A,0x42; LD B,0x99; NOP`.
pub const TEST_PROGRAM: [u8; 5] = [0x3E, 0x42, 0x06, 0x99, 0x00];

/// Instructions in [`TEST_PROGRAM`]. The program has no HALT, so running
/// past it walks through zeroed memory into the I/O page.
pub const TEST_PROGRAM_STEPS: u64 = 3;

/// Step limit for ROM images when the caller gives none.
pub const ROM_STEP_LIMIT: u64 = 1_000_000;

/// Configuration for creating a `GameBoy` instance.
#[derive(Debug, Clone, Default)]
pub struct GameBoyConfig {
    /// ROM image mapped at $0000. Only the first 32K is used. `None` installs
    /// [`TEST_PROGRAM`] at $0100 instead.
    pub rom: Option<Vec<u8>>,
}

impl GameBoyConfig {
    /// Configuration that boots the given ROM image.
    #[must_use]
    pub fn with_rom(rom: Vec<u8>) -> Self {
        Self { rom: Some(rom) }
    }

    /// Step limit to use when the caller gives none: exactly the built-in
    /// program's instructions, or [`ROM_STEP_LIMIT`] for a ROM.
    #[must_use]
    pub fn default_max_steps(&self) -> u64 {
        if self.rom.is_some() {
            ROM_STEP_LIMIT
        } else {
            TEST_PROGRAM_STEPS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_step_limit_depends_on_program() {
        assert_eq!(GameBoyConfig::default().default_max_steps(), 3);
        assert_eq!(
            GameBoyConfig::with_rom(vec![0; 0x150]).default_max_steps(),
            1_000_000
        );
    }
}
