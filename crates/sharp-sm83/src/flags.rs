//! SM83 flag register bits.
//!
//! Only the upper nibble of F exists in hardware; bits 0-3 always read as
//! zero.

/// Zero flag (bit 7) - set if result is zero.
pub const ZF: u8 = 0b1000_0000;

/// Subtract flag (bit 6) - set if last operation was a subtraction.
pub const NF: u8 = 0b0100_0000;

/// Half-carry flag (bit 5) - carry from bit 3 to bit 4.
pub const HF: u8 = 0b0010_0000;

/// Carry flag (bit 4) - carry out of bit 7.
pub const CF: u8 = 0b0001_0000;

/// Mask of the bits of F that exist in hardware.
pub(crate) const FLAG_MASK: u8 = 0xF0;

/// A named flag in the F register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Z,
    N,
    H,
    C,
}

impl Flag {
    /// The bit of F this flag occupies.
    #[must_use]
    pub const fn mask(self) -> u8 {
        match self {
            Flag::Z => ZF,
            Flag::N => NF,
            Flag::H => HF,
            Flag::C => CF,
        }
    }
}
