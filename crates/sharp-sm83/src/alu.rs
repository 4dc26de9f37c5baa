//! ALU operations for the SM83.
//!
//! Each binary operation recomputes all four flags from its operands. The
//! exceptions are `inc8`/`dec8`, whose flags exclude C (the caller merges in
//! the existing carry), and `add16`, whose flags exclude Z.

#![allow(clippy::cast_possible_truncation)] // Intentional truncation for low byte extraction.
#![allow(clippy::verbose_bit_mask)] // Clearer to read mask comparisons.

use crate::flags::{CF, HF, NF, ZF};

/// Result of an ALU operation with flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    pub value: u8,
    pub flags: u8,
}

const fn zero(value: u8) -> u8 {
    if value == 0 { ZF } else { 0 }
}

/// Add two bytes.
#[must_use]
pub fn add8(a: u8, b: u8) -> AluResult {
    adc8(a, b, false)
}

/// Add two bytes plus the incoming carry.
#[must_use]
pub fn adc8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let result16 = u16::from(a) + u16::from(b) + u16::from(c);
    let result = result16 as u8;

    let mut flags = zero(result);
    if (a & 0x0F) + (b & 0x0F) + c > 0x0F {
        flags |= HF;
    }
    if result16 > 0xFF {
        flags |= CF;
    }

    AluResult { value: result, flags }
}

/// Subtract two bytes.
#[must_use]
pub fn sub8(a: u8, b: u8) -> AluResult {
    sbc8(a, b, false)
}

/// Subtract two bytes and the incoming borrow.
#[must_use]
pub fn sbc8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = u8::from(carry);
    let result = a.wrapping_sub(b).wrapping_sub(c);

    let mut flags = NF | zero(result);
    // Borrow from bit 4
    if (a & 0x0F) < (b & 0x0F) + c {
        flags |= HF;
    }
    if u16::from(a) < u16::from(b) + u16::from(c) {
        flags |= CF;
    }

    AluResult { value: result, flags }
}

/// AND operation. H is always set.
#[must_use]
pub fn and8(a: u8, b: u8) -> AluResult {
    let result = a & b;
    AluResult {
        value: result,
        flags: zero(result) | HF,
    }
}

/// OR operation.
#[must_use]
pub fn or8(a: u8, b: u8) -> AluResult {
    let result = a | b;
    AluResult {
        value: result,
        flags: zero(result),
    }
}

/// XOR operation.
#[must_use]
pub fn xor8(a: u8, b: u8) -> AluResult {
    let result = a ^ b;
    AluResult {
        value: result,
        flags: zero(result),
    }
}

/// Compare. Flags as for `sub8`; the caller discards `value`.
#[must_use]
pub fn cp8(a: u8, b: u8) -> AluResult {
    sub8(a, b)
}

/// Increment byte. C is not part of the returned flags.
#[must_use]
pub fn inc8(a: u8) -> AluResult {
    let result = a.wrapping_add(1);

    let mut flags = zero(result);
    if a & 0x0F == 0x0F {
        flags |= HF;
    }

    AluResult { value: result, flags }
}

/// Decrement byte. C is not part of the returned flags.
#[must_use]
pub fn dec8(a: u8) -> AluResult {
    let result = a.wrapping_sub(1);

    let mut flags = NF | zero(result);
    if a & 0x0F == 0 {
        flags |= HF;
    }

    AluResult { value: result, flags }
}

/// 16-bit add for `ADD HL,rr`. Returns H (carry from bit 11) and C (carry
/// from bit 15); N is clear and Z is left to the caller.
#[must_use]
pub fn add16(a: u16, b: u16) -> (u16, u8) {
    let result32 = u32::from(a) + u32::from(b);

    let mut flags = 0;
    if (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF {
        flags |= HF;
    }
    if result32 > 0xFFFF {
        flags |= CF;
    }

    (result32 as u16, flags)
}

/// Signed 8-bit offset added to SP, for `ADD SP,r8` and `LD HL,SP+r8`.
///
/// Z and N are clear. H and C come from the unsigned add of the offset byte
/// to the low byte of SP.
#[must_use]
pub fn add_sp_offset(sp: u16, offset: u8) -> (u16, u8) {
    #[allow(clippy::cast_possible_wrap)]
    let result = sp.wrapping_add_signed(i16::from(offset as i8));

    let mut flags = 0;
    if (sp & 0x0F) + u16::from(offset & 0x0F) > 0x0F {
        flags |= HF;
    }
    if (sp & 0xFF) + u16::from(offset) > 0xFF {
        flags |= CF;
    }

    (result, flags)
}

/// Decimal adjust A after a BCD add or subtract.
///
/// Takes the current F. N is preserved, H is cleared, C is set when the
/// adjustment carries out of the high digit.
#[must_use]
pub fn daa(a: u8, f: u8) -> AluResult {
    let mut value = a;
    let mut carry = f & CF != 0;

    if f & NF == 0 {
        if carry || a > 0x99 {
            value = value.wrapping_add(0x60);
            carry = true;
        }
        if f & HF != 0 || a & 0x0F > 0x09 {
            value = value.wrapping_add(0x06);
        }
    } else {
        if carry {
            value = value.wrapping_sub(0x60);
        }
        if f & HF != 0 {
            value = value.wrapping_sub(0x06);
        }
    }

    let mut flags = zero(value) | (f & NF);
    if carry {
        flags |= CF;
    }

    AluResult { value, flags }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_half_carry() {
        let r = add8(0x0F, 0x01);
        assert_eq!(r.value, 0x10);
        assert_eq!(r.flags, HF);
    }

    #[test]
    fn add_wraps_to_zero() {
        let r = add8(0xFF, 0x01);
        assert_eq!(r.value, 0x00);
        assert_eq!(r.flags, ZF | HF | CF);
    }

    #[test]
    fn adc_uses_incoming_carry() {
        let r = adc8(0x0E, 0x01, true);
        assert_eq!(r.value, 0x10);
        assert_eq!(r.flags, HF);

        let r = adc8(0xFE, 0x01, true);
        assert_eq!(r.value, 0x00);
        assert_eq!(r.flags, ZF | HF | CF);
    }

    #[test]
    fn sub_borrows() {
        let r = sub8(0x00, 0x01);
        assert_eq!(r.value, 0xFF);
        assert_eq!(r.flags, NF | HF | CF);
    }

    #[test]
    fn sub_equal_is_zero() {
        let r = sub8(0x42, 0x42);
        assert_eq!(r.value, 0x00);
        assert_eq!(r.flags, ZF | NF);
    }

    #[test]
    fn sbc_uses_incoming_carry() {
        let r = sbc8(0x10, 0x0F, true);
        assert_eq!(r.value, 0x00);
        assert_eq!(r.flags, ZF | NF | HF);

        let r = sbc8(0x00, 0x00, true);
        assert_eq!(r.value, 0xFF);
        assert_eq!(r.flags, NF | HF | CF);
    }

    #[test]
    fn logic_ops_fix_h_and_c() {
        assert_eq!(and8(0xF0, 0x0F), AluResult { value: 0, flags: ZF | HF });
        assert_eq!(and8(0xFF, 0x81), AluResult { value: 0x81, flags: HF });
        assert_eq!(or8(0x00, 0x00), AluResult { value: 0, flags: ZF });
        assert_eq!(or8(0xF0, 0x0F), AluResult { value: 0xFF, flags: 0 });
        assert_eq!(xor8(0x5A, 0x5A), AluResult { value: 0, flags: ZF });
        assert_eq!(xor8(0x5A, 0xFF), AluResult { value: 0xA5, flags: 0 });
    }

    #[test]
    fn cp_sets_zero_on_equal() {
        assert_eq!(cp8(0x3C, 0x3C).flags, ZF | NF);
        assert_eq!(cp8(0x3C, 0x40).flags, NF | CF);
        assert_eq!(cp8(0x3C, 0x2F).flags, NF | HF);
    }

    #[test]
    fn inc_dec_nibble_boundaries() {
        assert_eq!(inc8(0x0F), AluResult { value: 0x10, flags: HF });
        assert_eq!(inc8(0xFF), AluResult { value: 0x00, flags: ZF | HF });
        assert_eq!(dec8(0x10), AluResult { value: 0x0F, flags: NF | HF });
        assert_eq!(dec8(0x01), AluResult { value: 0x00, flags: ZF | NF });
        assert_eq!(dec8(0x00), AluResult { value: 0xFF, flags: NF | HF });
    }

    #[test]
    fn add16_carries_from_bits_11_and_15() {
        assert_eq!(add16(0x0FFF, 0x0001), (0x1000, HF));
        assert_eq!(add16(0xFFFF, 0x0001), (0x0000, HF | CF));
        assert_eq!(add16(0x8000, 0x8000), (0x0000, CF));
        assert_eq!(add16(0x1000, 0x1234), (0x2234, 0));
    }

    #[test]
    fn sp_offset_flags_come_from_low_byte() {
        assert_eq!(add_sp_offset(0xFFF8, 0x02), (0xFFFA, 0));
        assert_eq!(add_sp_offset(0x000F, 0x01), (0x0010, HF));
        assert_eq!(add_sp_offset(0x00FF, 0x01), (0x0100, HF | CF));
        // -1: 0x0001 + 0xFF in the low byte carries out of both nibbles
        assert_eq!(add_sp_offset(0x0001, 0xFF), (0x0000, HF | CF));
        assert_eq!(add_sp_offset(0x0000, 0xFF), (0xFFFF, 0));
    }

    #[test]
    fn daa_after_add() {
        // 0x15 + 0x27 = 0x3C, adjusts to BCD 42
        let sum = add8(0x15, 0x27);
        let r = daa(sum.value, sum.flags);
        assert_eq!(r, AluResult { value: 0x42, flags: 0 });

        // 0x99 + 0x01 = 0x9A, adjusts to 00 with carry
        let sum = add8(0x99, 0x01);
        let r = daa(sum.value, sum.flags);
        assert_eq!(r, AluResult { value: 0x00, flags: ZF | CF });
    }

    #[test]
    fn daa_after_sub() {
        // 0x42 - 0x15 = 0x2D with half borrow, adjusts to BCD 27
        let diff = sub8(0x42, 0x15);
        let r = daa(diff.value, diff.flags);
        assert_eq!(r, AluResult { value: 0x27, flags: NF });
    }
}
