//! 8-bit arithmetic and logic for the SM83.

/// Result of an ALU operation with its flag outcome.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AluResult {
    pub value: u8,
    pub zero: bool,
    pub subtract: bool,
    pub half_carry: bool,
    /// `None` leaves the carry flag as it was.
    pub carry: Option<bool>,
}

/// Add two bytes with optional carry.
pub fn add8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = carry as u8;
    let sum = a as u16 + b as u16 + c as u16;
    let value = sum as u8;

    AluResult {
        value,
        zero: value == 0,
        subtract: false,
        half_carry: (a & 0x0F) + (b & 0x0F) + c > 0x0F,
        carry: Some(sum > 0xFF),
    }
}

/// Subtract two bytes with optional borrow. Also used by CP, which
/// discards the value.
pub fn sub8(a: u8, b: u8, carry: bool) -> AluResult {
    let c = carry as u8;
    let value = a.wrapping_sub(b).wrapping_sub(c);

    AluResult {
        value,
        zero: value == 0,
        subtract: true,
        // Borrow from bit 4.
        half_carry: (a & 0x0F) < (b & 0x0F) + c,
        carry: Some((a as u16) < b as u16 + c as u16),
    }
}

pub fn and8(a: u8, b: u8) -> AluResult {
    logic(a & b, true)
}

pub fn xor8(a: u8, b: u8) -> AluResult {
    logic(a ^ b, false)
}

pub fn or8(a: u8, b: u8) -> AluResult {
    logic(a | b, false)
}

fn logic(value: u8, half_carry: bool) -> AluResult {
    AluResult {
        value,
        zero: value == 0,
        subtract: false,
        half_carry,
        carry: Some(false),
    }
}

/// Increment a byte. Carry is not affected.
pub fn inc8(v: u8) -> AluResult {
    let value = v.wrapping_add(1);

    AluResult {
        value,
        zero: value == 0,
        subtract: false,
        half_carry: v & 0x0F == 0x0F,
        carry: None,
    }
}

/// Decrement a byte. Carry is not affected.
pub fn dec8(v: u8) -> AluResult {
    let value = v.wrapping_sub(1);

    AluResult {
        value,
        zero: value == 0,
        subtract: true,
        half_carry: v & 0x0F == 0x00,
        carry: None,
    }
}
