use strum_macros::{Display, EnumIter};

/// Bits of the flag register (F). The low nibble is unused.
#[derive(Copy, Clone, Debug, Display, EnumIter, Eq, PartialEq)]
pub enum Flag {
    Zero,
    Subtract,
    HalfCarry,
    Carry,
}

impl Flag {
    /// Bit position of the flag inside F.
    pub fn bit(self) -> u8 {
        match self {
            Flag::Zero => 7,
            Flag::Subtract => 6,
            Flag::HalfCarry => 5,
            Flag::Carry => 4,
        }
    }

    /// Single-bit mask of the flag inside F.
    pub fn mask(self) -> u8 {
        1 << self.bit()
    }
}

/// 8-bit registers.
#[derive(Copy, Clone, Debug, Display, EnumIter, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    F,
    H,
    L,
}

/// 16-bit register pairs, high register first.
#[derive(Copy, Clone, Debug, Display, EnumIter, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Pair {
    AF,
    BC,
    DE,
    HL,
}

impl Pair {
    /// The (high, low) registers forming the pair.
    pub fn registers(self) -> (Register, Register) {
        match self {
            Pair::AF => (Register::A, Register::F),
            Pair::BC => (Register::B, Register::C),
            Pair::DE => (Register::D, Register::E),
            Pair::HL => (Register::H, Register::L),
        }
    }
}

/// SM83 register file.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
    pub h: u8,
    pub l: u8,
    pub pc: u16,
    pub sp: u16,
}

impl Registers {
    /// Instantiate a zeroed register file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate a zeroed register file starting execution at `pc`.
    pub fn with_pc(pc: u16) -> Self {
        Self {
            pc,
            ..Self::default()
        }
    }

    /// Return the value of an 8-bit register.
    pub fn get(&self, register: Register) -> u8 {
        match register {
            Register::A => self.a,
            Register::B => self.b,
            Register::C => self.c,
            Register::D => self.d,
            Register::E => self.e,
            Register::F => self.f,
            Register::H => self.h,
            Register::L => self.l,
        }
    }

    /// Set the value of an 8-bit register.
    pub fn set(&mut self, register: Register, value: u8) {
        let r = match register {
            Register::A => &mut self.a,
            Register::B => &mut self.b,
            Register::C => &mut self.c,
            Register::D => &mut self.d,
            Register::E => &mut self.e,
            Register::F => &mut self.f,
            Register::H => &mut self.h,
            Register::L => &mut self.l,
        };
        *r = value;
    }

    /// Return the value of a flag.
    pub fn flag(&self, flag: Flag) -> bool {
        (self.f >> flag.bit()) & 1 != 0
    }

    /// Set or reset a single flag, leaving the other bits of F untouched.
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.f = (self.f & !flag.mask()) | ((value as u8) << flag.bit());
    }

    /// Read two 8-bit registers as a big-endian 16-bit value.
    pub fn pair(&self, high: Register, low: Register) -> u16 {
        ((self.get(high) as u16) << 8) | self.get(low) as u16
    }

    /// Write a 16-bit value through two 8-bit registers.
    pub fn set_pair(&mut self, high: Register, low: Register, value: u16) {
        self.set(high, (value >> 8) as u8);
        self.set(low, (value & 0xFF) as u8);
    }

    /// Return the value of a named register pair.
    pub fn get_wide(&self, pair: Pair) -> u16 {
        let (high, low) = pair.registers();
        self.pair(high, low)
    }

    /// Set the value of a named register pair.
    pub fn set_wide(&mut self, pair: Pair, value: u16) {
        let (high, low) = pair.registers();
        self.set_pair(high, low, value);
    }

    pub fn bc(&self) -> u16 {
        self.get_wide(Pair::BC)
    }

    pub fn de(&self) -> u16 {
        self.get_wide(Pair::DE)
    }

    pub fn hl(&self) -> u16 {
        self.get_wide(Pair::HL)
    }

    pub fn set_hl(&mut self, value: u16) {
        self.set_wide(Pair::HL, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_flag_bits() {
        assert_eq!(Flag::Zero.mask(), 0b1000_0000);
        assert_eq!(Flag::Subtract.mask(), 0b0100_0000);
        assert_eq!(Flag::HalfCarry.mask(), 0b0010_0000);
        assert_eq!(Flag::Carry.mask(), 0b0001_0000);
    }

    #[test]
    fn test_flags() {
        let mut regs = Registers {
            f: 0b1111_0000,
            ..Registers::default()
        };
        assert!(regs.flag(Flag::Zero));

        regs.set_flag(Flag::Zero, false);
        assert!(!regs.flag(Flag::Zero));
        assert_eq!(regs.f, 0b0111_0000);

        regs.set_flag(Flag::Subtract, false);
        assert!(!regs.flag(Flag::Subtract));

        regs.set_flag(Flag::Subtract, false);
        assert!(!regs.flag(Flag::Subtract));

        assert_eq!(regs.f, 0b0011_0000);
    }

    #[test]
    fn test_set_flag_round_trip() {
        for f in 0..=0xFFu8 {
            for flag in Flag::iter() {
                for &value in &[false, true] {
                    let mut regs = Registers {
                        f,
                        ..Registers::default()
                    };
                    regs.set_flag(flag, value);
                    assert_eq!(regs.flag(flag), value);
                    assert_eq!(regs.f & !flag.mask(), f & !flag.mask());
                }
            }
        }
    }

    #[test]
    fn test_pair_round_trip() {
        let mut regs = Registers::new();
        for value in 0..=0xFFFFu16 {
            regs.set_pair(Register::H, Register::L, value);
            assert_eq!(regs.pair(Register::H, Register::L), value);
        }
    }

    #[test]
    fn test_pair_is_a_view() {
        let mut regs = Registers::new();
        regs.set_wide(Pair::BC, 0x1234);
        assert_eq!(regs.b, 0x12);
        assert_eq!(regs.c, 0x34);

        regs.d = 0xBE;
        regs.e = 0xEF;
        assert_eq!(regs.de(), 0xBEEF);
    }

    #[test]
    fn test_get_set() {
        let mut regs = Registers::new();
        for (i, register) in Register::iter().enumerate() {
            regs.set(register, i as u8 + 1);
        }
        for (i, register) in Register::iter().enumerate() {
            assert_eq!(regs.get(register), i as u8 + 1);
        }
    }

    #[test]
    fn test_with_pc() {
        let regs = Registers::with_pc(0x0100);
        assert_eq!(regs.pc, 0x0100);
        assert_eq!(regs.sp, 0x0000);
        assert_eq!(regs.f, 0x00);
    }
}
