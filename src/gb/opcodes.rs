use derive_new::new;
use enum_map::{enum_map, Enum, EnumMap};
use getset::CopyGetters;
use lazy_static::lazy_static;
use strum_macros::{AsRefStr, Display};

use crate::gb::registers::{Pair, Register};

/// Operations.
#[derive(AsRefStr, Copy, Clone, Debug, Eq, PartialEq)]
pub enum Op {
    ADC,
    ADD,
    AND,
    CCF,
    CP,
    CPL,
    DEC,
    INC,
    JP,
    JR,
    LD,
    NOP,
    OR,
    SBC,
    SCF,
    SUB,
    XOR,
}

/// Addressing modes, i.e. what follows the opcode byte.
#[derive(Copy, Clone, Debug, Enum, Eq, PartialEq)]
pub enum AddressMode {
    Implied,
    Immediate8,
    Immediate16,
    Absolute,
    Relative,
}

/// Branch conditions.
#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum Condition {
    NZ,
    Z,
    NC,
    C,
}

/// Instruction operands.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operand {
    None,
    Reg(Register),
    Wide(Pair),
    SP,
    /// (hl)
    Indirect,
    /// (hl+)
    Increment,
    /// (hl-)
    Decrement,
    Cond(Condition),
    /// The instruction's argument (d8, d16, a16 or r8).
    Immediate,
}

/// Opcode descriptor.
#[derive(new, Copy, Clone, CopyGetters, Debug, Eq, PartialEq)]
#[getset(get_copy = "pub")]
pub struct Opcode {
    op: Op,
    mode: AddressMode,
    dst: Operand,
    src: Operand,
}

/// 8-bit operands in encoding order (bits 0-2 and 3-5 of the opcode).
const R8: [Operand; 8] = [
    Operand::Reg(Register::B),
    Operand::Reg(Register::C),
    Operand::Reg(Register::D),
    Operand::Reg(Register::E),
    Operand::Reg(Register::H),
    Operand::Reg(Register::L),
    Operand::Indirect,
    Operand::Reg(Register::A),
];

/// 16-bit operands in encoding order (bits 4-5 of the opcode).
const R16: [Operand; 4] = [
    Operand::Wide(Pair::BC),
    Operand::Wide(Pair::DE),
    Operand::Wide(Pair::HL),
    Operand::SP,
];

/// Conditions in encoding order (bits 3-4 of the opcode).
const CONDITIONS: [Condition; 4] = [Condition::NZ, Condition::Z, Condition::NC, Condition::C];

/// ALU operations in encoding order ($80-$BF and $C6-$FE).
const ALU: [Op; 8] = [
    Op::ADD,
    Op::ADC,
    Op::SUB,
    Op::SBC,
    Op::AND,
    Op::XOR,
    Op::OR,
    Op::CP,
];

/// Encoding of LD (hl),(hl), which is HALT.
const HALT: usize = 0x76;

lazy_static! {
    /// Size of the argument for each address mode.
    pub static ref ARGUMENT_SIZES: EnumMap<AddressMode, u16> = enum_map! {
        AddressMode::Implied => 0,
        AddressMode::Immediate8 => 1,
        AddressMode::Immediate16 => 2,
        AddressMode::Absolute => 2,
        AddressMode::Relative => 1,
    };

    /// Opcode table. Missing entries are not implemented.
    pub static ref OPCODES: [Option<Opcode>; 256] = build_table();
}

/// Look up the descriptor of an opcode.
pub fn decode(opcode: u8) -> Option<Opcode> {
    OPCODES[opcode as usize]
}

fn build_table() -> [Option<Opcode>; 256] {
    use AddressMode::*;
    use Operand::{Cond, Decrement, Increment, Reg};

    let def = |op, mode, dst, src| Some(Opcode::new(op, mode, dst, src));
    let mut table = [None; 256];

    table[0x00] = def(Op::NOP, Implied, Operand::None, Operand::None);

    for (i, &rr) in R16.iter().enumerate() {
        table[0x01 + i * 0x10] = def(Op::LD, Immediate16, rr, Operand::Immediate);
        table[0x03 + i * 0x10] = def(Op::INC, Implied, rr, Operand::None);
        table[0x0B + i * 0x10] = def(Op::DEC, Implied, rr, Operand::None);
    }

    for (i, &r) in R8.iter().enumerate() {
        table[0x04 + i * 8] = def(Op::INC, Implied, r, Operand::None);
        table[0x05 + i * 8] = def(Op::DEC, Implied, r, Operand::None);
        table[0x06 + i * 8] = def(Op::LD, Immediate8, r, Operand::Immediate);
    }

    // Rows that deliberately differ from the regular encoding pattern.
    table[0x21] = def(Op::LD, Immediate16, Operand::Wide(Pair::BC), Operand::Immediate);
    table[0x0D] = def(Op::DEC, Implied, Reg(Register::D), Operand::None);

    let a = Reg(Register::A);
    table[0x22] = def(Op::LD, Implied, Increment, a);
    table[0x2A] = def(Op::LD, Implied, a, Increment);
    table[0x32] = def(Op::LD, Implied, Decrement, a);
    table[0x3A] = def(Op::LD, Implied, a, Decrement);

    table[0x2F] = def(Op::CPL, Implied, Operand::None, Operand::None);
    table[0x37] = def(Op::SCF, Implied, Operand::None, Operand::None);
    table[0x3F] = def(Op::CCF, Implied, Operand::None, Operand::None);

    table[0x18] = def(Op::JR, Relative, Operand::None, Operand::Immediate);
    table[0xC3] = def(Op::JP, Absolute, Operand::None, Operand::Immediate);
    for (i, &cc) in CONDITIONS.iter().enumerate() {
        table[0x20 + i * 8] = def(Op::JR, Relative, Cond(cc), Operand::Immediate);
        table[0xC2 + i * 8] = def(Op::JP, Absolute, Cond(cc), Operand::Immediate);
    }

    for (i, &dst) in R8.iter().enumerate() {
        for (j, &src) in R8.iter().enumerate() {
            let opcode = 0x40 + i * 8 + j;
            if opcode != HALT {
                table[opcode] = def(Op::LD, Implied, dst, src);
            }
        }
    }

    for (i, &op) in ALU.iter().enumerate() {
        for (j, &src) in R8.iter().enumerate() {
            table[0x80 + i * 8 + j] = def(op, Implied, a, src);
        }
        table[0xC6 + i * 8] = def(op, Immediate8, a, Operand::Immediate);
    }

    table
}
