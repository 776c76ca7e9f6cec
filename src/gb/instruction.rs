use std::fmt;

use derive_new::new;
use getset::CopyGetters;

use crate::error::{Error, Result};
use crate::gb::opcodes::{self, AddressMode, Op, Opcode, Operand, ARGUMENT_SIZES};

/// Structure representing a decoded instruction.
#[derive(new, Copy, Clone, CopyGetters, Debug, Eq, PartialEq)]
pub struct Instruction {
    /// The address of the instruction.
    #[getset(get_copy = "pub")]
    pc: u16,

    /// The instruction's opcode byte.
    #[getset(get_copy = "pub")]
    opcode: u8,

    /// The opcode's descriptor.
    #[getset(get_copy = "pub")]
    definition: Opcode,

    /// The instruction argument (if any).
    argument: u16,
}

impl Instruction {
    /// Decode an instruction, failing if the opcode is not implemented.
    pub fn decode(pc: u16, opcode: u8, argument: u16) -> Result<Self> {
        match opcodes::decode(opcode) {
            Some(definition) => Ok(Self::new(pc, opcode, definition, argument)),
            None => Err(Error::UnimplementedOpcode { opcode, pc }),
        }
    }

    /// Return the name of the instruction's operation.
    pub fn name(&self) -> String {
        let op = self.operation();
        let name: &str = op.as_ref();
        name.to_lowercase()
    }

    /// Return the instruction's operation.
    pub fn operation(&self) -> Op {
        self.definition.op()
    }

    /// Return the instruction's address mode.
    pub fn address_mode(&self) -> AddressMode {
        self.definition.mode()
    }

    /// Return the instruction's size.
    pub fn size(&self) -> u16 {
        self.argument_size() + 1
    }

    /// Return the instruction's argument size.
    pub fn argument_size(&self) -> u16 {
        ARGUMENT_SIZES[self.address_mode()]
    }

    /// Return the instruction's argument, if any.
    pub fn argument(&self) -> Option<u16> {
        match self.argument_size() {
            0 => None,
            1 => Some(self.argument & 0xFF),
            _ => Some(self.argument),
        }
    }

    /// Return the instruction's argument as an absolute value, if possible.
    pub fn absolute_argument(&self) -> Option<u16> {
        let argument = self.argument()?;
        match self.address_mode() {
            AddressMode::Relative => {
                let offset = argument as u8 as i8;
                Some(
                    self.pc
                        .wrapping_add(self.size())
                        .wrapping_add(offset as i16 as u16),
                )
            }
            _ => Some(argument),
        }
    }

    /// Return whether this is a control instruction.
    pub fn is_control(&self) -> bool {
        matches!(self.operation(), Op::JP | Op::JR)
    }

    /// Return the raw bytes of the instruction.
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode];
        match self.argument_size() {
            0 => {}
            1 => bytes.push(self.argument as u8),
            _ => bytes.extend_from_slice(&self.argument.to_le_bytes()),
        }
        bytes
    }

    /// Return the instruction's operands as a string.
    pub fn argument_string(&self) -> String {
        let dst = match self.operation() {
            // The accumulator is implied for these.
            Op::SUB | Op::AND | Op::XOR | Op::OR | Op::CP => Operand::None,
            _ => self.definition.dst(),
        };

        [dst, self.definition.src()]
            .iter()
            .filter(|&&operand| operand != Operand::None)
            .map(|&operand| self.operand_string(operand))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn operand_string(&self, operand: Operand) -> String {
        match operand {
            Operand::None => String::new(),
            Operand::Reg(r) => r.to_string(),
            Operand::Wide(p) => p.to_string(),
            Operand::SP => String::from("sp"),
            Operand::Indirect => String::from("(hl)"),
            Operand::Increment => String::from("(hl+)"),
            Operand::Decrement => String::from("(hl-)"),
            Operand::Cond(cc) => cc.to_string(),
            Operand::Immediate => match self.address_mode() {
                AddressMode::Immediate8 => format!("${:02X}", self.argument & 0xFF),
                _ => format!("${:04X}", self.absolute_argument().unwrap_or(self.argument)),
            },
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let argument = self.argument_string();
        if argument.is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{} {}", self.name(), argument)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_jp() {
        let instruction = Instruction::decode(0x0101, 0xC3, 0x0150).unwrap();
        assert_eq!(instruction.name(), "jp");
        assert_eq!(instruction.operation(), Op::JP);
        assert_eq!(instruction.address_mode(), AddressMode::Absolute);
        assert_eq!(instruction.argument_size(), 2);
        assert_eq!(instruction.size(), 3);
        assert_eq!(instruction.argument().unwrap(), 0x0150);
        assert_eq!(instruction.absolute_argument().unwrap(), 0x0150);
        assert_eq!(instruction.bytes(), vec![0xC3, 0x50, 0x01]);
        assert_eq!(instruction.to_string(), "jp $0150");
        assert!(instruction.is_control());
    }

    #[test]
    fn test_instruction_jr_nz() {
        let instruction = Instruction::decode(0x0020, 0x20, 0x00FE).unwrap();
        assert_eq!(instruction.size(), 2);
        assert_eq!(instruction.argument().unwrap(), 0xFE);
        assert_eq!(instruction.absolute_argument().unwrap(), 0x0020);
        assert_eq!(instruction.to_string(), "jr nz,$0020");
    }

    #[test]
    fn test_instruction_jr_wraps() {
        let instruction = Instruction::decode(0xFFFE, 0x18, 0x0005).unwrap();
        assert_eq!(instruction.absolute_argument().unwrap(), 0x0005);

        let instruction = Instruction::decode(0x0000, 0x18, 0x0080).unwrap();
        assert_eq!(instruction.absolute_argument().unwrap(), 0xFF82);
    }

    #[test]
    fn test_instruction_ld() {
        let instruction = Instruction::decode(0x0150, 0x3E, 0x0012).unwrap();
        assert_eq!(instruction.size(), 2);
        assert_eq!(instruction.to_string(), "ld a,$12");
        assert!(!instruction.is_control());

        let instruction = Instruction::decode(0x0150, 0x21, 0xDFFF).unwrap();
        assert_eq!(instruction.size(), 3);
        assert_eq!(instruction.to_string(), "ld bc,$DFFF");

        let instruction = Instruction::decode(0x0150, 0x32, 0x0000).unwrap();
        assert_eq!(instruction.size(), 1);
        assert_eq!(instruction.argument(), None);
        assert_eq!(instruction.to_string(), "ld (hl-),a");
    }

    #[test]
    fn test_instruction_alu() {
        let xor = Instruction::decode(0x0000, 0xAF, 0x0000).unwrap();
        assert_eq!(xor.to_string(), "xor a");

        let adc = Instruction::decode(0x0000, 0x8E, 0x0000).unwrap();
        assert_eq!(adc.to_string(), "adc a,(hl)");

        let nop = Instruction::decode(0x0000, 0x00, 0x0000).unwrap();
        assert_eq!(nop.to_string(), "nop");
    }

    #[test]
    fn test_decode_unimplemented() {
        match Instruction::decode(0x0150, 0xD3, 0x0000) {
            Err(Error::UnimplementedOpcode { opcode, pc }) => {
                assert_eq!(opcode, 0xD3);
                assert_eq!(pc, 0x0150);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
