use getset::{Getters, MutGetters};
use tracing::trace;

use crate::error::Result;
use crate::gb::alu::{self, AluResult};
use crate::gb::bus::Bus;
use crate::gb::instruction::Instruction;
use crate::gb::opcodes::{AddressMode, Condition, Op, Operand};
use crate::gb::registers::{Flag, Register, Registers};

/// SM83 CPU emulation.
#[derive(Getters, MutGetters)]
pub struct CPU<'a> {
    /// Register file.
    #[getset(get = "pub", get_mut = "pub")]
    registers: Registers,

    /// Memory bus, borrowed for the whole session.
    bus: &'a mut Bus,
}

impl<'a> CPU<'a> {
    /// Instantiate a CPU object.
    pub fn new(registers: Registers, bus: &'a mut Bus) -> Self {
        Self { registers, bus }
    }

    /// Return the memory bus.
    pub fn bus(&self) -> &Bus {
        &*self.bus
    }

    /// Execute up to `limit` instructions, stopping at the first error.
    pub fn run(&mut self, limit: usize) -> Result<usize> {
        for _ in 0..limit {
            self.step()?;
        }
        Ok(limit)
    }

    /// Fetch and execute the next instruction.
    /// On error, registers are left as they were before the call.
    pub fn step(&mut self) -> Result<Instruction> {
        let instruction = self.fetch()?;
        trace!(pc = instruction.pc(), "{}", instruction);

        self.execute(instruction)?;
        Ok(instruction)
    }

    /// Decode the instruction at PC, without executing it.
    pub fn fetch(&self) -> Result<Instruction> {
        let pc = self.registers.pc;
        let opcode = self.bus.read(pc)?;
        let instruction = Instruction::decode(pc, opcode, 0)?;

        let operand = pc.wrapping_add(1);
        let argument = match instruction.argument_size() {
            0 => 0,
            1 => self.bus.read(operand)? as u16,
            _ => self.bus.read_word(operand)?,
        };
        Ok(Instruction::new(pc, opcode, instruction.definition(), argument))
    }

    /// Emulate an instruction.
    fn execute(&mut self, instruction: Instruction) -> Result<()> {
        let next = instruction.pc().wrapping_add(instruction.size());

        let target = match instruction.operation() {
            Op::NOP => None,
            Op::JP | Op::JR => self.jump(instruction),
            Op::LD => self.load(instruction)?,
            Op::INC | Op::DEC => self.inc_dec(instruction)?,
            Op::CPL => self.cpl(),
            Op::SCF | Op::CCF => self.carry_flag(instruction),
            _ => self.arithmetic(instruction)?,
        };

        self.registers.pc = target.unwrap_or(next);
        Ok(())
    }

    /// Jump instruction emulation. Returns the target if the jump is taken.
    fn jump(&mut self, instruction: Instruction) -> Option<u16> {
        let taken = match instruction.definition().dst() {
            Operand::Cond(cc) => self.condition(cc),
            _ => true,
        };

        if taken {
            instruction.absolute_argument()
        } else {
            None
        }
    }

    /// LD instruction emulation.
    fn load(&mut self, instruction: Instruction) -> Result<Option<u16>> {
        let (dst, src) = (instruction.definition().dst(), instruction.definition().src());

        if instruction.address_mode() == AddressMode::Immediate16 {
            let value = instruction.argument().unwrap_or(0);
            self.write16(dst, value);
            return Ok(None);
        }

        let value = self.read8(src, instruction)?;
        self.write8(dst, value)?;
        self.post_hl(dst);
        self.post_hl(src);
        Ok(None)
    }

    /// INC/DEC instruction emulation, on both 8 and 16-bit operands.
    fn inc_dec(&mut self, instruction: Instruction) -> Result<Option<u16>> {
        let operand = instruction.definition().dst();
        let increment = instruction.operation() == Op::INC;

        if let Some(value) = self.read16(operand) {
            let value = if increment {
                value.wrapping_add(1)
            } else {
                value.wrapping_sub(1)
            };
            self.write16(operand, value);
            return Ok(None);
        }

        let value = self.read8(operand, instruction)?;
        let result = if increment {
            alu::inc8(value)
        } else {
            alu::dec8(value)
        };
        self.write8(operand, result.value)?;
        self.set_flags(result);
        Ok(None)
    }

    /// Accumulator arithmetic and logic (ADD, ADC, SUB, SBC, AND, XOR, OR, CP).
    fn arithmetic(&mut self, instruction: Instruction) -> Result<Option<u16>> {
        let a = self.registers.a;
        let src = instruction.definition().src();
        let b = self.read8(src, instruction)?;
        let carry = self.registers.flag(Flag::Carry);

        let result = match instruction.operation() {
            Op::ADD => alu::add8(a, b, false),
            Op::ADC => alu::add8(a, b, carry),
            Op::SUB | Op::CP => alu::sub8(a, b, false),
            Op::SBC => alu::sub8(a, b, carry),
            Op::AND => alu::and8(a, b),
            // XOR A zeroes the accumulator and clears every flag, Z included.
            Op::XOR if src == Operand::Reg(Register::A) => AluResult {
                zero: false,
                ..alu::xor8(a, b)
            },
            Op::XOR => alu::xor8(a, b),
            Op::OR => alu::or8(a, b),
            _ => unreachable!(),
        };

        if instruction.operation() != Op::CP {
            self.registers.a = result.value;
        }
        self.set_flags(result);
        Ok(None)
    }

    /// CPL instruction emulation.
    fn cpl(&mut self) -> Option<u16> {
        self.registers.a = !self.registers.a;
        self.registers.set_flag(Flag::Subtract, true);
        self.registers.set_flag(Flag::HalfCarry, true);
        None
    }

    /// SCF/CCF instruction emulation.
    fn carry_flag(&mut self, instruction: Instruction) -> Option<u16> {
        let carry = match instruction.operation() {
            Op::SCF => true,
            Op::CCF => !self.registers.flag(Flag::Carry),
            _ => unreachable!(),
        };
        self.registers.set_flag(Flag::Subtract, false);
        self.registers.set_flag(Flag::HalfCarry, false);
        self.registers.set_flag(Flag::Carry, carry);
        None
    }

    /// Evaluate a branch condition.
    fn condition(&self, condition: Condition) -> bool {
        match condition {
            Condition::NZ => !self.registers.flag(Flag::Zero),
            Condition::Z => self.registers.flag(Flag::Zero),
            Condition::NC => !self.registers.flag(Flag::Carry),
            Condition::C => self.registers.flag(Flag::Carry),
        }
    }

    fn set_flags(&mut self, result: AluResult) {
        self.registers.set_flag(Flag::Zero, result.zero);
        self.registers.set_flag(Flag::Subtract, result.subtract);
        self.registers.set_flag(Flag::HalfCarry, result.half_carry);
        if let Some(carry) = result.carry {
            self.registers.set_flag(Flag::Carry, carry);
        }
    }

    fn read8(&self, operand: Operand, instruction: Instruction) -> Result<u8> {
        match operand {
            Operand::Reg(r) => Ok(self.registers.get(r)),
            Operand::Indirect | Operand::Increment | Operand::Decrement => {
                self.bus.read(self.registers.hl())
            }
            Operand::Immediate => Ok(instruction.argument().unwrap_or(0) as u8),
            _ => unreachable!(),
        }
    }

    fn write8(&mut self, operand: Operand, value: u8) -> Result<()> {
        match operand {
            Operand::Reg(r) => self.registers.set(r, value),
            Operand::Indirect | Operand::Increment | Operand::Decrement => {
                self.bus.write(self.registers.hl(), value)?
            }
            _ => unreachable!(),
        }
        Ok(())
    }

    /// Value of a 16-bit operand, or None if the operand is 8-bit.
    fn read16(&self, operand: Operand) -> Option<u16> {
        match operand {
            Operand::Wide(p) => Some(self.registers.get_wide(p)),
            Operand::SP => Some(self.registers.sp),
            _ => None,
        }
    }

    fn write16(&mut self, operand: Operand, value: u16) {
        match operand {
            Operand::Wide(p) => self.registers.set_wide(p, value),
            Operand::SP => self.registers.sp = value,
            _ => unreachable!(),
        }
    }

    /// Adjust HL after a (hl+) or (hl-) access.
    fn post_hl(&mut self, operand: Operand) {
        let hl = self.registers.hl();
        match operand {
            Operand::Increment => self.registers.set_hl(hl.wrapping_add(1)),
            Operand::Decrement => self.registers.set_hl(hl.wrapping_sub(1)),
            _ => {}
        }
    }
}
