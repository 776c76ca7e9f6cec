use colored::*;
use itertools::Itertools;

use crate::gb::instruction::Instruction;
use crate::gb::registers::{Flag, Registers};

const SEPARATOR_WIDTH: usize = 38;

/// Width of the raw bytes column (three bytes at most).
const BYTES_WIDTH: usize = 8;

/// A separator line with a centered title.
pub fn header(title: &str, color: &str) -> String {
    let n = SEPARATOR_WIDTH.max(title.len());
    let left_n = (n / 2) - (title.len() / 2);
    let right_n = n - (left_n + title.len());

    format!(
        "{}{}{}{}",
        ";".bright_black(),
        "-".repeat(left_n).bright_black(),
        title.color(color),
        "-".repeat(right_n).bright_black()
    )
}

/// One trace line: address, raw bytes, disassembly and register state.
pub fn line(instruction: &Instruction, registers: &Registers) -> String {
    let bytes = instruction
        .bytes()
        .iter()
        .map(|b| format!("{:02x}", b))
        .join(" ");
    let argument = instruction.argument_string();

    format!(
        "{}  {:w$}  {:4}{:14}{}",
        format!("${:04X}", instruction.pc()).bright_black(),
        bytes,
        instruction.name().green(),
        argument,
        state(registers).bright_black(),
        w = BYTES_WIDTH,
    )
}

/// Register state, e.g. `a:00 f:Z-H- bc:0000 de:0000 hl:0000 sp:0000`.
pub fn state(registers: &Registers) -> String {
    format!(
        "a:{:02x} f:{} bc:{:04x} de:{:04x} hl:{:04x} sp:{:04x}",
        registers.a,
        flags(registers),
        registers.bc(),
        registers.de(),
        registers.hl(),
        registers.sp
    )
}

fn flags(registers: &Registers) -> String {
    [
        (Flag::Zero, 'Z'),
        (Flag::Subtract, 'N'),
        (Flag::HalfCarry, 'H'),
        (Flag::Carry, 'C'),
    ]
    .iter()
    .map(|&(flag, c)| if registers.flag(flag) { c } else { '-' })
    .collect()
}
