//! Instruction-execution core of a Game Boy (DMG) emulator.
//!
//! - **gb**: cartridge, memory bus, SM83 registers, opcode table and CPU.
//! - **trace**: human-readable execution trace lines.

pub mod error;
pub mod gb;
pub mod trace;
