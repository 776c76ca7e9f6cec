pub mod alu;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod instruction;
pub mod opcodes;
pub mod registers;
