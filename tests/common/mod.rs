#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use lazy_static::lazy_static;
use maplit::btreemap;

use dotmatrix::gb::cartridge::{header, NINTENDO_LOGO, WINDOW_SIZE};

/// A test program: address -> bytes placed there.
pub type Program = BTreeMap<usize, Vec<u8>>;

/// Build a 32 KB image with a valid header and the given program.
pub fn assemble(title: &str, program: &Program) -> Vec<u8> {
    let mut data = vec![0; WINDOW_SIZE];

    // Conventional entry point: nop; jp $0150.
    data[header::ENTRY].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
    data[header::LOGO].copy_from_slice(&NINTENDO_LOGO);
    data[0x0134..0x0134 + title.len()].copy_from_slice(title.as_bytes());
    data[header::OLD_LICENSEE] = 0x01;
    data[header::VERSION] = 0x01;

    for (&address, bytes) in program {
        data[address..address + bytes.len()].copy_from_slice(bytes);
    }

    data[header::CHECKSUM] = checksum(&data);
    data
}

/// Compute the header checksum of an image.
pub fn checksum(data: &[u8]) -> u8 {
    data[header::CHECKSUMMED]
        .iter()
        .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
}

/// Nothing but the entry point.
pub fn empty() -> Program {
    Program::new()
}

/// Count B down from 5, then load A and hit an undecodable opcode.
pub fn countdown() -> Program {
    btreemap! {
        0x0150 => vec![
            0x06, 0x05, // ld b,$05
            0x05,       // dec b
            0x20, 0xFD, // jr nz,$0152
            0x3E, 0x42, // ld a,$42
            0xD3,       // (illegal)
        ],
    }
}

/// Start of Tetris' initialization, which loads $DFFF into BC and stores through HL.
pub fn clear_ram() -> Program {
    btreemap! {
        0x0150 => vec![0xC3, 0x0C, 0x02], // jp $020C
        0x020C => vec![
            0xAF,             // xor a
            0x21, 0xFF, 0xDF, // ld bc,$DFFF
            0x0E, 0x10,       // ld c,$10
            0x06, 0x00,       // ld b,$00
            0x32,             // ld (hl-),a
            0x05,             // dec b
            0x20, 0xFC,       // jr nz,$0214
        ],
    }
}

lazy_static! {
    /// A map of (ROM name) -> (corresponding assembled image).
    pub static ref ASSEMBLED_ROMS: Mutex<HashMap<&'static str, Vec<u8>>> =
        Mutex::new(HashMap::new());
}

/// Generate a function that returns the required assembled cartridge.
#[macro_export]
macro_rules! test_rom {
    ($setup_fn:ident, $title:literal, $program:path) => {
        fn $setup_fn() -> dotmatrix::gb::cartridge::Cartridge {
            let mut roms = common::ASSEMBLED_ROMS.lock().unwrap();
            let data = roms
                .entry($title)
                .or_insert_with(|| common::assemble($title, &$program()))
                .clone();
            dotmatrix::gb::cartridge::Cartridge::from_bytes(data)
        }
    };
}
