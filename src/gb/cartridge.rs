use std::fs::File;
use std::io::prelude::*;
use std::ops::RangeInclusive;

use getset::Getters;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Cartridge's header.
pub mod header {
    use std::ops::RangeInclusive;

    /// Entry point (usually a NOP followed by a JP).
    pub const ENTRY: RangeInclusive<usize> = 0x0100..=0x0103;
    /// Logo bitmap checked by the boot firmware.
    pub const LOGO: RangeInclusive<usize> = 0x0104..=0x0133;
    /// Game's title, padded with NULs.
    pub const TITLE: RangeInclusive<usize> = 0x0134..=0x0143;
    /// Super Game Boy support flag.
    pub const SGB_FLAG: usize = 0x0146;
    /// Cartridge type (mapper and extra hardware).
    pub const TYPE: usize = 0x0147;
    /// ROM size class.
    pub const ROM_SIZE: usize = 0x0148;
    /// Destination (Japan or overseas).
    pub const DESTINATION: usize = 0x014A;
    /// Old licensee code.
    pub const OLD_LICENSEE: usize = 0x014B;
    /// Mask ROM version number.
    pub const VERSION: usize = 0x014C;
    /// Bytes covered by the header checksum.
    pub const CHECKSUMMED: RangeInclusive<usize> = 0x0134..=0x014C;
    /// Header checksum.
    pub const CHECKSUM: usize = 0x014D;
}

/// Size of the fixed cartridge window, and of a blank cartridge.
pub const WINDOW_SIZE: usize = 0x8000;

/// Logo bitmap every licensed cartridge carries at $0104.
pub const NINTENDO_LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

/// Decoded header fields, in a serializable form.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Header {
    pub title: String,
    pub entry: Vec<u8>,
    pub cartridge_type: u8,
    pub size_kb: u32,
    pub sgb_flag: u8,
    pub destination_code: u8,
    pub old_licensee_code: u8,
    pub version: u8,
    pub logo_valid: bool,
    pub checksum_valid: bool,
}

impl Header {
    /// Render the header as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Structure representing a Game Boy cartridge (ROM only).
#[derive(Getters)]
pub struct Cartridge {
    #[getset(get = "pub")]
    path: String,
    data: Vec<u8>,
}

impl Cartridge {
    /// Instantiate a cartridge from raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            path: String::new(),
            data,
        }
    }

    /// Instantiate a zero-filled 32 KB cartridge.
    pub fn blank() -> Self {
        Self::from_bytes(vec![0; WINDOW_SIZE])
    }

    /// Load a cartridge from file.
    pub fn load(path: String) -> Result<Self> {
        let mut file = File::open(&path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        debug!(path = path.as_str(), len = data.len(), "loaded cartridge");
        Ok(Self { path, data })
    }

    /// Size of the image, in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return true if the image holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read a byte from the cartridge.
    pub fn read(&self, address: u16) -> Result<u8> {
        self.data
            .get(address as usize)
            .copied()
            .ok_or(Error::OutOfBounds {
                address,
                len: self.data.len(),
            })
    }

    /// Write a byte to the cartridge. ROM is immutable and there is no
    /// bank controller, so every write is rejected.
    pub fn write(&mut self, address: u16, value: u8) -> Result<()> {
        Err(Error::Unimplemented { address, value })
    }

    /// Return the cartridge's title.
    pub fn title(&self) -> Result<String> {
        let bytes = self.slice(header::TITLE)?;
        let title: String = bytes.iter().map(|&c| char::from(c)).collect();
        Ok(title.trim_matches('\0').to_string())
    }

    /// Return true if the header checksum matches the header contents.
    pub fn validate_header_checksum(&self) -> Result<bool> {
        let checksum = self
            .slice(header::CHECKSUMMED)?
            .iter()
            .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1));
        Ok(checksum == self.byte(header::CHECKSUM)?)
    }

    /// Return true if the logo matches the one the boot firmware expects.
    pub fn validate_logo(&self) -> Result<bool> {
        Ok(self.nintendo_logo()? == &NINTENDO_LOGO[..])
    }

    /// Return the four bytes at the entry point.
    pub fn entry(&self) -> Result<&[u8]> {
        self.slice(header::ENTRY)
    }

    /// Return the logo bitmap.
    pub fn nintendo_logo(&self) -> Result<&[u8]> {
        self.slice(header::LOGO)
    }

    pub fn old_licensee_code(&self) -> Result<u8> {
        self.byte(header::OLD_LICENSEE)
    }

    pub fn destination_code(&self) -> Result<u8> {
        self.byte(header::DESTINATION)
    }

    pub fn version(&self) -> Result<u8> {
        self.byte(header::VERSION)
    }

    pub fn cartridge_type(&self) -> Result<u8> {
        self.byte(header::TYPE)
    }

    pub fn sgb_flag(&self) -> Result<u8> {
        self.byte(header::SGB_FLAG)
    }

    /// Size of the ROM in KB, as indicated by the header.
    pub fn size_kb(&self) -> Result<u32> {
        match self.byte(header::ROM_SIZE)? {
            code @ 0x00..=0x08 => Ok(32u32 << code),
            0x52 => Ok(1152),
            0x53 => Ok(1280),
            0x54 => Ok(1536),
            code => Err(Error::UnknownRomSize(code)),
        }
    }

    /// Decode every header field at once.
    pub fn header(&self) -> Result<Header> {
        Ok(Header {
            title: self.title()?,
            entry: self.entry()?.to_vec(),
            cartridge_type: self.cartridge_type()?,
            size_kb: self.size_kb()?,
            sgb_flag: self.sgb_flag()?,
            destination_code: self.destination_code()?,
            old_licensee_code: self.old_licensee_code()?,
            version: self.version()?,
            logo_valid: self.validate_logo()?,
            checksum_valid: self.validate_header_checksum()?,
        })
    }

    fn byte(&self, offset: usize) -> Result<u8> {
        self.read(offset as u16)
    }

    fn slice(&self, range: RangeInclusive<usize>) -> Result<&[u8]> {
        let end = *range.end();
        self.data.get(range).ok_or(Error::OutOfBounds {
            address: end as u16,
            len: self.data.len(),
        })
    }
}
