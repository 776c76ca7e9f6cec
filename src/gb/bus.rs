use getset::{Getters, MutGetters};

use crate::error::{Access, Error, Result};
use crate::gb::cartridge::Cartridge;

/// Memory regions reachable through the bus.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Region {
    /// Fixed 32 KB cartridge window ($0000-$7FFF).
    Cartridge,
}

/// Route an address to the region backing it, if any.
pub fn region(address: u16) -> Option<Region> {
    match address {
        0x0000..=0x7FFF => Some(Region::Cartridge),
        _ => None,
    }
}

/// Game Boy memory bus.
#[derive(Getters, MutGetters)]
pub struct Bus {
    #[getset(get = "pub", get_mut = "pub")]
    cartridge: Cartridge,
}

impl Bus {
    /// Instantiate a bus with only the cartridge mapped.
    pub fn new(cartridge: Cartridge) -> Self {
        Self { cartridge }
    }

    /// Read a byte from the bus.
    pub fn read(&self, address: u16) -> Result<u8> {
        match region(address) {
            Some(Region::Cartridge) => self.cartridge.read(address),
            None => Err(Error::Unmapped {
                address,
                access: Access::Read,
            }),
        }
    }

    /// Read a little-endian word (16 bits) from the bus.
    pub fn read_word(&self, address: u16) -> Result<u16> {
        let lo = self.read(address)? as u16;
        let hi = self.read(address.wrapping_add(1))? as u16;
        Ok((hi << 8) | lo)
    }

    /// Write a byte to the bus.
    pub fn write(&mut self, address: u16, value: u8) -> Result<()> {
        match region(address) {
            Some(Region::Cartridge) => self.cartridge.write(address, value),
            None => Err(Error::Unmapped {
                address,
                access: Access::Write,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_bus() -> Bus {
        let mut data = vec![0; 0x8000];
        data[0x0150] = 0x34;
        data[0x0151] = 0x12;
        data[0x7FFF] = 0xAA;
        Bus::new(Cartridge::from_bytes(data))
    }

    #[test]
    fn test_region() {
        assert_eq!(region(0x0000), Some(Region::Cartridge));
        assert_eq!(region(0x7FFF), Some(Region::Cartridge));
        assert_eq!(region(0x8000), None);
        assert_eq!(region(0xFFFF), None);
    }

    #[test]
    fn test_read() {
        let bus = setup_bus();
        assert_eq!(bus.read(0x0150).unwrap(), 0x34);
        assert_eq!(bus.read(0x7FFF).unwrap(), 0xAA);
    }

    #[test]
    fn test_read_word() {
        let bus = setup_bus();
        assert_eq!(bus.read_word(0x0150).unwrap(), 0x1234);
    }

    #[test]
    fn test_read_unmapped() {
        let bus = setup_bus();
        assert!(matches!(
            bus.read(0x9000),
            Err(Error::Unmapped {
                address: 0x9000,
                access: Access::Read
            })
        ));
        assert!(matches!(
            bus.read_word(0x7FFF),
            Err(Error::Unmapped { address: 0x8000, .. })
        ));
    }

    #[test]
    fn test_read_out_of_bounds_is_not_unmapped() {
        let bus = Bus::new(Cartridge::from_bytes(vec![0; 0x100]));
        assert!(matches!(
            bus.read(0x0100),
            Err(Error::OutOfBounds { address: 0x0100, .. })
        ));
    }

    #[test]
    fn test_write() {
        let mut bus = setup_bus();
        assert!(matches!(
            bus.write(0x2000, 0x01),
            Err(Error::Unimplemented { address: 0x2000, .. })
        ));
        assert!(matches!(
            bus.write(0xC000, 0x01),
            Err(Error::Unmapped {
                address: 0xC000,
                access: Access::Write
            })
        ));
    }
}
