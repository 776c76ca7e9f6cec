use std::error;
use std::fmt;
use std::io;

/// Direction of a bus access.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Access::Read => write!(f, "read"),
            Access::Write => write!(f, "write"),
        }
    }
}

/// Emulation error type.
#[derive(Debug)]
pub enum Error {
    IOError(io::Error),
    JSONError(serde_json::Error),
    OutOfBounds { address: u16, len: usize },
    Unimplemented { address: u16, value: u8 },
    UnimplementedOpcode { opcode: u8, pc: u16 },
    UnknownRomSize(u8),
    Unmapped { address: u16, access: Access },
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::IOError(err) => Some(err),
            Error::JSONError(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IOError(err) => write!(f, "Error reading cartridge: {}.", err),
            Error::JSONError(err) => write!(f, "Error serializing header: {}.", err),
            Error::OutOfBounds { address, len } => write!(
                f,
                "Address ${:04X} is outside the cartridge image (${:X} bytes).",
                address, len
            ),
            Error::Unimplemented { address, value } => write!(
                f,
                "Cartridge writes are not supported (address ${:04X}, value ${:02X}).",
                address, value
            ),
            Error::UnimplementedOpcode { opcode, pc } => {
                write!(f, "Unimplemented opcode ${:02X} at ${:04X}.", opcode, pc)
            }
            Error::UnknownRomSize(code) => write!(f, "Unknown ROM size code ${:02X}.", code),
            Error::Unmapped { address, access } => {
                write!(f, "Unmapped {} at address ${:04X}.", access, address)
            }
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IOError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JSONError(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
