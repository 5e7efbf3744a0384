//! SHT3x command definitions.
//!
//! Every command except [`Command::MeasureResultGet`] is a 16-bit word sent
//! MSB first. Fetching a single-shot result is a plain 6-byte read with no
//! command word in front of it.

use core::fmt;

/// Number of bytes in a measurement result: `T_msb T_lsb T_crc H_msb H_lsb H_crc`.
pub const RAW_RESULT_LEN: usize = 6;

/// Direction of the bus transaction a command maps to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Write the 2-byte command word.
    Write([u8; 2]),
    /// Read this many bytes from the sensor.
    Read(usize),
}

/// A sensor operation the engine can have outstanding on the bus.
///
/// The idle slot is `Option::<Command>::None`; there is no `None` variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Soft reset (`0x30A2`). Needs a settle delay before the next command.
    SoftReset,
    /// Clear the status register (`0x3041`).
    ClearStatus,
    /// Enable the on-chip heater (`0x306D`).
    HeaterOn,
    /// Disable the on-chip heater (`0x3066`).
    HeaterOff,
    /// Single shot, high repeatability, clock stretching enabled (`0x2400`).
    MeasureStart,
    /// Read back the 6-byte result of the last single shot measurement.
    MeasureResultGet,
}

impl Command {
    /// The 16-bit command word, or `None` for the result read.
    pub const fn code(&self) -> Option<u16> {
        match self {
            Command::SoftReset => Some(0x30A2),
            Command::ClearStatus => Some(0x3041),
            Command::HeaterOn => Some(0x306D),
            Command::HeaterOff => Some(0x3066),
            Command::MeasureStart => Some(0x2400),
            Command::MeasureResultGet => None,
        }
    }

    /// Maps the command onto the bus transaction that issues it.
    pub const fn transfer(&self) -> Transfer {
        match self.code() {
            Some(word) => Transfer::Write(word.to_be_bytes()),
            None => Transfer::Read(RAW_RESULT_LEN),
        }
    }

    /// Whether the sensor needs physical settle time after this command completes.
    pub const fn needs_settle(&self) -> bool {
        matches!(self, Command::SoftReset | Command::MeasureStart)
    }

    /// Whether this command belongs to the one-time startup sequence.
    pub const fn is_init_step(&self) -> bool {
        matches!(
            self,
            Command::SoftReset | Command::ClearStatus | Command::HeaterOn | Command::HeaterOff
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(word) => write!(f, "{:?}({:#06x})", self, word),
            None => write!(f, "{:?}(read {})", self, RAW_RESULT_LEN),
        }
    }
}
