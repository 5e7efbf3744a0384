// src/common/address.rs

use core::convert::TryFrom;
use core::fmt;

/// Error returned when a value is not a usable 7-bit bus address.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum AddressError {
    /// Value does not fit in 7 bits.
    #[error("Bus address {0:#04x} does not fit in 7 bits")]
    OutOfRange(u8),

    /// Value falls in one of the reserved I2C address blocks.
    #[error("Bus address {0:#04x} is reserved")]
    Reserved(u8),
}

/// A validated 7-bit two-wire bus address.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct BusAddress(u8);

impl BusAddress {
    /// SHT31 with the ADDR pin pulled high (the wiring this crate targets).
    pub const SHT31_DEFAULT: BusAddress = BusAddress(0x45);
    /// SHT31 with the ADDR pin pulled low.
    pub const SHT31_ALTERNATE: BusAddress = BusAddress(0x44);

    pub fn new(address: u8) -> Result<Self, AddressError> {
        if address > 0x7F {
            Err(AddressError::OutOfRange(address))
        } else if Self::is_reserved(address) {
            Err(AddressError::Reserved(address))
        } else {
            Ok(BusAddress(address))
        }
    }

    #[inline]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// `0b0000_xxx` and `0b1111_xxx` are reserved on I2C.
    #[inline]
    pub const fn is_reserved(address: u8) -> bool {
        address <= 0x07 || (address >= 0x78 && address <= 0x7F)
    }
}

impl Default for BusAddress {
    fn default() -> Self {
        Self::SHT31_DEFAULT
    }
}

impl TryFrom<u8> for BusAddress {
    type Error = AddressError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BusAddress> for u8 {
    fn from(value: BusAddress) -> Self {
        value.0
    }
}

impl fmt::Display for BusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
