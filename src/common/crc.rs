// src/common/crc.rs

use crc::{Algorithm, Crc};

/// CRC-8 used by Sensirion humidity sensors (identical to CRC-8/NRSC-5).
/// Polynomial: 0x31 (x^8 + x^5 + x^4 + 1)
/// Initial Value: 0xFF
/// Input/Output Reflected: false
/// Final XOR: 0x00
/// Check Value: 0xF7 (for "123456789")
pub const SENSIRION_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&SENSIRION_CRC);

/// Calculates the checksum the sensor appends to each 16-bit word.
#[inline]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}

/// Checks one `[msb, lsb, crc]` triple from a measurement result.
///
/// Returns the calculated checksum on mismatch so callers can report both.
pub fn verify_word(triple: &[u8; 3]) -> Result<(), u8> {
    let calculated = calculate_crc8(&triple[..2]);
    if calculated == triple[2] {
        Ok(())
    } else {
        Err(calculated)
    }
}
