// src/advert.rs

//! Service-data frame broadcast with the latest reading.
//!
//! Layout, all multi-byte fields big-endian:
//!
//! ```text
//!  0       1               5               7               9
//!  +-------+---------------+---------------+---------------+
//!  |schema |   device id   | temperature   | humidity      |
//!  | 0x01  |   4 bytes     | i16, 0.01 C   | i16, 0.01 %RH |
//!  +-------+---------------+---------------+---------------+
//! ```
//!
//! Only the frame is built here; handing it to a radio is up to the integrator.

use crate::common::types::Reading;
use arrayvec::ArrayVec;

/// 16-bit service UUID the frame is advertised under.
pub const SERVICE_UUID: u16 = 0xFCBE;

/// Layout version in the first byte.
pub const SCHEMA_VERSION: u8 = 0x01;

pub const DEVICE_ID_LEN: usize = 4;

/// Encoded frame length.
pub const PAYLOAD_LEN: usize = 1 + DEVICE_ID_LEN + 2 + 2;

/// One encoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePayload {
    bytes: ArrayVec<u8, PAYLOAD_LEN>,
}

impl ServicePayload {
    pub fn new(device_id: [u8; DEVICE_ID_LEN], reading: &Reading) -> Self {
        let (temperature, humidity) = reading.into_pair();

        let mut bytes = ArrayVec::new();
        bytes.push(SCHEMA_VERSION);
        bytes.extend(device_id);
        bytes.extend(temperature.to_be_bytes());
        bytes.extend(humidity.to_be_bytes());
        ServicePayload { bytes }
    }

    /// Decodes a received frame. `None` on wrong length or unknown schema.
    pub fn parse(frame: &[u8]) -> Option<(u32, Reading)> {
        if frame.len() != PAYLOAD_LEN || frame[0] != SCHEMA_VERSION {
            return None;
        }
        let device_id = u32::from_be_bytes([frame[1], frame[2], frame[3], frame[4]]);
        let reading = Reading {
            temperature_centi_celsius: i16::from_be_bytes([frame[5], frame[6]]),
            humidity_centi_percent: i16::from_be_bytes([frame[7], frame[8]]),
        };
        Some((device_id, reading))
    }

    pub fn uuid(&self) -> u16 {
        SERVICE_UUID
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for ServicePayload {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
