// src/common/types.rs

use super::command::RAW_RESULT_LEN;
use super::crc;
use core::fmt;

// Divisor of both conversion formulas. Note: 65534, not 2^16 - 1.
const FULL_SCALE: i64 = 65_534;

// --- Converted Reading ---

/// One temperature/humidity sample in fixed-point hundredths.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Reading {
    /// Temperature in 0.01 °C.
    pub temperature_centi_celsius: i16,
    /// Relative humidity in 0.01 %RH.
    pub humidity_centi_percent: i16,
}

impl Reading {
    /// Converts the two raw sensor words.
    ///
    /// `T = -45 + 175 * raw_t / 65534`, `RH = 100 * raw_h / 65534`, both
    /// scaled by 100 and rounded half away from zero. Integer-only so it
    /// works without an FPU or `libm`.
    pub fn from_raw(raw_temperature: u16, raw_humidity: u16) -> Self {
        let t = div_round(
            17_500 * i64::from(raw_temperature) - 4_500 * FULL_SCALE,
            FULL_SCALE,
        );
        let h = div_round(10_000 * i64::from(raw_humidity), FULL_SCALE);

        Reading {
            temperature_centi_celsius: saturate_i16(t),
            humidity_centi_percent: saturate_i16(h),
        }
    }

    /// Splits into `(temperature, humidity)` for callers that want the bare pair.
    pub const fn into_pair(self) -> (i16, i16) {
        (self.temperature_centi_celsius, self.humidity_centi_percent)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = i32::from(self.temperature_centi_celsius);
        let h = i32::from(self.humidity_centi_percent);
        let sign = if t < 0 { "-" } else { "" };
        write!(
            f,
            "T={}{}.{:02}C RH={}.{:02}%",
            sign,
            t.abs() / 100,
            t.abs() % 100,
            h / 100,
            h % 100
        )
    }
}

fn div_round(numerator: i64, denominator: i64) -> i64 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

fn saturate_i16(value: i64) -> i16 {
    value.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

// --- Raw Result Buffer ---

/// Which word of the result failed its checksum.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Word {
    Temperature,
    Humidity,
}

/// The 6 bytes read back after a single shot: two `[msb, lsb, crc]` triples.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct RawSample(pub [u8; RAW_RESULT_LEN]);

impl RawSample {
    #[inline]
    pub fn raw_temperature(&self) -> u16 {
        u16::from_be_bytes([self.0[0], self.0[1]])
    }

    #[inline]
    pub fn raw_humidity(&self) -> u16 {
        u16::from_be_bytes([self.0[3], self.0[4]])
    }

    /// Converts without looking at the checksum bytes (offsets 2 and 5).
    pub fn reading(&self) -> Reading {
        Reading::from_raw(self.raw_temperature(), self.raw_humidity())
    }

    /// Validates both checksum bytes.
    pub fn verify(&self) -> Result<(), (Word, u8, u8)> {
        let t = [self.0[0], self.0[1], self.0[2]];
        let h = [self.0[3], self.0[4], self.0[5]];
        crc::verify_word(&t).map_err(|calc| (Word::Temperature, self.0[2], calc))?;
        crc::verify_word(&h).map_err(|calc| (Word::Humidity, self.0[5], calc))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_scale_conversion() {
        let sample = RawSample([0x66, 0x66, 0x00, 0x66, 0x66, 0x00]);
        assert_eq!(sample.raw_temperature(), 26214);
        assert_eq!(sample.raw_humidity(), 26214);
        let reading = sample.reading();
        assert_eq!(reading.temperature_centi_celsius, 2500);
        assert_eq!(reading.humidity_centi_percent, 4000);
    }

    #[test]
    fn test_conversion_boundaries() {
        assert_eq!(Reading::from_raw(0, 0).into_pair(), (-4500, 0));
        assert_eq!(Reading::from_raw(65534, 65534).into_pair(), (13000, 10000));
        // One step past full scale still rounds onto the same hundredth.
        assert_eq!(Reading::from_raw(65535, 65535).into_pair(), (13000, 10000));
    }

    #[test]
    fn test_negative_rounding_is_symmetric() {
        // raw 1 -> -44.9973 C -> -4499.73 -> -4500
        assert_eq!(Reading::from_raw(1, 0).temperature_centi_celsius, -4500);
        // raw 16851 -> -0.0016 C -> -0.16 -> 0
        assert_eq!(Reading::from_raw(16851, 0).temperature_centi_celsius, 0);
    }

    #[test]
    fn test_checksum_bytes_ignored_by_reading() {
        let a = RawSample([0x66, 0x66, 0x00, 0x66, 0x66, 0x00]);
        let b = RawSample([0x66, 0x66, 0xAB, 0x66, 0x66, 0xCD]);
        assert_eq!(a.reading(), b.reading());
    }

    #[test]
    fn test_verify() {
        let good = RawSample([0xBE, 0xEF, 0x92, 0xBE, 0xEF, 0x92]);
        assert_eq!(good.verify(), Ok(()));

        let bad_h = RawSample([0xBE, 0xEF, 0x92, 0xBE, 0xEF, 0x00]);
        assert_eq!(bad_h.verify(), Err((Word::Humidity, 0x00, 0x92)));

        let bad_t = RawSample([0xBE, 0xEF, 0x11, 0xBE, 0xEF, 0x92]);
        assert_eq!(bad_t.verify(), Err((Word::Temperature, 0x11, 0x92)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Reading::from_raw(26214, 26214).to_string(), "T=25.00C RH=40.00%");
        assert_eq!(
            Reading { temperature_centi_celsius: -505, humidity_centi_percent: 7 }.to_string(),
            "T=-5.05C RH=0.07%"
        );
    }
}
