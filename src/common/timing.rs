// src/common/timing.rs

use core::time::Duration;

// Nominal values from the SHT3x datasheet. The engine never polls, so these
// are the delays it arms between issuing a command and consuming its effect.

// === Settle Timing ===

/// Time the sensor needs after a soft reset before accepting commands (max 1.5 ms).
pub const SOFT_RESET_SETTLE: Duration = Duration::from_millis(2);
/// Conversion time of a high repeatability single shot (max 15.5 ms).
pub const MEASUREMENT_SETTLE: Duration = Duration::from_millis(16);

// === Publishing ===

/// Default period of the repeated timer that requests a fresh reading.
pub const PUBLISH_INTERVAL: Duration = Duration::from_millis(100);

// === Timer Clock ===

/// Low frequency RTC clock commonly backing one-shot timers, prescaler 0.
pub const DEFAULT_TICK_HZ: u32 = 32_768;

/// Converts a delay into timer ticks, rounding to the nearest tick.
///
/// Never returns 0: a zero-tick timer would expire before the command it
/// guards has had any time at all.
pub fn duration_to_ticks(delay: Duration, tick_hz: u32) -> u32 {
    let micros = delay.as_micros();
    let ticks = (micros * u128::from(tick_hz) + 500_000) / 1_000_000;
    ticks.clamp(1, u128::from(u32::MAX)) as u32
}

/// Converts milliseconds into timer ticks, rounding to the nearest tick.
#[inline]
pub fn millis_to_ticks(ms: u32, tick_hz: u32) -> u32 {
    duration_to_ticks(Duration::from_millis(u64::from(ms)), tick_hz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtc_tick_conversion() {
        assert_eq!(duration_to_ticks(SOFT_RESET_SETTLE, DEFAULT_TICK_HZ), 66);
        assert_eq!(duration_to_ticks(MEASUREMENT_SETTLE, DEFAULT_TICK_HZ), 524);
        assert_eq!(millis_to_ticks(100, DEFAULT_TICK_HZ), 3277);
    }

    #[test]
    fn test_millisecond_clock_is_identity() {
        assert_eq!(millis_to_ticks(16, 1_000), 16);
        assert_eq!(millis_to_ticks(2, 1_000), 2);
    }

    #[test]
    fn test_never_zero() {
        assert_eq!(millis_to_ticks(0, DEFAULT_TICK_HZ), 1);
        assert_eq!(duration_to_ticks(Duration::from_micros(1), 1_000), 1);
    }
}
