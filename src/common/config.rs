// src/common/config.rs

use super::address::BusAddress;
use super::command::Command;
use super::timing;
use core::time::Duration;

/// Heater setting applied once at the end of the startup sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum HeaterMode {
    #[default]
    Off,
    On,
}

impl HeaterMode {
    pub const fn command(&self) -> Command {
        match self {
            HeaterMode::Off => Command::HeaterOff,
            HeaterMode::On => Command::HeaterOn,
        }
    }
}

/// What to do with the checksum bytes of a measurement result.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ChecksumPolicy {
    /// Convert the words as read. Offsets 2 and 5 are never looked at.
    #[default]
    Ignore,
    /// Drop the reading when either CRC fails.
    ///
    /// A dropped reading never reaches its callback, so an accepted request
    /// may end with no callback at all instead of exactly one. Check the
    /// `ChecksumMismatch` returned by `on_transfer_complete` to notice it.
    Verify,
}

/// Everything the engine needs to know about the part and the timer clock.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub address: BusAddress,
    pub heater: HeaterMode,
    pub checksum: ChecksumPolicy,
    pub reset_settle: Duration,
    pub measurement_settle: Duration,
    /// Frequency of the clock behind the registry's backend.
    pub tick_hz: u32,
}

impl EngineConfig {
    pub const fn new() -> Self {
        EngineConfig {
            address: BusAddress::SHT31_DEFAULT,
            heater: HeaterMode::Off,
            checksum: ChecksumPolicy::Ignore,
            reset_settle: timing::SOFT_RESET_SETTLE,
            measurement_settle: timing::MEASUREMENT_SETTLE,
            tick_hz: timing::DEFAULT_TICK_HZ,
        }
    }

    pub const fn with_address(mut self, address: BusAddress) -> Self {
        self.address = address;
        self
    }

    pub const fn with_heater(mut self, heater: HeaterMode) -> Self {
        self.heater = heater;
        self
    }

    pub const fn with_checksum(mut self, checksum: ChecksumPolicy) -> Self {
        self.checksum = checksum;
        self
    }

    pub const fn with_tick_hz(mut self, tick_hz: u32) -> Self {
        self.tick_hz = tick_hz;
        self
    }

    pub const fn with_settle_times(mut self, reset: Duration, measurement: Duration) -> Self {
        self.reset_settle = reset;
        self.measurement_settle = measurement;
        self
    }

    /// Settle delay in ticks for a command that needs one.
    pub fn settle_ticks(&self, command: Command) -> Option<u32> {
        let delay = match command {
            Command::SoftReset => self.reset_settle,
            Command::MeasureStart => self.measurement_settle,
            _ => return None,
        };
        Some(timing::duration_to_ticks(delay, self.tick_hz))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
