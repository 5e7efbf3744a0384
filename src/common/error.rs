// src/common/error.rs

use super::command::Command;
use super::types::Word;
use crate::timer::TimerHandle;

/// Errors reported by the acquisition engine.
///
/// Every variant is also logged at the point it is raised; the returned value
/// only tells the caller that its request was dropped.
#[derive(Debug, thiserror::Error)]
pub enum EngineError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying transport refused to start the transaction.
    #[error("Transport error: {0:?}")]
    Transport(E),

    /// A bus transaction (or its settle delay) is still outstanding.
    #[error("Command already in progress: {0}")]
    CommandInProgress(Command),

    /// A measurement was requested while another one is outstanding.
    #[error("Measurement already in progress")]
    MeasurementInProgress,

    /// A measurement was requested before the startup sequence finished.
    #[error("Initialization not yet completed")]
    NotReady,

    /// `init` was called on an engine whose startup sequence already ran or is running.
    #[error("Engine already initialized")]
    AlreadyInitialized,

    /// The registry rejected a timer operation.
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// The sensor did not acknowledge the outstanding command. The engine
    /// stays in that command's state; there is no retry.
    #[error("Command {0} not acknowledged")]
    Nack(Command),

    /// A completion or expiry arrived that does not match the current state.
    #[error("Unexpected event in state {state}")]
    UnexpectedEvent { state: &'static str },

    /// The result read returned fewer or more bytes than requested.
    #[error("Result length mismatch: expected {expected} bytes, got {got}")]
    ResultLength { expected: usize, got: usize },

    /// A result word failed its CRC (only with checksum verification on).
    #[error("CRC mismatch on {word:?}: received {received:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { word: Word, received: u8, calculated: u8 },
}

/// Errors reported by the timer registry.
#[derive(Debug, thiserror::Error)]
pub enum TimerError<E = ()>
where
    E: core::fmt::Debug,
{
    /// The registry table is full.
    #[error("Unable to register, all {capacity} timer slots in use")]
    CapacityExhausted { capacity: usize },

    /// The handle is already registered.
    #[error("Timer {0:?} already registered")]
    DuplicateHandle(TimerHandle),

    /// The handle was never registered.
    #[error("Timer {0:?} not registered")]
    UnknownHandle(TimerHandle),

    /// Error from the hardware timer behind the registry.
    #[error("Timer backend error: {0:?}")]
    Backend(E),
}

impl<E: core::fmt::Debug> TimerError<E> {
    /// Drops the backend error payload, keeping the kind.
    ///
    /// The engine does not know the backend type; the payload has already
    /// been logged by the registry at this point.
    pub fn erase(self) -> TimerError {
        match self {
            TimerError::CapacityExhausted { capacity } => TimerError::CapacityExhausted { capacity },
            TimerError::DuplicateHandle(handle) => TimerError::DuplicateHandle(handle),
            TimerError::UnknownHandle(handle) => TimerError::UnknownHandle(handle),
            TimerError::Backend(_) => TimerError::Backend(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let busy: EngineError<()> = EngineError::CommandInProgress(Command::SoftReset);
        assert_eq!(busy.to_string(), "Command already in progress: SoftReset(0x30a2)");

        let timer: EngineError<()> = TimerError::UnknownHandle(TimerHandle::new(7)).into();
        assert_eq!(timer.to_string(), "Timer error: Timer TimerHandle(7) not registered");
    }

    #[test]
    fn test_erase_keeps_kind() {
        let err: TimerError<&str> = TimerError::Backend("rtc busy");
        assert!(matches!(err.erase(), TimerError::Backend(())));

        let err: TimerError<&str> = TimerError::CapacityExhausted { capacity: 2 };
        assert!(matches!(err.erase(), TimerError::CapacityExhausted { capacity: 2 }));
    }
}
