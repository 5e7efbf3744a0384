// src/common/hal_traits.rs

use crate::timer::{TimerHandle, TimerMode, TimerToken};
use core::fmt::Debug;

/// Completion notification for the last transaction started on a [`Transport`].
///
/// Delivered back into the engine from whatever context the bus driver
/// signals completion in. Handlers receiving it must not block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransferEvent<'a> {
    /// A write finished and was acknowledged.
    TxDone,
    /// A read finished; the bytes received.
    RxDone(&'a [u8]),
    /// The device did not acknowledge its address.
    AddressNack,
    /// The device did not acknowledge a data byte.
    DataNack,
}

impl TransferEvent<'_> {
    pub const fn is_done(&self) -> bool {
        matches!(self, TransferEvent::TxDone | TransferEvent::RxDone(_))
    }
}

/// Abstraction for a two-wire bus that completes transactions asynchronously.
///
/// Both methods only *start* a transaction. The driver later reports the
/// outcome as a [`TransferEvent`]; it must never do so from inside the call
/// that started the transaction.
pub trait Transport {
    /// Associated error type for transactions the driver refuses to start.
    type Error: Debug;

    /// Starts a write of `bytes` to the device at `address`.
    fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Starts a read of `len` bytes from the device at `address`.
    ///
    /// The bytes are handed back in [`TransferEvent::RxDone`].
    fn receive(&mut self, address: u8, len: usize) -> Result<(), Self::Error>;
}

/// Abstraction for the hardware timer behind a [`TimerRegistry`](crate::timer::TimerRegistry).
///
/// The backend only keeps time. When a timer runs out, the runtime hands the
/// token it was armed with to
/// [`TimerRegistry::expire`](crate::timer::TimerRegistry::expire), which
/// dispatches the callback.
pub trait TimerBackend {
    /// Associated error type for arming failures.
    type Error: Debug;

    /// Arms `token.handle()` to run out after `ticks`, replacing any earlier arming.
    ///
    /// `TimerMode::Repeated` timers keep running out every `ticks` until
    /// disarmed. Each expiry is reported with `token` unchanged.
    fn arm(&mut self, token: TimerToken, ticks: u32, mode: TimerMode) -> Result<(), Self::Error>;

    /// Cancels any pending expiry of `handle`. Disarming an idle timer is not an error.
    fn disarm(&mut self, handle: TimerHandle) -> Result<(), Self::Error>;
}
