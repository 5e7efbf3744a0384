// src/bus/mod.rs

//! [`Transport`] on top of a blocking `embedded-hal` 1.0 I2C bus.
//!
//! Each transaction runs to completion inside `transmit`/`receive`, but its
//! outcome is only queued there. The runtime drains the queue with
//! [`BlockingBus::poll`] and feeds each [`Completion`] to
//! [`SensorEngine::on_transfer_complete`](crate::engine::SensorEngine::on_transfer_complete),
//! so the engine is never re-entered from inside its own call.

use crate::common::command::RAW_RESULT_LEN;
use crate::common::hal_traits::{TransferEvent, Transport};
use core::convert::Infallible;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};
use heapless::Deque;

/// Completions that may be waiting at once. The engine keeps at most one
/// transaction outstanding; the spare slot absorbs a caller that polls late.
pub const QUEUE_DEPTH: usize = 2;

/// Error from [`BlockingBus`] when a transaction cannot be started.
#[derive(Debug, thiserror::Error)]
pub enum BusError<E>
where
    E: core::fmt::Debug,
{
    /// Bus fault other than a missing acknowledge.
    #[error("I2C error: {0:?}")]
    I2c(E),

    /// Read longer than the receive buffer.
    #[error("Read of {requested} bytes exceeds the {max} byte buffer")]
    ReadTooLong { requested: usize, max: usize },

    /// Earlier completions were never polled.
    #[error("Completion queue full")]
    QueueFull,
}

/// Outcome of one finished transaction, owned until it is handed to the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Completion {
    Tx,
    Rx { data: [u8; RAW_RESULT_LEN], len: usize },
    AddressNack,
    DataNack,
}

impl Completion {
    /// Borrowed event view for [`SensorEngine::on_transfer_complete`](crate::engine::SensorEngine::on_transfer_complete).
    pub fn event(&self) -> TransferEvent<'_> {
        match self {
            Completion::Tx => TransferEvent::TxDone,
            Completion::Rx { data, len } => TransferEvent::RxDone(&data[..*len]),
            Completion::AddressNack => TransferEvent::AddressNack,
            Completion::DataNack => TransferEvent::DataNack,
        }
    }
}

pub struct BlockingBus<I> {
    i2c: I,
    completions: Deque<Completion, QUEUE_DEPTH>,
}

impl<I: I2c> BlockingBus<I> {
    pub fn new(i2c: I) -> Self {
        BlockingBus {
            i2c,
            completions: Deque::new(),
        }
    }

    /// Takes the oldest queued completion.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` while nothing has finished.
    pub fn poll(&mut self) -> nb::Result<Completion, Infallible> {
        self.completions.pop_front().ok_or(nb::Error::WouldBlock)
    }

    /// Number of completions waiting to be polled.
    pub fn queued(&self) -> usize {
        self.completions.len()
    }

    pub fn inner(&self) -> &I {
        &self.i2c
    }

    pub fn inner_mut(&mut self) -> &mut I {
        &mut self.i2c
    }

    pub fn release(self) -> I {
        self.i2c
    }

    // --- Private Helpers ---

    /// Turns a transaction result into a queued completion.
    ///
    /// A missing acknowledge is a protocol outcome, not a refusal: it is
    /// queued like a success and the call itself succeeds.
    fn finish(&mut self, result: Result<Completion, I::Error>) -> Result<(), BusError<I::Error>> {
        let completion = match result {
            Ok(completion) => completion,
            Err(e) => match e.kind() {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => Completion::DataNack,
                ErrorKind::NoAcknowledge(_) => Completion::AddressNack,
                _ => {
                    log::error!("i2c transaction failed: {:?}", e);
                    return Err(BusError::I2c(e));
                }
            },
        };

        self.completions.push_back(completion).map_err(|_| {
            log::error!("completion queue full, {:?} lost", completion);
            BusError::QueueFull
        })
    }
}

impl<I: I2c> Transport for BlockingBus<I> {
    type Error = BusError<I::Error>;

    fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.completions.is_full() {
            return Err(BusError::QueueFull);
        }
        let result = self.i2c.write(address, bytes).map(|()| Completion::Tx);
        self.finish(result)
    }

    fn receive(&mut self, address: u8, len: usize) -> Result<(), Self::Error> {
        if len > RAW_RESULT_LEN {
            return Err(BusError::ReadTooLong {
                requested: len,
                max: RAW_RESULT_LEN,
            });
        }
        if self.completions.is_full() {
            return Err(BusError::QueueFull);
        }

        let mut data = [0u8; RAW_RESULT_LEN];
        let result = self
            .i2c
            .read(address, &mut data[..len])
            .map(|()| Completion::Rx { data, len });
        self.finish(result)
    }
}
