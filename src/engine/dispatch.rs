// src/engine/dispatch.rs

use super::state::{Phase, State};
use super::SensorEngine;
use crate::common::{
    command::{Command, Transfer, RAW_RESULT_LEN},
    config::ChecksumPolicy,
    error::EngineError,
    hal_traits::{TransferEvent, Transport},
    types::Reading,
};
use crate::timer::Timers;

impl<T, F> SensorEngine<T, F>
where
    T: Transport,
    F: FnOnce(Reading),
{
    /// Hands `command` to the transport if the slot is free.
    ///
    /// `MeasureResultGet` becomes a read; everything else writes its command word.
    /// On a transport refusal the slot is freed again and any waiting
    /// measurement is dropped.
    pub(super) fn send_command(&mut self, command: Command) -> Result<(), EngineError<T::Error>> {
        if let Some(current) = self.state.command() {
            log::warn!("{} rejected, {} already in progress", command, current);
            return Err(EngineError::CommandInProgress(current));
        }

        self.state = State::Transfer(command);
        log::debug!("issue {}", command);

        let address = self.config.address.get();
        let result = match command.transfer() {
            Transfer::Write(word) => self.transport.transmit(address, &word),
            Transfer::Read(len) => self.transport.receive(address, len),
        };

        result.map_err(|e| {
            log::error!("transport refused {}: {:?}", command, e);
            self.state = State::Idle;
            if !command.is_init_step() {
                self.pending = None;
            }
            EngineError::Transport(e)
        })
    }

    /// Advances the state machine after the outstanding `command` completed.
    pub(super) fn process_completion<Tm>(
        &mut self,
        command: Command,
        event: TransferEvent<'_>,
        timers: &mut Tm,
    ) -> Result<Option<Reading>, EngineError<T::Error>>
    where
        Tm: Timers + ?Sized,
    {
        match (self.phase, command, event) {
            (Phase::Initializing, Command::SoftReset, TransferEvent::TxDone)
            | (Phase::Ready, Command::MeasureStart, TransferEvent::TxDone) => {
                self.start_settle(command, timers)?;
                Ok(None)
            }

            (Phase::Initializing, Command::ClearStatus, TransferEvent::TxDone) => {
                self.state = State::Idle;
                self.send_command(self.config.heater.command())?;
                Ok(None)
            }

            (Phase::Initializing, Command::HeaterOn | Command::HeaterOff, TransferEvent::TxDone) => {
                self.state = State::Idle;
                self.phase = Phase::Ready;
                log::info!("initialization complete ({})", command);
                Ok(None)
            }

            (Phase::Ready, Command::MeasureResultGet, TransferEvent::RxDone(data)) => {
                self.finish_measurement(data)
            }

            (_, _, TransferEvent::AddressNack | TransferEvent::DataNack) => {
                log::error!("{} not acknowledged ({:?})", command, event);
                Err(EngineError::Nack(command))
            }

            _ => {
                log::error!("invalid completion {:?} for {} in {:?}", event, command, self.phase);
                Err(EngineError::UnexpectedEvent {
                    state: self.state.name(),
                })
            }
        }
    }

    /// Runs the step that follows a settle delay.
    pub(super) fn process_settled(&mut self, command: Command) -> Result<(), EngineError<T::Error>> {
        let next = match command {
            Command::SoftReset => Command::ClearStatus,
            Command::MeasureStart => Command::MeasureResultGet,
            other => {
                log::error!("{} has no settle step", other);
                return Err(EngineError::UnexpectedEvent {
                    state: self.state.name(),
                });
            }
        };

        self.state = State::Idle;
        self.send_command(next)
    }

    fn start_settle<Tm>(&mut self, command: Command, timers: &mut Tm) -> Result<(), EngineError<T::Error>>
    where
        Tm: Timers + ?Sized,
    {
        let ticks = self.config.settle_ticks(command).unwrap_or(1);

        if let Err(e) = timers.start_timer(self.timer, ticks) {
            log::error!("settle timer for {} not started: {}", command, e);
            self.state = State::Idle;
            if !command.is_init_step() {
                self.pending = None;
            }
            return Err(EngineError::Timer(e));
        }

        self.state = State::Settling(command);
        log::debug!("{} done, settling {} ticks", command, ticks);
        Ok(())
    }

    fn finish_measurement(&mut self, data: &[u8]) -> Result<Option<Reading>, EngineError<T::Error>> {
        self.state = State::Idle;
        let callback = self.pending.take();

        if data.len() != RAW_RESULT_LEN {
            log::error!("result read returned {} bytes, reading dropped", data.len());
            return Err(EngineError::ResultLength {
                expected: RAW_RESULT_LEN,
                got: data.len(),
            });
        }
        self.raw.0.copy_from_slice(data);

        if self.config.checksum == ChecksumPolicy::Verify {
            if let Err((word, received, calculated)) = self.raw.verify() {
                log::error!(
                    "{:?} CRC mismatch (received {:#04x}, calculated {:#04x}), reading dropped",
                    word,
                    received,
                    calculated
                );
                return Err(EngineError::ChecksumMismatch {
                    word,
                    received,
                    calculated,
                });
            }
        }

        let reading = self.raw.reading();
        log::info!("{}", reading);

        match callback {
            Some(callback) => callback(reading),
            None => log::warn!("reading without a waiting callback"),
        }
        Ok(Some(reading))
    }
}
