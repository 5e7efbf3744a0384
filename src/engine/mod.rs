// src/engine/mod.rs

//! The SHT31 acquisition state machine.
//!
//! The engine never blocks. It is re-entered from three places, all of which
//! must be serialized onto one execution context by the caller:
//!
//! * [`SensorEngine::request_measurement`], from application code;
//! * [`SensorEngine::on_transfer_complete`], when the bus reports a finished transaction;
//! * [`SensorEngine::on_settle_elapsed`], when the settle timer runs out.
//!
//! ```text
//!   init() ─► SoftReset ─tx─► settle 2 ms ─► ClearStatus ─tx─► Heater{Off,On} ─tx─► Ready
//!
//!   Ready ─request─► MeasureStart ─tx─► settle 16 ms ─► MeasureResultGet ─rx─► callback ─► Ready
//! ```

mod dispatch;
pub mod state;

pub use state::{Phase, State};

use crate::common::{
    command::Command,
    config::EngineConfig,
    error::EngineError,
    hal_traits::{TimerBackend, TransferEvent, Transport},
    types::{RawSample, Reading},
};
use crate::timer::{TimerCallback, TimerHandle, TimerMode, TimerRegistry, Timers};

/// Plain function callback, for callers that route readings through statics.
pub type ReadingCallback = fn(Reading);

/// Owns the sensor's protocol state and the transport used to talk to it.
pub struct SensorEngine<T, F = ReadingCallback>
where
    T: Transport,
{
    transport: T,
    config: EngineConfig,
    timer: TimerHandle,
    /// Set once `init` registered `timer`; a later `init` reuses that entry.
    timer_registered: bool,
    state: State,
    phase: Phase,
    raw: RawSample,
    pending: Option<F>,
}

impl<T, F> SensorEngine<T, F>
where
    T: Transport,
    F: FnOnce(Reading),
{
    /// Creates an idle engine. Nothing touches the bus until [`init`](Self::init).
    ///
    /// `timer` is the registry handle the engine uses for its settle delays.
    pub fn new(transport: T, timer: TimerHandle, config: EngineConfig) -> Self {
        SensorEngine {
            transport,
            config,
            timer,
            timer_registered: false,
            state: State::Idle,
            phase: Phase::Initializing,
            raw: RawSample::default(),
            pending: None,
        }
    }

    /// Registers the settle timer and starts the startup sequence.
    ///
    /// `on_expiry` must route the registry's context to
    /// [`on_settle_elapsed`](Self::on_settle_elapsed) of this engine. The
    /// handle must be free: an entry registered by someone else is reported
    /// as `DuplicateHandle` and nothing is sent. Calling `init` again while
    /// the sequence runs, or after it finished, is rejected without touching
    /// the registry.
    pub fn init<C, B, const N: usize>(
        &mut self,
        timers: &mut TimerRegistry<C, B, N>,
        on_expiry: TimerCallback<C>,
    ) -> Result<(), EngineError<T::Error>>
    where
        B: TimerBackend,
    {
        if self.phase == Phase::Ready || self.state != State::Idle {
            log::warn!("init ignored, engine already initialized");
            return Err(EngineError::AlreadyInitialized);
        }

        // After a refused SoftReset the timer is already ours; only prime again.
        if !self.timer_registered {
            timers
                .register(self.timer, on_expiry, TimerMode::OneShot)
                .map_err(|e| EngineError::Timer(e.erase()))?;
            self.timer_registered = true;
        }

        self.send_command(Command::SoftReset)
    }

    /// Accepts a measurement request if the engine is ready and not already measuring.
    ///
    /// `callback` runs exactly once, from inside
    /// [`on_transfer_complete`](Self::on_transfer_complete), when the result
    /// has been read. Rejected requests are logged and have no other effect.
    pub fn request_measurement(&mut self, callback: F) -> Result<(), EngineError<T::Error>> {
        if self.phase != Phase::Ready {
            log::warn!("measurement rejected, initialization not yet completed");
            return Err(EngineError::NotReady);
        }
        if self.pending.is_some() {
            log::warn!("measurement rejected, one already in progress");
            return Err(EngineError::MeasurementInProgress);
        }

        self.send_command(Command::MeasureStart)?;
        self.pending = Some(callback);
        Ok(())
    }

    /// Bus completion entry point.
    ///
    /// Returns the reading when this completion finished a measurement (the
    /// callback has already run with the same value).
    pub fn on_transfer_complete<Tm>(
        &mut self,
        event: TransferEvent<'_>,
        timers: &mut Tm,
    ) -> Result<Option<Reading>, EngineError<T::Error>>
    where
        Tm: Timers + ?Sized,
    {
        log::trace!("transfer complete {:?} in {:?}/{:?}", event, self.state, self.phase);

        match self.state {
            State::Transfer(command) => self.process_completion(command, event, timers),

            // Nothing outstanding yet during startup: the first completion primes the sequence.
            State::Idle if self.phase == Phase::Initializing && event.is_done() => {
                self.send_command(Command::SoftReset)?;
                Ok(None)
            }

            other => {
                log::error!("unexpected completion {:?} in {:?}", event, other);
                Err(EngineError::UnexpectedEvent { state: other.name() })
            }
        }
    }

    /// Settle timer entry point.
    pub fn on_settle_elapsed(&mut self) -> Result<(), EngineError<T::Error>> {
        match self.state {
            State::Settling(command) => self.process_settled(command),
            other => {
                log::warn!("settle timer fired in {:?}, ignoring", other);
                Err(EngineError::UnexpectedEvent { state: other.name() })
            }
        }
    }

    /// Registry callback for registries whose context is the engine itself.
    ///
    /// Errors have already been logged where they were raised.
    pub fn timer_callback(engine: &mut Self) {
        let _ = engine.on_settle_elapsed();
    }

    // --- State Accessors ---

    /// The command occupying the slot, including one that is settling.
    pub fn current_command(&self) -> Option<Command> {
        self.state.command()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn is_measuring(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_settling(&self) -> bool {
        matches!(self.state, State::Settling(_))
    }

    /// Whether a bus transaction has been started and not yet completed.
    pub fn is_transfer_pending(&self) -> bool {
        matches!(self.state, State::Transfer(_))
    }

    /// The last 6 bytes read back from the sensor.
    pub fn raw_sample(&self) -> &RawSample {
        &self.raw
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn timer_handle(&self) -> TimerHandle {
        self.timer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
