// src/timer/mod.rs

//! Fixed-capacity timer registry.
//!
//! Maps caller-chosen [`TimerHandle`]s to callbacks. The registry does not keep
//! time itself: it arms a [`TimerBackend`] and, when the runtime reports that a
//! handle ran out, invokes the matching callback with the caller's context.

pub mod tick;

pub use tick::TickTimers;

use crate::common::error::TimerError;
use crate::common::hal_traits::TimerBackend;
use heapless::Vec;

/// Default number of registry slots: the sensor settle timer and the publish timer.
pub const DEFAULT_CAPACITY: usize = 2;

/// Opaque timer identity, chosen by the caller and unique for the process lifetime.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TimerHandle(u16);

impl TimerHandle {
    pub const fn new(id: u16) -> Self {
        TimerHandle(id)
    }

    #[inline]
    pub const fn id(&self) -> u16 {
        self.0
    }
}

/// One arming of a timer, as handed to the backend and reported back on expiry.
///
/// Every [`TimerRegistry::start`] stamps a new generation, so an expiry the
/// backend reported for an earlier arming is recognized as stale.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TimerToken {
    handle: TimerHandle,
    generation: u16,
}

impl TimerToken {
    pub const fn new(handle: TimerHandle, generation: u16) -> Self {
        TimerToken { handle, generation }
    }

    #[inline]
    pub const fn handle(&self) -> TimerHandle {
        self.handle
    }

    #[inline]
    pub const fn generation(&self) -> u16 {
        self.generation
    }
}

/// How often a started timer fires.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerMode {
    /// Fires once, then stays idle until started again.
    OneShot,
    /// Fires every period until stopped.
    Repeated,
}

/// Callback invoked on expiry, with the context passed to [`TimerRegistry::expire`].
pub type TimerCallback<C> = fn(&mut C);

/// One registered timer.
pub struct TimerEntry<C> {
    handle: TimerHandle,
    callback: TimerCallback<C>,
    mode: TimerMode,
    armed: bool,
    generation: u16,
}

impl<C> TimerEntry<C> {
    pub fn handle(&self) -> TimerHandle {
        self.handle
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Start/stop access to a timer table, independent of its context type.
///
/// This is what the engine is handed on re-entry, so it can arm its settle
/// timer without knowing what the callbacks are dispatched with.
pub trait Timers {
    fn start_timer(&mut self, handle: TimerHandle, ticks: u32) -> Result<(), TimerError>;
    fn stop_timer(&mut self, handle: TimerHandle) -> Result<(), TimerError>;
}

/// Append-only table of up to `N` timers dispatching to callbacks over `C`.
pub struct TimerRegistry<C, B, const N: usize = DEFAULT_CAPACITY>
where
    B: TimerBackend,
{
    backend: B,
    entries: Vec<TimerEntry<C>, N>,
}

impl<C, B, const N: usize> TimerRegistry<C, B, N>
where
    B: TimerBackend,
{
    pub fn new(backend: B) -> Self {
        TimerRegistry {
            backend,
            entries: Vec::new(),
        }
    }

    /// Adds a timer. Entries are never removed.
    ///
    /// Rejects a handle that is already present and refuses to grow past `N`;
    /// in both cases the table is left untouched.
    pub fn register(
        &mut self,
        handle: TimerHandle,
        callback: TimerCallback<C>,
        mode: TimerMode,
    ) -> Result<(), TimerError<B::Error>> {
        log::debug!(
            "timer {:?} register ({:?}), {} of {} slots used",
            handle,
            mode,
            self.entries.len(),
            N
        );

        if self.position(handle).is_some() {
            log::error!("timer {:?} already registered", handle);
            return Err(TimerError::DuplicateHandle(handle));
        }

        self.entries
            .push(TimerEntry {
                handle,
                callback,
                mode,
                armed: false,
                generation: 0,
            })
            .map_err(|_| {
                log::error!("unable to register timer {:?}, maximum of {} reached", handle, N);
                TimerError::CapacityExhausted { capacity: N }
            })
    }

    /// Arms `handle` to fire after `ticks`. A running timer is restarted, not stacked.
    pub fn start(&mut self, handle: TimerHandle, ticks: u32) -> Result<(), TimerError<B::Error>> {
        let index = self.lookup(handle)?;
        let mode = self.entries[index].mode;

        if self.entries[index].armed {
            self.backend.disarm(handle).map_err(|e| {
                log::error!("timer {:?} disarm before restart failed: {:?}", handle, e);
                TimerError::Backend(e)
            })?;
            self.entries[index].armed = false;
        }

        let generation = self.entries[index].generation.wrapping_add(1);
        self.entries[index].generation = generation;

        self.backend
            .arm(TimerToken::new(handle, generation), ticks, mode)
            .map_err(|e| {
                log::error!("timer {:?} arm failed: {:?}", handle, e);
                TimerError::Backend(e)
            })?;
        self.entries[index].armed = true;

        log::trace!("timer {:?} started, {} ticks", handle, ticks);
        Ok(())
    }

    /// Cancels a pending firing. Stopping an idle timer succeeds.
    pub fn stop(&mut self, handle: TimerHandle) -> Result<(), TimerError<B::Error>> {
        let index = self.lookup(handle)?;

        self.backend.disarm(handle).map_err(|e| {
            log::error!("timer {:?} disarm failed: {:?}", handle, e);
            TimerError::Backend(e)
        })?;
        self.entries[index].armed = false;
        Ok(())
    }

    /// Dispatches an expiry reported by the backend.
    ///
    /// Returns `Ok(false)` for a stale expiry: the timer was stopped, or
    /// restarted after the backend reported `token`. The callback is not
    /// invoked in that case.
    pub fn expire(&mut self, token: TimerToken, context: &mut C) -> Result<bool, TimerError<B::Error>> {
        let handle = token.handle();
        let index = self.lookup(handle)?;
        let entry = &mut self.entries[index];

        if !entry.armed {
            log::warn!("timer {:?} expired while not armed, ignoring", handle);
            return Ok(false);
        }
        if token.generation() != entry.generation {
            log::debug!(
                "timer {:?} expiry from arming {} superseded by {}, ignoring",
                handle,
                token.generation(),
                entry.generation
            );
            return Ok(false);
        }
        if entry.mode == TimerMode::OneShot {
            entry.armed = false;
        }

        let callback = entry.callback;
        callback(context);
        Ok(true)
    }

    pub fn entry(&self, handle: TimerHandle) -> Option<&TimerEntry<C>> {
        self.position(handle).map(|index| &self.entries[index])
    }

    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.entry(handle).is_some_and(TimerEntry::is_armed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // --- Private Helpers ---

    fn position(&self, handle: TimerHandle) -> Option<usize> {
        self.entries.iter().position(|entry| entry.handle == handle)
    }

    fn lookup(&self, handle: TimerHandle) -> Result<usize, TimerError<B::Error>> {
        self.position(handle).ok_or_else(|| {
            log::error!("timer {:?} not registered", handle);
            TimerError::UnknownHandle(handle)
        })
    }
}

impl<C, B, const N: usize> Timers for TimerRegistry<C, B, N>
where
    B: TimerBackend,
{
    fn start_timer(&mut self, handle: TimerHandle, ticks: u32) -> Result<(), TimerError> {
        self.start(handle, ticks).map_err(TimerError::erase)
    }

    fn stop_timer(&mut self, handle: TimerHandle) -> Result<(), TimerError> {
        self.stop(handle).map_err(TimerError::erase)
    }
}
