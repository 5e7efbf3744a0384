// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Event-driven acquisition engine for the Sensirion SHT31 humidity and
//! temperature sensor.
//!
//! The crate holds no executor and no hardware access. The integrator supplies
//! a [`Transport`](common::Transport) that starts bus transactions and a
//! [`TimerBackend`](common::TimerBackend) that keeps time, then routes bus
//! completions and timer expiries back into the [`SensorEngine`] and the
//! [`TimerRegistry`].

pub mod advert;
pub mod common;
pub mod engine;
pub mod timer;

#[cfg(feature = "impl-blocking")]
pub mod bus;

// Re-export key types for convenience
pub use common::{BusAddress, Command, EngineConfig, EngineError, Reading, TimerError};
pub use engine::SensorEngine;
pub use timer::{TimerHandle, TimerMode, TimerRegistry, TimerToken};
