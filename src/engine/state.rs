// src/engine/state.rs

use crate::common::command::Command;

/// Where the engine is with respect to the bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum State {
    /// No transaction outstanding, nothing being waited on.
    #[default]
    Idle,
    /// `Command` was handed to the transport and its completion has not arrived.
    Transfer(Command),
    /// `Command` completed on the bus; its settle timer is running.
    Settling(Command),
}

impl State {
    /// The command occupying the slot, if any.
    pub const fn command(&self) -> Option<Command> {
        match self {
            State::Idle => None,
            State::Transfer(cmd) | State::Settling(cmd) => Some(*cmd),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            State::Idle => "Idle",
            State::Transfer(_) => "Transfer",
            State::Settling(_) => "Settling",
        }
    }
}

/// One-way progression from power-up to normal operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Startup sequence (reset, clear status, heater) not finished.
    #[default]
    Initializing,
    /// Measurements may be requested. Never left once reached.
    Ready,
}
