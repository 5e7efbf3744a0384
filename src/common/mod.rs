// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod config;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::{AddressError, BusAddress};

// From command.rs
pub use command::{Command, Transfer, RAW_RESULT_LEN};

// From config.rs
pub use config::{ChecksumPolicy, EngineConfig, HeaterMode};

// From crc.rs
pub use crc::{calculate_crc8, verify_word};

// From error.rs
pub use error::{EngineError, TimerError};

// From hal_traits.rs
pub use hal_traits::{TimerBackend, TransferEvent, Transport};

// From timing.rs (constants - users can access via common::timing::*)
pub use timing::{duration_to_ticks, millis_to_ticks};

// From types.rs
pub use types::{RawSample, Reading, Word};
