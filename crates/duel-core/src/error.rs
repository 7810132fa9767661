//! Error types shared across crates.

use thiserror::Error;

/// Failure to hand a new entity to the host engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    #[error("host refused entity `{name}`: {reason}")]
    Refused { name: String, reason: String },
    #[error("destroy tick {destroy_tick} precedes activation tick {activation_tick}")]
    InvalidLifespan {
        activation_tick: u64,
        destroy_tick: u64,
    },
}
