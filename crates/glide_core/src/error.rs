//! Core error types

use thiserror::Error;

use crate::events::EventType;

/// Errors raised while interpreting input events
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The event carries a payload that does not belong to its type
    #[error("event {event} carries a {found} payload, expected {expected}")]
    PayloadMismatch {
        event: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Numeric `deltaMode` outside the DOM's 0..=2 range
    #[error("unknown wheel delta mode: {0}")]
    UnknownDeltaMode(u32),

    /// Event type constant not known to this runtime
    #[error("unknown event type: {0}")]
    UnknownEventType(EventType),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
