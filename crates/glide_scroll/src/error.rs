//! Scroll engine error types

use thiserror::Error;

/// Errors raised by the scroll engine
///
/// Runtime input never produces an error: degenerate containers and detached
/// controllers turn events into no-ops. Only configuration and malformed
/// generic events are rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrollError {
    /// Smoothing outside (0, 1]
    #[error("smoothing must be in (0, 1], got {0}")]
    InvalidSmoothing(f64),

    /// Non-positive or non-finite sensitivity
    #[error("sensitivity must be a positive number, got {0}")]
    InvalidSensitivity(f64),

    /// Friction outside (0, 1)
    #[error("friction must be in (0, 1), got {0}")]
    InvalidFriction(f64),

    /// A physics threshold that must be positive
    #[error("{name} must be a positive number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    /// Event payload did not match its type
    #[error(transparent)]
    Event(#[from] glide_core::Error),
}

/// Result type for scroll operations
pub type Result<T> = std::result::Result<T, ScrollError>;
