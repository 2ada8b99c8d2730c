//! Glide Core Runtime
//!
//! Foundational primitives shared by the Glide scroll engine:
//!
//! - **Input Events**: wheel, pointer and resize events as a host element
//!   delivers them, with `preventDefault` bookkeeping
//! - **State Machines**: small typed transition tables for gesture phases
//!
//! # Example
//!
//! ```rust
//! use glide_core::events::{DeltaMode, Event};
//!
//! let mut event = Event::wheel(0.0, 120.0, DeltaMode::Pixel, 16.0);
//! assert!(!event.is_default_prevented());
//!
//! event.prevent_default();
//! assert!(event.is_default_prevented());
//! ```

pub mod error;
pub mod events;
pub mod fsm;

pub use error::{Error, Result};
pub use events::{DeltaMode, Event, EventData, EventType, PointerId, PointerInput, WheelInput};
pub use fsm::{StateMachine, Transition};
