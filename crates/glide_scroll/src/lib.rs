//! Glide Scroll Engine
//!
//! Cross-browser inertial scrolling for a single scrollable element:
//!
//! - **Wheel smoothing**: per-engine delta normalization and eased targets
//! - **Drag to scroll**: threshold-gated pointer drags with pointer capture
//! - **Momentum**: friction-decayed coasting after a drag is released
//! - **Responsive axis**: horizontal on wide viewports, vertical on narrow ones
//!
//! The controller never talks to a platform directly. It drives a
//! [`ScrollSurface`] and asks a [`FrameScheduler`](glide_animation::FrameScheduler)
//! for frames, so the same code runs against a browser binding or the
//! in-memory [`SimulatedSurface`].

pub mod axis;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod simulated;
pub mod surface;

pub use axis::{
    DeviceClass, DeviceProfile, ResolvedAxis, ScrollAxis, SharedViewport, ViewportClassifier,
    MOBILE_BREAKPOINT, RESPONSIVE_BREAKPOINT,
};
pub use config::{PhysicsConfig, ScrollOptions, DEFAULT_SMOOTHING};
pub use controller::{DragPhase, Intercept, LoopKind, ScrollController, ScrollSnapshot};
pub use engine::{BrowserEngine, BrowserInfo, WheelNormalizer};
pub use error::{Result, ScrollError};
pub use simulated::{OffsetWrite, SimulatedSurface};
pub use surface::{Cursor, ListenerKind, ListenerOptions, ScrollMetrics, ScrollSurface};
