//! Scroll axis resolution
//!
//! A container scrolls along one axis at a time. `Responsive` containers pick
//! theirs from the viewport width on every input event, so the controller
//! asks an injected [`ViewportClassifier`] rather than reading window state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Viewport width (px) at and above which responsive containers scroll horizontally
pub const RESPONSIVE_BREAKPOINT: f64 = 768.0;

/// Width/height (px) below which a device is laid out as mobile
pub const MOBILE_BREAKPOINT: f64 = 640.0;

/// Configured scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollAxis {
    /// Galleries default to horizontal
    #[default]
    Horizontal,
    Vertical,
    /// Horizontal at or above the breakpoint, vertical below it
    Responsive,
}

/// Axis in effect for one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedAxis {
    Horizontal,
    Vertical,
}

impl ResolvedAxis {
    /// Component of a 2D pointer position along this axis
    pub fn along(self, x: f64, y: f64) -> f64 {
        match self {
            ResolvedAxis::Horizontal => x,
            ResolvedAxis::Vertical => y,
        }
    }
}

/// Source of the current viewport width
pub trait ViewportClassifier {
    /// Current viewport width in CSS pixels
    fn viewport_width(&self) -> f64;

    /// Width at which responsive containers switch to horizontal
    fn breakpoint(&self) -> f64 {
        RESPONSIVE_BREAKPOINT
    }

    /// Resolve a configured axis against the current viewport
    fn resolve(&self, axis: ScrollAxis) -> ResolvedAxis {
        match axis {
            ScrollAxis::Horizontal => ResolvedAxis::Horizontal,
            ScrollAxis::Vertical => ResolvedAxis::Vertical,
            ScrollAxis::Responsive => {
                if self.viewport_width() >= self.breakpoint() {
                    ResolvedAxis::Horizontal
                } else {
                    ResolvedAxis::Vertical
                }
            }
        }
    }
}

/// Viewport width shared between a host and the controllers it feeds
///
/// Cloning yields another handle to the same width; the host updates it on
/// window resize and every controller sees the change on its next event.
#[derive(Debug, Clone)]
pub struct SharedViewport {
    width_bits: Arc<AtomicU64>,
    breakpoint: f64,
}

impl SharedViewport {
    pub fn new(width: f64) -> Self {
        Self {
            width_bits: Arc::new(AtomicU64::new(width.to_bits())),
            breakpoint: RESPONSIVE_BREAKPOINT,
        }
    }

    /// A typical desktop window
    pub fn desktop() -> Self {
        Self::new(1280.0)
    }

    /// Override the responsive breakpoint
    pub fn with_breakpoint(mut self, breakpoint: f64) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    pub fn set_width(&self, width: f64) {
        self.width_bits.store(width.to_bits(), Ordering::Relaxed);
    }

    pub fn width(&self) -> f64 {
        f64::from_bits(self.width_bits.load(Ordering::Relaxed))
    }
}

impl Default for SharedViewport {
    fn default() -> Self {
        Self::desktop()
    }
}

impl ViewportClassifier for SharedViewport {
    fn viewport_width(&self) -> f64 {
        self.width()
    }

    fn breakpoint(&self) -> f64 {
        self.breakpoint
    }
}

/// Layout class reported by the responsive layout host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// Axis a gallery should use on this class of device
    pub fn preferred_axis(self) -> ScrollAxis {
        match self {
            DeviceClass::Mobile => ScrollAxis::Vertical,
            DeviceClass::Desktop => ScrollAxis::Responsive,
        }
    }
}

/// Window facts used to classify a device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub width: f64,
    pub height: f64,
    /// Touch input available
    pub touch: bool,
    /// `(orientation: landscape)` matches
    pub landscape: bool,
}

impl DeviceProfile {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            touch: false,
            landscape: width > height,
        }
    }

    pub fn with_touch(mut self, touch: bool) -> Self {
        self.touch = touch;
        self
    }

    /// Mobile layout when the relevant dimension is under 640px
    ///
    /// A touch device held in landscape is judged by its height, so phones
    /// turned sideways keep the mobile layout.
    pub fn classify(&self) -> DeviceClass {
        let measured = if self.landscape && self.touch {
            self.height
        } else {
            self.width
        };
        if measured < MOBILE_BREAKPOINT {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}
