//! Scroll controller configuration
//!
//! Options are plain data so hosts can load them from a config file:
//!
//! ```toml
//! axis = "responsive"
//! smoothing = 0.12
//!
//! [physics]
//! friction = 0.95
//! drag_threshold = 5.0
//! ```

use serde::{Deserialize, Serialize};

use crate::axis::ScrollAxis;
use crate::error::{Result, ScrollError};

/// Default per-frame interpolation fraction for wheel easing
pub const DEFAULT_SMOOTHING: f64 = 0.15;

/// Momentum and gesture constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Per-frame velocity multiplier during momentum
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Pointer travel (px) before a press becomes a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,
    /// Release velocity (px/ms) above which momentum starts
    #[serde(default = "default_momentum_start")]
    pub momentum_start_velocity: f64,
    /// Velocity (px/ms) below which momentum stops
    #[serde(default = "default_momentum_stop")]
    pub momentum_stop_velocity: f64,
    /// Distance (px) at which the ease loop snaps onto its target
    #[serde(default = "default_snap_distance")]
    pub snap_distance: f64,
    /// Nominal frame duration (ms) used to integrate momentum
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
}

fn default_friction() -> f64 {
    0.95
}

fn default_drag_threshold() -> f64 {
    5.0
}

fn default_momentum_start() -> f64 {
    0.1
}

fn default_momentum_stop() -> f64 {
    0.01
}

fn default_snap_distance() -> f64 {
    0.5
}

fn default_frame_ms() -> f64 {
    16.0
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: default_friction(),
            drag_threshold: default_drag_threshold(),
            momentum_start_velocity: default_momentum_start(),
            momentum_stop_velocity: default_momentum_stop(),
            snap_distance: default_snap_distance(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl PhysicsConfig {
    /// Check every constant is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(ScrollError::InvalidFriction(self.friction));
        }
        let positive = [
            ("drag_threshold", self.drag_threshold),
            ("momentum_start_velocity", self.momentum_start_velocity),
            ("momentum_stop_velocity", self.momentum_stop_velocity),
            ("snap_distance", self.snap_distance),
            ("frame_ms", self.frame_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ScrollError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

/// Options passed to [`ScrollController::attach`](crate::ScrollController::attach)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollOptions {
    #[serde(default)]
    pub axis: ScrollAxis,
    /// Fraction of the remaining distance covered per frame, in (0, 1]
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    /// Multiplier applied to normalized wheel deltas
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    #[serde(default)]
    pub physics: PhysicsConfig,
}

fn default_smoothing() -> f64 {
    DEFAULT_SMOOTHING
}

fn default_sensitivity() -> f64 {
    1.0
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            axis: ScrollAxis::default(),
            smoothing: default_smoothing(),
            sensitivity: default_sensitivity(),
            physics: PhysicsConfig::default(),
        }
    }
}

impl ScrollOptions {
    pub fn horizontal() -> Self {
        Self {
            axis: ScrollAxis::Horizontal,
            ..Default::default()
        }
    }

    pub fn vertical() -> Self {
        Self {
            axis: ScrollAxis::Vertical,
            ..Default::default()
        }
    }

    /// Horizontal on wide viewports, vertical on narrow ones
    pub fn responsive() -> Self {
        Self {
            axis: ScrollAxis::Responsive,
            ..Default::default()
        }
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    /// Reject values the frame loops cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ScrollError::InvalidSmoothing(self.smoothing));
        }
        if !(self.sensitivity.is_finite() && self.sensitivity > 0.0) {
            return Err(ScrollError::InvalidSensitivity(self.sensitivity));
        }
        self.physics.validate()
    }
}
