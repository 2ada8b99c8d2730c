//! Engine and momentum diagnostics printed by the CLI.

use serde::Serialize;

use glide_scroll::engine::{self, BrowserInfo};
use glide_scroll::PhysicsConfig;

/// What the wheel normalizer would do for a user agent.
#[derive(Debug, Clone, Serialize)]
pub struct EngineReport {
    #[serde(flatten)]
    pub info: BrowserInfo,
    pub wheel_multiplier: f64,
}

impl EngineReport {
    pub fn for_user_agent(user_agent: Option<&str>) -> Self {
        let info = engine::detect(user_agent);
        let wheel_multiplier = info.engine.wheel_multiplier();
        Self {
            info,
            wheel_multiplier,
        }
    }
}

/// One momentum frame.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MomentumFrame {
    pub frame: u32,
    /// Velocity after this frame's friction (px/ms)
    pub velocity: f64,
    /// Distance travelled so far (px)
    pub travelled: f64,
}

/// Frame-by-frame momentum decay from a release velocity.
#[derive(Debug, Clone, Serialize)]
pub struct MomentumProfile {
    pub initial_velocity: f64,
    pub frames: Vec<MomentumFrame>,
    /// Total distance the loop covered
    pub travelled: f64,
    /// Unclamped geometric sum over the same number of frames
    pub closed_form: f64,
    /// Whether the travel limit stopped the loop early
    pub pinned: bool,
}

/// Replay the momentum integration a controller performs after release
///
/// `limit` bounds the distance like the far edge of a container would.
pub fn momentum_profile(velocity: f64, limit: Option<f64>, physics: &PhysicsConfig) -> MomentumProfile {
    let speed = velocity.abs();
    let mut frames = Vec::new();
    let mut current = speed;
    let mut travelled = 0.0;
    let mut pinned = false;

    if speed > physics.momentum_start_velocity {
        loop {
            current *= physics.friction;
            travelled += current * physics.frame_ms;
            if let Some(limit) = limit {
                if travelled >= limit {
                    travelled = limit;
                    pinned = true;
                }
            }
            frames.push(MomentumFrame {
                frame: frames.len() as u32 + 1,
                velocity: current,
                travelled,
            });
            if current < physics.momentum_stop_velocity || pinned {
                break;
            }
        }
    }

    let n = frames.len() as i32;
    let f = physics.friction;
    let closed_form = if n == 0 {
        0.0
    } else {
        speed * physics.frame_ms * f * (1.0 - f.powi(n)) / (1.0 - f)
    };

    MomentumProfile {
        initial_velocity: velocity,
        frames,
        travelled,
        closed_form,
        pinned,
    }
}
