//! Scenario definition for headless scroll replays.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use glide_core::DeltaMode;
use glide_scroll::{DragPhase, ScrollAxis};

/// A container plus the input sequence replayed against it.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub container: ContainerSpec,
    /// Overrides the configured axis
    #[serde(default)]
    pub axis: Option<ScrollAxis>,
    /// Overrides the configured smoothing
    #[serde(default)]
    pub smoothing: Option<f64>,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Content and viewport extents of the simulated element.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ContainerSpec {
    pub scroll_width: f64,
    pub client_width: f64,
    #[serde(default)]
    pub scroll_height: f64,
    #[serde(default)]
    pub client_height: f64,
    #[serde(default)]
    pub scroll_left: f64,
    #[serde(default)]
    pub scroll_top: f64,
}

/// Replay steps. Pointer steps carry client coordinates and a timestamp.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Wheel {
        #[serde(default)]
        delta_x: f64,
        #[serde(default)]
        delta_y: f64,
        #[serde(default)]
        delta_mode: DeltaMode,
    },
    PointerDown {
        x: f64,
        #[serde(default)]
        y: f64,
        time_ms: f64,
        #[serde(default)]
        pointer_id: u32,
        #[serde(default)]
        excluded: bool,
    },
    PointerMove {
        x: f64,
        #[serde(default)]
        y: f64,
        time_ms: f64,
        #[serde(default)]
        pointer_id: u32,
    },
    PointerUp {
        #[serde(default)]
        pointer_id: u32,
    },
    PointerCancel {
        #[serde(default)]
        pointer_id: u32,
    },
    PointerLeave {
        #[serde(default)]
        pointer_id: u32,
    },
    ScrollTo {
        offset: f64,
    },
    /// New container extents; offsets clamp like a browser would
    Resize {
        scroll_width: f64,
        client_width: f64,
        #[serde(default)]
        scroll_height: f64,
        #[serde(default)]
        client_height: f64,
    },
    /// New viewport width, seen by responsive axes on the next input
    Viewport {
        width: f64,
    },
    Frames {
        count: u32,
    },
    /// Run frames until no loop is scheduled
    Settle,
    AssertOffset {
        value: f64,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
    },
    AssertPhase {
        phase: PhaseName,
    },
}

fn default_tolerance() -> f64 {
    0.5
}

/// Drag phase as written in scenario files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Idle,
    Pending,
    Active,
}

impl PhaseName {
    pub fn matches(self, phase: DragPhase) -> bool {
        matches!(
            (self, phase),
            (PhaseName::Idle, DragPhase::Idle)
                | (PhaseName::Pending, DragPhase::Pending)
                | (PhaseName::Active, DragPhase::Active)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_steps() {
        let scenario = Scenario::from_json(
            r#"{
                "container": { "scroll_width": 2000, "client_width": 1000 },
                "steps": [
                    { "type": "wheel", "delta_y": 100, "delta_mode": "line" },
                    { "type": "settle" },
                    { "type": "assert_offset", "value": 100 },
                    { "type": "assert_phase", "phase": "idle" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.steps.len(), 4);
        assert!(matches!(
            scenario.steps[0],
            ScenarioStep::Wheel {
                delta_mode: DeltaMode::Line,
                ..
            }
        ));
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::AssertOffset { tolerance, .. } if tolerance == 0.5
        ));
    }

    #[test]
    fn test_unknown_step_rejected() {
        let result = Scenario::from_json(
            r#"{
                "container": { "scroll_width": 2000, "client_width": 1000 },
                "steps": [{ "type": "teleport" }]
            }"#,
        );
        assert!(result.is_err());
    }
}
