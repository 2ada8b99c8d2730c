//! Glide configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use glide_scroll::{PhysicsConfig, ScrollAxis, ScrollOptions};

/// Top-level Glide configuration (glide.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GlideConfig {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub frames: FramesConfig,
}

/// Controller defaults applied to every replayed scenario
#[derive(Debug, Deserialize, Serialize)]
pub struct ScrollConfig {
    #[serde(default)]
    pub axis: ScrollAxis,
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    #[serde(default = "default_friction")]
    pub friction: f64,
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,
}

fn default_smoothing() -> f64 {
    glide_scroll::DEFAULT_SMOOTHING
}

fn default_sensitivity() -> f64 {
    1.0
}

fn default_friction() -> f64 {
    0.95
}

fn default_drag_threshold() -> f64 {
    5.0
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            axis: ScrollAxis::default(),
            smoothing: default_smoothing(),
            sensitivity: default_sensitivity(),
            friction: default_friction(),
            drag_threshold: default_drag_threshold(),
        }
    }
}

impl ScrollConfig {
    /// Controller options with the configured overrides
    pub fn options(&self, frame_ms: f64) -> ScrollOptions {
        ScrollOptions {
            axis: self.axis,
            smoothing: self.smoothing,
            sensitivity: self.sensitivity,
            physics: PhysicsConfig {
                friction: self.friction,
                drag_threshold: self.drag_threshold,
                frame_ms,
                ..Default::default()
            },
        }
    }
}

/// Simulated host environment
#[derive(Debug, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    /// User agent used for engine detection; none means a server host
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Initial viewport width in CSS pixels
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
}

fn default_viewport_width() -> f64 {
    1280.0
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            viewport_width: default_viewport_width(),
        }
    }
}

/// Frame clock settings
#[derive(Debug, Deserialize, Serialize)]
pub struct FramesConfig {
    /// Logical milliseconds between frames
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// Upper bound on frames a `settle` step may run
    #[serde(default = "default_settle_limit")]
    pub settle_limit: u32,
}

fn default_frame_ms() -> f64 {
    16.0
}

fn default_settle_limit() -> u32 {
    600
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self {
            frame_ms: default_frame_ms(),
            settle_limit: default_settle_limit(),
        }
    }
}

impl GlideConfig {
    /// Load configuration from a file, or a directory containing glide.toml
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join("glide.toml")
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!("No glide.toml found at {}", config_path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load when a path was given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GlideConfig = toml::from_str(content)?;
        if config.frames.frame_ms <= 0.0 {
            anyhow::bail!("frames.frame_ms must be positive");
        }
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn scroll_options(&self) -> ScrollOptions {
        self.scroll.options(self.frames.frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = GlideConfig::from_toml("").unwrap();
        assert_eq!(config.scroll.smoothing, 0.15);
        assert_eq!(config.environment.viewport_width, 1280.0);
        assert_eq!(config.frames.settle_limit, 600);
        assert!(config.environment.user_agent.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = GlideConfig::from_toml(
            r#"
            [scroll]
            axis = "responsive"
            friction = 0.9

            [environment]
            viewport_width = 375.0
            "#,
        )
        .unwrap();

        let options = config.scroll_options();
        assert_eq!(options.axis, ScrollAxis::Responsive);
        assert_eq!(options.physics.friction, 0.9);
        assert_eq!(options.physics.drag_threshold, 5.0);
        assert_eq!(config.environment.viewport_width, 375.0);
    }

    #[test]
    fn test_rejects_zero_frame_duration() {
        assert!(GlideConfig::from_toml("[frames]\nframe_ms = 0.0").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml = GlideConfig::default().to_toml().unwrap();
        let parsed = GlideConfig::from_toml(&toml).unwrap();
        assert_eq!(parsed.scroll.drag_threshold, 5.0);
    }
}
