//! Scenario runner that replays input against a simulated element.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use glide_animation::FrameScheduler;
use glide_core::events::{event_types, Event};
use glide_core::{PointerId, PointerInput};
use glide_scroll::{
    BrowserEngine, ResolvedAxis, ScrollController, ScrollError, ScrollOptions, ScrollSurface,
    SharedViewport, SimulatedSurface,
};

use crate::config::GlideConfig;
use crate::report::{FinalState, ReplayReport};
use crate::scenario::{Scenario, ScenarioStep};

/// Errors that stop a replay before it can produce a report.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("invalid scroll options: {0}")]
    Options(#[source] ScrollError),

    #[error("step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: ScrollError,
    },
}

/// Everything a replay needs besides the scenario itself.
#[derive(Debug, Clone, Copy)]
pub struct ReplaySettings {
    pub options: ScrollOptions,
    pub engine: BrowserEngine,
    pub viewport_width: f64,
    pub frame_ms: f64,
    pub settle_limit: u32,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self::from_config(&GlideConfig::default(), BrowserEngine::Chrome)
    }
}

impl ReplaySettings {
    pub fn from_config(config: &GlideConfig, engine: BrowserEngine) -> Self {
        Self {
            options: config.scroll_options(),
            engine,
            viewport_width: config.environment.viewport_width,
            frame_ms: config.frames.frame_ms,
            settle_limit: config.frames.settle_limit,
        }
    }
}

/// Deterministic frame clock feeding the shared scheduler.
struct FrameClock {
    scheduler: Arc<Mutex<FrameScheduler>>,
    now_ms: f64,
    frame_ms: f64,
    frames: u64,
}

impl FrameClock {
    fn new(frame_ms: f64) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(FrameScheduler::new())),
            now_ms: 0.0,
            frame_ms,
            frames: 0,
        }
    }

    /// Run one frame; false once the controller has nothing scheduled
    fn advance(&mut self, controller: &mut ScrollController<SimulatedSurface>) -> bool {
        let tick = self
            .scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .begin_frame(self.now_ms);
        self.now_ms += self.frame_ms;
        self.frames += 1;
        controller.on_animation_frame(&tick)
    }
}

/// Execute scenario JSON with the given settings.
pub fn run_scenario_json(input: &str, settings: ReplaySettings) -> anyhow::Result<ReplayReport> {
    let scenario = Scenario::from_json(input)?;
    Ok(run_scenario(&scenario, settings)?)
}

/// Execute a loaded scenario.
///
/// Assertion failures and runaway loops end the replay with a failed report;
/// only unusable options or malformed events are errors.
pub fn run_scenario(
    scenario: &Scenario,
    settings: ReplaySettings,
) -> Result<ReplayReport, ReplayError> {
    let mut options = settings.options;
    if let Some(axis) = scenario.axis {
        options.axis = axis;
    }
    if let Some(smoothing) = scenario.smoothing {
        options.smoothing = smoothing;
    }

    let container = scenario.container;
    let surface = SimulatedSurface::new(
        container.scroll_width,
        container.client_width,
        container.scroll_height,
        container.client_height,
    )
    .with_offset(ResolvedAxis::Horizontal, container.scroll_left)
    .with_offset(ResolvedAxis::Vertical, container.scroll_top);

    let mut clock = FrameClock::new(settings.frame_ms);
    let viewport = SharedViewport::new(settings.viewport_width);
    let mut controller = ScrollController::attach(surface, options)
        .map_err(ReplayError::Options)?
        .with_scheduler(&clock.scheduler)
        .with_viewport(viewport.clone())
        .with_engine(settings.engine);

    tracing::info!(
        "replaying {} ({} steps, engine {})",
        scenario.name.as_deref().unwrap_or("scenario"),
        scenario.steps.len(),
        settings.engine.name()
    );

    let name = scenario.name.clone();
    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("step {}: {:?}", step_index, step);
        let dispatch = |controller: &mut ScrollController<SimulatedSurface>, mut event: Event| {
            controller
                .handle_event(&mut event)
                .map(|_| ())
                .map_err(|source| ReplayError::Step {
                    step: step_index,
                    source,
                })
        };

        match step {
            ScenarioStep::Wheel {
                delta_x,
                delta_y,
                delta_mode,
            } => {
                let event = Event::wheel(*delta_x, *delta_y, *delta_mode, clock.now_ms);
                dispatch(&mut controller, event)?;
            }
            ScenarioStep::PointerDown {
                x,
                y,
                time_ms,
                pointer_id,
                excluded,
            } => {
                let mut input = PointerInput::new(PointerId(*pointer_id), *x, *y);
                input.drag_excluded = *excluded;
                let event = Event::pointer(event_types::POINTER_DOWN, input, *time_ms);
                dispatch(&mut controller, event)?;
            }
            ScenarioStep::PointerMove {
                x,
                y,
                time_ms,
                pointer_id,
            } => {
                let input = PointerInput::new(PointerId(*pointer_id), *x, *y);
                let event = Event::pointer(event_types::POINTER_MOVE, input, *time_ms);
                dispatch(&mut controller, event)?;
            }
            ScenarioStep::PointerUp { pointer_id } => {
                let event = release(event_types::POINTER_UP, *pointer_id, clock.now_ms);
                dispatch(&mut controller, event)?;
            }
            ScenarioStep::PointerCancel { pointer_id } => {
                let event = release(event_types::POINTER_CANCEL, *pointer_id, clock.now_ms);
                dispatch(&mut controller, event)?;
            }
            ScenarioStep::PointerLeave { pointer_id } => {
                let event = release(event_types::POINTER_LEAVE, *pointer_id, clock.now_ms);
                dispatch(&mut controller, event)?;
            }
            ScenarioStep::ScrollTo { offset } => {
                if !controller.scroll_to(*offset) {
                    tracing::debug!("scroll_to({}) had no effect", offset);
                }
            }
            ScenarioStep::Resize {
                scroll_width,
                client_width,
                scroll_height,
                client_height,
            } => {
                if let Some(surface) = controller.surface_mut() {
                    surface.resize(*scroll_width, *client_width, *scroll_height, *client_height);
                }
                let event = Event::resize(
                    client_width.max(0.0) as u32,
                    client_height.max(0.0) as u32,
                    clock.now_ms,
                );
                dispatch(&mut controller, event)?;
            }
            ScenarioStep::Viewport { width } => {
                viewport.set_width(*width);
                let event = Event::resize(width.max(0.0) as u32, 0, clock.now_ms);
                dispatch(&mut controller, event)?;
            }
            ScenarioStep::Frames { count } => {
                for _ in 0..*count {
                    clock.advance(&mut controller);
                }
            }
            ScenarioStep::Settle => {
                let mut ran = 0;
                while clock.advance(&mut controller) {
                    ran += 1;
                    if ran >= settings.settle_limit {
                        return Ok(ReplayReport::failed(
                            name,
                            "settle",
                            step_index,
                            format!("still animating after {} frames", settings.settle_limit),
                            clock.frames,
                            final_state(&controller),
                        ));
                    }
                }
            }
            ScenarioStep::AssertOffset { value, tolerance } => {
                let actual = controller.snapshot().current_offset;
                if (actual - value).abs() > *tolerance {
                    return Ok(ReplayReport::failed(
                        name,
                        "assert_offset",
                        step_index,
                        format!("expected offset {value} ± {tolerance}, got {actual}"),
                        clock.frames,
                        final_state(&controller),
                    ));
                }
            }
            ScenarioStep::AssertPhase { phase } => {
                let actual = controller.snapshot().drag_phase;
                if !phase.matches(actual) {
                    return Ok(ReplayReport::failed(
                        name,
                        "assert_phase",
                        step_index,
                        format!("expected drag phase {phase:?}, got {actual:?}"),
                        clock.frames,
                        final_state(&controller),
                    ));
                }
            }
        }
    }

    Ok(ReplayReport::passed(
        name,
        clock.frames,
        final_state(&controller),
    ))
}

fn release(event_type: u32, pointer_id: u32, time_ms: f64) -> Event {
    let input = PointerInput {
        pointer_id: PointerId(pointer_id),
        ..Default::default()
    };
    Event::pointer(event_type, input, time_ms)
}

fn final_state(controller: &ScrollController<SimulatedSurface>) -> FinalState {
    let Some(surface) = controller.surface() else {
        return FinalState::default();
    };
    let metrics = surface.metrics();
    FinalState {
        axis: controller.snapshot().axis,
        scroll_left: metrics.scroll_left,
        scroll_top: metrics.scroll_top,
        offset_writes: surface.writes().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportStatus;

    #[test]
    fn test_empty_scenario_passes() {
        let report = run_scenario_json(
            r#"{ "container": { "scroll_width": 2000, "client_width": 1000 }, "steps": [] }"#,
            ReplaySettings::default(),
        )
        .unwrap();
        assert_eq!(report.status, ReportStatus::Passed);
        assert_eq!(report.elapsed_frames, 0);
    }

    #[test]
    fn test_invalid_smoothing_is_an_error() {
        let result = run_scenario_json(
            r#"{
                "container": { "scroll_width": 2000, "client_width": 1000 },
                "smoothing": 0.0,
                "steps": []
            }"#,
            ReplaySettings::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_settle_limit_fails_report() {
        let mut settings = ReplaySettings::default();
        settings.settle_limit = 3;
        let report = run_scenario_json(
            r#"{
                "container": { "scroll_width": 2000, "client_width": 1000 },
                "steps": [
                    { "type": "scroll_to", "offset": 900 },
                    { "type": "settle" }
                ]
            }"#,
            settings,
        )
        .unwrap();
        assert!(report.is_failed());
        assert_eq!(report.assertion.as_deref(), Some("settle"));
    }
}
