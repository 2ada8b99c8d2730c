//! Headless tooling for the Glide scroll engine
//!
//! Replays JSON scenarios against a simulated scrollable element and reports
//! whether the controller ended up where the scenario expected.

pub mod config;
pub mod inspect;
pub mod report;
pub mod runner;
pub mod scenario;

pub use config::GlideConfig;
pub use report::{ReplayReport, ReportStatus};
pub use runner::{run_scenario, run_scenario_json, ReplayError, ReplaySettings};
pub use scenario::{Scenario, ScenarioStep};
