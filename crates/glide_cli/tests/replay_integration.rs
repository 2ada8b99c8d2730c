//! Replays the bundled scenarios end to end

use std::path::PathBuf;

use glide_cli::{run_scenario, run_scenario_json, GlideConfig, ReplaySettings, ReportStatus, Scenario};
use glide_scroll::{BrowserEngine, ResolvedAxis};

fn bundled(name: &str) -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name);
    Scenario::from_path(&path).unwrap()
}

#[test]
fn test_bundled_scenarios_pass() {
    for name in ["gallery_wheel.json", "drag_momentum.json", "responsive_axis.json"] {
        let report = run_scenario(&bundled(name), ReplaySettings::default()).unwrap();
        assert_eq!(
            report.status,
            ReportStatus::Passed,
            "{name}: {:?}",
            report.message
        );
    }
}

#[test]
fn test_responsive_report_ends_vertical() {
    let report = run_scenario(&bundled("responsive_axis.json"), ReplaySettings::default()).unwrap();
    assert_eq!(report.final_state.axis, Some(ResolvedAxis::Vertical));
    assert_eq!(report.final_state.scroll_left, 200.0);
    assert_eq!(report.final_state.scroll_top, 150.0);
}

#[test]
fn test_failed_assertion_reports_step() {
    let report = run_scenario_json(
        r#"{
            "container": { "scroll_width": 2000, "client_width": 1000 },
            "steps": [
                { "type": "wheel", "delta_y": 300 },
                { "type": "settle" },
                { "type": "assert_offset", "value": 250 }
            ]
        }"#,
        ReplaySettings::default(),
    )
    .unwrap();

    assert!(report.is_failed());
    assert_eq!(report.failed_step_index, Some(2));
    assert_eq!(report.assertion.as_deref(), Some("assert_offset"));
    assert_eq!(report.final_state.scroll_left, 300.0);
}

#[test]
fn test_zero_extent_container_ignores_input() {
    let report = run_scenario_json(
        r#"{
            "container": { "scroll_width": 800, "client_width": 1000 },
            "steps": [
                { "type": "wheel", "delta_y": 300 },
                { "type": "pointer_down", "x": 500, "time_ms": 0 },
                { "type": "pointer_move", "x": 100, "time_ms": 16 },
                { "type": "assert_phase", "phase": "idle" },
                { "type": "settle" },
                { "type": "assert_offset", "value": 0, "tolerance": 0 }
            ]
        }"#,
        ReplaySettings::default(),
    )
    .unwrap();

    assert_eq!(report.status, ReportStatus::Passed);
    assert_eq!(report.final_state.offset_writes, 0);
}

#[test]
fn test_config_engine_scales_wheel() {
    let config = GlideConfig::from_toml("[scroll]\nsensitivity = 0.5").unwrap();
    let settings = ReplaySettings::from_config(&config, BrowserEngine::Firefox);

    let report = run_scenario_json(
        r#"{
            "container": { "scroll_width": 2000, "client_width": 1000 },
            "steps": [
                { "type": "wheel", "delta_y": 3, "delta_mode": "line" },
                { "type": "settle" },
                { "type": "assert_offset", "value": 60, "tolerance": 0 }
            ]
        }"#,
        settings,
    )
    .unwrap();
    assert_eq!(report.status, ReportStatus::Passed, "{:?}", report.message);
}
