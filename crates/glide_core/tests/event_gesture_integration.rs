//! Integration tests for the event model driving a gesture state machine
//!
//! These tests verify that:
//! - Raw pointer events can be mapped onto gesture signals
//! - The machine rejects out-of-order streams (move before down, double up)
//! - Payload mismatches surface as errors rather than silent defaults

use glide_core::events::{event_types, DeltaMode, Event, PointerId, PointerInput};
use glide_core::fsm::{StateMachine, Transition};
use glide_core::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Phase {
    Idle,
    Pressed,
    Dragging,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Signal {
    Down,
    Moved,
    Up,
}

fn machine() -> StateMachine<Phase, Signal> {
    StateMachine::new(
        Phase::Idle,
        vec![
            Transition::new(Phase::Idle, Signal::Down, Phase::Pressed),
            Transition::new(Phase::Pressed, Signal::Moved, Phase::Dragging),
            Transition::new(Phase::Pressed, Signal::Up, Phase::Idle),
            Transition::new(Phase::Dragging, Signal::Up, Phase::Idle),
        ],
    )
}

fn signal_for(event: &Event) -> Option<Signal> {
    match event.event_type {
        event_types::POINTER_DOWN => Some(Signal::Down),
        event_types::POINTER_MOVE => Some(Signal::Moved),
        event_types::POINTER_UP | event_types::POINTER_CANCEL | event_types::POINTER_LEAVE => {
            Some(Signal::Up)
        }
        _ => None,
    }
}

fn pointer(event_type: u32, x: f64, t: f64) -> Event {
    Event::pointer(event_type, PointerInput::new(PointerId(1), x, 0.0), t)
}

#[test]
fn test_pointer_stream_drives_machine() {
    let mut fsm = machine();
    let stream = [
        pointer(event_types::POINTER_DOWN, 100.0, 0.0),
        pointer(event_types::POINTER_MOVE, 120.0, 16.0),
        pointer(event_types::POINTER_MOVE, 140.0, 32.0),
        pointer(event_types::POINTER_UP, 140.0, 48.0),
    ];

    let mut phases = Vec::new();
    for event in &stream {
        if let Some(signal) = signal_for(event) {
            phases.push(fsm.send(signal));
        }
    }

    assert_eq!(
        phases,
        vec![Phase::Pressed, Phase::Dragging, Phase::Dragging, Phase::Idle]
    );
}

#[test]
fn test_out_of_order_stream_is_ignored() {
    let mut fsm = machine();

    fsm.send(Signal::Moved);
    fsm.send(Signal::Up);
    assert_eq!(fsm.current_state(), Phase::Idle);

    // A stray move did not arm the drag edge
    assert_eq!(fsm.send(Signal::Down), Phase::Pressed);
}

#[test]
fn test_cancel_and_leave_end_the_gesture() {
    for end in [event_types::POINTER_CANCEL, event_types::POINTER_LEAVE] {
        let mut fsm = machine();
        fsm.send(Signal::Down);
        fsm.send(Signal::Moved);

        let event = pointer(end, 0.0, 10.0);
        let signal = signal_for(&event).expect("end events map to Up");
        assert_eq!(fsm.send(signal), Phase::Idle);
    }
}

#[test]
fn test_payload_mismatch_reports_event_name() {
    let event = Event::wheel(0.0, 3.0, DeltaMode::Line, 0.0);
    let err = event.pointer_input().unwrap_err();
    assert_eq!(
        err,
        Error::PayloadMismatch {
            event: "wheel",
            expected: "pointer",
            found: "wheel",
        }
    );
    assert_eq!(
        err.to_string(),
        "event wheel carries a wheel payload, expected pointer"
    );
}
