//! Typed transition tables
//!
//! A gesture phase only moves along the edges it was built with. Signals with
//! no edge out of the current phase are dropped, so a stray `move` before a
//! `down` cannot corrupt the gesture.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// One edge of the table: `from --event--> to`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S, E> {
    pub from: S,
    pub event: E,
    pub to: S,
}

impl<S, E> Transition<S, E> {
    pub fn new(from: S, event: E, to: S) -> Self {
        Self { from, event, to }
    }
}

/// Phase tracker over a fixed transition table
#[derive(Debug, Clone)]
pub struct StateMachine<S, E> {
    initial_state: S,
    current_state: S,
    table: FxHashMap<(S, E), S>,
}

impl<S, E> StateMachine<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Build a machine starting in `initial_state`
    ///
    /// A later transition for the same `(from, event)` pair replaces an
    /// earlier one.
    pub fn new(initial_state: S, transitions: impl IntoIterator<Item = Transition<S, E>>) -> Self {
        let table = transitions
            .into_iter()
            .map(|t| ((t.from, t.event), t.to))
            .collect();
        Self {
            initial_state,
            current_state: initial_state,
            table,
        }
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    /// Send an event, returning the state after it was processed
    pub fn send(&mut self, event: E) -> S {
        let current = self.current_state;
        match self.table.get(&(current, event)) {
            Some(&to) => {
                self.current_state = to;
                tracing::trace!("fsm: {:?} --{:?}--> {:?}", current, event, to);
                to
            }
            None => {
                tracing::trace!("fsm: {:?} ignored in {:?}", event, current);
                current
            }
        }
    }

    /// Jump back to the initial state
    ///
    /// Used when the owner is torn down mid-gesture.
    pub fn reset(&mut self) {
        self.current_state = self.initial_state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Phase {
        Idle,
        Pending,
        Active,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Signal {
        Press,
        Threshold,
        Release,
    }

    fn gesture_machine() -> StateMachine<Phase, Signal> {
        StateMachine::new(
            Phase::Idle,
            [
                Transition::new(Phase::Idle, Signal::Press, Phase::Pending),
                Transition::new(Phase::Pending, Signal::Threshold, Phase::Active),
                Transition::new(Phase::Pending, Signal::Release, Phase::Idle),
                Transition::new(Phase::Active, Signal::Release, Phase::Idle),
            ],
        )
    }

    #[test]
    fn test_press_drag_release() {
        let mut fsm = gesture_machine();
        assert_eq!(fsm.current_state(), Phase::Idle);

        assert_eq!(fsm.send(Signal::Press), Phase::Pending);
        assert_eq!(fsm.send(Signal::Threshold), Phase::Active);
        assert_eq!(fsm.send(Signal::Release), Phase::Idle);
    }

    #[test]
    fn test_signal_without_edge_is_dropped() {
        let mut fsm = gesture_machine();

        assert_eq!(fsm.send(Signal::Threshold), Phase::Idle);
        assert_eq!(fsm.send(Signal::Release), Phase::Idle);

        // Active never re-enters Pending
        fsm.send(Signal::Press);
        fsm.send(Signal::Threshold);
        assert_eq!(fsm.send(Signal::Press), Phase::Active);
    }

    #[test]
    fn test_reset_from_any_phase() {
        let mut fsm = gesture_machine();
        fsm.send(Signal::Press);
        fsm.send(Signal::Threshold);

        fsm.reset();
        assert_eq!(fsm.current_state(), Phase::Idle);
        assert_eq!(fsm.send(Signal::Press), Phase::Pending);
    }

    #[test]
    fn test_later_edge_replaces_earlier() {
        let mut fsm = StateMachine::new(
            Phase::Idle,
            [
                Transition::new(Phase::Idle, Signal::Press, Phase::Pending),
                Transition::new(Phase::Idle, Signal::Press, Phase::Active),
            ],
        );
        assert_eq!(fsm.send(Signal::Press), Phase::Active);
    }
}
