//! Inertial scroll controller
//!
//! Owns one scrollable surface and turns three input modalities into a single
//! scroll offset:
//!
//! - **Wheel / touchpad**: deltas are normalized per browser engine and set a
//!   target; an ease loop closes a fixed fraction of the gap every frame and
//!   snaps once within half a pixel.
//! - **Pointer drag**: a press becomes a drag after 5px of travel, then tracks
//!   the pointer 1:1. Release hands the measured velocity to a momentum loop
//!   that decays it by a constant friction factor per frame.
//! - **Programmatic**: [`ScrollController::scroll_to`] feeds the ease loop.
//!
//! At most one frame loop (ease or momentum) is live at a time; starting one
//! cancels the other. Offsets are clamped to `[0, max]` before every write.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use glide_animation::FrameScheduler;
//! use glide_core::{DeltaMode, WheelInput};
//! use glide_scroll::{BrowserEngine, ScrollController, ScrollOptions, SimulatedSurface};
//!
//! let scheduler = Arc::new(Mutex::new(FrameScheduler::new()));
//! let surface = SimulatedSurface::horizontal(2000.0, 1000.0);
//!
//! let mut controller = ScrollController::attach(surface, ScrollOptions::horizontal())
//!     .unwrap()
//!     .with_scheduler(&scheduler)
//!     .with_engine(BrowserEngine::Chrome);
//!
//! controller.on_wheel(WheelInput {
//!     delta_x: 0.0,
//!     delta_y: 300.0,
//!     delta_mode: DeltaMode::Pixel,
//! });
//!
//! let mut now = 0.0;
//! loop {
//!     let tick = scheduler.lock().unwrap().begin_frame(now);
//!     if !controller.on_animation_frame(&tick) {
//!         break;
//!     }
//!     now += 16.0;
//! }
//! assert_eq!(controller.snapshot().current_offset, 300.0);
//! ```

use std::sync::{Arc, Mutex, PoisonError, Weak};

use glide_animation::{FrameHandle, FrameScheduler, FrameTick};
use glide_core::events::{event_types, Event};
use glide_core::fsm::{StateMachine, Transition};
use glide_core::{PointerId, PointerInput, WheelInput};

use crate::axis::{ResolvedAxis, SharedViewport, ViewportClassifier};
use crate::config::ScrollOptions;
use crate::engine::{BrowserEngine, WheelNormalizer};
use crate::error::Result;
use crate::surface::{Cursor, ListenerKind, ListenerOptions, ScrollSurface};

// ============================================================================
// Gesture and loop state
// ============================================================================

/// Drag gesture phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragPhase {
    /// No pointer down
    #[default]
    Idle,
    /// Pointer down, still under the movement threshold
    Pending,
    /// Threshold exceeded, content tracks the pointer
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DragSignal {
    Press,
    ThresholdExceeded,
    Release,
}

fn drag_machine() -> StateMachine<DragPhase, DragSignal> {
    StateMachine::new(
        DragPhase::Idle,
        vec![
            Transition::new(DragPhase::Idle, DragSignal::Press, DragPhase::Pending),
            Transition::new(
                DragPhase::Pending,
                DragSignal::ThresholdExceeded,
                DragPhase::Active,
            ),
            Transition::new(DragPhase::Pending, DragSignal::Release, DragPhase::Idle),
            Transition::new(DragPhase::Active, DragSignal::Release, DragPhase::Idle),
        ],
    )
}

/// Per-frame loop currently driving the offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    /// Interpolating toward a wheel or programmatic target
    Ease,
    /// Coasting on release velocity
    Momentum,
}

/// Whether a handler took over an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intercept {
    /// Leave the event to the platform (native or outer scrolling)
    PassThrough,
    /// The controller handled it; the host must call `preventDefault`
    PreventDefault,
}

impl Intercept {
    pub fn is_prevented(self) -> bool {
        self == Intercept::PreventDefault
    }
}

#[derive(Debug, Clone, Copy)]
struct LiveLoop {
    kind: LoopKind,
    handle: FrameHandle,
}

/// Anchors of the gesture in progress
struct DragTracker {
    phase: StateMachine<DragPhase, DragSignal>,
    pointer_id: PointerId,
    press_x: f64,
    press_y: f64,
    /// Pointer position along the axis the offset is measured from
    start_pos: f64,
    start_offset: f64,
    last_pos: f64,
    last_time_ms: f64,
}

impl DragTracker {
    fn new() -> Self {
        Self {
            phase: drag_machine(),
            pointer_id: PointerId::default(),
            press_x: 0.0,
            press_y: 0.0,
            start_pos: 0.0,
            start_offset: 0.0,
            last_pos: 0.0,
            last_time_ms: 0.0,
        }
    }

    fn phase(&self) -> DragPhase {
        self.phase.current_state()
    }

    fn press(&mut self, input: &PointerInput, axis: ResolvedAxis, offset: f64, time_ms: f64) {
        self.phase.send(DragSignal::Press);
        self.pointer_id = input.pointer_id;
        self.press_x = input.x;
        self.press_y = input.y;
        self.start_pos = axis.along(input.x, input.y);
        self.start_offset = offset;
        self.last_pos = self.start_pos;
        self.last_time_ms = time_ms;
    }

    fn owns(&self, input: &PointerInput) -> bool {
        self.phase() != DragPhase::Idle && self.pointer_id == input.pointer_id
    }
}

/// Read-only view of a controller's kinematic state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSnapshot {
    pub attached: bool,
    pub axis: Option<ResolvedAxis>,
    pub current_offset: f64,
    pub target_offset: f64,
    pub max_offset: f64,
    /// Drag or momentum velocity in px/ms (pointer direction)
    pub velocity: f64,
    pub drag_phase: DragPhase,
    pub active_loop: Option<LoopKind>,
}

// ============================================================================
// Controller
// ============================================================================

/// Inertial scroll controller bound to one surface
pub struct ScrollController<S: ScrollSurface> {
    options: ScrollOptions,
    surface: Option<S>,
    scheduler: Weak<Mutex<FrameScheduler>>,
    viewport: Box<dyn ViewportClassifier + Send>,
    normalizer: WheelNormalizer,
    axis: Option<ResolvedAxis>,
    current_offset: f64,
    target_offset: f64,
    velocity: f64,
    drag: DragTracker,
    live: Option<LiveLoop>,
}

impl<S: ScrollSurface> ScrollController<S> {
    /// Bind a controller to `surface`
    ///
    /// Registers non-passive listeners for every input the controller may
    /// need to `preventDefault`. Until a scheduler is supplied with
    /// [`with_scheduler`](Self::with_scheduler) eased scrolls jump straight
    /// to their target and releases carry no momentum.
    pub fn attach(mut surface: S, options: ScrollOptions) -> Result<Self> {
        options.validate()?;

        for kind in ListenerKind::ALL {
            surface.add_listener(kind, ListenerOptions::ACTIVE);
        }
        surface.set_cursor(Cursor::Grab);

        let mut controller = Self {
            options,
            surface: Some(surface),
            scheduler: Weak::new(),
            viewport: Box::new(SharedViewport::desktop()),
            normalizer: WheelNormalizer::detected(),
            axis: None,
            current_offset: 0.0,
            target_offset: 0.0,
            velocity: 0.0,
            drag: DragTracker::new(),
            live: None,
        };
        controller.refresh_axis();

        tracing::debug!(
            "scroll controller attached: axis={:?} resolved={:?} smoothing={} sensitivity={} engine={}",
            options.axis,
            controller.axis,
            options.smoothing,
            options.sensitivity,
            controller.normalizer.engine().name()
        );
        Ok(controller)
    }

    /// Use `scheduler` for ease and momentum frames
    pub fn with_scheduler(mut self, scheduler: &Arc<Mutex<FrameScheduler>>) -> Self {
        self.set_scheduler(scheduler);
        self
    }

    /// Resolve responsive axes against `viewport` instead of a fixed desktop width
    pub fn with_viewport(mut self, viewport: impl ViewportClassifier + Send + 'static) -> Self {
        self.viewport = Box::new(viewport);
        self.refresh_axis();
        self
    }

    /// Normalize wheel deltas for `engine` instead of the detected one
    pub fn with_engine(mut self, engine: BrowserEngine) -> Self {
        self.normalizer = WheelNormalizer::new(engine);
        self
    }

    pub fn set_scheduler(&mut self, scheduler: &Arc<Mutex<FrameScheduler>>) {
        self.cancel_loop();
        self.scheduler = Arc::downgrade(scheduler);
    }

    /// Unbind from the surface, handing it back
    ///
    /// Removes every listener, cancels the live frame, releases pointer
    /// capture and forgets all kinematic state. Returns `None` when already
    /// detached, so repeated calls are harmless.
    pub fn detach(&mut self) -> Option<S> {
        self.surface.as_ref()?;
        self.reset_motion();

        let mut surface = self.surface.take()?;
        for kind in ListenerKind::ALL {
            surface.remove_listener(kind);
        }
        surface.set_cursor(Cursor::Default);

        self.axis = None;
        self.current_offset = 0.0;
        self.target_offset = 0.0;
        tracing::debug!("scroll controller detached");
        Some(surface)
    }

    /// Bind to a new surface, returning the previous one if any
    pub fn reattach(&mut self, mut surface: S) -> Option<S> {
        let previous = self.detach();
        for kind in ListenerKind::ALL {
            surface.add_listener(kind, ListenerOptions::ACTIVE);
        }
        surface.set_cursor(Cursor::Grab);
        self.surface = Some(surface);
        self.refresh_axis();
        previous
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// The bound surface, for observation
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Mutable access for layout changes; follow with [`on_resize`](Self::on_resize)
    ///
    /// Writing the scroll offset through this reference bypasses the
    /// controller and is not supported.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn snapshot(&self) -> ScrollSnapshot {
        let max_offset = match (self.surface.as_ref(), self.axis) {
            (Some(surface), Some(axis)) => surface.metrics().max_offset(axis),
            _ => 0.0,
        };
        ScrollSnapshot {
            attached: self.is_attached(),
            axis: self.axis,
            current_offset: self.current_offset,
            target_offset: self.target_offset,
            max_offset,
            velocity: self.velocity,
            drag_phase: self.drag.phase(),
            active_loop: self.live.map(|live| live.kind),
        }
    }

    // ========================================================================
    // Event dispatch
    // ========================================================================

    /// Route a generic event to its typed handler and apply `preventDefault`
    pub fn handle_event(&mut self, event: &mut Event) -> Result<Intercept> {
        let time = event.timestamp_ms;
        let intercept = match event.event_type {
            event_types::WHEEL => self.on_wheel(event.wheel_input()?),
            event_types::POINTER_DOWN => self.on_pointer_down(event.pointer_input()?, time),
            event_types::POINTER_MOVE => self.on_pointer_move(event.pointer_input()?, time),
            event_types::POINTER_UP => self.on_pointer_up(event.pointer_input()?),
            event_types::POINTER_CANCEL => self.on_pointer_cancel(event.pointer_input()?),
            event_types::POINTER_LEAVE => self.on_pointer_leave(event.pointer_input()?),
            event_types::DRAG_START => self.on_drag_start(),
            event_types::RESIZE => {
                self.on_resize();
                Intercept::PassThrough
            }
            other => return Err(glide_core::Error::UnknownEventType(other).into()),
        };
        if intercept.is_prevented() {
            event.prevent_default();
        }
        Ok(intercept)
    }

    // ========================================================================
    // Wheel
    // ========================================================================

    /// Handle a wheel event
    pub fn on_wheel(&mut self, input: WheelInput) -> Intercept {
        let Some(axis) = self.refresh_axis() else {
            return Intercept::PassThrough;
        };
        let Some(metrics) = self.surface.as_ref().map(|s| s.metrics()) else {
            return Intercept::PassThrough;
        };
        let max = metrics.max_offset(axis);
        if max <= 0.0 {
            return Intercept::PassThrough;
        }
        if self.drag.phase() == DragPhase::Active {
            // The pointer owns the offset until release
            return Intercept::PreventDefault;
        }

        let delta = match axis {
            ResolvedAxis::Horizontal => {
                if input.is_touchpad_horizontal() && input.delta_x.abs() > input.delta_y.abs() {
                    tracing::trace!("native horizontal swipe, not intercepted");
                    return Intercept::PassThrough;
                }
                input.dominant_delta()
            }
            ResolvedAxis::Vertical => input.delta_y,
        };
        if delta == 0.0 || !delta.is_finite() {
            return Intercept::PassThrough;
        }

        let position = metrics.offset(axis).clamp(0.0, max);
        if axis == ResolvedAxis::Vertical {
            let exhausted = (delta < 0.0 && position <= 0.0) || (delta > 0.0 && position >= max);
            if exhausted {
                tracing::trace!("container exhausted at {:.1}, wheel falls through", position);
                return Intercept::PassThrough;
            }
        }

        let normalized = self.normalizer.normalize(delta) * self.options.sensitivity;
        self.current_offset = position;
        self.target_offset = (position + normalized).clamp(0.0, max);
        self.velocity = 0.0;

        tracing::trace!(
            "wheel delta={:.1} ({:?}) normalized={:.1} target: {:.1} -> {:.1}, max={:.0}",
            delta,
            input.delta_mode,
            normalized,
            position,
            self.target_offset,
            max
        );

        self.ensure_ease();
        Intercept::PreventDefault
    }

    // ========================================================================
    // Pointer drag
    // ========================================================================

    /// Handle a pointer press
    pub fn on_pointer_down(&mut self, input: PointerInput, timestamp_ms: f64) -> Intercept {
        let Some(axis) = self.refresh_axis() else {
            return Intercept::PassThrough;
        };
        if input.drag_excluded {
            tracing::trace!("press inside drag-excluded element ignored");
            return Intercept::PassThrough;
        }
        if !input.x.is_finite() || !input.y.is_finite() {
            return Intercept::PassThrough;
        }
        if self.drag.phase() != DragPhase::Idle {
            // Second pointer while one is already down
            return Intercept::PassThrough;
        }
        let Some(metrics) = self.surface.as_ref().map(|s| s.metrics()) else {
            return Intercept::PassThrough;
        };
        let max = metrics.max_offset(axis);
        if max <= 0.0 {
            return Intercept::PassThrough;
        }

        self.cancel_loop();
        let offset = metrics.offset(axis).clamp(0.0, max);
        self.current_offset = offset;
        self.target_offset = offset;
        self.velocity = 0.0;
        self.drag.press(&input, axis, offset, timestamp_ms);

        tracing::debug!(
            "drag pending: pointer={:?} at ({:.1}, {:.1}) offset={:.1}",
            input.pointer_id,
            input.x,
            input.y,
            offset
        );
        Intercept::PassThrough
    }

    /// Handle pointer movement
    pub fn on_pointer_move(&mut self, input: PointerInput, timestamp_ms: f64) -> Intercept {
        if !self.drag.owns(&input) || !input.x.is_finite() || !input.y.is_finite() {
            return Intercept::PassThrough;
        }
        // An axis flip resets the gesture
        let Some(axis) = self.refresh_axis() else {
            return Intercept::PassThrough;
        };
        if !self.drag.owns(&input) {
            return Intercept::PassThrough;
        }

        let activating = self.drag.phase() == DragPhase::Pending;
        let travelled = input.distance_to(self.drag.press_x, self.drag.press_y);
        if activating {
            if travelled <= self.options.physics.drag_threshold {
                return Intercept::PassThrough;
            }
            // A wheel ease may have started while the press was pending
            self.cancel_loop();
        }

        let Some(surface) = self.surface.as_mut() else {
            return Intercept::PassThrough;
        };
        let pos = axis.along(input.x, input.y);

        if activating {
            let metrics = surface.metrics();
            self.current_offset = metrics.offset(axis).clamp(0.0, metrics.max_offset(axis));
            self.drag.phase.send(DragSignal::ThresholdExceeded);
            surface.set_pointer_capture(input.pointer_id);
            surface.set_cursor(Cursor::Grabbing);
            // Re-anchor so the threshold distance does not show up as a jump
            self.drag.start_pos = pos;
            self.drag.start_offset = self.current_offset;
            tracing::debug!(
                "drag active after {:.1}px, anchored at {:.1}",
                travelled,
                self.current_offset
            );
        }

        let elapsed = timestamp_ms - self.drag.last_time_ms;
        if elapsed > 0.0 {
            self.velocity = (pos - self.drag.last_pos) / elapsed;
        }
        self.drag.last_pos = pos;
        self.drag.last_time_ms = timestamp_ms;

        let max = surface.metrics().max_offset(axis);
        let offset = (self.drag.start_offset - (pos - self.drag.start_pos)).clamp(0.0, max);
        self.current_offset = offset;
        self.target_offset = offset;
        surface.set_scroll_offset(axis, offset);

        tracing::trace!(
            "drag pos={:.1} offset={:.1} velocity={:.3}px/ms",
            pos,
            offset,
            self.velocity
        );
        Intercept::PreventDefault
    }

    /// Handle pointer release
    pub fn on_pointer_up(&mut self, input: PointerInput) -> Intercept {
        self.end_drag(input, "up")
    }

    /// Handle the platform cancelling the pointer stream
    pub fn on_pointer_cancel(&mut self, input: PointerInput) -> Intercept {
        self.end_drag(input, "cancel")
    }

    /// Handle the pointer leaving the surface
    pub fn on_pointer_leave(&mut self, input: PointerInput) -> Intercept {
        self.end_drag(input, "leave")
    }

    /// Native drag-and-drop of images and links is always suppressed
    pub fn on_drag_start(&mut self) -> Intercept {
        if self.is_attached() {
            Intercept::PreventDefault
        } else {
            Intercept::PassThrough
        }
    }

    fn end_drag(&mut self, input: PointerInput, reason: &str) -> Intercept {
        if !self.drag.owns(&input) {
            return Intercept::PassThrough;
        }
        let Some(surface) = self.surface.as_mut() else {
            return Intercept::PassThrough;
        };

        let was_active = self.drag.phase() == DragPhase::Active;
        if surface.has_pointer_capture(input.pointer_id) {
            surface.release_pointer_capture(input.pointer_id);
        }
        self.drag.phase.send(DragSignal::Release);

        if !was_active {
            // Never crossed the threshold: a click
            self.velocity = 0.0;
            tracing::trace!("pointer {} before threshold, treated as click", reason);
            return Intercept::PassThrough;
        }

        surface.set_cursor(Cursor::Grab);
        let velocity = self.velocity;
        tracing::debug!("drag released ({}) with velocity {:.3}px/ms", reason, velocity);

        if velocity.abs() > self.options.physics.momentum_start_velocity {
            if !self.start_loop(LoopKind::Momentum) {
                self.velocity = 0.0;
            }
        } else {
            self.velocity = 0.0;
        }
        // Suppress the click that would otherwise follow a drag
        Intercept::PreventDefault
    }

    // ========================================================================
    // Programmatic scrolling
    // ========================================================================

    /// Ease to an absolute offset; returns false when nothing can scroll
    pub fn scroll_to(&mut self, offset: f64) -> bool {
        let Some(axis) = self.refresh_axis() else {
            return false;
        };
        if self.drag.phase() != DragPhase::Idle {
            tracing::debug!("scroll_to({:.1}) ignored during drag", offset);
            return false;
        }
        let Some(metrics) = self.surface.as_ref().map(|s| s.metrics()) else {
            return false;
        };
        let max = metrics.max_offset(axis);
        if max <= 0.0 {
            return false;
        }

        self.current_offset = metrics.offset(axis).clamp(0.0, max);
        self.target_offset = offset.clamp(0.0, max);
        self.velocity = 0.0;
        self.ensure_ease();
        true
    }

    /// Ease by a relative amount from the current target
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        if self.refresh_axis().is_none() {
            return false;
        }
        let base = if self.live.is_some() {
            self.target_offset
        } else {
            self.current_offset
        };
        self.scroll_to(base + delta)
    }

    /// Move to an offset immediately, without animation
    pub fn jump_to(&mut self, offset: f64) -> bool {
        let Some(axis) = self.refresh_axis() else {
            return false;
        };
        if self.drag.phase() != DragPhase::Idle {
            return false;
        }
        self.cancel_loop();
        self.velocity = 0.0;

        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let max = surface.metrics().max_offset(axis);
        let offset = offset.clamp(0.0, max);
        self.current_offset = offset;
        self.target_offset = offset;
        surface.set_scroll_offset(axis, offset);
        true
    }

    /// Re-clamp after the surface or viewport changed size
    pub fn on_resize(&mut self) {
        let previous = self.axis;
        let Some(axis) = self.refresh_axis() else {
            return;
        };
        if previous != Some(axis) {
            // refresh_axis already re-read the surface
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let max = surface.metrics().max_offset(axis);
        let clamped = self.current_offset.clamp(0.0, max);
        self.target_offset = self.target_offset.clamp(0.0, max);
        if clamped != self.current_offset {
            tracing::debug!(
                "resize clamped offset {:.1} -> {:.1}",
                self.current_offset,
                clamped
            );
            self.current_offset = clamped;
            surface.set_scroll_offset(axis, clamped);
        }
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Advance the live loop if its frame fired in `tick`
    ///
    /// Returns true while a loop is still scheduled.
    pub fn on_animation_frame(&mut self, tick: &FrameTick) -> bool {
        let Some(live) = self.live else {
            return false;
        };
        if !tick.fired(live.handle) {
            return true;
        }

        let running = match live.kind {
            LoopKind::Ease => self.step_ease(),
            LoopKind::Momentum => self.step_momentum(),
        };

        if !running {
            self.live = None;
            tracing::debug!(
                "{:?} loop settled at {:.1} (frame {})",
                live.kind,
                self.current_offset,
                tick.index
            );
            return false;
        }

        match self.with_frames(|scheduler| scheduler.request_frame()) {
            Some(handle) => {
                self.live = Some(LiveLoop {
                    kind: live.kind,
                    handle,
                });
                true
            }
            None => {
                self.live = None;
                self.finish_unscheduled(live.kind);
                false
            }
        }
    }

    /// One ease step; false once snapped onto the target
    fn step_ease(&mut self) -> bool {
        let Some(axis) = self.axis else {
            return false;
        };
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };

        let max = surface.metrics().max_offset(axis);
        self.target_offset = self.target_offset.clamp(0.0, max);
        self.current_offset += (self.target_offset - self.current_offset) * self.options.smoothing;
        self.current_offset = self.current_offset.clamp(0.0, max);

        let settled =
            (self.target_offset - self.current_offset).abs() < self.options.physics.snap_distance;
        if settled {
            self.current_offset = self.target_offset;
        }
        surface.set_scroll_offset(axis, self.current_offset);

        tracing::trace!(
            "ease current={:.2} target={:.2}",
            self.current_offset,
            self.target_offset
        );
        !settled
    }

    /// One momentum step; false once the velocity has decayed or hit an edge
    fn step_momentum(&mut self) -> bool {
        let Some(axis) = self.axis else {
            return false;
        };
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let physics = self.options.physics;

        self.velocity *= physics.friction;
        let max = surface.metrics().max_offset(axis);
        let step = -self.velocity * physics.frame_ms;
        let next = (self.current_offset + step).clamp(0.0, max);
        let pinned = (step < 0.0 && next <= 0.0) || (step > 0.0 && next >= max);

        self.current_offset = next;
        self.target_offset = next;
        surface.set_scroll_offset(axis, next);

        tracing::trace!(
            "momentum offset={:.2} velocity={:.4}",
            next,
            self.velocity
        );

        if self.velocity.abs() < physics.momentum_stop_velocity || pinned {
            self.velocity = 0.0;
            return false;
        }
        true
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn with_frames<R>(&self, f: impl FnOnce(&mut FrameScheduler) -> R) -> Option<R> {
        let scheduler = self.scheduler.upgrade()?;
        let mut guard = scheduler.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut guard))
    }

    /// Make `kind` the single live loop; false if no scheduler is available
    fn start_loop(&mut self, kind: LoopKind) -> bool {
        if let Some(live) = self.live {
            if live.kind == kind {
                return true;
            }
        }
        self.cancel_loop();

        match self.with_frames(|scheduler| scheduler.request_frame()) {
            Some(handle) => {
                self.live = Some(LiveLoop { kind, handle });
                tracing::debug!("{:?} loop started", kind);
                true
            }
            None => false,
        }
    }

    fn cancel_loop(&mut self) {
        let Some(live) = self.live.take() else {
            return;
        };
        self.with_frames(|scheduler| scheduler.cancel_frame(live.handle));
        if live.kind == LoopKind::Momentum {
            self.velocity = 0.0;
        }
        tracing::debug!("{:?} loop cancelled", live.kind);
    }

    fn ensure_ease(&mut self) {
        if !self.start_loop(LoopKind::Ease) {
            self.finish_unscheduled(LoopKind::Ease);
        }
    }

    /// Without frames an ease completes instantly and momentum is dropped
    fn finish_unscheduled(&mut self, kind: LoopKind) {
        match kind {
            LoopKind::Ease => {
                self.current_offset = self.target_offset;
                if let (Some(surface), Some(axis)) = (self.surface.as_mut(), self.axis) {
                    surface.set_scroll_offset(axis, self.current_offset);
                }
            }
            LoopKind::Momentum => self.velocity = 0.0,
        }
    }

    /// Stop every loop and gesture, releasing pointer capture
    fn reset_motion(&mut self) {
        self.cancel_loop();
        if self.drag.phase() != DragPhase::Idle {
            if let Some(surface) = self.surface.as_mut() {
                let pointer_id = self.drag.pointer_id;
                if surface.has_pointer_capture(pointer_id) {
                    surface.release_pointer_capture(pointer_id);
                }
                surface.set_cursor(Cursor::Grab);
            }
        }
        self.drag.phase.reset();
        self.velocity = 0.0;
    }

    /// Resolve the axis for an incoming input, resetting state if it flipped
    fn refresh_axis(&mut self) -> Option<ResolvedAxis> {
        let axis = self.viewport.resolve(self.options.axis);
        let metrics = self.surface.as_ref()?.metrics();
        if self.axis == Some(axis) {
            return Some(axis);
        }

        if let Some(previous) = self.axis {
            tracing::debug!("axis changed {:?} -> {:?}, resetting", previous, axis);
        }
        self.reset_motion();
        self.axis = Some(axis);
        let max = metrics.max_offset(axis);
        self.current_offset = metrics.offset(axis).clamp(0.0, max);
        self.target_offset = self.current_offset;
        Some(axis)
    }
}

impl<S: ScrollSurface> Drop for ScrollController<S> {
    fn drop(&mut self) {
        self.cancel_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedSurface;
    use glide_core::DeltaMode;

    fn scheduler() -> Arc<Mutex<FrameScheduler>> {
        Arc::new(Mutex::new(FrameScheduler::new()))
    }

    fn gallery(scheduler: &Arc<Mutex<FrameScheduler>>) -> ScrollController<SimulatedSurface> {
        ScrollController::attach(
            SimulatedSurface::horizontal(2000.0, 1000.0),
            ScrollOptions::horizontal(),
        )
        .unwrap()
        .with_scheduler(scheduler)
        .with_engine(BrowserEngine::Chrome)
    }

    fn wheel_y(delta_y: f64) -> WheelInput {
        WheelInput {
            delta_x: 0.0,
            delta_y,
            delta_mode: DeltaMode::Pixel,
        }
    }

    fn pointer(x: f64) -> PointerInput {
        PointerInput::new(PointerId(1), x, 300.0)
    }

    fn run_frames(
        controller: &mut ScrollController<SimulatedSurface>,
        scheduler: &Arc<Mutex<FrameScheduler>>,
        limit: usize,
    ) -> usize {
        let mut frames = 0;
        while frames < limit {
            let now = scheduler.lock().unwrap().next_timestamp();
            let tick = scheduler.lock().unwrap().begin_frame(now);
            frames += 1;
            if !controller.on_animation_frame(&tick) {
                break;
            }
        }
        frames
    }

    #[test]
    fn test_attach_registers_active_listeners() {
        let scheduler = scheduler();
        let controller = gallery(&scheduler);
        let surface = controller.surface().unwrap();

        assert_eq!(surface.listener_count(), ListenerKind::ALL.len());
        for kind in ListenerKind::ALL {
            assert_eq!(surface.listener(kind), Some(ListenerOptions { passive: false }));
        }
        assert_eq!(surface.cursor(), Cursor::Grab);
    }

    #[test]
    fn test_detach_is_idempotent() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        controller.on_wheel(wheel_y(200.0));
        assert_eq!(scheduler.lock().unwrap().pending_count(), 1);

        let surface = controller.detach().unwrap();
        assert_eq!(surface.listener_count(), 0);
        assert_eq!(surface.cursor(), Cursor::Default);
        assert_eq!(scheduler.lock().unwrap().pending_count(), 0);

        assert!(controller.detach().is_none());
        assert!(!controller.is_attached());
        assert_eq!(controller.on_wheel(wheel_y(100.0)), Intercept::PassThrough);
    }

    #[test]
    fn test_wheel_eases_to_target() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        assert_eq!(controller.on_wheel(wheel_y(300.0)), Intercept::PreventDefault);
        assert_eq!(controller.snapshot().target_offset, 300.0);
        assert_eq!(controller.snapshot().active_loop, Some(LoopKind::Ease));

        run_frames(&mut controller, &scheduler, 200);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.current_offset, 300.0);
        assert_eq!(snapshot.active_loop, None);
        assert_eq!(
            controller.surface().unwrap().offset(ResolvedAxis::Horizontal),
            300.0
        );
    }

    #[test]
    fn test_repeated_wheel_keeps_single_request() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        for _ in 0..5 {
            controller.on_wheel(wheel_y(50.0));
        }
        assert_eq!(scheduler.lock().unwrap().pending_count(), 1);
    }

    #[test]
    fn test_touchpad_horizontal_swipe_not_intercepted() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        let swipe = WheelInput {
            delta_x: 30.0,
            delta_y: 4.0,
            delta_mode: DeltaMode::Pixel,
        };
        assert_eq!(controller.on_wheel(swipe), Intercept::PassThrough);
        assert_eq!(controller.snapshot().active_loop, None);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        for delta in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(controller.on_wheel(wheel_y(delta)), Intercept::PassThrough);
        }
        assert_eq!(controller.snapshot().active_loop, None);
        assert_eq!(controller.snapshot().target_offset, 0.0);

        assert_eq!(
            controller.on_pointer_down(pointer(f64::NAN), 0.0),
            Intercept::PassThrough
        );
        assert_eq!(controller.snapshot().drag_phase, DragPhase::Idle);

        controller.on_pointer_down(pointer(500.0), 0.0);
        assert_eq!(
            controller.on_pointer_move(pointer(f64::NEG_INFINITY), 16.0),
            Intercept::PassThrough
        );
        controller.on_pointer_move(pointer(490.0), 32.0);
        controller.on_pointer_move(pointer(400.0), 48.0);
        assert_eq!(controller.snapshot().drag_phase, DragPhase::Active);
        assert_eq!(controller.snapshot().current_offset, 90.0);

        let surface = controller.surface().unwrap();
        assert!(surface.offset(ResolvedAxis::Horizontal).is_finite());
        for write in surface.writes() {
            assert!(write.requested.is_finite());
        }
    }

    #[test]
    fn test_without_scheduler_wheel_jumps() {
        let mut controller = ScrollController::attach(
            SimulatedSurface::horizontal(2000.0, 1000.0),
            ScrollOptions::horizontal(),
        )
        .unwrap()
        .with_engine(BrowserEngine::Chrome);

        assert!(controller.on_wheel(wheel_y(120.0)).is_prevented());
        assert_eq!(controller.snapshot().current_offset, 120.0);
        assert_eq!(controller.snapshot().active_loop, None);
    }

    #[test]
    fn test_click_has_no_scroll_effect() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        controller.on_pointer_down(pointer(500.0), 0.0);
        assert_eq!(controller.snapshot().drag_phase, DragPhase::Pending);
        controller.on_pointer_move(pointer(503.0), 8.0);

        assert_eq!(controller.on_pointer_up(pointer(503.0)), Intercept::PassThrough);
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.drag_phase, DragPhase::Idle);
        assert_eq!(snapshot.current_offset, 0.0);
        assert!(controller.surface().unwrap().writes().is_empty());
    }

    #[test]
    fn test_drag_excluded_press_ignored() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        controller.on_pointer_down(pointer(500.0).excluded(), 0.0);
        assert_eq!(controller.snapshot().drag_phase, DragPhase::Idle);
    }

    #[test]
    fn test_drag_captures_and_releases_pointer() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        controller.on_pointer_down(pointer(500.0), 0.0);
        controller.on_pointer_move(pointer(490.0), 16.0);

        let surface = controller.surface().unwrap();
        assert_eq!(surface.captured_pointer(), Some(PointerId(1)));
        assert_eq!(surface.cursor(), Cursor::Grabbing);

        controller.on_pointer_cancel(pointer(490.0));
        let surface = controller.surface().unwrap();
        assert_eq!(surface.captured_pointer(), None);
        assert_eq!(surface.cursor(), Cursor::Grab);
        assert_eq!(controller.snapshot().drag_phase, DragPhase::Idle);
    }

    #[test]
    fn test_drag_activation_cancels_ease() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        controller.on_pointer_down(pointer(500.0), 0.0);
        controller.on_wheel(wheel_y(300.0));
        assert_eq!(controller.snapshot().active_loop, Some(LoopKind::Ease));

        controller.on_pointer_move(pointer(480.0), 16.0);
        assert_eq!(controller.snapshot().drag_phase, DragPhase::Active);
        assert_eq!(controller.snapshot().active_loop, None);
        assert_eq!(scheduler.lock().unwrap().pending_count(), 0);
    }

    #[test]
    fn test_other_pointer_ignored_during_drag() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        controller.on_pointer_down(pointer(500.0), 0.0);
        let intruder = PointerInput::new(PointerId(7), 100.0, 300.0);
        assert_eq!(controller.on_pointer_move(intruder, 16.0), Intercept::PassThrough);
        assert_eq!(controller.on_pointer_up(intruder), Intercept::PassThrough);
        assert_eq!(controller.snapshot().drag_phase, DragPhase::Pending);
    }

    #[test]
    fn test_drag_start_suppressed_while_attached() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        let mut event = Event::drag_start(0.0);
        controller.handle_event(&mut event).unwrap();
        assert!(event.is_default_prevented());

        controller.detach();
        assert_eq!(controller.on_drag_start(), Intercept::PassThrough);
    }

    #[test]
    fn test_handle_event_rejects_mismatched_payload() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        let mut event = Event::new(
            event_types::WHEEL,
            glide_core::EventData::None,
            0.0,
        );
        assert!(controller.handle_event(&mut event).is_err());
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_scroll_to_and_jump_to() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);

        assert!(controller.scroll_to(5000.0));
        assert_eq!(controller.snapshot().target_offset, 1000.0);
        run_frames(&mut controller, &scheduler, 500);
        assert_eq!(controller.snapshot().current_offset, 1000.0);

        assert!(controller.scroll_by(-250.0));
        assert_eq!(controller.snapshot().target_offset, 750.0);

        assert!(controller.jump_to(100.0));
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.current_offset, 100.0);
        assert_eq!(snapshot.active_loop, None);
        assert_eq!(scheduler.lock().unwrap().pending_count(), 0);
    }

    #[test]
    fn test_resize_clamps_offsets() {
        let scheduler = scheduler();
        let mut controller = gallery(&scheduler);
        controller.jump_to(900.0);

        controller
            .surface_mut()
            .unwrap()
            .resize(1500.0, 1000.0, 600.0, 600.0);
        controller.on_resize();

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.current_offset, 500.0);
        assert_eq!(snapshot.target_offset, 500.0);
        assert_eq!(snapshot.max_offset, 500.0);
    }

    #[test]
    fn test_invalid_options_rejected_at_attach() {
        let result = ScrollController::attach(
            SimulatedSurface::horizontal(2000.0, 1000.0),
            ScrollOptions::horizontal().with_smoothing(0.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let scheduler = scheduler();
        {
            let mut controller = gallery(&scheduler);
            controller.on_wheel(wheel_y(100.0));
            assert_eq!(scheduler.lock().unwrap().pending_count(), 1);
        }
        assert_eq!(scheduler.lock().unwrap().pending_count(), 0);
    }
}
