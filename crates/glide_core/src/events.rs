//! Input event model
//!
//! Wheel, pointer and resize events in the shape a host element's native
//! listeners deliver them. Handlers that decide to take over an event mark it
//! with [`Event::prevent_default`]; the host forwards that decision to the
//! platform so the native scroll path stays available as a fallback.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Event type identifier
pub type EventType = u32;

/// Event types a scroll surface listens for
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_LEAVE: EventType = 5;
    /// Pointer stream interrupted by the platform (touch takeover, capture loss)
    pub const POINTER_CANCEL: EventType = 8;
    /// Native drag-and-drop start (images, links)
    pub const DRAG_START: EventType = 9;
    pub const WHEEL: EventType = 30;
    pub const RESIZE: EventType = 40;
}

/// Human readable name for an event type, used in logs and errors
pub fn event_name(event_type: EventType) -> &'static str {
    match event_type {
        event_types::POINTER_DOWN => "pointerdown",
        event_types::POINTER_UP => "pointerup",
        event_types::POINTER_MOVE => "pointermove",
        event_types::POINTER_LEAVE => "pointerleave",
        event_types::POINTER_CANCEL => "pointercancel",
        event_types::DRAG_START => "dragstart",
        event_types::WHEEL => "wheel",
        event_types::RESIZE => "resize",
        _ => "unknown",
    }
}

/// Unit of a wheel event's deltas
///
/// Mirrors the DOM `WheelEvent.deltaMode` codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaMode {
    /// Deltas are in CSS pixels (touchpads, most mice on Chromium/WebKit)
    #[default]
    Pixel,
    /// Deltas are in lines (Firefox with a notched wheel)
    Line,
    /// Deltas are in pages
    Page,
}

impl DeltaMode {
    /// Parse a DOM `deltaMode` code
    pub fn from_dom(code: u32) -> Result<Self> {
        match code {
            0 => Ok(DeltaMode::Pixel),
            1 => Ok(DeltaMode::Line),
            2 => Ok(DeltaMode::Page),
            other => Err(Error::UnknownDeltaMode(other)),
        }
    }

    /// The DOM `deltaMode` code
    pub fn dom_code(self) -> u32 {
        match self {
            DeltaMode::Pixel => 0,
            DeltaMode::Line => 1,
            DeltaMode::Page => 2,
        }
    }
}

/// Identifier of one pointer stream (mouse, pen, or a single touch)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerId(pub u32);

/// Wheel payload
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub delta_mode: DeltaMode,
}

impl WheelInput {
    /// Two-finger horizontal touchpad swipe: pixel deltas with a horizontal component
    pub fn is_touchpad_horizontal(&self) -> bool {
        self.delta_mode == DeltaMode::Pixel && self.delta_x.abs() > 0.0
    }

    /// Whichever of the two deltas has the larger magnitude (ties go to `delta_y`)
    pub fn dominant_delta(&self) -> f64 {
        if self.delta_x.abs() > self.delta_y.abs() {
            self.delta_x
        } else {
            self.delta_y
        }
    }
}

/// Pointer payload
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PointerInput {
    pub pointer_id: PointerId,
    /// Client x coordinate in CSS pixels
    pub x: f64,
    /// Client y coordinate in CSS pixels
    pub y: f64,
    pub button: u8,
    /// Press originated inside an element marked as excluded from drag-scroll
    pub drag_excluded: bool,
}

impl PointerInput {
    pub fn new(pointer_id: PointerId, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            x,
            y,
            button: 0,
            drag_excluded: false,
        }
    }

    /// Mark the pointer as originating inside a drag-excluded element
    pub fn excluded(mut self) -> Self {
        self.drag_excluded = true;
        self
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Wheel(WheelInput),
    Pointer(PointerInput),
    Resize { width: u32, height: u32 },
    None,
}

impl EventData {
    fn kind(&self) -> &'static str {
        match self {
            EventData::Wheel(_) => "wheel",
            EventData::Pointer(_) => "pointer",
            EventData::Resize { .. } => "resize",
            EventData::None => "empty",
        }
    }
}

/// An input event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
    /// High resolution timestamp in milliseconds
    pub timestamp_ms: f64,
    default_prevented: bool,
}

impl Event {
    pub fn new(event_type: EventType, data: EventData, timestamp_ms: f64) -> Self {
        Self {
            event_type,
            data,
            timestamp_ms,
            default_prevented: false,
        }
    }

    pub fn wheel(delta_x: f64, delta_y: f64, delta_mode: DeltaMode, timestamp_ms: f64) -> Self {
        Self::new(
            event_types::WHEEL,
            EventData::Wheel(WheelInput {
                delta_x,
                delta_y,
                delta_mode,
            }),
            timestamp_ms,
        )
    }

    pub fn pointer(event_type: EventType, input: PointerInput, timestamp_ms: f64) -> Self {
        Self::new(event_type, EventData::Pointer(input), timestamp_ms)
    }

    pub fn drag_start(timestamp_ms: f64) -> Self {
        Self::new(event_types::DRAG_START, EventData::None, timestamp_ms)
    }

    pub fn resize(width: u32, height: u32, timestamp_ms: f64) -> Self {
        Self::new(
            event_types::RESIZE,
            EventData::Resize { width, height },
            timestamp_ms,
        )
    }

    /// Suppress the platform's default action for this event
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn name(&self) -> &'static str {
        event_name(self.event_type)
    }

    /// Wheel payload, or an error if this event carries something else
    pub fn wheel_input(&self) -> Result<WheelInput> {
        match &self.data {
            EventData::Wheel(input) => Ok(*input),
            other => Err(self.mismatch("wheel", other)),
        }
    }

    /// Pointer payload, or an error if this event carries something else
    pub fn pointer_input(&self) -> Result<PointerInput> {
        match &self.data {
            EventData::Pointer(input) => Ok(*input),
            other => Err(self.mismatch("pointer", other)),
        }
    }

    fn mismatch(&self, expected: &'static str, found: &EventData) -> Error {
        Error::PayloadMismatch {
            event: self.name(),
            expected,
            found: found.kind(),
        }
    }
}
