//! Host element contract
//!
//! A [`ScrollSurface`] is the one scrollable element a controller owns while
//! attached: it reports extents, accepts scroll-offset writes, and hosts the
//! native listeners. The controller is the only writer of the offset for as
//! long as it holds the surface.

use glide_core::events::{event_types, EventType};
use glide_core::PointerId;

use crate::axis::ResolvedAxis;

/// Extents and current offsets of a scrollable element, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

impl ScrollMetrics {
    /// Largest valid offset along `axis`; zero when the content fits
    pub fn max_offset(&self, axis: ResolvedAxis) -> f64 {
        let scrollable = match axis {
            ResolvedAxis::Horizontal => self.scroll_width - self.client_width,
            ResolvedAxis::Vertical => self.scroll_height - self.client_height,
        };
        if scrollable > 0.0 {
            scrollable
        } else {
            0.0
        }
    }

    /// Current offset along `axis`
    pub fn offset(&self, axis: ResolvedAxis) -> f64 {
        match axis {
            ResolvedAxis::Horizontal => self.scroll_left,
            ResolvedAxis::Vertical => self.scroll_top,
        }
    }
}

/// Native listeners a controller registers on its surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Wheel,
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    PointerLeave,
    DragStart,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 7] = [
        ListenerKind::Wheel,
        ListenerKind::PointerDown,
        ListenerKind::PointerMove,
        ListenerKind::PointerUp,
        ListenerKind::PointerCancel,
        ListenerKind::PointerLeave,
        ListenerKind::DragStart,
    ];

    /// Event type delivered to this listener
    pub fn event_type(self) -> EventType {
        match self {
            ListenerKind::Wheel => event_types::WHEEL,
            ListenerKind::PointerDown => event_types::POINTER_DOWN,
            ListenerKind::PointerMove => event_types::POINTER_MOVE,
            ListenerKind::PointerUp => event_types::POINTER_UP,
            ListenerKind::PointerCancel => event_types::POINTER_CANCEL,
            ListenerKind::PointerLeave => event_types::POINTER_LEAVE,
            ListenerKind::DragStart => event_types::DRAG_START,
        }
    }
}

/// Listener registration flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListenerOptions {
    /// Passive listeners cannot call `preventDefault`
    pub passive: bool,
}

impl ListenerOptions {
    /// Registration that keeps `preventDefault` available
    pub const ACTIVE: ListenerOptions = ListenerOptions { passive: false };
}

/// Cursor affordance shown over the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Content can be dragged
    Grab,
    /// Content is being dragged
    Grabbing,
}

/// The element a controller scrolls
pub trait ScrollSurface {
    fn metrics(&self) -> ScrollMetrics;

    /// Write the native scroll offset along `axis`
    fn set_scroll_offset(&mut self, axis: ResolvedAxis, offset: f64);

    fn add_listener(&mut self, kind: ListenerKind, options: ListenerOptions);

    fn remove_listener(&mut self, kind: ListenerKind);

    /// Route all further events of `pointer_id` to this surface
    fn set_pointer_capture(&mut self, pointer_id: PointerId);

    fn release_pointer_capture(&mut self, pointer_id: PointerId);

    fn has_pointer_capture(&self, pointer_id: PointerId) -> bool;

    fn set_cursor(&mut self, cursor: Cursor);
}
