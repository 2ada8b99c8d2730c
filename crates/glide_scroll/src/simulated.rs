//! In-memory scroll surface
//!
//! Behaves like a DOM element with `overflow: auto`: writes are clamped to the
//! scrollable range, listeners and pointer capture are tracked, and every
//! offset write is recorded so hosts and tests can observe what a controller
//! did frame by frame.

use rustc_hash::FxHashMap;

use glide_core::PointerId;

use crate::axis::ResolvedAxis;
use crate::surface::{Cursor, ListenerKind, ListenerOptions, ScrollMetrics, ScrollSurface};

/// One recorded `scrollLeft`/`scrollTop` assignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetWrite {
    pub axis: ResolvedAxis,
    /// Value the controller asked for
    pub requested: f64,
    /// Value after the element clamped it
    pub applied: f64,
}

/// A scrollable element simulated in memory
#[derive(Debug, Clone, Default)]
pub struct SimulatedSurface {
    metrics: ScrollMetrics,
    listeners: FxHashMap<ListenerKind, ListenerOptions>,
    captured: Option<PointerId>,
    cursor: Cursor,
    writes: Vec<OffsetWrite>,
}

impl SimulatedSurface {
    /// Element with the given content and viewport sizes, scrolled to the origin
    pub fn new(scroll_width: f64, client_width: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            metrics: ScrollMetrics {
                scroll_width,
                scroll_height,
                client_width,
                client_height,
                scroll_left: 0.0,
                scroll_top: 0.0,
            },
            ..Default::default()
        }
    }

    /// Horizontal strip: content wider than the viewport, no vertical overflow
    pub fn horizontal(scroll_width: f64, client_width: f64) -> Self {
        Self::new(scroll_width, client_width, 600.0, 600.0)
    }

    /// Vertical column: content taller than the viewport, no horizontal overflow
    pub fn vertical(scroll_height: f64, client_height: f64) -> Self {
        Self::new(400.0, 400.0, scroll_height, client_height)
    }

    /// Resize content/viewport; the current offsets are clamped like a browser would
    pub fn resize(&mut self, scroll_width: f64, client_width: f64, scroll_height: f64, client_height: f64) {
        self.metrics.scroll_width = scroll_width;
        self.metrics.client_width = client_width;
        self.metrics.scroll_height = scroll_height;
        self.metrics.client_height = client_height;
        self.metrics.scroll_left = self
            .metrics
            .scroll_left
            .clamp(0.0, self.metrics.max_offset(ResolvedAxis::Horizontal));
        self.metrics.scroll_top = self
            .metrics
            .scroll_top
            .clamp(0.0, self.metrics.max_offset(ResolvedAxis::Vertical));
    }

    /// Place the element at an offset without going through a controller
    pub fn with_offset(mut self, axis: ResolvedAxis, offset: f64) -> Self {
        self.apply(axis, offset);
        self.writes.clear();
        self
    }

    pub fn offset(&self, axis: ResolvedAxis) -> f64 {
        self.metrics.offset(axis)
    }

    pub fn listener(&self, kind: ListenerKind) -> Option<ListenerOptions> {
        self.listeners.get(&kind).copied()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn captured_pointer(&self) -> Option<PointerId> {
        self.captured
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Every offset write since creation (or the last [`clear_writes`](Self::clear_writes))
    pub fn writes(&self) -> &[OffsetWrite] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    fn apply(&mut self, axis: ResolvedAxis, offset: f64) -> f64 {
        let applied = offset.clamp(0.0, self.metrics.max_offset(axis));
        match axis {
            ResolvedAxis::Horizontal => self.metrics.scroll_left = applied,
            ResolvedAxis::Vertical => self.metrics.scroll_top = applied,
        }
        applied
    }
}

impl ScrollSurface for SimulatedSurface {
    fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn set_scroll_offset(&mut self, axis: ResolvedAxis, offset: f64) {
        let applied = self.apply(axis, offset);
        self.writes.push(OffsetWrite {
            axis,
            requested: offset,
            applied,
        });
    }

    fn add_listener(&mut self, kind: ListenerKind, options: ListenerOptions) {
        self.listeners.insert(kind, options);
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        self.listeners.remove(&kind);
    }

    fn set_pointer_capture(&mut self, pointer_id: PointerId) {
        self.captured = Some(pointer_id);
    }

    fn release_pointer_capture(&mut self, pointer_id: PointerId) {
        if self.captured == Some(pointer_id) {
            self.captured = None;
        }
    }

    fn has_pointer_capture(&self, pointer_id: PointerId) -> bool {
        self.captured == Some(pointer_id)
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_are_clamped_and_recorded() {
        let mut surface = SimulatedSurface::horizontal(2000.0, 1000.0);
        surface.set_scroll_offset(ResolvedAxis::Horizontal, 1500.0);

        assert_eq!(surface.offset(ResolvedAxis::Horizontal), 1000.0);
        assert_eq!(
            surface.writes(),
            &[OffsetWrite {
                axis: ResolvedAxis::Horizontal,
                requested: 1500.0,
                applied: 1000.0,
            }]
        );
    }

    #[test]
    fn test_resize_clamps_offsets() {
        let mut surface =
            SimulatedSurface::horizontal(2000.0, 1000.0).with_offset(ResolvedAxis::Horizontal, 900.0);
        surface.resize(1200.0, 1000.0, 600.0, 600.0);
        assert_eq!(surface.offset(ResolvedAxis::Horizontal), 200.0);
    }

    #[test]
    fn test_pointer_capture_only_released_by_owner() {
        let mut surface = SimulatedSurface::default();
        surface.set_pointer_capture(PointerId(1));
        surface.release_pointer_capture(PointerId(2));
        assert!(surface.has_pointer_capture(PointerId(1)));
        surface.release_pointer_capture(PointerId(1));
        assert_eq!(surface.captured_pointer(), None);
    }
}
