//! Animation frame scheduler
//!
//! Collects frame requests between display refreshes and fires them together
//! when the host begins the next frame.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Token identifying one pending frame request
    pub struct FrameHandle;
}

/// Bookkeeping for a pending request
#[derive(Debug, Clone, Copy)]
struct FrameRequest {
    /// Frame index at the time of the request
    requested_during: u64,
}

/// The set of requests that fired for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameTick {
    /// Monotonic frame counter (first frame is 1)
    pub index: u64,
    /// Host timestamp for this frame in milliseconds
    pub now_ms: f64,
    /// Milliseconds since the previous frame (0 for the first frame)
    pub dt_ms: f64,
    fired: SmallVec<[FrameHandle; 4]>,
}

impl FrameTick {
    /// Whether `handle` was pending when this frame began
    pub fn fired(&self, handle: FrameHandle) -> bool {
        self.fired.contains(&handle)
    }

    /// Number of requests that fired
    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// Frame scheduler shared by every animated controller in a host
pub struct FrameScheduler {
    pending: SlotMap<FrameHandle, FrameRequest>,
    frame_index: u64,
    last_frame_ms: Option<f64>,
    frame_interval_ms: f64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            pending: SlotMap::with_key(),
            frame_index: 0,
            last_frame_ms: None,
            frame_interval_ms: 16.0,
        }
    }

    /// Set the nominal refresh rate used by hosts that synthesize timestamps
    pub fn set_target_fps(&mut self, fps: u32) {
        self.frame_interval_ms = 1000.0 / f64::from(fps.max(1));
    }

    /// Nominal milliseconds between frames
    pub fn frame_interval_ms(&self) -> f64 {
        self.frame_interval_ms
    }

    /// Request a callback on the next frame
    pub fn request_frame(&mut self) -> FrameHandle {
        let handle = self.pending.insert(FrameRequest {
            requested_during: self.frame_index,
        });
        tracing::trace!(
            "frame requested: {:?} (pending={})",
            handle,
            self.pending.len()
        );
        handle
    }

    /// Cancel a pending request; returns false if it already fired or was cancelled
    pub fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        self.pending.remove(handle).is_some()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains_key(handle)
    }

    /// Number of requests waiting for the next frame
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Begin a frame at `now_ms`, firing every pending request exactly once
    ///
    /// Requests made while the returned tick is being processed belong to the
    /// following frame.
    pub fn begin_frame(&mut self, now_ms: f64) -> FrameTick {
        self.frame_index += 1;
        let index = self.frame_index;
        let dt_ms = self
            .last_frame_ms
            .map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_frame_ms = Some(now_ms);

        let fired: SmallVec<[FrameHandle; 4]> = self
            .pending
            .drain()
            .map(|(handle, request)| {
                debug_assert!(request.requested_during < index);
                handle
            })
            .collect();

        FrameTick {
            index,
            now_ms,
            dt_ms,
            fired,
        }
    }

    /// Timestamp for the next synthesized frame
    pub fn next_timestamp(&self) -> f64 {
        self.last_frame_ms
            .map_or(0.0, |last| last + self.frame_interval_ms)
    }

    /// Number of frames begun so far
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}
