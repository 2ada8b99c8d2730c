//! Glide Animation System
//!
//! Frame scheduling for per-frame animation loops.
//!
//! # Features
//!
//! - **One-shot frame requests**: a handle fires on the next frame only, like
//!   `requestAnimationFrame`; loops re-request every frame
//! - **Cancellation**: a cancelled handle never fires
//! - **Deterministic time**: the host supplies frame timestamps, so headless
//!   runs and tests are reproducible

pub mod scheduler;

pub use scheduler::{FrameHandle, FrameScheduler, FrameTick};
