//! Session module - Interactive state around the pure sampler.
//!
//! - [`SliceSession`]: the active image, its faces and the latest sample
//! - [`PlaneController`]: input events to plane transforms
//! - [`ResampleScheduler`]: throttled, latest-wins slice requests
//! - [`PendingLoad`]: decoding on a background thread (native only)

mod controller;
#[cfg(not(target_arch = "wasm32"))]
mod loader;
mod scheduler;
mod slicer;

pub use controller::*;
#[cfg(not(target_arch = "wasm32"))]
pub use loader::*;
pub use scheduler::*;
pub use slicer::*;

use crate::animation::DecodeError;

/// Errors from session-level loading.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("Failed to spawn decode thread: {0}")]
    Spawn(std::io::Error),
    #[error("Decode thread panicked")]
    DecoderPanicked,
    #[error("Load result was already taken")]
    AlreadyTaken,
}
