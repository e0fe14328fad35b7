//! Animated image decoding for GIF Slice.
//!
//! Turns a GIF byte stream into an [`AnimatedImage`]: an ordered sequence of
//! fully composited RGBA frames that all share the logical screen size.
//!
//! # Compositing
//!
//! ```text
//! frame 0:  blank canvas  <- blit block 0
//! frame i:  copy(frame i-1) <- blit block i
//! ```
//!
//! Transparent pixels of a block leave the inherited pixel untouched.
//! Restore-to-background and restore-to-previous disposal are not applied;
//! frames are treated as independent depth layers of a volume, never replayed.

mod decoder;
mod frame;

pub use decoder::{DEFAULT_MAX_CANVAS_BYTES, DecodeError, decode, decode_with_limit};
pub use frame::{AnimatedImage, Disposal, Frame, FrameInfo, Rgba, TRANSPARENT};
