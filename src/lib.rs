//! GIF Slice - Volumetric cross sections of animated images.
//!
//! An animated GIF is read as a 3D color volume: image X and Y span the
//! width and height, and the frame sequence runs along depth. An arbitrary
//! plane placed in that volume is resampled into a flat RGBA image, and six
//! skin textures describe the outside of the cube.
//!
//! # Architecture
//!
//! - `animation`: GIF decoding into fully composited frames
//! - `compute`: the volume view, the plane sampler and face extraction
//! - `schema`: plane transforms and configuration
//! - `session`: throttled resampling, input handling, background loading
//!
//! # Example
//!
//! ```rust,no_run
//! use gif_slice::{
//!     animation::decode,
//!     compute::{extract_faces, slice},
//!     schema::PlaneTransform,
//! };
//!
//! let bytes = std::fs::read("animation.gif").unwrap();
//! let image = decode(&bytes).unwrap();
//!
//! // Cut straight through the middle of the frame sequence
//! let sample = slice(Some(&image), &PlaneTransform::IDENTITY, 256, 256).unwrap();
//! println!("{}x{} slice", sample.width, sample.height);
//!
//! let faces = extract_faces(&image);
//! assert_eq!(faces.front.len(), image.width() * image.height() * 4);
//! ```

pub mod animation;
pub mod compute;
pub mod schema;
pub mod session;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export commonly used types
pub use animation::{AnimatedImage, DecodeError, decode};
pub use compute::{CubeFaces, Face, Sample, Volume, extract_faces, slice};
pub use schema::{PlaneTransform, SlicerConfig};
pub use session::{PlaneController, ResampleScheduler, SliceSession};
