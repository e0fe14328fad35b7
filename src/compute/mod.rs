//! Compute module - Volume sampling for GIF Slice.

mod faces;
mod sampler;
mod volume;

pub use faces::*;
pub use sampler::*;
pub use volume::*;
