//! Schema module - Configuration and plane placement types for GIF Slice.

mod config;
mod transform;

pub use config::*;
pub use transform::*;
