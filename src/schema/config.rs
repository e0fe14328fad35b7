//! Configuration types for slicing sessions.

use std::f32::consts::FRAC_PI_4;
use std::time::Duration;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::PlaneTransform;
use crate::animation::DEFAULT_MAX_CANVAS_BYTES;

fn default_resample_interval_ms() -> u64 {
    50
}

fn default_max_canvas_bytes() -> usize {
    DEFAULT_MAX_CANVAS_BYTES
}

/// Top-level slicer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlicerConfig {
    /// Output raster width in pixels.
    pub sample_width: usize,
    /// Output raster height in pixels.
    pub sample_height: usize,
    /// Minimum time between two resamples while the plane is moving.
    /// Zero disables throttling.
    #[serde(default = "default_resample_interval_ms")]
    pub resample_interval_ms: u64,
    /// Largest decoded RGBA canvas accepted, in bytes.
    #[serde(default = "default_max_canvas_bytes")]
    pub max_canvas_bytes: usize,
    /// Initial plane placement.
    #[serde(default)]
    pub plane: PlaneConfig,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            sample_width: 200,
            sample_height: 200,
            resample_interval_ms: default_resample_interval_ms(),
            max_canvas_bytes: default_max_canvas_bytes(),
            plane: PlaneConfig::default(),
        }
    }
}

/// Initial placement of the sampling plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    /// Plane center in volume space.
    pub position: [f32; 3],
    /// Tilt about -X in radians, leaning the top edge away from the viewer.
    pub tilt: f32,
    /// Edge length of the square plane.
    pub size: f32,
    /// Full column-major placement, e.g. a saved sample's matrix. When set it
    /// replaces `position`, `tilt` and `size`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[f32; 16]>,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            tilt: FRAC_PI_4,
            size: 1.5,
            matrix: None,
        }
    }
}

impl PlaneConfig {
    /// Transform the plane starts from and returns to on reset.
    pub fn initial_transform(&self) -> PlaneTransform {
        if let Some(cols) = &self.matrix {
            return PlaneTransform::from_cols_array(cols);
        }
        PlaneTransform::new(
            Vec3::from_array(self.position),
            Quat::from_axis_angle(Vec3::NEG_X, self.tilt),
            Vec3::new(self.size, self.size, 1.0),
        )
    }
}

impl SlicerConfig {
    /// Throttle interval as a [`Duration`].
    #[inline]
    pub fn resample_interval(&self) -> Duration {
        Duration::from_millis(self.resample_interval_ms)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_width == 0 || self.sample_height == 0 {
            return Err(ConfigError::InvalidSampleSize {
                width: self.sample_width,
                height: self.sample_height,
            });
        }
        let size = self.plane.size;
        if self.plane.matrix.is_none() && !(size.is_finite() && size > 0.0) {
            return Err(ConfigError::InvalidPlaneSize(self.plane.size));
        }
        if !self.plane.initial_transform().is_finite() {
            return Err(ConfigError::NonFinitePlane);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Sample size must be non-zero (got {width}x{height})")]
    InvalidSampleSize { width: usize, height: usize },
    #[error("Plane size must be positive and finite (got {0})")]
    InvalidPlaneSize(f32),
    #[error("Plane placement must be finite and non-degenerate")]
    NonFinitePlane,
}
