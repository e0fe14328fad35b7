//! The active slicing session.

use std::sync::Arc;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use super::{PendingLoad, SessionError};
use super::{InputEvent, PlaneController, ResampleScheduler, SliceRequest};
use crate::animation::{AnimatedImage, DecodeError, decode_with_limit};
use crate::compute::{CubeFaces, Sample, extract_faces, slice};
use crate::schema::{ConfigError, PlaneTransform, SlicerConfig};

/// One active image, one sampling plane, throttled resampling.
///
/// Loading a new image replaces the old one wholesale and discards the
/// latest sample. Every plane or resolution change raises the resample flag;
/// [`tick`](Self::tick) turns that into at most one slice per interval.
#[derive(Debug)]
pub struct SliceSession {
    image: Option<Arc<AnimatedImage>>,
    faces: Option<CubeFaces>,
    /// Incremented on every image replacement.
    generation: u64,
    controller: PlaneController,
    scheduler: ResampleScheduler,
    sample_width: usize,
    sample_height: usize,
    max_canvas_bytes: usize,
    latest: Option<Sample>,
}

impl SliceSession {
    pub fn new(config: &SlicerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            image: None,
            faces: None,
            generation: 0,
            controller: PlaneController::new(config.plane.initial_transform()),
            scheduler: ResampleScheduler::new(config.resample_interval()),
            sample_width: config.sample_width,
            sample_height: config.sample_height,
            max_canvas_bytes: config.max_canvas_bytes,
            latest: None,
        })
    }

    /// Decode `bytes` on the calling thread and make it the active image.
    ///
    /// On failure the previous image stays active.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let image = decode_with_limit(bytes, self.max_canvas_bytes)?;
        self.set_image(Arc::new(image));
        Ok(())
    }

    /// Start decoding `bytes` on a background thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_in_background(&self, bytes: Vec<u8>) -> Result<PendingLoad, SessionError> {
        PendingLoad::spawn(bytes, self.max_canvas_bytes)
    }

    /// Install the result of a background load if it is ready.
    ///
    /// Returns `Ok(true)` when a new image became active.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn poll_load(&mut self, pending: &mut PendingLoad) -> Result<bool, SessionError> {
        match pending.try_take() {
            Some(result) => {
                self.set_image(result?);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace the active image.
    pub fn set_image(&mut self, image: Arc<AnimatedImage>) {
        self.faces = Some(extract_faces(&image));
        self.generation += 1;
        self.latest = None;
        log::info!(
            "Loaded {}x{} image with {} frames (generation {})",
            image.width(),
            image.height(),
            image.frame_count(),
            self.generation
        );
        self.image = Some(image);
        self.controller.mark_dirty();
    }

    /// Drop the active image. Later slices are absent until a new load.
    pub fn clear_image(&mut self) {
        self.image = None;
        self.faces = None;
        self.latest = None;
        self.generation += 1;
    }

    pub fn image(&self) -> Option<&Arc<AnimatedImage>> {
        self.image.as_ref()
    }

    /// Cube skin textures of the active image.
    pub fn faces(&self) -> Option<&CubeFaces> {
        self.faces.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn controller(&self) -> &PlaneController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaneController {
        &mut self.controller
    }

    /// Forward an input event to the plane controller.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        self.controller.handle_event(event)
    }

    pub fn sample_size(&self) -> (usize, usize) {
        (self.sample_width, self.sample_height)
    }

    /// Change the throttled output resolution. Zero in either axis is
    /// rejected, as in [`SlicerConfig::validate`].
    pub fn set_sample_size(&mut self, width: usize, height: usize) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidSampleSize { width, height });
        }
        if (width, height) != (self.sample_width, self.sample_height) {
            self.sample_width = width;
            self.sample_height = height;
            self.controller.mark_dirty();
        }
        Ok(())
    }

    /// Most recent throttled sample of the active image.
    pub fn latest_sample(&self) -> Option<&Sample> {
        self.latest.as_ref()
    }

    /// Slice the active image at an arbitrary plane and resolution,
    /// bypassing the throttle.
    pub fn slice_with(
        &self,
        transform: &PlaneTransform,
        width: usize,
        height: usize,
    ) -> Option<Sample> {
        slice(self.image.as_deref(), transform, width, height)
    }

    /// Slice the active image at the current plane and sample size.
    pub fn slice_now(&self) -> Option<Sample> {
        self.slice_with(
            &self.controller.transform(),
            self.sample_width,
            self.sample_height,
        )
    }

    /// Drive resampling. Call from any loop with a monotonic timestamp;
    /// returns the new sample when one was produced on this tick.
    pub fn tick(&mut self, now: Duration) -> Option<&Sample> {
        if self.controller.take_needs_resample() {
            self.scheduler.request(SliceRequest {
                transform: self.controller.transform(),
                width: self.sample_width,
                height: self.sample_height,
            });
        }

        let request = self.scheduler.poll(now)?;
        let sample = self.slice_with(&request.transform, request.width, request.height)?;
        self.latest = Some(sample);
        self.latest.as_ref()
    }
}
