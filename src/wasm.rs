//! WebAssembly bindings for GIF Slice.
//!
//! Provides a thin wrapper around `SliceSession` for browser environments.
//! The page owns the render loop and calls `tick` from it.

use glam::{Quat, Vec3};
use wasm_bindgen::prelude::*;

use crate::{
    compute::Face,
    schema::{PlaneTransform, SlicerConfig},
    session::{InputEvent, SliceSession, timestamp_from_millis},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// WebAssembly wrapper for a slicing session.
#[wasm_bindgen]
pub struct WasmSlicer {
    session: SliceSession,
}

#[wasm_bindgen]
impl WasmSlicer {
    /// Create a slicer from JSON configuration (empty string for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmSlicer, JsValue> {
        let config: SlicerConfig = if config_json.is_empty() {
            SlicerConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?
        };

        let session = SliceSession::new(&config)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;

        Ok(WasmSlicer { session })
    }

    /// Decode GIF bytes and make them the active volume.
    #[wasm_bindgen(js_name = setGif)]
    pub fn set_gif(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.session
            .load(bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setSampleSize)]
    pub fn set_sample_size(&mut self, width: usize, height: usize) -> Result<(), JsValue> {
        self.session
            .set_sample_size(width, height)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Place the plane: translation, rotation quaternion (x, y, z, w), scale.
    #[wasm_bindgen(js_name = setPlane)]
    #[allow(clippy::too_many_arguments)]
    pub fn set_plane(
        &mut self,
        px: f32,
        py: f32,
        pz: f32,
        qx: f32,
        qy: f32,
        qz: f32,
        qw: f32,
        sx: f32,
        sy: f32,
        sz: f32,
    ) {
        let transform = PlaneTransform::new(
            Vec3::new(px, py, pz),
            Quat::from_xyzw(qx, qy, qz, qw).normalize(),
            Vec3::new(sx, sy, sz),
        );
        self.session.controller_mut().modify(|_| transform);
    }

    /// Place the plane from a saved column-major matrix, e.g. a previous
    /// `sampleTransform()`.
    #[wasm_bindgen(js_name = setPlaneMatrix)]
    pub fn set_plane_matrix(&mut self, cols: &[f32]) -> Result<(), JsValue> {
        let cols: &[f32; 16] = cols
            .try_into()
            .map_err(|_| JsValue::from_str("Plane matrix must have 16 elements"))?;
        let transform = PlaneTransform::from_cols_array(cols);
        if !transform.is_finite() {
            return Err(JsValue::from_str("Plane matrix is degenerate"));
        }
        self.session.controller_mut().modify(|_| transform);
        Ok(())
    }

    /// Forward a key press (W/E/R switch the transform mode).
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: char) -> bool {
        self.session.handle_event(&InputEvent::KeyDown(key))
    }

    /// Drag in the current transform mode.
    #[wasm_bindgen]
    pub fn drag(&mut self, dx: f32, dy: f32, dz: f32) -> bool {
        let delta = Vec3::new(dx, dy, dz);
        self.session.handle_event(&InputEvent::Drag(delta))
    }

    #[wasm_bindgen(js_name = resetPlane)]
    pub fn reset_plane(&mut self) {
        self.session.controller_mut().reset();
    }

    /// Drive throttled resampling with a `performance.now()` timestamp.
    /// Returns true when a new sample is ready.
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.session.tick(timestamp_from_millis(now_ms)).is_some()
    }

    /// Slice the current plane at any resolution right away, outside the
    /// throttle. Empty if no image is loaded.
    #[wasm_bindgen(js_name = sliceAt)]
    pub fn slice_at(&self, width: usize, height: usize) -> Vec<u8> {
        let transform = self.session.controller().transform();
        self.session
            .slice_with(&transform, width, height)
            .map(|s| s.raster)
            .unwrap_or_default()
    }

    /// RGBA bytes of the latest sample, or empty if none.
    #[wasm_bindgen(js_name = sampleData)]
    pub fn sample_data(&self) -> Vec<u8> {
        self.session
            .latest_sample()
            .map(|s| s.raster.clone())
            .unwrap_or_default()
    }

    /// Column-major plane matrix of the latest sample.
    #[wasm_bindgen(js_name = sampleTransform)]
    pub fn sample_transform(&self) -> Vec<f32> {
        self.session
            .latest_sample()
            .map(|s| s.transform_matrix().to_vec())
            .unwrap_or_default()
    }

    /// Plane width and height of the latest sample.
    #[wasm_bindgen(js_name = sampleSize)]
    pub fn sample_size(&self) -> Vec<f32> {
        self.session
            .latest_sample()
            .map(|s| vec![s.plane_width, s.plane_height])
            .unwrap_or_default()
    }

    /// Clipping plane `(nx, ny, nz, d)` of the current plane.
    #[wasm_bindgen(js_name = clippingPlane)]
    pub fn clipping_plane(&self) -> Vec<f32> {
        self.session
            .controller()
            .transform()
            .clipping_plane()
            .to_array()
            .to_vec()
    }

    /// RGBA texture for a cube face ("front", "back", "left", "right",
    /// "top", "bottom").
    #[wasm_bindgen]
    pub fn face(&self, name: &str) -> Result<Vec<u8>, JsValue> {
        let face = Face::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown face: {name}")))?;
        let faces = self
            .session
            .faces()
            .ok_or_else(|| JsValue::from_str("No image loaded"))?;
        Ok(faces.get(face).to_vec())
    }

    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self) -> usize {
        self.session.image().map_or(0, |image| image.frame_count())
    }
}
