//! Plane sampler - cross sections of the image volume.
//!
//! Every output pixel is inverse-mapped onto the plane and looked up in the
//! [`Volume`]:
//!
//! ```text
//!  TL ----- dx ----> TR
//!   |  *  *  *  *
//!  dy  *  *  *  *      world(col, row) = TL + dy*(row + 0.5) + dx*(col + 0.5)
//!   v  *  *  *  *
//!  BL               BR
//! ```
//!
//! Sampling at pixel centers keeps the result symmetric under rotation.

use glam::Vec3;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::Volume;
use crate::animation::{AnimatedImage, Rgba};
use crate::schema::PlaneTransform;

/// A resampled cross section and the placement that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Row-major RGBA bytes, top row first (`width * height * 4`).
    pub raster: Vec<u8>,
    /// Output width in pixels.
    pub width: usize,
    /// Output height in pixels.
    pub height: usize,
    /// Plane placement at the time of sampling.
    pub transform: PlaneTransform,
    /// Physical plane width in volume units.
    pub plane_width: f32,
    /// Physical plane height in volume units.
    pub plane_height: f32,
}

impl Sample {
    /// Column-major 16-element matrix of the sampled plane.
    pub fn transform_matrix(&self) -> [f32; 16] {
        self.transform.to_cols_array()
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let pixels: &[Rgba] = bytemuck::cast_slice(&self.raster);
        pixels[y * self.width + x]
    }
}

/// Slice the currently loaded image, if any.
///
/// Returns `None` when no image is loaded. The result depends only on the
/// image, the transform and the output size.
pub fn slice(
    image: Option<&AnimatedImage>,
    transform: &PlaneTransform,
    width: usize,
    height: usize,
) -> Option<Sample> {
    image.map(|image| slice_volume(&Volume::new(image), transform, width, height))
}

/// Slice a volume into a freshly allocated [`Sample`].
pub fn slice_volume(
    volume: &Volume<'_>,
    transform: &PlaneTransform,
    width: usize,
    height: usize,
) -> Sample {
    let mut raster = vec![0u8; width * height * 4];
    slice_into(volume, transform, width, height, &mut raster);

    let (plane_width, plane_height) = transform.plane_size();
    Sample {
        raster,
        width,
        height,
        transform: *transform,
        plane_width,
        plane_height,
    }
}

/// Slice a volume into a caller-owned RGBA buffer.
///
/// `output` must hold exactly `width * height * 4` bytes. Rows are filled in
/// parallel on native targets.
pub fn slice_into(
    volume: &Volume<'_>,
    transform: &PlaneTransform,
    width: usize,
    height: usize,
    output: &mut [u8],
) {
    assert_eq!(
        output.len(),
        width * height * 4,
        "Output buffer does not match {width}x{height} RGBA"
    );
    if width == 0 || height == 0 {
        return;
    }

    let grid = PixelGrid::new(transform, width, height);
    let row_bytes = width * 4;

    let fill_row = |(row, out_row): (usize, &mut [u8])| {
        let row_start = grid.row_start(row);
        for (col, out) in out_row.chunks_exact_mut(4).enumerate() {
            let world = row_start + grid.dx * (col as f32 + 0.5);
            out.copy_from_slice(&volume.sample_point(world));
        }
    };

    #[cfg(not(target_arch = "wasm32"))]
    output
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(fill_row);

    #[cfg(target_arch = "wasm32")]
    output
        .chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(fill_row);
}

/// World-space stepping of output pixels across the plane.
#[derive(Debug, Clone, Copy)]
struct PixelGrid {
    top_left: Vec3,
    /// Step between adjacent columns.
    dx: Vec3,
    /// Step between adjacent rows.
    dy: Vec3,
}

impl PixelGrid {
    fn new(transform: &PlaneTransform, width: usize, height: usize) -> Self {
        let [top_left, top_right, _, bottom_left] = transform.corners();
        Self {
            top_left,
            dx: (top_right - top_left) / width as f32,
            dy: (bottom_left - top_left) / height as f32,
        }
    }

    /// World position of the left edge of `row`, at the row's vertical center.
    #[inline]
    fn row_start(&self, row: usize) -> Vec3 {
        self.top_left + self.dy * (row as f32 + 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TRANSPARENT;
    use glam::Quat;
    use std::f32::consts::PI;

    const R: Rgba = [255, 0, 0, 255];
    const G: Rgba = [0, 255, 0, 255];
    const B: Rgba = [0, 0, 255, 255];
    const W: Rgba = [255, 255, 255, 255];

    fn raster(pixels: &[Rgba]) -> Vec<u8> {
        pixels.iter().flatten().copied().collect()
    }

    fn two_by_two() -> AnimatedImage {
        let frames = vec![raster(&[R, G, B, W]), raster(&[W, B, G, R])];
        AnimatedImage::from_rgba_frames(2, 2, frames).unwrap()
    }

    fn front() -> PlaneTransform {
        PlaneTransform::from_translation(Vec3::new(0.0, 0.0, 0.5))
    }

    fn back() -> PlaneTransform {
        PlaneTransform::from_translation(Vec3::new(0.0, 0.0, -0.5))
    }

    #[test]
    fn test_slice_without_image_is_absent() {
        assert!(slice(None, &PlaneTransform::IDENTITY, 4, 4).is_none());
    }

    #[test]
    fn test_single_pixel_image_fills_output() {
        let color = [10, 20, 30, 255];
        let image = AnimatedImage::from_rgba_frames(1, 1, vec![color.to_vec()]).unwrap();

        let sample = slice(Some(&image), &PlaneTransform::IDENTITY, 7, 5).unwrap();
        assert_eq!(sample.raster.len(), 7 * 5 * 4);
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(sample.pixel(x, y), color);
            }
        }
    }

    #[test]
    fn test_front_and_back_slices() {
        let image = two_by_two();

        let sample = slice(Some(&image), &front(), 2, 2).unwrap();
        assert_eq!(sample.raster, raster(&[R, G, B, W]));

        let sample = slice(Some(&image), &back(), 2, 2).unwrap();
        assert_eq!(sample.raster, raster(&[W, B, G, R]));
    }

    #[test]
    fn test_upsampled_front_slice_is_nearest_neighbor() {
        let image = two_by_two();
        let sample = slice(Some(&image), &front(), 4, 4).unwrap();

        for y in 0..4 {
            for x in 0..4 {
                let expected = image.first_frame().pixel(x / 2, y / 2);
                assert_eq!(sample.pixel(x, y), expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_rotated_half_turn_flips_slice() {
        let image = two_by_two();
        let transform = front().rotated(Quat::from_rotation_z(PI));

        let sample = slice(Some(&image), &transform, 2, 2).unwrap();
        assert_eq!(sample.raster, raster(&[W, B, G, R]));
    }

    #[test]
    fn test_side_slice_walks_through_frames() {
        let image = two_by_two();
        // Plane in the YZ plane at x = -0.25, width axis running front to back.
        let transform = PlaneTransform::from_translation(Vec3::new(-0.25, 0.0, 0.0))
            .rotated(Quat::from_rotation_y(PI / 2.0));

        let sample = slice(Some(&image), &transform, 2, 2).unwrap();
        // Left column of frame 0, then left column of frame 1
        assert_eq!(sample.pixel(0, 0), R);
        assert_eq!(sample.pixel(0, 1), B);
        assert_eq!(sample.pixel(1, 0), W);
        assert_eq!(sample.pixel(1, 1), G);
    }

    #[test]
    fn test_plane_outside_volume_is_transparent() {
        let image = two_by_two();
        let transform = PlaneTransform::from_translation(Vec3::new(0.0, 0.0, 2.0));

        let sample = slice(Some(&image), &transform, 3, 3).unwrap();
        assert!(sample.raster.chunks_exact(4).all(|px| px == TRANSPARENT));
    }

    #[test]
    fn test_oversized_plane_has_transparent_border() {
        let image = two_by_two();
        let transform = front().with_scale(Vec3::new(2.0, 2.0, 1.0));

        let sample = slice(Some(&image), &transform, 4, 4).unwrap();
        assert_eq!(sample.pixel(0, 0), TRANSPARENT);
        assert_eq!(sample.pixel(3, 3), TRANSPARENT);
        assert_eq!(sample.pixel(1, 1), R);
        assert_eq!(sample.pixel(2, 2), W);
        assert_eq!((sample.plane_width, sample.plane_height), (2.0, 2.0));
    }

    #[test]
    fn test_slice_is_idempotent() {
        let image = two_by_two();
        let transform = PlaneTransform::from_translation(Vec3::new(0.05, -0.1, 0.2))
            .rotated_euler(Vec3::new(0.3, -0.7, 1.1));

        let a = slice(Some(&image), &transform, 33, 17).unwrap();
        let b = slice(Some(&image), &transform, 33, 17).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_keeps_transform_snapshot() {
        let image = two_by_two();
        let mut transform = front();
        let sample = slice(Some(&image), &transform, 2, 2).unwrap();

        transform = transform.translated(Vec3::X);
        assert_ne!(sample.transform, transform);
        assert_eq!(sample.transform, front());
        assert_eq!(sample.transform_matrix(), front().to_cols_array());
    }

    #[test]
    fn test_zero_sized_output() {
        let image = two_by_two();
        let sample = slice(Some(&image), &front(), 0, 3).unwrap();
        assert!(sample.raster.is_empty());
        assert_eq!(sample.height, 3);
    }

    #[test]
    fn test_slice_into_reuses_buffer() {
        let image = two_by_two();
        let volume = Volume::new(&image);
        let mut buffer = vec![7u8; 2 * 2 * 4];

        slice_into(&volume, &back(), 2, 2, &mut buffer);
        assert_eq!(buffer, raster(&[W, B, G, R]));
    }

    #[test]
    #[should_panic(expected = "Output buffer")]
    fn test_slice_into_rejects_wrong_buffer() {
        let image = two_by_two();
        let volume = Volume::new(&image);
        let mut buffer = vec![0u8; 3];
        slice_into(&volume, &front(), 2, 2, &mut buffer);
    }
}
