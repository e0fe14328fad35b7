//! Normalized 3D view over an animated image.
//!
//! The frame sequence is treated as a lattice of `width x height x frames`
//! voxels, scaled so its longest image edge and its depth both span 1.0 and
//! centered on the origin:
//!
//! ```text
//!        +Y (row 0)
//!         |
//!         |___ +X (column 0 at -X)
//!        /
//!      +Z  (frame 0 faces the viewer)
//! ```

use glam::Vec3;

use crate::animation::{AnimatedImage, Rgba, TRANSPARENT};

/// Stateless point-sampling view over an [`AnimatedImage`].
#[derive(Debug, Clone, Copy)]
pub struct Volume<'a> {
    image: &'a AnimatedImage,
    /// Normalized extents (width, height, depth).
    dims: Vec3,
    half_extents: Vec3,
}

impl<'a> Volume<'a> {
    pub fn new(image: &'a AnimatedImage) -> Self {
        let scale = image.width().max(image.height()) as f32;
        let dims = Vec3::new(
            image.width() as f32 / scale,
            image.height() as f32 / scale,
            1.0,
        );
        Self {
            image,
            dims,
            half_extents: dims * 0.5,
        }
    }

    /// Backing image.
    pub fn image(&self) -> &'a AnimatedImage {
        self.image
    }

    /// Normalized extents along X, Y and Z.
    pub fn dimensions(&self) -> Vec3 {
        self.dims
    }

    /// Half of [`dimensions`](Self::dimensions); the volume spans
    /// `[-half, half]` on each axis.
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// True if `point` lies inside the closed volume bounds.
    pub fn contains(&self, point: Vec3) -> bool {
        let p = point + self.half_extents;
        (0.0..=self.dims.x).contains(&p.x)
            && (0.0..=self.dims.y).contains(&p.y)
            && (0.0..=self.dims.z).contains(&p.z)
    }

    /// Sample the color at `(x, y, z)`.
    #[inline]
    pub fn sample(&self, x: f32, y: f32, z: f32) -> Rgba {
        self.sample_point(Vec3::new(x, y, z))
    }

    /// Nearest-neighbor color lookup. Points outside the volume (or NaN)
    /// return transparent black.
    #[inline]
    pub fn sample_point(&self, point: Vec3) -> Rgba {
        // Shift into positive space
        let p = point + self.half_extents;

        // Row 0 is the top of the image; frame 0 is the face nearest +Z
        let x = p.x;
        let y = self.dims.y - p.y;
        let z = self.dims.z - p.z;

        if !(0.0..=self.dims.x).contains(&x)
            || !(0.0..=self.dims.y).contains(&y)
            || !(0.0..=self.dims.z).contains(&z)
        {
            return TRANSPARENT;
        }

        let frame_count = self.image.frame_count();
        let width = self.image.width();
        let height = self.image.height();

        let frame_index = voxel_index(z / self.dims.z, frame_count);
        let u = voxel_index(x / self.dims.x, width);
        let v = voxel_index(y / self.dims.y, height);

        self.image.frames()[frame_index].pixel(u, v)
    }
}

/// Map a normalized coordinate in `[0, 1]` onto `[0, count - 1]`.
#[inline]
fn voxel_index(t: f32, count: usize) -> usize {
    // `t` is non-negative here, so truncation is floor.
    ((t * count as f32) as usize).min(count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const R: Rgba = [255, 0, 0, 255];
    const G: Rgba = [0, 255, 0, 255];
    const B: Rgba = [0, 0, 255, 255];
    const W: Rgba = [255, 255, 255, 255];

    fn raster(pixels: &[Rgba]) -> Vec<u8> {
        pixels.iter().flatten().copied().collect()
    }

    /// 2x2, two frames: [[R, G], [B, W]] then [[W, B], [G, R]].
    fn two_by_two() -> AnimatedImage {
        let frames = vec![raster(&[R, G, B, W]), raster(&[W, B, G, R])];
        AnimatedImage::from_rgba_frames(2, 2, frames).unwrap()
    }

    /// Image whose every voxel encodes its own (u, v, frame) coordinates.
    fn coordinate_image(width: usize, height: usize, frames: usize) -> AnimatedImage {
        let rasters = (0..frames)
            .map(|f| {
                let mut data = Vec::with_capacity(width * height * 4);
                for v in 0..height {
                    for u in 0..width {
                        data.extend_from_slice(&[u as u8, v as u8, f as u8, 255]);
                    }
                }
                data
            })
            .collect();
        AnimatedImage::from_rgba_frames(width, height, rasters).unwrap()
    }

    #[test]
    fn test_dimensions_normalized_by_longest_edge() {
        let image = coordinate_image(4, 2, 3);
        let volume = Volume::new(&image);
        assert_eq!(volume.dimensions(), Vec3::new(1.0, 0.5, 1.0));
        assert_eq!(volume.half_extents(), Vec3::new(0.5, 0.25, 0.5));
    }

    #[test]
    fn test_front_and_back_faces() {
        let image = two_by_two();
        let volume = Volume::new(&image);

        // Front face (z = +0.5) shows frame 0
        assert_eq!(volume.sample(-0.25, 0.25, 0.5), R);
        assert_eq!(volume.sample(0.25, 0.25, 0.5), G);
        assert_eq!(volume.sample(-0.25, -0.25, 0.5), B);
        assert_eq!(volume.sample(0.25, -0.25, 0.5), W);

        // Back face (z = -0.5) clamps to the last frame
        assert_eq!(volume.sample(-0.25, 0.25, -0.5), W);
        assert_eq!(volume.sample(0.25, -0.25, -0.5), R);
    }

    #[test]
    fn test_depth_selects_frame() {
        let image = coordinate_image(2, 2, 4);
        let volume = Volume::new(&image);

        // Each frame occupies a quarter of the depth, front to back
        assert_eq!(volume.sample(0.0, 0.0, 0.45)[2], 0);
        assert_eq!(volume.sample(0.0, 0.0, 0.2)[2], 1);
        assert_eq!(volume.sample(0.0, 0.0, -0.1)[2], 2);
        assert_eq!(volume.sample(0.0, 0.0, -0.4)[2], 3);
    }

    #[test]
    fn test_upper_bounds_are_clamped() {
        let image = coordinate_image(3, 3, 2);
        let volume = Volume::new(&image);

        // x at +half, y at -half: last column, last row
        let px = volume.sample(0.5, -0.5, 0.0);
        assert_eq!((px[0], px[1]), (2, 2));
    }

    #[test]
    fn test_outside_is_transparent() {
        let image = two_by_two();
        let volume = Volume::new(&image);

        assert_eq!(volume.sample(0.51, 0.0, 0.0), TRANSPARENT);
        assert_eq!(volume.sample(0.0, -0.6, 0.0), TRANSPARENT);
        assert_eq!(volume.sample(0.0, 0.0, 0.7), TRANSPARENT);
        assert_eq!(volume.sample(f32::NAN, 0.0, 0.0), TRANSPARENT);
        assert!(!volume.contains(Vec3::new(0.0, 0.0, -0.51)));
        assert!(volume.contains(Vec3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_non_square_image_bounds() {
        let image = coordinate_image(4, 2, 1);
        let volume = Volume::new(&image);

        // Height only spans [-0.25, 0.25]
        assert_eq!(volume.sample(0.0, 0.3, 0.0), TRANSPARENT);
        let px = volume.sample(-0.4, 0.2, 0.0);
        assert_eq!((px[0], px[1]), (0, 0));
    }

    proptest! {
        #[test]
        fn prop_voxel_center_returns_source_pixel(
            width in 1usize..12,
            height in 1usize..12,
            frames in 1usize..8,
            u_seed in 0usize..1000,
            v_seed in 0usize..1000,
            f_seed in 0usize..1000,
        ) {
            let image = coordinate_image(width, height, frames);
            let volume = Volume::new(&image);
            let dims = volume.dimensions();
            let (u, v, f) = (u_seed % width, v_seed % height, f_seed % frames);

            // Center of voxel (u, v, f) in volume space
            let x = (u as f32 + 0.5) / width as f32 * dims.x - dims.x / 2.0;
            let y = dims.y / 2.0 - (v as f32 + 0.5) / height as f32 * dims.y;
            let z = dims.z / 2.0 - (f as f32 + 0.5) / frames as f32 * dims.z;

            prop_assert_eq!(volume.sample(x, y, z), [u as u8, v as u8, f as u8, 255]);
        }

        #[test]
        fn prop_outside_any_axis_is_transparent(
            axis in 0usize..3,
            overshoot in 0.001f32..10.0,
            negative in any::<bool>(),
            a in -0.5f32..0.5,
            b in -0.5f32..0.5,
        ) {
            let image = coordinate_image(5, 3, 4);
            let volume = Volume::new(&image);
            let half = volume.half_extents();

            let mut point = Vec3::new(a * half.x * 2.0, b * half.y * 2.0, 0.0);
            let edge = half[axis] + overshoot;
            point[axis] = if negative { -edge } else { edge };

            prop_assert_eq!(volume.sample_point(point), TRANSPARENT);
        }
    }
}
