//! Cube skin textures.
//!
//! Six frame-sized rasters showing the outside of the volume. Front and back
//! are the first and last frames; the four sides spread the frame sequence
//! across one image axis and show a single edge row or column of each frame.

use crate::animation::{AnimatedImage, Frame, Rgba};

/// One face of the volume cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Left,
        Face::Top,
        Face::Bottom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Left => "left",
            Face::Right => "right",
            Face::Top => "top",
            Face::Bottom => "bottom",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|face| face.name() == name)
    }
}

/// The six skin textures, each `width * height * 4` RGBA bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeFaces {
    pub width: usize,
    pub height: usize,
    pub front: Vec<u8>,
    pub back: Vec<u8>,
    pub left: Vec<u8>,
    pub right: Vec<u8>,
    pub top: Vec<u8>,
    pub bottom: Vec<u8>,
}

impl CubeFaces {
    pub fn get(&self, face: Face) -> &[u8] {
        match face {
            Face::Front => &self.front,
            Face::Back => &self.back,
            Face::Left => &self.left,
            Face::Right => &self.right,
            Face::Top => &self.top,
            Face::Bottom => &self.bottom,
        }
    }
}

/// Derive all six face textures from an image.
pub fn extract_faces(image: &AnimatedImage) -> CubeFaces {
    let width = image.width();
    let height = image.height();

    CubeFaces {
        width,
        height,
        front: image.first_frame().pixels().to_vec(),
        back: image.last_frame().pixels().to_vec(),
        left: side_face(image, 0),
        right: side_face(image, width - 1),
        top: cap_face(image, 0),
        bottom: cap_face(image, height - 1),
    }
}

/// Output column `x` shows `column` of the frame at `x / width` through the
/// sequence.
fn side_face(image: &AnimatedImage, column: usize) -> Vec<u8> {
    let width = image.width();
    let height = image.height();
    let mut data = vec![0u8; width * height * 4];
    let out: &mut [Rgba] = bytemuck::cast_slice_mut(&mut data);

    for x in 0..width {
        let frame = frame_at(image, x, width);
        for y in 0..height {
            out[y * width + x] = frame.pixel(column, y);
        }
    }
    data
}

/// Output row `y` shows `row` of the frame at `y / height` through the
/// sequence.
fn cap_face(image: &AnimatedImage, row: usize) -> Vec<u8> {
    let width = image.width();
    let height = image.height();
    let mut data = vec![0u8; width * height * 4];
    let out: &mut [Rgba] = bytemuck::cast_slice_mut(&mut data);

    for (y, out_row) in out.chunks_exact_mut(width).enumerate() {
        let frame = frame_at(image, y, height);
        let source = &frame.rgba()[row * width..(row + 1) * width];
        out_row.copy_from_slice(source);
    }
    data
}

/// Frame at `floor(position / extent * frame_count)`.
#[inline]
fn frame_at(image: &AnimatedImage, position: usize, extent: usize) -> &Frame {
    &image.frames()[position * image.frame_count() / extent]
}
