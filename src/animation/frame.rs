//! Composited frame and animated image types.

use super::DecodeError;

/// One RGBA pixel.
pub type Rgba = [u8; 4];

/// Fully transparent black, returned for samples outside the volume.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Disposal method as declared by the stream.
///
/// Kept for inspection only. Compositing always inherits the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposal {
    /// No disposal specified.
    #[default]
    Unspecified,
    /// Leave the frame in place.
    Keep,
    /// Restore the frame area to the background.
    Background,
    /// Restore the frame area to the previous content.
    Previous,
}

impl From<gif::DisposalMethod> for Disposal {
    fn from(method: gif::DisposalMethod) -> Self {
        match method {
            gif::DisposalMethod::Any => Disposal::Unspecified,
            gif::DisposalMethod::Keep => Disposal::Keep,
            gif::DisposalMethod::Background => Disposal::Background,
            gif::DisposalMethod::Previous => Disposal::Previous,
        }
    }
}

/// Per-frame metadata read from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInfo {
    /// Display delay in hundredths of a second.
    pub delay: u16,
    /// Left edge of the frame's source rectangle.
    pub left: u16,
    /// Top edge of the frame's source rectangle.
    pub top: u16,
    /// Width of the source rectangle.
    pub width: u16,
    /// Height of the source rectangle.
    pub height: u16,
    /// Declared disposal method.
    pub disposal: Disposal,
    /// Palette index treated as transparent, if any.
    pub transparent: Option<u8>,
}

impl From<&gif::Frame<'_>> for FrameInfo {
    fn from(frame: &gif::Frame<'_>) -> Self {
        Self {
            delay: frame.delay,
            left: frame.left,
            top: frame.top,
            width: frame.width,
            height: frame.height,
            disposal: frame.dispose.into(),
            transparent: frame.transparent,
        }
    }
}

/// A fully composited RGBA raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    /// Row-major RGBA bytes, top row first.
    pixels: Vec<u8>,
    info: FrameInfo,
}

impl Frame {
    pub(crate) fn new(width: usize, height: usize, pixels: Vec<u8>, info: FrameInfo) -> Self {
        debug_assert_eq!(pixels.len(), width * height * 4);
        Self {
            width,
            height,
            pixels,
            info,
        }
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixels viewed as RGBA quads.
    #[inline]
    pub fn rgba(&self) -> &[Rgba] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Pixel at column `x`, row `y`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.rgba()[y * self.width + x]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Stream metadata for this frame.
    pub fn info(&self) -> &FrameInfo {
        &self.info
    }
}

/// Decoded animation: an ordered sequence of equally sized composited frames.
///
/// Immutable once built. Reloading produces a new value rather than mutating
/// this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedImage {
    width: usize,
    height: usize,
    frames: Vec<Frame>,
}

impl AnimatedImage {
    pub(crate) fn from_frames(width: usize, height: usize, frames: Vec<Frame>) -> Self {
        debug_assert!(!frames.is_empty());
        debug_assert!(frames.iter().all(|f| f.width == width && f.height == height));
        Self {
            width,
            height,
            frames,
        }
    }

    /// Build an image from already composited RGBA rasters.
    ///
    /// Every raster must hold exactly `width * height * 4` bytes.
    pub fn from_rgba_frames(
        width: usize,
        height: usize,
        rasters: Vec<Vec<u8>>,
    ) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 {
            return Err(DecodeError::EmptyCanvas { width, height });
        }
        if rasters.is_empty() {
            return Err(DecodeError::NoFrames);
        }

        let expected = width * height * 4;
        let frames = rasters
            .into_iter()
            .enumerate()
            .map(|(index, pixels)| {
                if pixels.len() != expected {
                    return Err(DecodeError::FrameSizeMismatch {
                        index,
                        expected,
                        actual: pixels.len(),
                    });
                }
                Ok(Frame::new(width, height, pixels, FrameInfo::default()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_frames(width, height, frames))
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of frames (volume depth).
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn first_frame(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn last_frame(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    /// Total animation duration in hundredths of a second.
    pub fn total_delay(&self) -> u32 {
        self.frames.iter().map(|f| f.info.delay as u32).sum()
    }
}
