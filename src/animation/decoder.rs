//! GIF stream decoding into composited frames.

use super::frame::{AnimatedImage, Frame, FrameInfo};

/// Errors produced while decoding an animated image.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed or unsupported GIF stream: {0}")]
    Gif(#[from] gif::DecodingError),
    #[error("Logical screen must be non-empty (got {width}x{height})")]
    EmptyCanvas { width: usize, height: usize },
    #[error("Canvas {width}x{height} exceeds the {limit} byte budget")]
    CanvasTooLarge {
        width: usize,
        height: usize,
        limit: usize,
    },
    #[error("Stream contains no image frames")]
    NoFrames,
    #[error("Frame {index} has {actual} bytes, expected {expected}")]
    FrameSizeMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}

/// Largest RGBA canvas [`decode`] accepts: 4096x4096 pixels.
pub const DEFAULT_MAX_CANVAS_BYTES: usize = 4096 * 4096 * 4;

/// Decode a GIF byte stream into a sequence of fully composited RGBA frames.
///
/// Frame 0 is decoded onto a transparent canvas. Every later frame starts
/// from a copy of the previous composited frame and is blitted over it, so
/// each output frame is displayable on its own. Declared disposal methods
/// are recorded in [`FrameInfo`] but never applied.
pub fn decode(bytes: &[u8]) -> Result<AnimatedImage, DecodeError> {
    decode_with_limit(bytes, DEFAULT_MAX_CANVAS_BYTES)
}

/// Like [`decode`], rejecting logical screens whose RGBA canvas would take
/// more than `max_canvas_bytes`.
///
/// The codec only bounds each frame's own rectangle; the canvas is sized
/// from the header and copied once per frame.
pub fn decode_with_limit(
    bytes: &[u8],
    max_canvas_bytes: usize,
) -> Result<AnimatedImage, DecodeError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(bytes)?;

    let width = decoder.width() as usize;
    let height = decoder.height() as usize;
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyCanvas { width, height });
    }
    let canvas_bytes = width.checked_mul(height).and_then(|n| n.checked_mul(4));
    if canvas_bytes.is_none_or(|n| n > max_canvas_bytes) {
        return Err(DecodeError::CanvasTooLarge {
            width,
            height,
            limit: max_canvas_bytes,
        });
    }

    let mut frames: Vec<Frame> = Vec::new();
    while let Some(block) = decoder.read_next_frame()? {
        let mut canvas = match frames.last() {
            Some(previous) => previous.pixels().to_vec(),
            None => vec![0u8; width * height * 4],
        };
        blit_frame(&mut canvas, width, height, block);
        frames.push(Frame::new(width, height, canvas, FrameInfo::from(block)));
    }

    if frames.is_empty() {
        return Err(DecodeError::NoFrames);
    }

    log::debug!(
        "Decoded {}x{} animation with {} frames",
        width,
        height,
        frames.len()
    );

    Ok(AnimatedImage::from_frames(width, height, frames))
}

/// Blit one decoded frame rectangle onto the canvas.
///
/// Pixels mapped to the transparent palette index (alpha 0) are skipped so
/// the inherited content shows through. The rectangle is clipped to the
/// logical screen.
fn blit_frame(canvas: &mut [u8], width: usize, height: usize, block: &gif::Frame<'_>) {
    let left = block.left as usize;
    let top = block.top as usize;
    let row_bytes = block.width as usize * 4;
    if row_bytes == 0 {
        return;
    }

    for (row, src_row) in block.buffer.chunks_exact(row_bytes).enumerate() {
        let y = top + row;
        if y >= height {
            break;
        }
        for (col, src) in src_row.chunks_exact(4).enumerate() {
            let x = left + col;
            if x >= width {
                break;
            }
            if src[3] == 0 {
                continue;
            }
            let offset = (y * width + x) * 4;
            canvas[offset..offset + 4].copy_from_slice(src);
        }
    }
}
