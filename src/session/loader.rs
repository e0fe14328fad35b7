//! Background decoding off the interactive path.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::SessionError;
use crate::animation::{AnimatedImage, DecodeError, decode_with_limit};

/// A decode running on its own thread.
///
/// The result is handed back exactly once, through [`try_take`](Self::try_take)
/// or [`wait`](Self::wait).
#[derive(Debug)]
pub struct PendingLoad {
    handle: Option<JoinHandle<Result<AnimatedImage, DecodeError>>>,
}

impl PendingLoad {
    /// Start decoding `bytes` on a new thread, rejecting canvases larger
    /// than `max_canvas_bytes`.
    pub fn spawn(bytes: Vec<u8>, max_canvas_bytes: usize) -> Result<Self, SessionError> {
        let handle = thread::Builder::new()
            .name("gif-decode".into())
            .spawn(move || decode_with_limit(&bytes, max_canvas_bytes))
            .map_err(SessionError::Spawn)?;
        Ok(Self {
            handle: Some(handle),
        })
    }

    /// True once the decode thread has exited (or the result was taken).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Take the result if decoding has finished, without blocking.
    pub fn try_take(&mut self) -> Option<Result<Arc<AnimatedImage>, SessionError>> {
        if !self.handle.as_ref()?.is_finished() {
            return None;
        }
        self.handle.take().map(join)
    }

    /// Block until decoding finishes.
    pub fn wait(mut self) -> Result<Arc<AnimatedImage>, SessionError> {
        let handle = self.handle.take().ok_or(SessionError::AlreadyTaken)?;
        join(handle)
    }
}

fn join(
    handle: JoinHandle<Result<AnimatedImage, DecodeError>>,
) -> Result<Arc<AnimatedImage>, SessionError> {
    match handle.join() {
        Ok(result) => Ok(Arc::new(result?)),
        Err(_) => Err(SessionError::DecoderPanicked),
    }
}
