use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{InterpError, InterpResult};
use crate::raster::frame::Image;

/// Quantized frame handed to a [`FrameSink`]: interleaved 8-bit RGB, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb8 {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRgb8 {
    /// Round and clamp a normalized image to `[0, 255]`.
    pub fn from_image(img: &Image) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.to_rgb8(),
        }
    }
}

/// Configuration provided to a [`FrameSink`] before any frame is pushed.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Number of frames that will be pushed.
    pub frame_count: u64,
}

/// Consumer of encoded frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> InterpResult<()>;
    /// Push one frame in strictly increasing timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> InterpResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> InterpResult<()>;
    /// Undo partial output after a failure. The default does nothing.
    fn abort(&mut self) {}
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRgb8)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRgb8)] {
        &self.frames
    }

    /// Whether `end` was reached.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> InterpResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb8) -> InterpResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| InterpError::io("in-memory sink not started"))?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(InterpError::io(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(InterpError::io(format!(
                "frame index {} pushed after {}",
                idx.0, last.0
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> InterpResult<()> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.frames.clear();
    }
}
