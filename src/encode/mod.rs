//! Encoding: quantize a [`FrameSequence`] and hand it to a [`FrameSink`].
//!
//! Duration convention: every frame is shown for `1 / fps`, so a sequence of `n` frames plays for
//! `n / fps` seconds.

/// `ffmpeg`-based sink (system binary, raw frames over stdin).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

use crate::assemble::FrameSequence;
use crate::encode::sink::{FrameRgb8, FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::InterpResult;

/// What [`write_video`] produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoSummary {
    pub frames: u64,
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub duration_secs: f64,
}

/// Stream `seq` into `sink` at `fps`.
///
/// On any failure the sink is aborted, which for file sinks removes the partial output.
pub fn write_video(
    seq: &FrameSequence,
    fps: Fps,
    sink: &mut dyn FrameSink,
) -> InterpResult<VideoSummary> {
    fps.validate()?;
    let (height, width) = seq.frame_shape();
    let frames = seq.len() as u64;

    let result = stream(seq, fps, width, height, sink);
    if let Err(e) = result {
        sink.abort();
        return Err(e);
    }

    let summary = VideoSummary {
        frames,
        width,
        height,
        fps,
        duration_secs: fps.frames_to_secs(frames),
    };
    tracing::info!(
        frames,
        size = %format!("{width}x{height}"),
        fps = %fps.ffmpeg_arg(),
        duration_secs = summary.duration_secs,
        "video written"
    );
    Ok(summary)
}

fn stream(
    seq: &FrameSequence,
    fps: Fps,
    width: u32,
    height: u32,
    sink: &mut dyn FrameSink,
) -> InterpResult<()> {
    sink.begin(SinkConfig {
        width,
        height,
        fps,
        frame_count: seq.len() as u64,
    })?;
    for (i, img) in seq.frames().iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), &FrameRgb8::from_image(img))?;
    }
    sink.end()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/write.rs"]
mod tests;
