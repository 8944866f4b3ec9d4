//! Inbetween turns two still images into a smooth video transition.
//!
//! An interpolation oracle (any model that, given two images and a time fraction, returns a
//! plausible intermediate image) is asked for evenly spaced frames between the endpoints, and the
//! results are assembled in temporal order and encoded with the system `ffmpeg`.
//!
//! # Pipeline overview
//!
//! 1. **Pad**: both endpoints are zero-padded so their sides are multiples of the alignment
//!    factor, content centered ([`pad`]).
//! 2. **Schedule**: `N` requests at `t = (i + 1) / (N + 1)`, each between the two original
//!    endpoints, optionally on a worker pool ([`schedule`]).
//! 3. **Assemble**: `[a] + frames + [b]`, every frame cropped back to the original size
//!    ([`assemble`]).
//! 4. **Encode**: quantize to 8-bit RGB and stream to a [`FrameSink`] ([`write_video`]).
//!
//! The oracle is injected as `&dyn InterpolationOracle`; [`CrossfadeOracle`] is a deterministic
//! stand-in and [`CommandOracle`] drives an external model process.
#![forbid(unsafe_code)]

/// Sequence assembly and cropping.
pub mod assemble;
/// Frame sinks and the video writer.
pub mod encode;
mod foundation;
/// Interpolation oracle capability.
pub mod oracle;
/// Alignment padding.
pub mod pad;
/// Configuration and end-to-end runs.
pub mod pipeline;
mod raster;
/// Time-fraction scheduling.
pub mod schedule;

pub use assemble::{FrameSequence, assemble};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path};
pub use encode::sink::{FrameRgb8, FrameSink, InMemorySink, SinkConfig};
pub use encode::{VideoSummary, write_video};
pub use foundation::cancel::CancelToken;
pub use foundation::core::{Fps, FrameIndex, Size};
pub use foundation::error::{InterpError, InterpResult};
pub use oracle::command::CommandOracle;
pub use oracle::crossfade::CrossfadeOracle;
pub use oracle::retry::{RetryPolicy, RetryingOracle};
pub use oracle::{InterpolationOracle, InterpolationRequest, validate_output};
pub use pad::{DEFAULT_ALIGNMENT, MAX_PADDED_SIDE, Padding, crop, pad};
pub use pipeline::{FileJob, InterpolationConfig, Preset, RunReport, interpolate_files, run};
pub use raster::codec::{decode_image, load_image, save_image};
pub use raster::frame::{CHANNELS, Image, quantize_u8};
pub use schedule::{
    ScheduleMode, ScheduleOpts, ScheduleStats, Threading, recursive_depth, schedule,
    schedule_with_stats, time_fractions,
};
