use std::path::{Path, PathBuf};

use crate::assemble::{FrameSequence, assemble};
use crate::encode::sink::FrameSink;
use crate::encode::{VideoSummary, write_video};
use crate::foundation::cancel::CancelToken;
use crate::foundation::core::{Fps, Size};
use crate::foundation::error::{InterpError, InterpResult};
use crate::oracle::InterpolationOracle;
use crate::oracle::retry::{RetryPolicy, RetryingOracle};
use crate::pad::{DEFAULT_ALIGNMENT, MAX_PADDED_SIDE, pad};
use crate::raster::codec::{load_image, save_image};
use crate::raster::frame::Image;
use crate::schedule::{ScheduleMode, ScheduleOpts, Threading, schedule_with_stats};

/// Everything that shapes one interpolation run.
///
/// Serializable so it can be loaded from a JSON file; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Resize both inputs to this size on load. `None` keeps the decoded size.
    pub target_size: Option<Size>,
    /// Number of interpolated frames between the endpoints.
    pub frame_count: usize,
    pub fps: Fps,
    /// Both sides are padded to a multiple of this before reaching the oracle.
    pub alignment: u32,
    pub mode: ScheduleMode,
    pub threading: Threading,
    pub retry: RetryPolicy,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            target_size: None,
            frame_count: 1,
            fps: Fps { num: 2, den: 1 },
            alignment: DEFAULT_ALIGNMENT,
            mode: ScheduleMode::Even,
            threading: Threading::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Named starting points for [`InterpolationConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// 256x256, one midpoint frame, 2 fps.
    Quick,
    /// 512x512, 65 frames, 20 fps.
    Smooth,
}

impl Preset {
    pub fn config(self) -> InterpolationConfig {
        match self {
            Self::Quick => InterpolationConfig {
                target_size: Some(Size::new(256, 256)),
                frame_count: 1,
                fps: Fps { num: 2, den: 1 },
                ..InterpolationConfig::default()
            },
            Self::Smooth => InterpolationConfig {
                target_size: Some(Size::new(512, 512)),
                frame_count: 65,
                fps: Fps { num: 20, den: 1 },
                ..InterpolationConfig::default()
            },
        }
    }
}

impl InterpolationConfig {
    pub fn validate(&self) -> InterpResult<()> {
        if self.frame_count == 0 {
            return Err(InterpError::validation("frame_count must be >= 1"));
        }
        if self.alignment == 0 || self.alignment > MAX_PADDED_SIDE {
            return Err(InterpError::validation(format!(
                "alignment must be in 1..={MAX_PADDED_SIDE}, got {}",
                self.alignment
            )));
        }
        if let Some(size) = self.target_size
            && size.is_empty()
        {
            return Err(InterpError::validation(format!(
                "target_size {size} must be non-zero"
            )));
        }
        if !self.alignment.is_power_of_two() {
            tracing::warn!(
                alignment = self.alignment,
                "alignment is not a power of two; most models will reject it"
            );
        }
        if self.mode == ScheduleMode::Recursive {
            crate::schedule::recursive_depth(self.frame_count)?;
        }
        self.fps.validate()?;
        self.threading.validate()?;
        self.retry.validate()
    }

    /// Load a JSON config file.
    pub fn from_json_file(path: &Path) -> InterpResult<Self> {
        let f = std::fs::File::open(path)
            .map_err(|e| InterpError::io(format!("open config '{}': {e}", path.display())))?;
        serde_json::from_reader(std::io::BufReader::new(f)).map_err(|e| {
            InterpError::validation(format!("parse config '{}': {e}", path.display()))
        })
    }
}

/// Summary of a completed [`run`].
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Frames in the final sequence, endpoints included.
    pub frames: usize,
    pub oracle_calls: u64,
    /// Shape the oracle worked at.
    pub padded_size: Size,
    /// Shape of the final frames.
    pub output_size: Size,
    /// Nominal time fraction of every interpolated frame.
    pub fractions: Vec<f64>,
    /// `frames / fps`.
    pub duration_secs: f64,
}

/// Pad, schedule and assemble: the whole algorithm, with no file IO.
#[tracing::instrument(
    skip_all,
    fields(
        frame_count = cfg.frame_count,
        alignment = cfg.alignment,
        oracle = oracle.name()
    )
)]
pub fn run(
    cfg: &InterpolationConfig,
    oracle: &dyn InterpolationOracle,
    a: &Image,
    b: &Image,
    cancel: &CancelToken,
) -> InterpResult<(FrameSequence, RunReport)> {
    cfg.validate()?;
    if !a.same_shape(b) {
        return Err(InterpError::shape_mismatch(format!(
            "endpoint images differ: {}x{} vs {}x{} (h x w)",
            a.height(),
            a.width(),
            b.height(),
            b.width()
        )));
    }

    let (padded_a, pad_a) = pad(a, cfg.alignment)?;
    let (padded_b, pad_b) = pad(b, cfg.alignment)?;
    tracing::debug!(
        from = %a.size(),
        to = %padded_a.size(),
        "padded endpoints"
    );

    let oracle = RetryingOracle::new(oracle, cfg.retry)?;
    let opts = ScheduleOpts {
        mode: cfg.mode,
        threading: cfg.threading.clone(),
        cancel: cancel.clone(),
    };
    let (interpolated, stats) =
        schedule_with_stats(&padded_a, &padded_b, cfg.frame_count, &oracle, &opts)?;

    let seq = assemble(&padded_a, &padded_b, interpolated, &pad_a, &pad_b)?;
    let report = RunReport {
        frames: seq.len(),
        oracle_calls: stats.oracle_calls,
        padded_size: padded_a.size(),
        output_size: a.size(),
        fractions: stats.fractions,
        duration_secs: cfg.fps.frames_to_secs(seq.len() as u64),
    };
    tracing::info!(
        frames = report.frames,
        oracle_calls = report.oracle_calls,
        padded = %report.padded_size,
        "interpolation finished"
    );
    Ok((seq, report))
}

/// Input/output locations for [`interpolate_files`].
#[derive(Clone, Debug)]
pub struct FileJob {
    pub image1: PathBuf,
    pub image2: PathBuf,
    /// Write every final frame as `frame_00000.png`, ... into this directory.
    pub dump_frames: Option<PathBuf>,
}

/// Load both images, [`run`], optionally dump frames, then encode into `sink`.
///
/// Nothing reaches the sink unless the whole run succeeded.
pub fn interpolate_files(
    cfg: &InterpolationConfig,
    oracle: &dyn InterpolationOracle,
    job: &FileJob,
    sink: &mut dyn FrameSink,
    cancel: &CancelToken,
) -> InterpResult<(RunReport, VideoSummary)> {
    cfg.validate()?;
    let a = load_image(&job.image1, cfg.target_size)?;
    let b = load_image(&job.image2, cfg.target_size)?;

    let (seq, report) = run(cfg, oracle, &a, &b, cancel)?;

    if let Some(dir) = job.dump_frames.as_deref() {
        dump_frames(&seq, dir)?;
    }

    cancel.check("encoding")?;
    let summary = write_video(&seq, cfg.fps, sink)?;
    Ok((report, summary))
}

/// Write each frame of `seq` as a numbered PNG into `dir`.
pub fn dump_frames(seq: &FrameSequence, dir: &Path) -> InterpResult<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| InterpError::io(format!("create frame dir '{}': {e}", dir.display())))?;
    for (i, frame) in seq.frames().iter().enumerate() {
        save_image(frame, &dir.join(format!("frame_{i:05}.png")))?;
    }
    tracing::debug!(count = seq.len(), dir = %dir.display(), "dumped frames");
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
