//! Frame scheduling: decide which time fractions to request from the oracle and return the
//! resulting frames in ascending time order.
//!
//! Two modes exist:
//!
//! - [`ScheduleMode::Even`]: `N` fractions `(i + 1) / (N + 1)`, each frame interpolated directly
//!   between the two original endpoints. Requests are independent of each other.
//! - [`ScheduleMode::Recursive`]: binary midpoint subdivision. Each level asks for `t = 0.5`
//!   between neighbours produced by the previous level, so `N + 1` must be a power of two.
//!
//! Either way the output is ordered by ascending nominal fraction, and the nominal fractions are
//! the same `(i + 1) / (N + 1)` grid.

use rayon::prelude::*;

use crate::foundation::cancel::CancelToken;
use crate::foundation::error::{InterpError, InterpResult};
use crate::oracle::{InterpolationOracle, InterpolationRequest, validate_output};
use crate::raster::frame::Image;

/// How intermediate frames are derived from the endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    /// Every frame is interpolated between the original endpoints.
    #[default]
    Even,
    /// Midpoint subdivision on previously generated frames.
    Recursive,
}

impl std::str::FromStr for ScheduleMode {
    type Err = InterpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "even" => Ok(Self::Even),
            "recursive" => Ok(Self::Recursive),
            other => Err(InterpError::validation(format!(
                "unknown schedule mode '{other}'"
            ))),
        }
    }
}

/// Worker-pool configuration for oracle calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Threading {
    pub parallel: bool,
    /// Pool size; `None` lets rayon pick.
    pub threads: Option<usize>,
}

impl Threading {
    pub fn validate(&self) -> InterpResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(InterpError::validation(
                "threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Options for [`schedule`].
#[derive(Clone, Debug, Default)]
pub struct ScheduleOpts {
    pub mode: ScheduleMode,
    pub threading: Threading,
    pub cancel: CancelToken,
}

/// What [`schedule_with_stats`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleStats {
    pub oracle_calls: u64,
    /// Nominal fraction of each returned frame, ascending.
    pub fractions: Vec<f64>,
}

/// `N` evenly spaced fractions `(i + 1) / (N + 1)`, strictly inside `(0, 1)`.
pub fn time_fractions(frame_count: usize) -> InterpResult<Vec<f64>> {
    if frame_count == 0 {
        return Err(InterpError::validation("frame_count must be >= 1"));
    }
    let denom = (frame_count + 1) as f64;
    Ok((0..frame_count).map(|i| (i + 1) as f64 / denom).collect())
}

/// Subdivision depth `d` with `2^d - 1 == frame_count`.
pub fn recursive_depth(frame_count: usize) -> InterpResult<u32> {
    let slots = frame_count.checked_add(1).unwrap_or(0);
    if frame_count == 0 || !slots.is_power_of_two() {
        return Err(InterpError::validation(format!(
            "recursive mode needs frame_count = 2^d - 1 (1, 3, 7, 15, ...), got {frame_count}"
        )));
    }
    Ok(slots.trailing_zeros())
}

/// Interpolate `frame_count` frames between `a` and `b`, in ascending time order.
pub fn schedule(
    a: &Image,
    b: &Image,
    frame_count: usize,
    oracle: &dyn InterpolationOracle,
    opts: &ScheduleOpts,
) -> InterpResult<Vec<Image>> {
    schedule_with_stats(a, b, frame_count, oracle, opts).map(|(frames, _)| frames)
}

#[tracing::instrument(
    skip_all,
    fields(
        frame_count = frame_count,
        mode = ?opts.mode,
        oracle = oracle.name(),
        parallel = opts.threading.parallel
    )
)]
pub fn schedule_with_stats(
    a: &Image,
    b: &Image,
    frame_count: usize,
    oracle: &dyn InterpolationOracle,
    opts: &ScheduleOpts,
) -> InterpResult<(Vec<Image>, ScheduleStats)> {
    if !a.same_shape(b) {
        return Err(InterpError::shape_mismatch(format!(
            "endpoints differ: {}x{} vs {}x{} (h x w)",
            a.height(),
            a.width(),
            b.height(),
            b.width()
        )));
    }
    let fractions = time_fractions(frame_count)?;
    opts.threading.validate()?;

    let pool = if opts.threading.parallel {
        Some(build_thread_pool(opts.threading.threads)?)
    } else {
        None
    };
    let runner = Runner {
        oracle,
        cancel: &opts.cancel,
        pool: pool.as_ref(),
    };

    let frames = match opts.mode {
        ScheduleMode::Even => {
            let reqs: Vec<_> = fractions
                .iter()
                .map(|&time| InterpolationRequest { x0: a, x1: b, time })
                .collect();
            runner.run(&reqs)?
        }
        ScheduleMode::Recursive => subdivide(a, b, recursive_depth(frame_count)?, &runner)?,
    };

    debug_assert_eq!(frames.len(), frame_count);
    let stats = ScheduleStats {
        oracle_calls: frames.len() as u64,
        fractions,
    };
    Ok((frames, stats))
}

/// Level-by-level midpoint subdivision. Returns the interior frames only.
fn subdivide(a: &Image, b: &Image, depth: u32, runner: &Runner<'_>) -> InterpResult<Vec<Image>> {
    let mut row = vec![a.clone(), b.clone()];
    for level in 1..=depth {
        let mids = {
            let reqs: Vec<_> = row
                .windows(2)
                .map(|pair| InterpolationRequest {
                    x0: &pair[0],
                    x1: &pair[1],
                    time: 0.5,
                })
                .collect();
            runner.run(&reqs)?
        };
        tracing::debug!(level, new_frames = mids.len(), "subdivision level done");

        let mut next = Vec::with_capacity(row.len() + mids.len());
        let mut mids = mids.into_iter();
        for (i, frame) in row.into_iter().enumerate() {
            if i > 0 {
                next.extend(mids.next());
            }
            next.push(frame);
        }
        row = next;
    }

    // Drop the endpoints.
    row.pop();
    row.remove(0);
    Ok(row)
}

struct Runner<'a> {
    oracle: &'a dyn InterpolationOracle,
    cancel: &'a CancelToken,
    pool: Option<&'a rayon::ThreadPool>,
}

impl Runner<'_> {
    /// Run independent requests; the result keeps request order.
    fn run(&self, reqs: &[InterpolationRequest<'_>]) -> InterpResult<Vec<Image>> {
        match self.pool {
            None => reqs.iter().map(|req| self.call(req)).collect(),
            Some(pool) => pool.install(|| reqs.par_iter().map(|req| self.call(req)).collect()),
        }
    }

    fn call(&self, req: &InterpolationRequest<'_>) -> InterpResult<Image> {
        self.cancel.check(&format!("oracle call at t={}", req.time))?;
        tracing::debug!(t = req.time, "oracle call");
        let out = self.oracle.interpolate(req)?;
        validate_output(req, out)
    }
}

fn build_thread_pool(threads: Option<usize>) -> InterpResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| InterpError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/schedule.rs"]
mod tests;
