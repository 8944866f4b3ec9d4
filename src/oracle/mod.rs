//! The interpolation oracle capability and its built-in implementations.
//!
//! The scheduler only ever talks to `&dyn InterpolationOracle`, so any model runtime can be plugged
//! in without touching the scheduling code. Outputs are checked with [`validate_output`] before
//! they are accepted.

/// External-process oracle (one program invocation per request).
pub mod command;
/// Deterministic linear-blend oracle.
pub mod crossfade;
/// Bounded retry wrapper.
pub mod retry;

use crate::foundation::error::{InterpError, InterpResult};
use crate::raster::frame::Image;

/// Samples this far outside `[0, 1]` are clamped instead of rejected.
pub const RANGE_TOLERANCE: f32 = 1e-3;

/// One unit of oracle work: two equally-shaped images and a time fraction in `(0, 1)`.
#[derive(Clone, Copy, Debug)]
pub struct InterpolationRequest<'a> {
    pub x0: &'a Image,
    pub x1: &'a Image,
    pub time: f64,
}

/// A capability that returns a plausible intermediate image between two inputs.
///
/// Implementations must be free of side effects visible to the caller; they may be called
/// concurrently from a worker pool.
pub trait InterpolationOracle: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Produce the frame at `req.time` between `req.x0` and `req.x1`.
    fn interpolate(&self, req: &InterpolationRequest<'_>) -> InterpResult<Image>;
}

impl<T: InterpolationOracle + ?Sized> InterpolationOracle for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn interpolate(&self, req: &InterpolationRequest<'_>) -> InterpResult<Image> {
        (**self).interpolate(req)
    }
}

impl<T: InterpolationOracle + ?Sized> InterpolationOracle for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn interpolate(&self, req: &InterpolationRequest<'_>) -> InterpResult<Image> {
        (**self).interpolate(req)
    }
}

/// Check an oracle result against its request.
///
/// Wrong shape, non-finite samples or samples beyond [`RANGE_TOLERANCE`] of `[0, 1]` are
/// `OracleError`s. Samples within tolerance are clamped.
pub fn validate_output(req: &InterpolationRequest<'_>, out: Image) -> InterpResult<Image> {
    if !out.same_shape(req.x0) {
        return Err(InterpError::oracle(format!(
            "oracle returned {}x{} (h x w) for t={}, expected {}x{}",
            out.height(),
            out.width(),
            req.time,
            req.x0.height(),
            req.x0.width()
        )));
    }

    let mut needs_clamp = false;
    for &v in out.data() {
        if !v.is_finite() {
            return Err(InterpError::oracle(format!(
                "oracle returned a non-finite sample for t={}",
                req.time
            )));
        }
        if !(-RANGE_TOLERANCE..=1.0 + RANGE_TOLERANCE).contains(&v) {
            return Err(InterpError::oracle(format!(
                "oracle returned sample {v} outside [0, 1] for t={}",
                req.time
            )));
        }
        needs_clamp |= !(0.0..=1.0).contains(&v);
    }

    if !needs_clamp {
        return Ok(out);
    }
    let data = out.data().iter().map(|v| v.clamp(0.0, 1.0)).collect();
    Image::from_raw(out.height(), out.width(), data)
}

#[cfg(test)]
#[path = "../../tests/unit/oracle/validate.rs"]
mod tests;
