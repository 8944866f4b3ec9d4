use crate::foundation::error::{InterpError, InterpResult};
use crate::oracle::{InterpolationOracle, InterpolationRequest};
use crate::raster::frame::Image;

/// Per-pixel linear blend `(1 - t) * x0 + t * x1`.
///
/// Deterministic and model-free. Blending an image with itself returns it unchanged at every
/// `t`, which makes it the reference fake for scheduling tests and the fallback when no model is
/// configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrossfadeOracle;

impl InterpolationOracle for CrossfadeOracle {
    fn name(&self) -> &str {
        "crossfade"
    }

    fn interpolate(&self, req: &InterpolationRequest<'_>) -> InterpResult<Image> {
        if !req.x0.same_shape(req.x1) {
            return Err(InterpError::oracle(format!(
                "crossfade inputs differ in shape: {}x{} vs {}x{} (h x w)",
                req.x0.height(),
                req.x0.width(),
                req.x1.height(),
                req.x1.width()
            )));
        }

        let t = req.time as f32;
        let data = req
            .x0
            .data()
            .iter()
            .zip(req.x1.data())
            .map(|(&a, &b)| if a == b { a } else { a + (b - a) * t })
            .collect();
        Image::from_raw(req.x0.height(), req.x0.width(), data)
    }
}
