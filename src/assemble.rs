use crate::foundation::error::{InterpError, InterpResult};
use crate::pad::{Padding, crop};
use crate::raster::frame::Image;

/// Final ordered frames: first endpoint, interpolated frames, second endpoint.
///
/// Invariants: at least two frames, all of identical shape.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Image>,
}

impl FrameSequence {
    /// Wrap already-ordered frames, checking the sequence invariants.
    pub fn new(frames: Vec<Image>) -> InterpResult<Self> {
        if frames.len() < 2 {
            return Err(InterpError::validation(format!(
                "a frame sequence needs both endpoints, got {} frame(s)",
                frames.len()
            )));
        }
        let first = &frames[0];
        if let Some((i, f)) = frames.iter().enumerate().find(|(_, f)| !f.same_shape(first)) {
            return Err(InterpError::shape_mismatch(format!(
                "frame {i} is {}x{} (h x w), frame 0 is {}x{}",
                f.height(),
                f.width(),
                first.height(),
                first.width()
            )));
        }
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[Image] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// `(height, width)` shared by every frame.
    pub fn frame_shape(&self) -> (u32, u32) {
        (self.frames[0].height(), self.frames[0].width())
    }
}

/// Build `[a] + interpolated + [b]`, cropping every frame back to its pre-padding size.
///
/// `a` and `b` are the padded endpoints handed to the scheduler; interpolated frames share the
/// padded shape. Fails with `CropMismatch` when the two descriptors disagree or any frame does
/// not have the padded shape they describe.
pub fn assemble(
    a: &Image,
    b: &Image,
    interpolated: Vec<Image>,
    pad_a: &Padding,
    pad_b: &Padding,
) -> InterpResult<FrameSequence> {
    if pad_a != pad_b {
        return Err(InterpError::crop_mismatch(format!(
            "endpoints were padded differently: {pad_a:?} vs {pad_b:?}"
        )));
    }

    let mut frames = Vec::with_capacity(interpolated.len() + 2);
    frames.push(crop(a, pad_a)?);
    for frame in &interpolated {
        frames.push(crop(frame, pad_a)?);
    }
    frames.push(crop(b, pad_b)?);

    FrameSequence::new(frames)
}

#[cfg(test)]
#[path = "../tests/unit/assemble.rs"]
mod tests;
