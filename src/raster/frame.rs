use std::sync::Arc;

use crate::foundation::core::Size;
use crate::foundation::error::{InterpError, InterpResult};

/// Number of color channels in every [`Image`].
pub const CHANNELS: usize = 3;

/// Immutable RGB image with `f32` samples normalized to `[0.0, 1.0]`.
///
/// Layout is row-major, interleaved `(height, width, 3)`. Pixel storage is shared, so cloning is
/// cheap; every oracle request receives its own handle to the same endpoint data.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    height: u32,
    width: u32,
    data: Arc<Vec<f32>>,
}

impl Image {
    /// Wrap an interleaved RGB buffer.
    ///
    /// Fails with `InvalidDimension` when either side is zero or the buffer length is not
    /// `height * width * 3`.
    pub fn from_raw(height: u32, width: u32, data: Vec<f32>) -> InterpResult<Self> {
        if height == 0 || width == 0 {
            return Err(InterpError::invalid_dimension(format!(
                "image must have positive height and width, got {height}x{width} (h x w)"
            )));
        }
        let expected = sample_count(height, width);
        if data.len() != expected {
            return Err(InterpError::invalid_dimension(format!(
                "image buffer holds {} samples, expected {expected} for {height}x{width}x{CHANNELS}",
                data.len()
            )));
        }
        Ok(Self {
            height,
            width,
            data: Arc::new(data),
        })
    }

    /// Image of the given shape filled with one color.
    pub fn filled(height: u32, width: u32, rgb: [f32; 3]) -> InterpResult<Self> {
        if height == 0 || width == 0 {
            return Err(InterpError::invalid_dimension(format!(
                "image must have positive height and width, got {height}x{width} (h x w)"
            )));
        }
        let px = (height as usize) * (width as usize);
        let mut data = Vec::with_capacity(px * CHANNELS);
        for _ in 0..px {
            data.extend_from_slice(&rgb);
        }
        Self::from_raw(height, width, data)
    }

    /// Normalize 8-bit RGB samples to `[0, 1]`.
    pub fn from_rgb8(height: u32, width: u32, rgb: &[u8]) -> InterpResult<Self> {
        let data = rgb.iter().map(|&v| f32::from(v) / 255.0).collect();
        Self::from_raw(height, width, data)
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// `(height, width, channels)`.
    pub fn shape(&self) -> (u32, u32, usize) {
        (self.height, self.width, CHANNELS)
    }

    pub fn same_shape(&self, other: &Image) -> bool {
        self.height == other.height && self.width == other.width
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// RGB triple at `(y, x)`.
    pub fn pixel(&self, y: u32, x: u32) -> [f32; 3] {
        let i = self.offset(y, x);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Row `y` as an interleaved slice of `width * 3` samples.
    pub fn row(&self, y: u32) -> &[f32] {
        let start = self.offset(y, 0);
        &self.data[start..start + (self.width as usize) * CHANNELS]
    }

    /// Quantize to interleaved 8-bit RGB. Every output value lies in `[0, 255]`.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data.iter().copied().map(quantize_u8).collect()
    }

    fn offset(&self, y: u32, x: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * CHANNELS
    }
}

/// Map a normalized sample to `[0, 255]` with rounding and clamping. NaN maps to 0.
#[inline]
pub fn quantize_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn sample_count(height: u32, width: u32) -> usize {
    (height as usize) * (width as usize) * CHANNELS
}

#[cfg(test)]
#[path = "../../tests/unit/raster/frame.rs"]
mod tests;
