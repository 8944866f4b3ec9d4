//! Alignment padding: grow an image so both sides are multiples of an alignment factor, keeping
//! the original content centered, and invert it again with [`crop`].

use crate::foundation::error::{InterpError, InterpResult};
use crate::raster::frame::{CHANNELS, Image};

/// Default alignment expected by FILM-style interpolation models.
pub const DEFAULT_ALIGNMENT: u32 = 64;

/// Largest padded side [`Padding::for_size`] accepts, in pixels.
pub const MAX_PADDED_SIDE: u32 = 1 << 15;

/// Everything needed to undo [`pad`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Padding {
    pub orig_height: u32,
    pub orig_width: u32,
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl Padding {
    /// Zero padding for an image of the given size.
    pub fn none(orig_height: u32, orig_width: u32) -> Self {
        Self {
            orig_height,
            orig_width,
            top: 0,
            bottom: 0,
            left: 0,
            right: 0,
        }
    }

    /// Compute the padding that aligns `height x width` to `alignment`.
    ///
    /// Odd totals put the extra pixel on the trailing edge (bottom/right).
    pub fn for_size(height: u32, width: u32, alignment: u32) -> InterpResult<Self> {
        if height == 0 || width == 0 {
            return Err(InterpError::invalid_dimension(format!(
                "cannot pad a {height}x{width} (h x w) image"
            )));
        }
        if alignment == 0 {
            return Err(InterpError::validation("alignment must be >= 1"));
        }
        let pad_h = pad_amount(height, alignment);
        let pad_w = pad_amount(width, alignment);
        let padded_h = u64::from(height) + u64::from(pad_h);
        let padded_w = u64::from(width) + u64::from(pad_w);
        if padded_h > u64::from(MAX_PADDED_SIDE) || padded_w > u64::from(MAX_PADDED_SIDE) {
            return Err(InterpError::invalid_dimension(format!(
                "{height}x{width} (h x w) aligned to {alignment} becomes {padded_h}x{padded_w}, \
                 above the {MAX_PADDED_SIDE} px limit"
            )));
        }
        let (top, bottom) = split(pad_h);
        let (left, right) = split(pad_w);
        Ok(Self {
            orig_height: height,
            orig_width: width,
            top,
            bottom,
            left,
            right,
        })
    }

    pub fn padded_height(&self) -> u32 {
        self.orig_height
            .saturating_add(self.top)
            .saturating_add(self.bottom)
    }

    pub fn padded_width(&self) -> u32 {
        self.orig_width
            .saturating_add(self.left)
            .saturating_add(self.right)
    }

    pub fn is_noop(&self) -> bool {
        self.top == 0 && self.bottom == 0 && self.left == 0 && self.right == 0
    }
}

/// Smallest `p >= 0` with `(dim + p) % alignment == 0`.
fn pad_amount(dim: u32, alignment: u32) -> u32 {
    match dim % alignment {
        0 => 0,
        rem => alignment - rem,
    }
}

fn split(total: u32) -> (u32, u32) {
    let lead = total / 2;
    (lead, total - lead)
}

/// Zero-fill `img` so both sides are multiples of `alignment`, content centered.
///
/// Already-aligned images come back unchanged (same pixel storage) with zero padding.
pub fn pad(img: &Image, alignment: u32) -> InterpResult<(Image, Padding)> {
    let padding = Padding::for_size(img.height(), img.width(), alignment)?;
    if padding.is_noop() {
        return Ok((img.clone(), padding));
    }

    let out_w = padding.padded_width() as usize;
    let out_h = padding.padded_height() as usize;
    let samples = out_h
        .checked_mul(out_w)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| {
            InterpError::invalid_dimension(format!("padded size {out_h}x{out_w} overflows"))
        })?;
    let mut data = vec![0.0f32; samples];

    let row_len = (img.width() as usize) * CHANNELS;
    for y in 0..img.height() {
        let dst_y = (y + padding.top) as usize;
        let start = (dst_y * out_w + padding.left as usize) * CHANNELS;
        data[start..start + row_len].copy_from_slice(img.row(y));
    }

    let padded = Image::from_raw(out_h as u32, out_w as u32, data)?;
    Ok((padded, padding))
}

/// Cut the original region back out of a padded frame.
///
/// Fails with `CropMismatch` if `img` is not exactly the padded shape `padding` describes.
pub fn crop(img: &Image, padding: &Padding) -> InterpResult<Image> {
    if img.height() != padding.padded_height() || img.width() != padding.padded_width() {
        return Err(InterpError::crop_mismatch(format!(
            "frame is {}x{} (h x w), expected padded shape {}x{}",
            img.height(),
            img.width(),
            padding.padded_height(),
            padding.padded_width()
        )));
    }
    if padding.is_noop() {
        return Ok(img.clone());
    }

    let left = padding.left as usize * CHANNELS;
    let row_len = padding.orig_width as usize * CHANNELS;
    let mut data = Vec::with_capacity(padding.orig_height as usize * row_len);
    for y in padding.top..padding.top + padding.orig_height {
        data.extend_from_slice(&img.row(y)[left..left + row_len]);
    }
    Image::from_raw(padding.orig_height, padding.orig_width, data)
        .map_err(|e| InterpError::crop_mismatch(e.to_string()))
}

#[cfg(test)]
#[path = "../tests/unit/pad.rs"]
mod tests;
