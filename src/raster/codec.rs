use std::path::Path;

use image::imageops::FilterType;

use crate::foundation::core::Size;
use crate::foundation::error::{InterpError, InterpResult};
use crate::raster::frame::Image;

/// Decode an encoded image (any format the `image` crate understands) into a normalized RGB
/// [`Image`], optionally resizing to `target`.
pub fn decode_image(bytes: &[u8], target: Option<Size>) -> InterpResult<Image> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| InterpError::io(format!("decode image from memory: {e}")))?;
    to_normalized(dyn_img, target)
}

/// Read and decode `path`. See [`decode_image`].
pub fn load_image(path: &Path, target: Option<Size>) -> InterpResult<Image> {
    let dyn_img = image::open(path)
        .map_err(|e| InterpError::io(format!("read image '{}': {e}", path.display())))?;
    to_normalized(dyn_img, target)
}

/// Quantize `img` to 8-bit RGB and write it; the format follows the file extension.
pub fn save_image(img: &Image, path: &Path) -> InterpResult<()> {
    crate::encode::ffmpeg::ensure_parent_dir(path)?;
    image::save_buffer(
        path,
        &img.to_rgb8(),
        img.width(),
        img.height(),
        image::ColorType::Rgb8,
    )
    .map_err(|e| InterpError::io(format!("write image '{}': {e}", path.display())))
}

fn to_normalized(dyn_img: image::DynamicImage, target: Option<Size>) -> InterpResult<Image> {
    if dyn_img.width() == 0 || dyn_img.height() == 0 {
        return Err(InterpError::invalid_dimension(format!(
            "decoded image is {}x{}",
            dyn_img.width(),
            dyn_img.height()
        )));
    }

    let dyn_img = match target {
        Some(size) if size.is_empty() => {
            return Err(InterpError::validation(format!(
                "resize target {size} must be non-zero"
            )));
        }
        Some(size) if size != Size::new(dyn_img.width(), dyn_img.height()) => {
            dyn_img.resize_exact(size.width, size.height, FilterType::Triangle)
        }
        _ => dyn_img,
    };

    let rgb = dyn_img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Image::from_rgb8(height, width, rgb.as_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/codec.rs"]
mod tests;
