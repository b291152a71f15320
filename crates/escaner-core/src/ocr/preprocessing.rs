//! Image decoding ahead of OCR.

use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::OcrError;

/// Decode uploaded image bytes into an RGB image.
///
/// Any format supported by the `image` crate is accepted. Images whose longer
/// side exceeds `max_size` are downscaled, keeping aspect ratio; a `max_size`
/// of 0 disables resizing.
pub fn decode_image(bytes: &[u8], max_size: u32) -> Result<DynamicImage, OcrError> {
    if bytes.is_empty() {
        return Err(OcrError::InvalidImage("empty upload".to_string()));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

    let (width, height) = image.dimensions();
    debug!("Decoded image: {}x{}", width, height);

    let image = if max_size > 0 && width.max(height) > max_size {
        let (new_width, new_height) = fit_within(width, height, max_size);
        debug!("Resizing image to {}x{}", new_width, new_height);
        image.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
    } else {
        image
    };

    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

/// Scale dimensions so the longer side equals `max_size`.
fn fit_within(width: u32, height: u32, max_size: u32) -> (u32, u32) {
    let scale = max_size as f32 / width.max(height) as f32;
    let new_width = ((width as f32 * scale).round() as u32).max(1);
    let new_height = ((height as f32 * scale).round() as u32).max(1);
    (new_width, new_height)
}
