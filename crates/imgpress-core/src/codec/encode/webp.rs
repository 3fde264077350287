//! WebP encoding through libwebp.

use image::DynamicImage;

use crate::codec::CodecError;
use crate::{Quality, TargetFormat};

/// Encode an image as WebP.
///
/// Lossy at the given quality; the top of the scale switches to lossless.
/// Alpha is kept when the source has it.
pub fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
    let lossless = quality.is_max();
    let q = quality.get() as f32;

    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        ::webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height()).encode_simple(lossless, q)
    } else {
        let rgb = img.to_rgb8();
        ::webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height()).encode_simple(lossless, q)
    };

    let memory = encoded.map_err(|e| CodecError::Encode {
        format: TargetFormat::WebP,
        reason: format!("{e:?}"),
    })?;

    Ok(memory.to_vec())
}
