//! JPEG encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::codec::CodecError;
use crate::{Quality, TargetFormat};

/// Encode an image as baseline JPEG.
///
/// JPEG has no alpha channel, so transparency is dropped before encoding.
///
/// # Arguments
///
/// * `img` - Decoded source image
/// * `quality` - JPEG quality, passed to the encoder unchanged
pub fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
    let rgb = img.to_rgb8();
    let mut buffer = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut buffer, quality.get())
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| CodecError::Encode {
            format: TargetFormat::Jpeg,
            reason: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}
