//! PNG encoding.
//!
//! PNG is lossless, so quality only trades encode time for size: low values
//! ask for the strongest compression.

use std::io::Cursor;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::codec::CodecError;
use crate::{Quality, TargetFormat};

fn compression_for(quality: Quality) -> CompressionType {
    match quality.get() {
        0..=33 => CompressionType::Best,
        34..=66 => CompressionType::Default,
        _ => CompressionType::Fast,
    }
}

/// Encode an image as PNG, keeping an alpha channel when present.
pub fn encode_png(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new_with_quality(&mut buffer, compression_for(quality), FilterType::Adaptive);

    let result = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        encoder.write_image(rgba.as_raw(), rgba.width(), rgba.height(), ExtendedColorType::Rgba8)
    } else {
        let rgb = img.to_rgb8();
        encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
    };

    result.map_err(|e| CodecError::Encode {
        format: TargetFormat::Png,
        reason: e.to_string(),
    })?;

    Ok(buffer.into_inner())
}
