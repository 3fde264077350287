//! Encoders for each [`TargetFormat`].

mod jpeg;
mod png;
mod webp;

use image::DynamicImage;

pub use self::jpeg::encode_jpeg;
pub use self::png::encode_png;
pub use self::webp::encode_webp;

use crate::codec::CodecError;
use crate::{Quality, TargetFormat};

/// Encode `img` into `format` at `quality`.
pub fn encode(img: &DynamicImage, format: TargetFormat, quality: Quality) -> Result<Vec<u8>, CodecError> {
    match format {
        TargetFormat::Jpeg => encode_jpeg(img, quality),
        TargetFormat::Png => encode_png(img, quality),
        TargetFormat::WebP => encode_webp(img, quality),
    }
}
