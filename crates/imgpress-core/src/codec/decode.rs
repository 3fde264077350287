//! Decoding of uploaded images with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{CodecError, Orientation};

/// Decode an image of any supported container, applying EXIF orientation.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes as uploaded
///
/// # Returns
///
/// The decoded image, upright. Alpha is preserved when the source has it.
///
/// # Errors
///
/// Returns `CodecError::EmptyInput` for zero bytes and `CodecError::Decode`
/// when the container is unknown or the data is corrupted.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let orientation = orientation(bytes);

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CodecError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| CodecError::Decode(e.to_string()))?;

    Ok(apply_orientation(img, orientation))
}

/// Read the EXIF orientation tag, defaulting to `Normal`.
///
/// Works for every container `kamadak-exif` understands (JPEG, PNG, WebP, TIFF).
pub fn orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fixtures;
    use image::GenericImageView;

    #[test]
    fn test_decode_png_keeps_alpha() {
        let img = decode(&fixtures::png_rgba(4, 3)).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert!(img.color().has_alpha());
    }

    #[test]
    fn test_decode_jpeg() {
        let img = decode(&fixtures::jpeg(8, 6)).unwrap();
        assert_eq!(img.dimensions(), (8, 6));
    }

    #[test]
    fn test_decode_gif_source() {
        let img = decode(&fixtures::gif(5, 5)).unwrap();
        assert_eq!(img.dimensions(), (5, 5));
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(&[]).unwrap_err(), CodecError::EmptyInput);
    }

    #[test]
    fn test_decode_garbage() {
        let result = decode(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_decode_truncated_png() {
        let png = fixtures::png_rgba(16, 16);
        let result = decode(&png[..png.len() / 2]);
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(orientation(&fixtures::jpeg(2, 2)), Orientation::Normal);
        assert_eq!(orientation(&[]), Orientation::Normal);
    }

    #[test]
    fn test_orientation_from_exif() {
        assert_eq!(orientation(&fixtures::jpeg_with_orientation(8, 4, 6)), Orientation::Rotate90CW);
        assert_eq!(orientation(&fixtures::jpeg_with_orientation(8, 4, 3)), Orientation::Rotate180);
    }

    #[test]
    fn test_decode_applies_exif_rotation() {
        let rotated = decode(&fixtures::jpeg_with_orientation(8, 4, 6)).unwrap();
        assert_eq!(rotated.dimensions(), (4, 8));

        let upright = decode(&fixtures::jpeg_with_orientation(8, 4, 1)).unwrap();
        assert_eq!(upright.dimensions(), (8, 4));
    }

    #[test]
    fn test_apply_orientation_rotations() {
        let img = DynamicImage::new_rgb8(4, 2);
        assert_eq!(apply_orientation(img.clone(), Orientation::Rotate90CW).dimensions(), (2, 4));
        assert_eq!(apply_orientation(img.clone(), Orientation::Transverse).dimensions(), (2, 4));
        assert_eq!(apply_orientation(img.clone(), Orientation::Rotate180).dimensions(), (4, 2));
        assert_eq!(apply_orientation(img, Orientation::FlipVertical).dimensions(), (4, 2));
    }

    #[test]
    fn test_apply_orientation_flip_moves_pixels() {
        let mut img = image::RgbImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgb([255, 0, 0]));

        let flipped = apply_orientation(DynamicImage::ImageRgb8(img), Orientation::FlipHorizontal);
        assert_eq!(flipped.to_rgb8().get_pixel(1, 0).0, [255, 0, 0]);
        assert_eq!(flipped.to_rgb8().get_pixel(0, 0).0, [0, 0, 0]);
    }
}
