//! In-process transcoding.
//!
//! Decodes any container the `image` crate recognizes (JPEG, PNG, WebP, GIF,
//! BMP), straightens it per EXIF orientation and re-encodes it into one of the
//! [`TargetFormat`](crate::TargetFormat)s. Output carries no metadata.

mod decode;
mod encode;
mod transcode;
mod types;

pub use decode::{decode, orientation};
pub use encode::{encode, encode_jpeg, encode_png, encode_webp};
pub use transcode::{transcode, LocalTranscoder, Transcoded};
pub use types::{CodecError, Orientation};

#[cfg(test)]
pub(crate) mod fixtures {
    //! Small encoded images for tests.

    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    fn pattern(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 11) as u8, (y * 13) as u8, ((x ^ y) * 17) as u8, 255 - (x as u8)])
        })
    }

    fn write(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    pub fn png_rgba(width: u32, height: u32) -> Vec<u8> {
        write(DynamicImage::ImageRgba8(pattern(width, height)), ImageFormat::Png)
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let rgb = DynamicImage::ImageRgba8(pattern(width, height)).to_rgb8();
        write(DynamicImage::ImageRgb8(rgb), ImageFormat::Jpeg)
    }

    /// Baseline JPEG carrying an EXIF APP1 segment with the given orientation tag.
    pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
        let mut tiff = Vec::new();
        // big-endian header, first IFD at offset 8
        tiff.extend_from_slice(b"MM\x00\x2a\x00\x00\x00\x08");
        // one entry: Orientation (0x0112), SHORT, count 1
        tiff.extend_from_slice(&[0x00, 0x01, 0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0x00, 0x00]);
        // no next IFD
        tiff.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let mut app1 = b"Exif\x00\x00".to_vec();
        app1.extend_from_slice(&tiff);
        let segment_len = (app1.len() + 2) as u16;

        let plain = jpeg(width, height);
        let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
        out.extend_from_slice(&segment_len.to_be_bytes());
        out.extend_from_slice(&app1);
        out.extend_from_slice(&plain[2..]);
        out
    }

    pub fn gif(width: u32, height: u32) -> Vec<u8> {
        write(DynamicImage::ImageRgba8(pattern(width, height)), ImageFormat::Gif)
    }

    pub fn bmp(width: u32, height: u32) -> Vec<u8> {
        let rgb = DynamicImage::ImageRgba8(pattern(width, height)).to_rgb8();
        write(DynamicImage::ImageRgb8(rgb), ImageFormat::Bmp)
    }
}
