//! Shared codec types.

use thiserror::Error;

use crate::batch::TranscodeError;
use crate::TargetFormat;

/// Errors produced while transcoding an image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// No bytes were supplied.
    #[error("No image data")]
    EmptyInput,

    /// The bytes are not a decodable image.
    #[error("Could not decode image: {0}")]
    Decode(String),

    /// The encoder for the target format failed.
    #[error("{format} encoding failed: {reason}")]
    Encode { format: TargetFormat, reason: String },
}

impl From<CodecError> for TranscodeError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::EmptyInput => TranscodeError::EmptyInput,
            other => TranscodeError::Failed(other.to_string()),
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}
