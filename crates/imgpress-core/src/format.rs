//! Output encodings the processing endpoint can produce.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a format name is not one of the supported encodings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported format: {0}")]
pub struct FormatError(pub String);

/// One of the fixed set of output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// Baseline format used by the endpoint when no format is requested.
    #[default]
    #[serde(alias = "jpg")]
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
}

impl TargetFormat {
    /// Target format given to freshly added entries.
    pub const CLIENT_DEFAULT: TargetFormat = TargetFormat::WebP;

    /// Every supported format, in menu order.
    pub const ALL: [TargetFormat; 3] = [TargetFormat::Jpeg, TargetFormat::Png, TargetFormat::WebP];

    /// Parse a format name as sent in the `format` form field.
    ///
    /// Matching is case-insensitive and accepts both `jpg` and `jpeg`.
    pub fn parse(value: &str) -> Result<Self, FormatError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "webp" => Ok(TargetFormat::WebP),
            _ => Err(FormatError(value.to_string())),
        }
    }

    /// Map a browser-declared MIME type (e.g. `image/png`) to a format.
    ///
    /// Returns `None` for images outside the supported set (GIF, BMP, ...).
    pub fn from_mime(mime: &str) -> Option<Self> {
        let subtype = mime.trim().to_ascii_lowercase();
        let subtype = subtype.strip_prefix("image/")?;
        // drop MIME parameters
        let subtype = subtype.split(';').next().unwrap_or_default().trim();

        match subtype {
            "jpeg" | "jpg" | "pjpeg" => Some(TargetFormat::Jpeg),
            "png" => Some(TargetFormat::Png),
            "webp" => Some(TargetFormat::WebP),
            _ => None,
        }
    }

    /// MIME type sent in the `Content-Type` header of encoded output.
    pub fn content_type(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "image/jpeg",
            TargetFormat::Png => "image/png",
            TargetFormat::WebP => "image/webp",
        }
    }

    /// File extension used for downloads, also the value sent as the `format` field.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
            TargetFormat::WebP => "webp",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
