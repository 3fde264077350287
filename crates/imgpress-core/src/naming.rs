//! Download naming and size display helpers.

use crate::TargetFormat;

/// Prefix added to every downloaded file.
pub const DOWNLOAD_PREFIX: &str = "compressed-";

/// File name of the bulk download archive.
pub const ARCHIVE_NAME: &str = "compressed-images.zip";

/// Name a processed image is saved under.
///
/// The last extension of `original` is replaced with the target format's
/// extension and [`DOWNLOAD_PREFIX`] is prepended. When stripping the
/// extension would leave nothing (no dot at all, or a leading dot only) the
/// whole original name is kept.
///
/// ```
/// use imgpress_core::{naming::download_filename, TargetFormat};
///
/// assert_eq!(download_filename("holiday.photo.png", TargetFormat::WebP), "compressed-holiday.photo.webp");
/// assert_eq!(download_filename("README", TargetFormat::Jpeg), "compressed-README.jpg");
/// ```
pub fn download_filename(original: &str, format: TargetFormat) -> String {
    let stem = match original.rfind('.') {
        Some(idx) if idx > 0 => &original[..idx],
        _ => original,
    };

    format!("{DOWNLOAD_PREFIX}{stem}.{}", format.extension())
}

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Human readable byte count, base 1024, at most two decimals.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');

    format!("{rendered} {}", SIZE_UNITS[unit])
}

/// Percentage saved by compression, rounded; negative when the output grew.
pub fn reduction_percent(original_size: u64, output_size: u64) -> i64 {
    if original_size == 0 {
        return 0;
    }

    let saved = original_size as f64 - output_size as f64;
    (saved / original_size as f64 * 100.0).round() as i64
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: download names always carry the prefix and the target extension.
        #[test]
        fn prop_download_name_shape(name in "[a-zA-Z0-9 _.-]{1,24}", idx in 0usize..3) {
            let format = TargetFormat::ALL[idx];
            let out = download_filename(&name, format);
            prop_assert!(out.starts_with(DOWNLOAD_PREFIX));
            let suffix = format!(".{}", format.extension());
            prop_assert!(out.ends_with(&suffix));
        }

        /// Property: reduction never exceeds 100% and is 0 for unchanged sizes.
        #[test]
        fn prop_reduction_bounded(original in 1u64..10_000_000, output in 0u64..10_000_000) {
            prop_assert!(reduction_percent(original, output) <= 100);
            prop_assert_eq!(reduction_percent(original, original), 0);
        }
    }
}
