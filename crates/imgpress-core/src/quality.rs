//! Encoder quality setting.
//!
//! Quality is an integer from 1 to 100 passed straight through to the encoder;
//! what it means is up to the encoder for the chosen format.

use std::fmt;
use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while reading a quality value from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QualityError {
    /// The value is present but is not an integer.
    #[error("Invalid quality: {0}")]
    NotANumber(String),
}

/// Encoder quality, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// Quality used when none is given.
    pub const DEFAULT: Quality = Quality(80);

    /// Create a quality value, clamping into `1..=100`.
    pub fn new(value: u8) -> Self {
        Quality(value.clamp(Self::MIN, Self::MAX))
    }

    /// Read a quality from an optional form field.
    ///
    /// Absent or blank values fall back to [`Quality::DEFAULT`], integers are
    /// clamped into range, and anything else is rejected.
    pub fn from_field(value: Option<&str>) -> Result<Self, QualityError> {
        let raw = match value.map(str::trim) {
            None | Some("") => return Ok(Self::DEFAULT),
            Some(raw) => raw,
        };

        match raw.parse::<i64>() {
            Ok(parsed) => Ok(Quality(parsed.clamp(Self::MIN as i64, Self::MAX as i64) as u8)),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(Quality(Self::MAX)),
                IntErrorKind::NegOverflow => Ok(Quality(Self::MIN)),
                _ => Err(QualityError::NotANumber(raw.to_string())),
            },
        }
    }

    /// The raw value.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// True at the top of the scale, where some encoders switch to lossless.
    #[inline]
    pub fn is_max(self) -> bool {
        self.0 == Self::MAX
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for Quality {
    fn from(value: u8) -> Self {
        Quality::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(value: Quality) -> Self {
        value.0
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
