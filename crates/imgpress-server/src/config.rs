//! Server configuration.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address {0:?}: {1}")]
    InvalidBind(String, #[source] std::net::AddrParseError),

    #[error("Upload limit must be at least 1 MiB")]
    ZeroUploadLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the listener binds to.
    pub bind: SocketAddr,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl Config {
    /// Build a config from optional overrides, falling back to the defaults.
    pub fn from_options(bind: Option<&str>, max_upload_mb: Option<usize>) -> Result<Self, ConfigError> {
        let bind = bind.unwrap_or(DEFAULT_BIND).trim();
        let bind = bind
            .parse()
            .map_err(|e| ConfigError::InvalidBind(bind.to_owned(), e))?;

        let max_upload_bytes = match max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB) {
            0 => return Err(ConfigError::ZeroUploadLimit),
            mb => mb.saturating_mul(1024 * 1024),
        };

        Ok(Config { bind, max_upload_bytes })
    }
}
