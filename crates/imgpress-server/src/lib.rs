//! imgpress server - the image processing endpoint
//!
//! A single stateless route that accepts a multipart upload and answers with
//! the re-encoded image. Codec work runs on tokio's blocking pool.

use std::future::Future;

use tokio::net::TcpListener;

pub mod config;
pub mod error;
pub mod routes;

pub use config::{Config, ConfigError};
pub use error::ApiError;

/// Build the application router.
pub fn app(config: &Config) -> axum::Router {
    routes::router(config)
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: &Config, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(config)).with_graceful_shutdown(shutdown).await
}
