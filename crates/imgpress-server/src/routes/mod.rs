use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use imgpress_core::PROCESS_PATH;

use crate::config::Config;

pub mod process;

pub fn router(config: &Config) -> Router {
    Router::new()
        .route(PROCESS_PATH, post(process::process))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
}
