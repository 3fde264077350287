//! Request errors and their HTTP mapping.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use imgpress_core::{FormatError, QualityError};
use serde::Serialize;

/// Everything a processing request can fail with.
///
/// The `Display` text is what the client sees in `{"error": ...}`, so
/// server-side failures carry their detail separately and only log it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No file provided")]
    NoFile,

    #[error("Invalid form data")]
    InvalidForm,

    #[error("File too large")]
    TooLarge,

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Quality(#[from] QualityError),

    #[error("Failed to process image")]
    Processing(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFile | ApiError::InvalidForm | ApiError::Format(_) | ApiError::Quality(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::TooLarge
        } else {
            tracing::debug!("rejecting multipart body: {err}");
            ApiError::InvalidForm
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.status();

        if let ApiError::Processing(ref detail) = self {
            tracing::warn!("processing failed: {detail}");
        }

        (code, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
