//! `POST /api/process`: re-encode one uploaded image.
//!
//! Form fields:
//!
//! * `file` - the image, required
//! * `format` - `jpeg`, `png` or `webp`; JPEG when absent
//! * `quality` - integer 1-100; 80 when absent, clamped when out of range

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use imgpress_core::{transcode, Quality, TargetFormat};
use tracing::{debug, info};

use crate::error::ApiError;

/// Raw form fields, before validation.
#[derive(Debug, Default)]
struct ProcessForm {
    file_name: Option<String>,
    file: Option<Bytes>,
    format: Option<String>,
    quality: Option<String>,
}

impl ProcessForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = ProcessForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);

            match name.as_deref() {
                Some("file") => {
                    form.file_name = field.file_name().map(str::to_owned);
                    form.file = Some(field.bytes().await?);
                }
                Some("format") => form.format = Some(field.text().await?),
                Some("quality") => form.quality = Some(field.text().await?),
                other => debug!(field = ?other, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

fn parse_format(value: Option<&str>) -> Result<TargetFormat, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(TargetFormat::default()),
        Some(value) => Ok(TargetFormat::parse(value)?),
    }
}

pub async fn process(multipart: Result<Multipart, MultipartRejection>) -> Result<Response, ApiError> {
    let multipart = multipart.map_err(|e| {
        debug!("not a multipart request: {e}");
        ApiError::InvalidForm
    })?;

    let form = ProcessForm::read(multipart).await?;

    let file = form.file.filter(|f| !f.is_empty()).ok_or(ApiError::NoFile)?;
    let format = parse_format(form.format.as_deref())?;
    let quality = Quality::from_field(form.quality.as_deref())?;

    let started = Instant::now();
    let original_size = file.len();

    let transcoded = tokio::task::spawn_blocking(move || transcode(&file, format, quality))
        .await
        .map_err(|e| ApiError::Processing(format!("transcode task failed: {e}")))?
        .map_err(|e| ApiError::Processing(e.to_string()))?;

    info!(
        file = form.file_name.as_deref().unwrap_or("<unnamed>"),
        %format,
        %quality,
        original_size,
        output_size = transcoded.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "image processed"
    );

    let content_type = transcoded.content_type();
    let length = transcoded.len();

    let mut response = transcoded.bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(length));

    Ok(response)
}
