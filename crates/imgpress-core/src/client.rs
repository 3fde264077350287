//! HTTP client for the processing endpoint.
//!
//! Builds on native targets and on `wasm32`, where `reqwest` goes through the
//! browser's `fetch`.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::batch::{TranscodeError, Transcoder};
use crate::entry::TranscodeJob;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`Transcoder`] that posts each job to a remote endpoint.
#[derive(Debug, Clone)]
pub struct HttpTranscoder {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranscoder {
    /// Create a transcoder for the full endpoint URL, e.g. `http://host/api/process`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(job: &TranscodeJob) -> Result<Form, TranscodeError> {
        let mut file = Part::bytes(job.bytes.to_vec()).file_name(job.file_name.clone());
        if let Some(mime) = &job.mime {
            file = file
                .mime_str(mime)
                .map_err(|e| TranscodeError::Transport(e.to_string()))?;
        }

        Ok(Form::new()
            .part("file", file)
            .text("format", job.format.extension())
            .text("quality", job.quality.to_string()))
    }
}

impl Transcoder for HttpTranscoder {
    async fn transcode(&self, job: &TranscodeJob) -> Result<Vec<u8>, TranscodeError> {
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Self::form(job)?)
            .send()
            .await
            .map_err(|e| TranscodeError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(id = %job.id, %status, "endpoint responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Request failed").to_string());

            return Err(TranscodeError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TranscodeError::Transport(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
