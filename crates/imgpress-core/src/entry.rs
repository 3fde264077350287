//! Image entries and the jobs derived from them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::naming::{download_filename, reduction_percent};
use crate::{Quality, TargetFormat};

/// Identifier of an entry, unique within one [`EntryList`](crate::EntryList).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u32);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of an entry: `Pending → Processing → Completed | Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Error,
}

/// A file handed to the entry list.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    /// MIME type declared by the browser, if any.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
    /// Opaque preview reference (an object URL in the browser).
    pub preview: Option<String>,
}

impl NewFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            bytes,
            preview: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }
}

/// One user-supplied image and its processing state.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub(crate) id: EntryId,
    pub(crate) name: String,
    pub(crate) mime: Option<String>,
    pub(crate) original: Arc<[u8]>,
    pub(crate) preview: Option<String>,
    pub(crate) status: EntryStatus,
    pub(crate) source_format: Option<TargetFormat>,
    pub(crate) target_format: TargetFormat,
    pub(crate) quality: Quality,
    pub(crate) output: Option<Arc<[u8]>>,
    pub(crate) error: Option<String>,
}

impl ImageEntry {
    pub(crate) fn new(id: EntryId, file: NewFile) -> Self {
        let source_format = file.mime.as_deref().and_then(TargetFormat::from_mime);

        Self {
            id,
            name: file.name,
            mime: file.mime,
            original: file.bytes.into(),
            preview: file.preview,
            status: EntryStatus::Pending,
            source_format,
            target_format: TargetFormat::CLIENT_DEFAULT,
            quality: Quality::DEFAULT,
            output: None,
            error: None,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    pub fn original(&self) -> &[u8] {
        &self.original
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Take the preview reference so the caller can release it.
    pub fn take_preview(&mut self) -> Option<String> {
        self.preview.take()
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn original_size(&self) -> u64 {
        self.original.len() as u64
    }

    pub fn source_format(&self) -> Option<TargetFormat> {
        self.source_format
    }

    pub fn target_format(&self) -> TargetFormat {
        self.target_format
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Encoded output, present only once completed.
    pub fn output(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    pub fn output_size(&self) -> Option<u64> {
        self.output.as_ref().map(|out| out.len() as u64)
    }

    /// Failure message of the last attempt, present only in [`EntryStatus::Error`].
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rounded percentage saved; 0 until completed.
    pub fn reduction_percent(&self) -> i64 {
        match self.output_size() {
            Some(size) => reduction_percent(self.original_size(), size),
            None => 0,
        }
    }

    /// Name the output is saved under.
    pub fn download_name(&self) -> String {
        download_filename(&self.name, self.target_format)
    }

    pub fn is_completed(&self) -> bool {
        self.status == EntryStatus::Completed
    }

    /// Snapshot the current bytes and settings for a transcode request.
    pub(crate) fn job(&self) -> TranscodeJob {
        TranscodeJob {
            id: self.id,
            file_name: self.name.clone(),
            mime: self.mime.clone(),
            bytes: Arc::clone(&self.original),
            format: self.target_format,
            quality: self.quality,
        }
    }

    pub(crate) fn summary(&self) -> EntrySummary {
        EntrySummary {
            id: self.id,
            name: self.name.clone(),
            preview: self.preview.clone(),
            status: self.status,
            original_size: self.original_size(),
            source_format: self.source_format,
            target_format: self.target_format,
            quality: self.quality,
            output_size: self.output_size(),
            reduction_percent: self.reduction_percent(),
            error: self.error.clone(),
        }
    }
}

/// Requested change to an entry's encode settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub target_format: Option<TargetFormat>,
    pub quality: Option<Quality>,
}

impl SettingsUpdate {
    pub fn format(format: TargetFormat) -> Self {
        Self {
            target_format: Some(format),
            quality: None,
        }
    }

    pub fn quality(quality: Quality) -> Self {
        Self {
            target_format: None,
            quality: Some(quality),
        }
    }
}

/// Everything a transcoder needs to process one entry.
///
/// Jobs own a shared handle to the original bytes so the entry list can be
/// released while requests are in flight.
#[derive(Debug, Clone)]
pub struct TranscodeJob {
    pub id: EntryId,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Arc<[u8]>,
    pub format: TargetFormat,
    pub quality: Quality,
}

/// Serializable view of an entry without its byte buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub id: EntryId,
    pub name: String,
    pub preview: Option<String>,
    pub status: EntryStatus,
    pub original_size: u64,
    pub source_format: Option<TargetFormat>,
    pub target_format: TargetFormat,
    pub quality: Quality,
    pub output_size: Option<u64>,
    pub reduction_percent: i64,
    pub error: Option<String>,
}
