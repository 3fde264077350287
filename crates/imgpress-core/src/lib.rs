//! imgpress core - image compression state and transcoding
//!
//! This crate holds everything the compressor needs outside of a UI:
//! the list of uploaded images and their processing state, the encode
//! settings, batch processing against a pluggable [`Transcoder`], zip export,
//! and (with the `codec` feature) the decode/encode pipeline the processing
//! endpoint runs.

/// Path the processing endpoint is mounted on.
pub const PROCESS_PATH: &str = "/api/process";

pub mod archive;
pub mod batch;
pub mod entry;
pub mod format;
pub mod naming;
pub mod quality;
pub mod session;

#[cfg(feature = "codec")]
pub mod codec;

#[cfg(feature = "client")]
pub mod client;

pub use archive::{bundle, ArchiveError};
pub use batch::{
    process_all, process_entry, record_outcomes, run_jobs, BatchReport, JobOutcome, TranscodeError, Transcoder,
};
pub use entry::{EntryId, EntryStatus, EntrySummary, ImageEntry, NewFile, SettingsUpdate, TranscodeJob};
pub use format::{FormatError, TargetFormat};
pub use naming::{download_filename, format_size, reduction_percent, ARCHIVE_NAME};
pub use quality::{Quality, QualityError};
pub use session::{EntryError, EntryList};

#[cfg(feature = "codec")]
pub use codec::{transcode, CodecError, LocalTranscoder, Transcoded};

#[cfg(feature = "client")]
pub use client::HttpTranscoder;
