//! Ordered list of image entries and their state transitions.
//!
//! The list is the client's single source of truth. Processing is split into
//! three steps so the list never needs to be borrowed across a network call:
//!
//! 1. [`EntryList::begin`] / [`EntryList::begin_batch`] mark entries as
//!    processing and hand out [`TranscodeJob`]s.
//! 2. A [`Transcoder`](crate::batch::Transcoder) turns jobs into outcomes.
//! 3. [`EntryList::finish`] records each outcome on its entry.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::batch::JobOutcome;
use crate::entry::{EntryId, EntryStatus, EntrySummary, ImageEntry, NewFile, SettingsUpdate, TranscodeJob};

/// Errors raised by entry list operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// No entry with this id exists.
    #[error("No entry with id {0}")]
    NotFound(EntryId),

    /// The entry is being processed and cannot be changed or restarted.
    #[error("Entry {0} is already being processed")]
    Busy(EntryId),
}

/// Ordered collection of [`ImageEntry`] values.
#[derive(Debug, Default)]
pub struct EntryList {
    entries: Vec<ImageEntry>,
    next_id: u32,
}

impl EntryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one file as a pending entry.
    pub fn add_file(&mut self, file: NewFile) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        debug!(%id, name = %file.name, size = file.bytes.len(), "entry added");
        self.entries.push(ImageEntry::new(id, file));
        id
    }

    /// Append several files, preserving their order.
    pub fn add_files<I>(&mut self, files: I) -> Vec<EntryId>
    where
        I: IntoIterator<Item = NewFile>,
    {
        files.into_iter().map(|file| self.add_file(file)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: EntryId) -> Result<&mut ImageEntry, EntryError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(EntryError::NotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageEntry> {
        self.entries.iter()
    }

    /// Remove exactly one entry, returning it so its preview can be released.
    pub fn remove(&mut self, id: EntryId) -> Option<ImageEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        debug!(%id, "entry removed");
        Some(self.entries.remove(idx))
    }

    /// Remove every entry, returning them in list order.
    pub fn clear(&mut self) -> Vec<ImageEntry> {
        debug!(count = self.entries.len(), "entries cleared");
        std::mem::take(&mut self.entries)
    }

    /// Change an entry's target format and/or quality.
    ///
    /// Completed and failed entries go back to pending and lose their output,
    /// so the new settings take effect on the next run.
    pub fn update_settings(&mut self, id: EntryId, update: SettingsUpdate) -> Result<(), EntryError> {
        let entry = self.get_mut(id)?;

        if entry.status == EntryStatus::Processing {
            return Err(EntryError::Busy(id));
        }

        let mut changed = false;
        if let Some(format) = update.target_format {
            changed |= entry.target_format != format;
            entry.target_format = format;
        }
        if let Some(quality) = update.quality {
            changed |= entry.quality != quality;
            entry.quality = quality;
        }

        if changed && entry.status != EntryStatus::Pending {
            entry.status = EntryStatus::Pending;
            entry.output = None;
            entry.error = None;
        }

        Ok(())
    }

    /// Mark one entry as processing and snapshot its job.
    pub fn begin(&mut self, id: EntryId) -> Result<TranscodeJob, EntryError> {
        let entry = self.get_mut(id)?;

        if entry.status == EntryStatus::Processing {
            return Err(EntryError::Busy(id));
        }

        entry.status = EntryStatus::Processing;
        entry.output = None;
        entry.error = None;

        Ok(entry.job())
    }

    /// Mark every pending or failed entry as processing, one job per entry.
    pub fn begin_batch(&mut self) -> Vec<TranscodeJob> {
        self.entries
            .iter_mut()
            .filter(|e| matches!(e.status, EntryStatus::Pending | EntryStatus::Error))
            .map(|entry| {
                entry.status = EntryStatus::Processing;
                entry.error = None;
                entry.job()
            })
            .collect()
    }

    /// Record the outcome of a job.
    ///
    /// Returns `false` when the entry was removed (or restarted elsewhere)
    /// while the job was in flight; the outcome is then discarded.
    pub fn finish(&mut self, outcome: JobOutcome) -> bool {
        let Ok(entry) = self.get_mut(outcome.id) else {
            debug!(id = %outcome.id, "outcome for removed entry dropped");
            return false;
        };

        if entry.status != EntryStatus::Processing {
            return false;
        }

        match outcome.result {
            Ok(bytes) => {
                entry.status = EntryStatus::Completed;
                entry.output = Some(Arc::from(bytes));
                entry.error = None;
            }
            Err(err) => {
                entry.status = EntryStatus::Error;
                entry.output = None;
                entry.error = Some(err.to_string());
            }
        }

        true
    }

    /// Completed entries in list order.
    pub fn completed(&self) -> impl Iterator<Item = &ImageEntry> {
        self.entries.iter().filter(|e| e.is_completed())
    }

    pub fn has_completed(&self) -> bool {
        self.entries.iter().any(ImageEntry::is_completed)
    }

    /// True while any entry is being processed.
    pub fn is_processing(&self) -> bool {
        self.entries.iter().any(|e| e.status == EntryStatus::Processing)
    }

    /// Byte-free snapshot of every entry, for display.
    pub fn summaries(&self) -> Vec<EntrySummary> {
        self.entries.iter().map(ImageEntry::summary).collect()
    }
}
