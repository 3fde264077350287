//! Driving transcode jobs for one entry or the whole list.
//!
//! A [`Transcoder`] turns a [`TranscodeJob`] into encoded bytes. The browser
//! build posts jobs to the processing endpoint, the server runs them locally.
//! Batches issue every request at once and record each outcome as it lands,
//! so one failure never affects the other entries.

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::entry::{EntryId, TranscodeJob};
use crate::session::{EntryError, EntryList};

/// Reasons a single transcode attempt can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// The job carried no bytes.
    #[error("No file provided")]
    EmptyInput,

    /// The image could not be decoded or encoded.
    #[error("Image processing failed: {0}")]
    Failed(String),

    /// The endpoint answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(String),
}

/// Something that can re-encode one image.
#[allow(async_fn_in_trait)]
pub trait Transcoder {
    /// Re-encode the job's bytes into its target format.
    async fn transcode(&self, job: &TranscodeJob) -> Result<Vec<u8>, TranscodeError>;
}

/// Result of one job, keyed by the entry it belongs to.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub id: EntryId,
    pub result: Result<Vec<u8>, TranscodeError>,
}

impl JobOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

async fn run_job<T: Transcoder + ?Sized>(transcoder: &T, job: TranscodeJob) -> JobOutcome {
    let result = if job.bytes.is_empty() {
        Err(TranscodeError::EmptyInput)
    } else {
        transcoder.transcode(&job).await
    };

    match &result {
        Ok(bytes) => debug!(id = %job.id, format = %job.format, size = bytes.len(), "job completed"),
        Err(err) => warn!(id = %job.id, file = %job.file_name, "job failed: {err}"),
    }

    JobOutcome { id: job.id, result }
}

/// Run every job concurrently and collect the outcomes in job order.
///
/// Does not touch the entry list, so callers that keep the list behind a
/// `RefCell` can release the borrow while this is awaited.
pub async fn run_jobs<T: Transcoder + ?Sized>(transcoder: &T, jobs: Vec<TranscodeJob>) -> Vec<JobOutcome> {
    join_all(jobs.into_iter().map(|job| run_job(transcoder, job))).await
}

/// Process one entry and record its outcome.
///
/// # Returns
///
/// `true` when the entry ended up completed.
pub async fn process_entry<T: Transcoder + ?Sized>(
    list: &mut EntryList,
    transcoder: &T,
    id: EntryId,
) -> Result<bool, EntryError> {
    let job = list.begin(id)?;
    let outcome = run_job(transcoder, job).await;
    let ok = outcome.is_ok();
    Ok(list.finish(outcome) && ok)
}

/// Counts reported after a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub completed: usize,
    pub failed: usize,
}

/// Process every entry that is not already completed or in flight.
pub async fn process_all<T: Transcoder + ?Sized>(list: &mut EntryList, transcoder: &T) -> BatchReport {
    let jobs = list.begin_batch();
    let outcomes = run_jobs(transcoder, jobs).await;
    record_outcomes(list, outcomes)
}

/// Apply a batch of outcomes to the list.
pub fn record_outcomes(list: &mut EntryList, outcomes: Vec<JobOutcome>) -> BatchReport {
    let mut report = BatchReport::default();

    for outcome in outcomes {
        let ok = outcome.is_ok();
        if list.finish(outcome) {
            if ok {
                report.completed += 1;
            } else {
                report.failed += 1;
            }
        }
    }

    debug!(completed = report.completed, failed = report.failed, "batch finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryStatus, NewFile};
    use crate::TargetFormat;
    use futures::executor::block_on;
    use std::cell::RefCell;

    /// Echoes the input reversed, fails for names containing "bad".
    #[derive(Default)]
    struct MockTranscoder {
        seen: RefCell<Vec<(EntryId, TargetFormat, u8)>>,
    }

    impl Transcoder for MockTranscoder {
        async fn transcode(&self, job: &TranscodeJob) -> Result<Vec<u8>, TranscodeError> {
            self.seen
                .borrow_mut()
                .push((job.id, job.format, job.quality.get()));

            if job.file_name.contains("bad") {
                return Err(TranscodeError::Rejected {
                    status: 500,
                    message: "Failed to process image".into(),
                });
            }
            Ok(job.bytes.iter().rev().copied().collect())
        }
    }

    fn list_of(names: &[&str]) -> (EntryList, Vec<EntryId>) {
        let mut list = EntryList::new();
        let ids = list.add_files(names.iter().map(|n| NewFile::new(*n, vec![1, 2, 3])));
        (list, ids)
    }

    #[test]
    fn test_process_entry_success() {
        let (mut list, ids) = list_of(&["a.png"]);
        let transcoder = MockTranscoder::default();

        let ok = block_on(process_entry(&mut list, &transcoder, ids[0])).unwrap();
        assert!(ok);

        let entry = list.get(ids[0]).unwrap();
        assert_eq!(entry.status(), EntryStatus::Completed);
        assert_eq!(entry.output(), Some(&[3u8, 2, 1][..]));
        assert_eq!(transcoder.seen.borrow()[0], (ids[0], TargetFormat::WebP, 80));
    }

    #[test]
    fn test_process_entry_failure() {
        let (mut list, ids) = list_of(&["bad.png"]);
        let ok = block_on(process_entry(&mut list, &MockTranscoder::default(), ids[0])).unwrap();
        assert!(!ok);

        let entry = list.get(ids[0]).unwrap();
        assert_eq!(entry.status(), EntryStatus::Error);
        assert_eq!(entry.error(), Some("Server returned 500: Failed to process image"));
    }

    #[test]
    fn test_process_entry_unknown_id() {
        let mut list = EntryList::new();
        let err = block_on(process_entry(&mut list, &MockTranscoder::default(), EntryId(4))).unwrap_err();
        assert_eq!(err, EntryError::NotFound(EntryId(4)));
    }

    #[test]
    fn test_empty_input_never_reaches_transcoder() {
        let mut list = EntryList::new();
        let id = list.add_file(NewFile::new("empty.png", Vec::new()));
        let transcoder = MockTranscoder::default();

        block_on(process_entry(&mut list, &transcoder, id)).unwrap();
        assert!(transcoder.seen.borrow().is_empty());
        assert_eq!(list.get(id).unwrap().error(), Some("No file provided"));
    }

    #[test]
    fn test_process_all_isolates_failures() {
        let (mut list, ids) = list_of(&["a.png", "bad.jpg", "c.webp"]);
        let report = block_on(process_all(&mut list, &MockTranscoder::default()));

        assert_eq!(report, BatchReport { completed: 2, failed: 1 });
        assert!(list.get(ids[0]).unwrap().is_completed());
        assert_eq!(list.get(ids[1]).unwrap().status(), EntryStatus::Error);
        assert!(list.get(ids[2]).unwrap().is_completed());
    }

    #[test]
    fn test_process_all_skips_completed() {
        let (mut list, _) = list_of(&["a.png", "b.png"]);
        let transcoder = MockTranscoder::default();

        block_on(process_all(&mut list, &transcoder));
        assert_eq!(transcoder.seen.borrow().len(), 2);

        block_on(process_all(&mut list, &transcoder));
        assert_eq!(transcoder.seen.borrow().len(), 2);
    }

    #[test]
    fn test_process_all_retries_failed() {
        let (mut list, ids) = list_of(&["bad.png"]);
        let transcoder = MockTranscoder::default();

        block_on(process_all(&mut list, &transcoder));
        block_on(process_all(&mut list, &transcoder));
        assert_eq!(transcoder.seen.borrow().len(), 2);
        assert_eq!(list.get(ids[0]).unwrap().status(), EntryStatus::Error);
    }

    #[test]
    fn test_run_jobs_preserves_order() {
        let (mut list, ids) = list_of(&["a.png", "b.png", "c.png"]);
        let jobs = list.begin_batch();
        let outcomes = block_on(run_jobs(&MockTranscoder::default(), jobs));
        let outcome_ids: Vec<_> = outcomes.iter().map(|o| o.id).collect();
        assert_eq!(outcome_ids, ids);
    }

    #[test]
    fn test_outcome_for_removed_entry_not_counted() {
        let (mut list, ids) = list_of(&["a.png", "b.png"]);
        let jobs = list.begin_batch();
        list.remove(ids[0]);

        let outcomes = block_on(run_jobs(&MockTranscoder::default(), jobs));
        let report = record_outcomes(&mut list, outcomes);
        assert_eq!(report, BatchReport { completed: 1, failed: 0 });
    }
}
