//! Zip bundling of completed outputs.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use thiserror::Error;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::entry::ImageEntry;
use crate::session::EntryList;

/// Errors that can occur while writing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Nothing has been processed yet.
    #[error("No processed images to export")]
    Empty,

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Make `name` unique within `taken` by inserting ` (n)` before the extension.
fn unique_name(name: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.clone()) {
        return name;
    }

    let (stem, ext) = match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name.as_str(), ""),
    };

    let mut n = 1;
    loop {
        let candidate = format!("{stem} ({n}){ext}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Write `(name, bytes)` pairs into an in-memory zip.
///
/// Entries are stored without further compression since the payloads are
/// already compressed images. Colliding names get a ` (n)` suffix.
pub fn bundle<'a, I>(files: I) -> Result<Vec<u8>, ArchiveError>
where
    I: IntoIterator<Item = (String, &'a [u8])>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut taken = HashSet::new();

    for (name, bytes) in files {
        let name = unique_name(name, &mut taken);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file(name, options)?;
        writer.write_all(bytes)?;
    }

    if taken.is_empty() {
        return Err(ArchiveError::Empty);
    }

    let archive = writer.finish()?.into_inner();
    debug!(files = taken.len(), size = archive.len(), "archive written");
    Ok(archive)
}

fn completed_files<'a>(entries: impl Iterator<Item = &'a ImageEntry>) -> impl Iterator<Item = (String, &'a [u8])> {
    entries.filter_map(|entry| Some((entry.download_name(), entry.output()?)))
}

impl EntryList {
    /// Zip every completed output under its download name, in list order.
    pub fn export_archive(&self) -> Result<Vec<u8>, ArchiveError> {
        bundle(completed_files(self.completed()))
    }
}
