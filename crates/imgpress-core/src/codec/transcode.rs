//! Bytes in, bytes out: the work behind the processing endpoint.

use tracing::trace;

use super::{decode, encode, CodecError};
use crate::batch::{TranscodeError, Transcoder};
use crate::entry::TranscodeJob;
use crate::{Quality, TargetFormat};

/// Re-encoded image bytes and the format they are in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcoded {
    pub bytes: Vec<u8>,
    pub format: TargetFormat,
}

impl Transcoded {
    /// MIME type matching the requested format.
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Decode `bytes` and encode them as `format` at `quality`.
///
/// # Errors
///
/// `CodecError::EmptyInput` when no bytes are given, `CodecError::Decode` when
/// the input is not an image, `CodecError::Encode` when the encoder fails.
pub fn transcode(bytes: &[u8], format: TargetFormat, quality: Quality) -> Result<Transcoded, CodecError> {
    let img = decode(bytes)?;
    trace!(
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "decoded source"
    );

    let bytes = encode(&img, format, quality)?;
    Ok(Transcoded { bytes, format })
}

/// [`Transcoder`] that runs the codec on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTranscoder;

impl Transcoder for LocalTranscoder {
    async fn transcode(&self, job: &TranscodeJob) -> Result<Vec<u8>, TranscodeError> {
        Ok(transcode(&job.bytes, job.format, job.quality)?.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::process_all;
    use crate::codec::fixtures;
    use crate::entry::{EntryStatus, NewFile, SettingsUpdate};
    use crate::EntryList;
    use futures::executor::block_on;

    fn magic_matches(bytes: &[u8], format: TargetFormat) -> bool {
        match format {
            TargetFormat::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            TargetFormat::Png => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
            TargetFormat::WebP => bytes.len() > 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
        }
    }

    #[test]
    fn test_png_to_webp() {
        let out = transcode(&fixtures::png_rgba(20, 10), TargetFormat::WebP, Quality::DEFAULT).unwrap();
        assert_eq!(out.format, TargetFormat::WebP);
        assert_eq!(out.content_type(), "image/webp");
        assert!(magic_matches(&out.bytes, TargetFormat::WebP));
    }

    #[test]
    fn test_jpeg_to_png_keeps_dimensions() {
        let out = transcode(&fixtures::jpeg(12, 9), TargetFormat::Png, Quality::new(50)).unwrap();
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 9));
    }

    #[test]
    fn test_every_source_to_every_target() {
        let sources = [
            fixtures::png_rgba(6, 6),
            fixtures::jpeg(6, 6),
            fixtures::gif(6, 6),
            fixtures::bmp(6, 6),
        ];

        for source in &sources {
            for format in TargetFormat::ALL {
                let out = transcode(source, format, Quality::DEFAULT).unwrap();
                assert!(magic_matches(&out.bytes, format), "bad output for {format}");
            }
        }
    }

    #[test]
    fn test_same_format_reencode() {
        let source = fixtures::jpeg(32, 32);
        let out = transcode(&source, TargetFormat::Jpeg, Quality::new(20)).unwrap();
        assert!(magic_matches(&out.bytes, TargetFormat::Jpeg));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            transcode(&[], TargetFormat::Png, Quality::DEFAULT).unwrap_err(),
            CodecError::EmptyInput
        );
    }

    #[test]
    fn test_not_an_image() {
        let err = transcode(b"hello, world", TargetFormat::Jpeg, Quality::DEFAULT).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_local_transcoder_drives_batch() {
        let mut list = EntryList::new();
        let ids = list.add_files([
            NewFile::new("a.png", fixtures::png_rgba(4, 4)).with_mime("image/png"),
            NewFile::new("b.txt", b"not an image".to_vec()),
        ]);
        list.update_settings(ids[0], SettingsUpdate::format(TargetFormat::Jpeg))
            .unwrap();

        let report = block_on(process_all(&mut list, &LocalTranscoder));
        assert_eq!(report.completed, 1);
        assert_eq!(report.failed, 1);

        let done = list.get(ids[0]).unwrap();
        assert!(magic_matches(done.output().unwrap(), TargetFormat::Jpeg));
        assert_eq!(list.get(ids[1]).unwrap().status(), EntryStatus::Error);
    }
}
