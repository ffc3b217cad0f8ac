//! The scoped resource owning one open primary file.
//!
//! An [`ActiveWriter`] bundles the sink, the optional compression filter
//! layered over it, and the logical byte counter rotation decisions consult.
//! Dropping the writer finalizes the codec, so the terminator frame reaches
//! the file on every exit path, including unwinding. Callers that care about
//! finalization errors use [`ActiveWriter::finish`] instead of dropping.

use std::path::Path;

use log::warn;

use crate::codec::{CodecWriter, CompressionMode};
use crate::error::ChannelError;
use crate::sink::ByteSink;

pub(crate) struct ActiveWriter {
    /// `None` only after `finish` has consumed the codec.
    codec: Option<CodecWriter>,
    logical_bytes: u64,
}

impl ActiveWriter {
    /// Open the primary file and layer the configured codec over it. The
    /// byte counter is seeded from the file's on-disk size so append runs
    /// resume where the previous one stopped.
    pub(crate) fn open(path: &Path, mode: CompressionMode) -> Result<Self, ChannelError> {
        let sink = ByteSink::open(path)?;
        let logical_bytes = sink
            .current_size()
            .map_err(|err| ChannelError::io(path, err))?;
        Ok(Self {
            codec: Some(CodecWriter::new(sink, mode)),
            logical_bytes,
        })
    }

    /// Logical bytes fed into the codec since this writer opened, counted
    /// before compression so size rotation tracks log volume rather than
    /// compression ratio.
    pub(crate) fn logical_bytes(&self) -> u64 {
        self.logical_bytes
    }

    /// Write one complete record. The counter advances only after the whole
    /// record has been accepted.
    pub(crate) fn write_record(&mut self, record: &[u8]) -> Result<(), ChannelError> {
        let codec = self
            .codec
            .as_mut()
            .expect("writer used after finalization");
        if let Err(err) = codec.write_all(record) {
            return Err(ChannelError::io(codec.path().to_path_buf(), err));
        }
        self.logical_bytes += record.len() as u64;
        Ok(())
    }

    /// Finalize the codec and release the file handle, surfacing any error.
    pub(crate) fn finish(mut self) -> Result<(), ChannelError> {
        match self.codec.take() {
            Some(codec) => codec.finish(),
            None => Ok(()),
        }
    }
}

impl Drop for ActiveWriter {
    fn drop(&mut self) {
        if let Some(codec) = self.codec.take() {
            if let Err(err) = codec.finish() {
                warn!("log writer finalization failed during drop: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn byte_counter_is_seeded_from_existing_file() -> Result<(), ChannelError> {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("writer.log");
        std::fs::write(&path, "previous run\n").expect("seed file");

        let writer = ActiveWriter::open(&path, CompressionMode::None)?;
        assert_eq!(writer.logical_bytes(), 13);
        Ok(())
    }

    #[test]
    fn write_record_advances_counter_by_record_length() -> Result<(), ChannelError> {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("writer.log");
        let mut writer = ActiveWriter::open(&path, CompressionMode::None)?;

        writer.write_record(b"hello\n")?;
        assert_eq!(writer.logical_bytes(), 6);
        writer.write_record(b"world\n")?;
        assert_eq!(writer.logical_bytes(), 12);
        writer.finish()?;

        assert_eq!(
            std::fs::read_to_string(&path).expect("read back"),
            "hello\nworld\n"
        );
        Ok(())
    }

    #[test]
    fn counter_tracks_logical_bytes_under_compression() -> Result<(), ChannelError> {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("writer.log");
        let mut writer = ActiveWriter::open(&path, CompressionMode::Gzip)?;

        let record = vec![b'a'; 512];
        writer.write_record(&record)?;
        assert_eq!(writer.logical_bytes(), 512);
        writer.finish()?;

        let on_disk = std::fs::metadata(&path).expect("stat").len();
        assert!(
            on_disk < 512,
            "compressed output should undercut the logical count, got {on_disk}"
        );
        Ok(())
    }

    #[test]
    fn drop_finalizes_the_compressed_stream() -> Result<(), ChannelError> {
        use std::io::Read;

        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("writer.log");
        {
            let mut writer = ActiveWriter::open(&path, CompressionMode::Gzip)?;
            writer.write_record(b"scoped\n")?;
            // Dropped without an explicit finish.
        }

        let file = std::fs::File::open(&path).expect("open archive");
        let mut decoded = String::new();
        flate2::read::GzDecoder::new(file)
            .read_to_string(&mut decoded)
            .expect("stream must carry its terminator");
        assert_eq!(decoded, "scoped\n");
        Ok(())
    }
}
