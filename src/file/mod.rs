//! File-backed log channel with rotation, archiving, and compression.
//!
//! [`FileChannel`] writes newline-delimited records to a primary file and,
//! when the configured rotation trigger fires, finalizes the live stream,
//! renames (or drops) the primary according to the archive strategy, applies
//! the purge policy, and reopens a fresh primary. The channel is single-owner
//! and performs no internal locking; concurrent loggers serialize through an
//! external mutex.
//!
//! Configuration goes through string attributes:
//!
//! ```
//! use logchannel::{FileChannel, Message, Priority};
//!
//! # fn main() -> Result<(), logchannel::ChannelError> {
//! # let dir = std::env::temp_dir();
//! let mut channel = FileChannel::new(dir.join("logchannel-demo.log"));
//! channel.put_attr("rotate", "size");
//! channel.put_attr("rotate.size", "1m");
//! channel.put_attr("archive", "number");
//! channel.log(&Message::new("core", "ready", Priority::Info))?;
//! channel.close()?;
//! # std::fs::remove_file(channel.path()).ok();
//! # Ok(())
//! # }
//! ```

mod settings;
mod writer;


use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;

use crate::archive::archive_destination;
use crate::attrs::AttributeBag;
use crate::channel::Channel;
use crate::clock::{Clock, SystemClock};
use crate::error::ChannelError;
use crate::message::Message;

use settings::ChannelSettings;
use writer::ActiveWriter;

/// A log channel persisting records to a file, rolling it over on demand.
pub struct FileChannel {
    path: PathBuf,
    attrs: AttributeBag,
    settings: ChannelSettings,
    settings_version: u64,
    writer: Option<ActiveWriter>,
    opened_at: SystemTime,
    rotation_seq: u64,
    clock: Arc<dyn Clock>,
}

impl FileChannel {
    /// Create a channel writing to `path`. The file is opened lazily on the
    /// first [`log`](Self::log) or explicitly via [`open`](Self::open).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    /// Create a channel reading time from `clock` instead of the system
    /// clock. Interval rotation, timestamp archive names, and age purging
    /// all consult it.
    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            attrs: AttributeBag::new(),
            settings: ChannelSettings::default(),
            settings_version: 0,
            writer: None,
            opened_at: UNIX_EPOCH,
            rotation_seq: 0,
            clock,
        }
    }

    /// Path of the primary file. Fixed for the channel's lifetime.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// On-disk size of the primary file, or 0 when it does not exist.
    pub fn size(&self) -> u64 {
        fs::metadata(&self.path).map(|meta| meta.len()).unwrap_or(0)
    }

    /// Modification time of the primary file in seconds since the epoch, or
    /// -1 when it does not exist.
    pub fn last_write_time(&self) -> i64 {
        fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map_or(-1, |since_epoch| since_epoch.as_secs() as i64)
    }

    /// Completed rotations since this channel was created.
    pub fn rotation_seq(&self) -> u64 {
        self.rotation_seq
    }

    /// Store a configuration attribute. Unknown keys are accepted; recognized
    /// keys take effect on the next rotation decision.
    pub fn put_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.put(key, value);
    }

    /// Look up a configuration attribute.
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key)
    }

    /// Ensure the primary file is open for writing. Idempotent.
    pub fn open(&mut self) -> Result<(), ChannelError> {
        self.refresh_settings();
        if self.writer.is_some() {
            return Ok(());
        }
        self.writer = Some(ActiveWriter::open(&self.path, self.settings.compression)?);
        self.opened_at = self.clock.now();
        Ok(())
    }

    /// Finalize the compressor, flush, and release the file handle.
    /// Idempotent; returns the first error encountered while finalizing.
    pub fn close(&mut self) -> Result<(), ChannelError> {
        match self.writer.take() {
            Some(writer) => writer.finish(),
            None => Ok(()),
        }
    }

    /// Persist one message as `text` plus a trailing newline, rotating first
    /// when the configured trigger fires.
    ///
    /// A failing write never advances the byte counter; the channel is left
    /// cleanly closed, so a subsequent `log` reopens the primary.
    pub fn log(&mut self, msg: &Message) -> Result<(), ChannelError> {
        self.open()?;

        let mut record = msg.text.clone();
        record.push('\n');
        let now = self.clock.now();

        let bytes_written = self
            .writer
            .as_ref()
            .map(ActiveWriter::logical_bytes)
            .unwrap_or(0);
        if self.settings.rotate.should_rotate(
            bytes_written,
            record.len() as u64,
            self.opened_at,
            now,
        ) {
            self.rotate(now)?;
        }

        let writer = self
            .writer
            .as_mut()
            .expect("open() leaves an active writer in place");
        if let Err(err) = writer.write_record(record.as_bytes()) {
            // The codec state may be mid-frame; drop the writer so the next
            // log starts from a clean stream.
            self.writer = None;
            return Err(err);
        }
        Ok(())
    }

    /// Roll the primary file over: finalize the live stream, move it aside
    /// per the archive strategy, purge old archives, and reopen.
    fn rotate(&mut self, now: SystemTime) -> Result<(), ChannelError> {
        if let Some(writer) = self.writer.take() {
            if let Err(err) = writer.finish() {
                warn!("finalizing rolled file failed, archive may be truncated: {err}");
            }
        }

        match archive_destination(&self.path, self.settings.archive, self.settings.times, now) {
            Some(destination) => {
                fs::rename(&self.path, &destination)
                    .map_err(|err| ChannelError::io(&self.path, err))?;
            }
            None => {
                // No archive requested: the rolled window's contents are
                // dropped.
                if let Err(err) = fs::remove_file(&self.path) {
                    if err.kind() != std::io::ErrorKind::NotFound {
                        return Err(ChannelError::io(&self.path, err));
                    }
                }
            }
        }

        if let Err(err) = self.settings.purge.apply(&self.path, now) {
            warn!("purging archives of {} failed: {err}", self.path.display());
        }

        self.writer = Some(ActiveWriter::open(&self.path, self.settings.compression)?);
        self.opened_at = now;
        self.rotation_seq += 1;
        Ok(())
    }

    /// Re-derive cached settings when the attribute bag has changed since the
    /// last derivation.
    fn refresh_settings(&mut self) {
        if self.attrs.version() != self.settings_version {
            self.settings = ChannelSettings::from_attrs(&self.attrs);
            self.settings_version = self.attrs.version();
        }
    }
}

impl Channel for FileChannel {
    fn open(&mut self) -> Result<(), ChannelError> {
        FileChannel::open(self)
    }

    fn log(&mut self, msg: &Message) -> Result<(), ChannelError> {
        FileChannel::log(self, msg)
    }

    fn close(&mut self) -> Result<(), ChannelError> {
        FileChannel::close(self)
    }
}
