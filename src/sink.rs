//! Append-mode byte sink over a filesystem path.
//!
//! The sink is deliberately unbuffered: a record handed to [`ByteSink`] has
//! reached the OS by the time `write` returns, which keeps the on-disk size
//! of the primary file in lockstep with the channel's byte counter.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ChannelError;

/// Writable stream over a path with create-or-append semantics.
#[derive(Debug)]
pub struct ByteSink {
    file: File,
    path: PathBuf,
}

impl ByteSink {
    /// Open `path`, creating the file if absent and appending if present.
    ///
    /// Fails with [`ChannelError::NotAFile`] when the path resolves to a
    /// directory.
    pub fn open(path: &Path) -> Result<Self, ChannelError> {
        if path.is_dir() {
            return Err(ChannelError::NotAFile(path.to_path_buf()));
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| ChannelError::io(path, err))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Size of the file on disk. Consulted at (re)open to seed the channel's
    /// byte counter.
    pub fn current_size(&self) -> io::Result<u64> {
        self.file.metadata().map(|meta| meta.len())
    }

    /// Path this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and release the file handle.
    pub fn close(mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Write for ByteSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
