//! Error types surfaced by the channel.
//!
//! All failures propagate synchronously from the call that provoked them;
//! [`ChannelError`] is the single error type across configuration parsing,
//! sink I/O, and codec finalization.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by a file channel or its collaborators.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// An attribute value could not be parsed (size, interval, duration).
    #[error("invalid {what} value: '{value}'")]
    InvalidConfig {
        /// Which grammar rejected the input, e.g. `"size"` or `"interval"`.
        what: &'static str,
        /// The offending raw value.
        value: String,
    },

    /// The primary path resolves to a directory or another non-file object.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    /// An underlying filesystem operation failed. The source carries the OS
    /// errno.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path the failing operation touched.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The compressor could not flush its internal state or write its
    /// terminator frame.
    #[error("compression failure: {0}")]
    Compression(#[source] io::Error),
}

impl ChannelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ChannelError::Io {
            path: path.into(),
            source,
        }
    }
}
