//! Streaming compressors layered over the byte sink.
//!
//! [`CodecWriter`] is a tagged variant over the supported codecs rather than
//! a trait object: adding a codec means one new variant implementing the
//! `write`/`finish` capability set. Rotation decisions are made on
//! the logical record stream, so the byte counting happens above this layer;
//! a codec only guarantees that once [`CodecWriter::finish`] returns, the
//! file holds a standalone decompressable stream.

use std::io::{self, Write};
use std::str::FromStr;

use bzip2::write::BzEncoder;
use flate2::write::{GzEncoder, ZlibEncoder};

use crate::error::ChannelError;
use crate::sink::ByteSink;

/// Which compressor wraps the live stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CompressionMode {
    /// Identity pass-through.
    #[default]
    None,
    Gzip,
    Bzip2,
    Zlib,
}

impl FromStr for CompressionMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "gzip" => Ok(Self::Gzip),
            "bzip2" => Ok(Self::Bzip2),
            "zlib" => Ok(Self::Zlib),
            _ => Err(()),
        }
    }
}

/// A byte sink optionally wrapped in a streaming compressor.
pub(crate) enum CodecWriter {
    Plain(ByteSink),
    Gzip(GzEncoder<ByteSink>),
    Bzip2(BzEncoder<ByteSink>),
    Zlib(ZlibEncoder<ByteSink>),
}

impl CodecWriter {
    /// Layer the codec selected by `mode` over `sink`.
    pub(crate) fn new(sink: ByteSink, mode: CompressionMode) -> Self {
        match mode {
            CompressionMode::None => CodecWriter::Plain(sink),
            CompressionMode::Gzip => {
                CodecWriter::Gzip(GzEncoder::new(sink, flate2::Compression::default()))
            }
            CompressionMode::Bzip2 => {
                CodecWriter::Bzip2(BzEncoder::new(sink, bzip2::Compression::default()))
            }
            CompressionMode::Zlib => {
                CodecWriter::Zlib(ZlibEncoder::new(sink, flate2::Compression::default()))
            }
        }
    }

    /// Path of the underlying sink.
    pub(crate) fn path(&self) -> &std::path::Path {
        match self {
            CodecWriter::Plain(sink) => sink.path(),
            CodecWriter::Gzip(enc) => enc.get_ref().path(),
            CodecWriter::Bzip2(enc) => enc.get_ref().path(),
            CodecWriter::Zlib(enc) => enc.get_ref().path(),
        }
    }

    pub(crate) fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            CodecWriter::Plain(sink) => sink.write_all(buf),
            CodecWriter::Gzip(enc) => enc.write_all(buf),
            CodecWriter::Bzip2(enc) => enc.write_all(buf),
            CodecWriter::Zlib(enc) => enc.write_all(buf),
        }
    }

    /// Flush internal state, write the terminator frame, and release the
    /// sink. After this returns the file is a complete standalone stream for
    /// the configured codec.
    pub(crate) fn finish(self) -> Result<(), ChannelError> {
        let sink = match self {
            CodecWriter::Plain(sink) => sink,
            CodecWriter::Gzip(enc) => enc.finish().map_err(ChannelError::Compression)?,
            CodecWriter::Bzip2(enc) => enc.finish().map_err(ChannelError::Compression)?,
            CodecWriter::Zlib(enc) => enc.finish().map_err(ChannelError::Compression)?,
        };
        let path = sink.path().to_path_buf();
        sink.close().map_err(|err| ChannelError::io(path, err))
    }
}
