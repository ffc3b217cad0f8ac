//! Rotating, archiving, compressing file log channel.
//!
//! The crate centers on [`FileChannel`]: a sink that accepts log
//! [`Message`]s and persists them as newline-delimited records to a primary
//! file. When the configured rotation trigger fires (size or interval), the
//! channel finalizes the live stream, renames or timestamps the rolled file
//! per the archive strategy, optionally purges old archives, and reopens a
//! fresh primary. Compression (`gzip`, `bzip2`, `zlib`) applies to the live
//! stream, so the primary file and every archive are standalone
//! decompressable streams.
//!
//! Channels are configured through string attributes (`rotate`,
//! `rotate.size`, `archive`, `purge`, ...) and present a single-owner
//! contract: no internal locking, callers serialize externally.

mod archive;
mod attrs;
mod channel;
mod clock;
mod codec;
mod error;
mod file;
mod message;
mod parse;
mod policy;
mod purge;
mod sink;

#[cfg(test)]
pub(crate) mod test_support;

pub use archive::{ArchiveMode, TimestampZone};
pub use attrs::AttributeBag;
pub use channel::Channel;
pub use clock::{Clock, SystemClock};
pub use codec::CompressionMode;
pub use error::ChannelError;
pub use file::FileChannel;
pub use message::{Message, Priority};
pub use parse::{parse_duration, parse_interval, parse_size};
pub use policy::RotatePolicy;
pub use purge::PurgePolicy;
pub use sink::ByteSink;
