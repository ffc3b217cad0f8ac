//! The contract between a logger and its output channels.

use crate::error::ChannelError;
use crate::message::Message;

/// A destination for log messages.
///
/// Channels are single-owner: at most one logical writer may call into a
/// channel at a time, and concurrent loggers serialize through an external
/// lock. Implementations open lazily on the first [`log`](Channel::log) and
/// release their resources on [`close`](Channel::close) or drop.
pub trait Channel {
    /// Acquire the underlying resources. Idempotent.
    fn open(&mut self) -> Result<(), ChannelError>;

    /// Persist one message.
    fn log(&mut self, msg: &Message) -> Result<(), ChannelError>;

    /// Flush and release the underlying resources. Idempotent.
    fn close(&mut self) -> Result<(), ChannelError>;
}
