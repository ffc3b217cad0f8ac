//! Log messages and their severity levels.
//!
//! A [`Message`] is what upstream loggers hand to a channel. The channel
//! itself consumes only the text; source, priority, and timestamp exist for
//! formatters and filtering collaborators.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// Severity of a log message, lowest to highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Priority {
    Trace,
    Debug,
    #[default]
    Info,
    Notice,
    Warning,
    Error,
    Critical,
    Fatal,
}

impl Priority {
    /// Canonical lowercase name of the priority.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Priority::Trace => "trace",
            Priority::Debug => "debug",
            Priority::Info => "info",
            Priority::Notice => "notice",
            Priority::Warning => "warning",
            Priority::Error => "error",
            Priority::Critical => "critical",
            Priority::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "notice" => Ok(Self::Notice),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            "fatal" => Ok(Self::Fatal),
            _ => Err(()),
        }
    }
}

/// A single log event handed to a channel.
#[derive(Clone, Debug)]
pub struct Message {
    /// Name of the component that emitted the message.
    pub source: String,
    /// The message body. Channels persist `text` followed by a newline.
    pub text: String,
    /// Severity assigned by the emitter.
    pub priority: Priority,
    /// Time the message was created.
    pub timestamp: SystemTime,
}

impl Message {
    /// Construct a message stamped with the current system time.
    pub fn new(source: impl Into<String>, text: impl Into<String>, priority: Priority) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
            priority,
            timestamp: SystemTime::now(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.source, self.priority, self.text)
    }
}
