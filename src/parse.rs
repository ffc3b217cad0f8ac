//! Parsers for the size, interval, and duration attribute grammars.
//!
//! Sizes are integers with an optional `k`/`K` (×1024) or `m`/`M` (×1024²)
//! suffix. Intervals are `HH:MM:SS`. Durations (used by `purge=age:`) accept
//! either plain seconds or the interval grammar.

use std::time::Duration;

use crate::error::ChannelError;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

fn invalid(what: &'static str, value: &str) -> ChannelError {
    ChannelError::InvalidConfig {
        what,
        value: value.to_owned(),
    }
}

/// Parse a size in bytes. `"57"` is 57 bytes, `"1k"` is 1024, `"2M"` is
/// 2×1024².
pub fn parse_size(input: &str) -> Result<u64, ChannelError> {
    let trimmed = input.trim();
    let (digits, multiplier) = match trimmed.char_indices().last() {
        Some((idx, 'k')) | Some((idx, 'K')) => (&trimmed[..idx], KIB),
        Some((idx, 'm')) | Some((idx, 'M')) => (&trimmed[..idx], MIB),
        _ => (trimmed, 1),
    };
    let count: u64 = digits.parse().map_err(|_| invalid("size", input))?;
    count
        .checked_mul(multiplier)
        .ok_or_else(|| invalid("size", input))
}

/// Parse an `HH:MM:SS` interval. Hours are unbounded; minutes and seconds
/// must be below 60.
pub fn parse_interval(input: &str) -> Result<Duration, ChannelError> {
    let mut parts = input.trim().split(':');
    let (hours, minutes, seconds) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(s), None) => (h, m, s),
        _ => return Err(invalid("interval", input)),
    };
    let hours: u64 = hours.parse().map_err(|_| invalid("interval", input))?;
    let minutes: u64 = minutes.parse().map_err(|_| invalid("interval", input))?;
    let seconds: u64 = seconds.parse().map_err(|_| invalid("interval", input))?;
    if minutes > 59 || seconds > 59 {
        return Err(invalid("interval", input));
    }
    Ok(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}

/// Parse a duration: plain seconds (`"3600"`) or `HH:MM:SS`.
pub fn parse_duration(input: &str) -> Result<Duration, ChannelError> {
    let trimmed = input.trim();
    if trimmed.contains(':') {
        return parse_interval(trimmed);
    }
    let seconds: u64 = trimmed.parse().map_err(|_| invalid("duration", input))?;
    Ok(Duration::from_secs(seconds))
}
