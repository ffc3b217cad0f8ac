//! Archive naming for rolled files.
//!
//! Given the primary path, the strategy computes where the file being rolled
//! should land. Number archives grow monotonically: the suffix is one past
//! the highest suffix already present, so archives appear in creation order,
//! restarts continue after the existing sequence, and holes left by purging
//! are never reused. Timestamp archives carry a millisecond ISO 8601 stamp
//! and fall back to a numeric counter when two rotations land inside the
//! same millisecond.
//!
//! Compression applies to the live stream, not as a post-rotation step, so
//! archive names never carry a codec extension: the archive is byte-for-byte
//! the finalized primary.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, Local, Utc};

/// How a rolled primary file is named.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ArchiveMode {
    /// Keep no archive: the primary is truncated in place and the previous
    /// window's contents are lost.
    #[default]
    None,
    /// `path.0`, `path.1`, ... in creation order.
    Number,
    /// `path.<ISO8601>` in the configured zone.
    Timestamp,
}

impl FromStr for ArchiveMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "number" => Ok(Self::Number),
            "timestamp" => Ok(Self::Timestamp),
            _ => Err(()),
        }
    }
}

/// Clock zone used when rendering timestamp archive names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimestampZone {
    #[default]
    Utc,
    Local,
}

impl FromStr for TimestampZone {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(()),
        }
    }
}

/// Build a sibling of `path` whose file name gains `.{suffix}`.
pub(crate) fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| path.as_os_str().to_os_string());
    name.push(".");
    name.push(suffix);
    let mut out = path.to_path_buf();
    out.set_file_name(name);
    out
}

/// Highest `N` for which `primary.N` exists, scanning the primary's
/// directory.
fn highest_numeric_suffix(primary: &Path) -> Option<u64> {
    let dir = match primary.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!("{}.", primary.file_name()?.to_string_lossy());

    let mut highest = None;
    for entry in std::fs::read_dir(dir).ok()?.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(n) = name.strip_prefix(&prefix).and_then(|s| s.parse::<u64>().ok()) {
            highest = highest.max(Some(n));
        }
    }
    highest
}

fn format_timestamp(now: SystemTime, zone: TimestampZone) -> String {
    const FORMAT: &str = "%Y%m%dT%H%M%S%.3f";
    match zone {
        TimestampZone::Utc => DateTime::<Utc>::from(now).format(FORMAT).to_string(),
        TimestampZone::Local => DateTime::<Local>::from(now).format(FORMAT).to_string(),
    }
}

/// Compute the destination for the primary file being rolled, unique within
/// its directory at the moment of the check. Returns `None` for
/// [`ArchiveMode::None`], meaning the primary is dropped rather than renamed.
pub(crate) fn archive_destination(
    primary: &Path,
    mode: ArchiveMode,
    zone: TimestampZone,
    now: SystemTime,
) -> Option<PathBuf> {
    match mode {
        ArchiveMode::None => None,
        ArchiveMode::Number => {
            let next = match highest_numeric_suffix(primary) {
                Some(highest) => highest + 1,
                None => 0,
            };
            Some(sibling_with_suffix(primary, &next.to_string()))
        }
        ArchiveMode::Timestamp => {
            let stamp = format_timestamp(now, zone);
            let candidate = sibling_with_suffix(primary, &stamp);
            if !candidate.exists() {
                return Some(candidate);
            }
            let mut n: u64 = 1;
            loop {
                let candidate = sibling_with_suffix(primary, &format!("{stamp}.{n}"));
                if !candidate.exists() {
                    return Some(candidate);
                }
                n += 1;
            }
        }
    }
}
