//! Retention for archived files.
//!
//! The purge operates on every file in the primary's directory whose name
//! begins with the primary's file name plus a dot. `count:N` keeps the N
//! most recent archives, ordered by numeric suffix when every candidate has
//! one (number archives) and by modification time otherwise (timestamp
//! archives). `age:D` deletes archives whose modification time is older than
//! `now - D`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, SystemTime};

use crate::parse::parse_duration;

/// Which archived files to delete after a rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PurgePolicy {
    /// Retain every archive.
    #[default]
    None,
    /// Keep only the N most recent archives.
    Count(usize),
    /// Delete archives older than the given duration.
    Age(Duration),
}

impl FromStr for PurgePolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if lowered == "none" {
            return Ok(Self::None);
        }
        if let Some(count) = lowered.strip_prefix("count:") {
            return count.trim().parse().map(Self::Count).map_err(|_| ());
        }
        if let Some(age) = lowered.strip_prefix("age:") {
            return parse_duration(age).map(Self::Age).map_err(|_| ());
        }
        Err(())
    }
}

struct ArchiveEntry {
    path: PathBuf,
    numeric_suffix: Option<u64>,
    modified: SystemTime,
}

fn archive_entries(primary: &Path) -> io::Result<Vec<ArchiveEntry>> {
    let dir = match primary.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = match primary.file_name() {
        Some(name) => format!("{}.", name.to_string_lossy()),
        None => return Ok(Vec::new()),
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let Some(suffix) = name.strip_prefix(&prefix) else {
            continue;
        };
        entries.push(ArchiveEntry {
            path: entry.path(),
            numeric_suffix: suffix.parse().ok(),
            modified: entry.metadata()?.modified()?,
        });
    }
    Ok(entries)
}

impl PurgePolicy {
    /// Apply the policy to the archives of `primary`. Failures are returned
    /// to the caller, which treats them as diagnostics rather than fatal
    /// errors.
    pub(crate) fn apply(&self, primary: &Path, now: SystemTime) -> io::Result<()> {
        match self {
            PurgePolicy::None => Ok(()),
            PurgePolicy::Count(keep) => purge_by_count(primary, *keep),
            PurgePolicy::Age(max_age) => purge_by_age(primary, *max_age, now),
        }
    }
}

fn purge_by_count(primary: &Path, keep: usize) -> io::Result<()> {
    let mut entries = archive_entries(primary)?;
    if entries.len() <= keep {
        return Ok(());
    }
    if entries.iter().all(|e| e.numeric_suffix.is_some()) {
        // Number archives grow monotonically, so the suffix is the creation
        // order.
        entries.sort_by_key(|e| std::cmp::Reverse(e.numeric_suffix));
    } else {
        entries.sort_by_key(|e| std::cmp::Reverse(e.modified));
    }
    for stale in entries.iter().skip(keep) {
        fs::remove_file(&stale.path)?;
    }
    Ok(())
}

fn purge_by_age(primary: &Path, max_age: Duration, now: SystemTime) -> io::Result<()> {
    for entry in archive_entries(primary)? {
        let expired = now
            .duration_since(entry.modified)
            .map_or(false, |age| age > max_age);
        if expired {
            fs::remove_file(&entry.path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case::none("none", PurgePolicy::None)]
    #[case::count("count:3", PurgePolicy::Count(3))]
    #[case::age_seconds("age:120", PurgePolicy::Age(Duration::from_secs(120)))]
    #[case::age_interval("age:01:00:00", PurgePolicy::Age(Duration::from_secs(3600)))]
    fn purge_policy_parses_valid_values(#[case] input: &str, #[case] expected: PurgePolicy) {
        assert_eq!(input.parse(), Ok(expected));
    }

    #[rstest]
    #[case::bad_count("count:many")]
    #[case::bad_age("age:later")]
    #[case::unknown("weekly")]
    fn purge_policy_rejects_invalid_values(#[case] input: &str) {
        assert!(input.parse::<PurgePolicy>().is_err());
    }

    #[test]
    fn none_policy_retains_everything() -> io::Result<()> {
        let dir = tempdir()?;
        let primary = dir.path().join("app.log");
        for n in 0..4 {
            fs::write(dir.path().join(format!("app.log.{n}")), "x")?;
        }
        PurgePolicy::None.apply(&primary, SystemTime::now())?;
        assert_eq!(archive_entries(&primary)?.len(), 4);
        Ok(())
    }

    #[test]
    fn count_policy_keeps_highest_numeric_suffixes() -> io::Result<()> {
        let dir = tempdir()?;
        let primary = dir.path().join("app.log");
        for n in 0..5 {
            fs::write(dir.path().join(format!("app.log.{n}")), "x")?;
        }

        PurgePolicy::Count(2).apply(&primary, SystemTime::now())?;

        assert!(!dir.path().join("app.log.0").exists());
        assert!(!dir.path().join("app.log.1").exists());
        assert!(!dir.path().join("app.log.2").exists());
        assert!(dir.path().join("app.log.3").exists());
        assert!(dir.path().join("app.log.4").exists());
        Ok(())
    }

    #[test]
    fn count_policy_ignores_unrelated_files() -> io::Result<()> {
        let dir = tempdir()?;
        let primary = dir.path().join("app.log");
        fs::write(&primary, "live")?;
        fs::write(dir.path().join("other.log.0"), "x")?;
        fs::write(dir.path().join("app.log.0"), "x")?;

        PurgePolicy::Count(1).apply(&primary, SystemTime::now())?;

        assert!(primary.exists(), "the primary file is never a candidate");
        assert!(dir.path().join("other.log.0").exists());
        assert!(dir.path().join("app.log.0").exists());
        Ok(())
    }

    #[test]
    fn age_policy_deletes_archives_older_than_cutoff() -> io::Result<()> {
        let dir = tempdir()?;
        let primary = dir.path().join("app.log");
        fs::write(dir.path().join("app.log.0"), "x")?;

        // The archive's mtime is "now"; judged from one hour in the future it
        // is expired, judged from the present it is not.
        let future = SystemTime::now() + Duration::from_secs(3600);
        PurgePolicy::Age(Duration::from_secs(60)).apply(&primary, SystemTime::now())?;
        assert!(dir.path().join("app.log.0").exists());

        PurgePolicy::Age(Duration::from_secs(60)).apply(&primary, future)?;
        assert!(!dir.path().join("app.log.0").exists());
        Ok(())
    }
}
