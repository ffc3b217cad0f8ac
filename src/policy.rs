//! Rotation trigger predicate.
//!
//! The policy is a pure function of the writer's state and the current time.
//! The channel evaluates it before writing each record, so a size threshold
//! of `T` produces archives no larger than `T` plus one record, and an
//! interval threshold rolls the file the first time a record arrives after
//! the window has elapsed.

use std::time::{Duration, SystemTime};

/// When the current primary file should be rolled over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RotatePolicy {
    /// Never rotate.
    #[default]
    None,
    /// Rotate once the file would meet or exceed this many logical bytes.
    Size(u64),
    /// Rotate once the file has been open for this long.
    Interval(Duration),
}

impl RotatePolicy {
    /// Decide whether to rotate before writing the next record.
    ///
    /// `bytes_written` counts logical bytes in the current primary file and
    /// `next_record_len` the record about to be written.
    pub fn should_rotate(
        &self,
        bytes_written: u64,
        next_record_len: u64,
        opened_at: SystemTime,
        now: SystemTime,
    ) -> bool {
        match self {
            RotatePolicy::None => false,
            RotatePolicy::Size(threshold) => {
                bytes_written >= *threshold
                    || bytes_written.saturating_add(next_record_len) >= *threshold
            }
            RotatePolicy::Interval(interval) => now
                .duration_since(opened_at)
                .map_or(false, |elapsed| elapsed >= *interval),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPOCH: SystemTime = SystemTime::UNIX_EPOCH;

    #[rstest]
    #[case::below_threshold(0, 56, 1024, false)]
    #[case::record_reaches_threshold(967, 57, 1024, true)]
    #[case::record_just_under(966, 57, 1024, false)]
    #[case::already_at_threshold(1024, 0, 1024, true)]
    #[case::record_equals_threshold(0, 57, 57, true)]
    fn size_policy_checks_budget_before_write(
        #[case] written: u64,
        #[case] next: u64,
        #[case] threshold: u64,
        #[case] expected: bool,
    ) {
        let policy = RotatePolicy::Size(threshold);
        assert_eq!(policy.should_rotate(written, next, EPOCH, EPOCH), expected);
    }

    #[rstest]
    #[case::window_elapsed(2, 1, true)]
    #[case::window_exact(1, 1, true)]
    #[case::window_open(0, 1, false)]
    fn interval_policy_compares_elapsed_time(
        #[case] elapsed_secs: u64,
        #[case] interval_secs: u64,
        #[case] expected: bool,
    ) {
        let policy = RotatePolicy::Interval(Duration::from_secs(interval_secs));
        let now = EPOCH + Duration::from_secs(elapsed_secs);
        assert_eq!(policy.should_rotate(0, 57, EPOCH, now), expected);
    }

    #[test]
    fn interval_policy_tolerates_clock_running_backwards() {
        let policy = RotatePolicy::Interval(Duration::from_secs(1));
        let opened_at = EPOCH + Duration::from_secs(10);
        assert!(!policy.should_rotate(0, 57, opened_at, EPOCH));
    }

    #[test]
    fn none_policy_never_rotates() {
        let policy = RotatePolicy::None;
        assert!(!policy.should_rotate(u64::MAX, u64::MAX, EPOCH, EPOCH + Duration::from_secs(1)));
    }

    #[test]
    fn size_policy_saturates_instead_of_overflowing() {
        let policy = RotatePolicy::Size(u64::MAX);
        assert!(policy.should_rotate(u64::MAX - 1, 57, EPOCH, EPOCH));
    }
}
