//! Shared helpers for the crate's tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use crate::clock::Clock;

/// A clock that only moves when told to, so interval-rotation tests do not
/// sleep.
pub(crate) struct ManualClock {
    base: SystemTime,
    offset_millis: AtomicU64,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            base: SystemTime::now(),
            offset_millis: AtomicU64::new(0),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.offset_millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.base + Duration::from_millis(self.offset_millis.load(Ordering::SeqCst))
    }
}
