//! Wall-clock timestamps for log diagnostics.
//!
//! Timestamps never decide ordering: log entries are ordered by emission.
//! They exist so tests and tooling can reason about relative timing.

use serde::{Deserialize, Serialize};

/// Wall-clock capture at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Seconds since the Unix epoch.
    pub seconds: u64,
    /// Sub-second nanoseconds.
    pub nanos: u32,
}

impl Timestamp {
    /// Maximum nanoseconds per second.
    pub const NANOS_PER_SEC: u32 = 1_000_000_000;

    /// Create a timestamp from raw parts.
    #[must_use]
    pub const fn new(seconds: u64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Capture the current wall clock.
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub fn now() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards");
        Self {
            seconds: duration.as_secs(),
            nanos: duration.subsec_nanos(),
        }
    }

    /// Total milliseconds since the epoch.
    #[must_use]
    pub const fn as_millis(&self) -> u128 {
        self.seconds as u128 * 1_000 + self.nanos as u128 / 1_000_000
    }

    /// Milliseconds elapsed since an earlier timestamp, saturating at zero.
    #[must_use]
    pub fn millis_since(&self, earlier: &Timestamp) -> u128 {
        self.as_millis().saturating_sub(earlier.as_millis())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_millis() {
        let t = Timestamp::new(2, 500_000_000);
        assert_eq!(t.as_millis(), 2_500);
    }

    #[test]
    fn test_ordering() {
        let t1 = Timestamp::new(100, 0);
        let t2 = Timestamp::new(100, 1);
        let t3 = Timestamp::new(101, 0);
        assert!(t1 < t2);
        assert!(t2 < t3);
    }

    #[test]
    fn test_millis_since_saturates() {
        let earlier = Timestamp::new(10, 0);
        let later = Timestamp::new(12, 0);
        assert_eq!(later.millis_since(&earlier), 2_000);
        assert_eq!(earlier.millis_since(&later), 0);
    }

    #[test]
    fn test_now_is_monotonic_enough() {
        let t1 = Timestamp::now();
        let t2 = Timestamp::now();
        assert!(t2 >= t1);
    }

    #[test]
    fn test_display() {
        let t = Timestamp::new(5, 42);
        assert_eq!(t.to_string(), "5.000000042");
    }
}
