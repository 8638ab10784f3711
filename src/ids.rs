//! Time-based identifier generation.
//!
//! IDs are millisecond timestamps, bumped by one whenever the clock has
//! not advanced past the last issued value, so they are strictly
//! increasing within a process even when several are issued in the same
//! millisecond or the clock steps backwards.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Prefix of generated scope IDs.
pub const SCOPE_PREFIX: &str = "sc";
/// Prefix of generated event IDs.
pub const EVENT_PREFIX: &str = "ev";

/// Strictly increasing millisecond-based ID source.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    /// Creates a generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next numeric ID, at least `now` in milliseconds.
    pub fn next_numeric(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let next = candidate.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }

    /// Next scope ID (`sc<millis>`).
    pub fn next_scope_id(&self, now: DateTime<Utc>) -> String {
        format!("{SCOPE_PREFIX}{}", self.next_numeric(now))
    }

    /// Next event ID (`ev<millis>`).
    pub fn next_event_id(&self, now: DateTime<Utc>) -> String {
        format!("{EVENT_PREFIX}{}", self.next_numeric(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ids_strictly_increase_at_same_instant() {
        let ids = IdGenerator::new();
        let now = Utc.with_ymd_and_hms(2026, 2, 6, 23, 5, 26).unwrap();
        let a = ids.next_numeric(now);
        let b = ids.next_numeric(now);
        let c = ids.next_numeric(now);
        assert_eq!(a, now.timestamp_millis());
        assert_eq!(b, a + 1);
        assert_eq!(c, a + 2);
    }

    #[test]
    fn test_ids_survive_clock_going_back() {
        let ids = IdGenerator::new();
        let now = Utc.with_ymd_and_hms(2026, 2, 6, 23, 5, 26).unwrap();
        let a = ids.next_numeric(now);
        let b = ids.next_numeric(now - chrono::Duration::seconds(5));
        assert!(b > a);
    }

    #[test]
    fn test_prefixes() {
        let ids = IdGenerator::new();
        let now = Utc.with_ymd_and_hms(2026, 2, 6, 0, 0, 0).unwrap();
        assert!(ids.next_scope_id(now).starts_with("sc"));
        assert!(ids.next_event_id(now).starts_with("ev"));
    }
}
