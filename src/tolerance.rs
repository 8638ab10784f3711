//! Tolerance rules for inconsistent snapshots.
//!
//! The engine runs against live interactive edits, so it accepts data a
//! strict model would reject. All of that laxity is concentrated here:
//!
//! - **Degenerate windows**: a date window whose end does not lie after its
//!   start never yields a negative value or a division fault. Instants
//!   before its start give 0 and instants after its end give 100.
//! - **Dangling references**: a dependency whose predecessor no longer
//!   exists is skipped by every read-time derivation and left in place.
//! - **Lenient dates**: ISO dates are accepted with or without a trailing
//!   time component.
//!
//! Free-text assignees outside the roster are tolerated by the workload
//! aggregator, which synthesizes entries for them
//! (see [`crate::analytics::workload`]).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::{Dependency, Event, Project};

/// Parses an ISO calendar date, ignoring any `T...` time suffix.
pub fn parse_iso_date(value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed.split('T').next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| EngineError::InvalidDate {
        value: value.to_string(),
    })
}

/// The instant at which a calendar date begins (00:00 UTC).
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Whether `[start, end]` lacks positive length.
pub fn is_degenerate(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    end <= start
}

/// Elapsed fraction of `[start, end]` at `now`, as a percentage in `[0, 100]`.
///
/// Checked in order: `now < start` gives 0, `now > end` gives 100, and a
/// window that is still degenerate after that gives 0.
pub fn elapsed_percentage(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    if now < start {
        return 0.0;
    }
    if now > end {
        return 100.0;
    }
    if is_degenerate(start, end) {
        return 0.0;
    }
    let total = (end - start).num_milliseconds() as f64;
    let elapsed = (now - start).num_milliseconds() as f64;
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

/// Dependencies of `event` whose predecessor still exists, paired with it.
pub fn live_dependencies<'a>(
    project: &'a Project,
    event: &'a Event,
) -> impl Iterator<Item = (&'a Dependency, &'a Event)> + 'a {
    event.dependencies.iter().filter_map(move |dep| {
        let predecessor = project.event(&dep.event_id);
        if predecessor.is_none() {
            log::debug!(
                "skipping dangling dependency {} -> {} ({})",
                event.id,
                dep.event_id,
                dep.relation
            );
        }
        predecessor.map(|p| (dep, p))
    })
}

/// Dependencies of `event` whose predecessor no longer exists.
pub fn dangling_dependencies<'a>(
    project: &'a Project,
    event: &'a Event,
) -> impl Iterator<Item = &'a Dependency> + 'a {
    event
        .dependencies
        .iter()
        .filter(move |dep| !project.contains_event(&dep.event_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scope;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2026-02-06").unwrap(), d(2026, 2, 6));
        assert_eq!(
            parse_iso_date("2026-02-06T23:05:26.261Z").unwrap(),
            d(2026, 2, 6)
        );
        assert!(matches!(
            parse_iso_date("06/02/2026"),
            Err(EngineError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_elapsed_percentage_endpoints() {
        let start = start_of_day(d(2026, 1, 1));
        let end = start_of_day(d(2026, 1, 11));
        assert!((elapsed_percentage(start, end, start) - 0.0).abs() < 1e-10);
        assert!((elapsed_percentage(start, end, end) - 100.0).abs() < 1e-10);
        let mid = start_of_day(d(2026, 1, 6));
        assert!((elapsed_percentage(start, end, mid) - 50.0).abs() < 1e-10);
        assert_eq!(elapsed_percentage(start, end, start - chrono::Duration::days(3)), 0.0);
        assert_eq!(elapsed_percentage(start, end, end + chrono::Duration::days(3)), 100.0);
    }

    #[test]
    fn test_elapsed_percentage_degenerate() {
        let start = start_of_day(d(2026, 1, 11));
        let end = start_of_day(d(2026, 1, 1));
        // Endpoint checks come first, even for an inverted window.
        let after = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(elapsed_percentage(start, end, after), 100.0);
        let before = start_of_day(d(2025, 12, 1));
        assert_eq!(elapsed_percentage(start, end, before), 0.0);
        // Zero-length window evaluated at its only instant.
        assert_eq!(elapsed_percentage(start, start, start), 0.0);
    }

    #[test]
    fn test_live_and_dangling_dependencies() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let project = Project::new(1, "P", created, d(2026, 1, 1), d(2026, 12, 31)).with_scope(
            Scope::new("sc1", "ARQ", d(2026, 1, 1))
                .with_event(Event::new("ev1", "A", d(2026, 1, 1), d(2026, 1, 5)))
                .with_event(
                    Event::new("ev2", "B", d(2026, 1, 6), d(2026, 1, 9))
                        .with_dependency(Dependency::finish_to_start("ev1"))
                        .with_dependency(Dependency::finish_to_start("ev-gone")),
                ),
        );
        let ev2 = project.event("ev2").unwrap();

        let live: Vec<&str> = live_dependencies(&project, ev2)
            .map(|(_, p)| p.id.as_str())
            .collect();
        assert_eq!(live, vec!["ev1"]);

        let dangling: Vec<&str> = dangling_dependencies(&project, ev2)
            .map(|d| d.event_id.as_str())
            .collect();
        assert_eq!(dangling, vec!["ev-gone"]);
    }
}
