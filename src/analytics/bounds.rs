//! Bounds and date metrics.
//!
//! | Metric | Window | Anchor |
//! |--------|--------|--------|
//! | `project_bounds` | discovered from content | earliest scope start → latest event end |
//! | `hours_spent` | bounds, capped at today | business days × hours/day |
//! | `global_progress` | `[timeline_start, timeline_end]` | declared plan window |
//! | `progress_percentage` | `[created_at, bounds.end]` | actual elapsed work time |
//!
//! The two progress metrics are deliberately distinct and must not be
//! unified: one tracks the declared plan, the other elapsed work against
//! the discovered content window.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::BusinessCalendar;
use crate::config::EngineConfig;
use crate::models::Project;
use crate::tolerance;

/// Effective time window spanned by a project's content.
///
/// Serializes as ISO calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

impl Bounds {
    /// Creates a window.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Length in days (negative if inverted).
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Whether the window has no positive length.
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `date` lies inside the closed window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Derives the effective `[start, end]` window of a project.
///
/// - No scopes: the stored timeline window.
/// - Otherwise `start` is the earliest scope start and `end` the latest
///   event end. If no event ends on or after `start` (including when there
///   are no events), `end` becomes `start + config.empty_window_days`,
///   saturating at the last representable date.
pub fn project_bounds(project: &Project, config: &EngineConfig) -> Bounds {
    let Some(start) = project.scopes.iter().map(|s| s.start_date).min() else {
        return Bounds::new(project.timeline_start, project.timeline_end);
    };

    let end = match project.events().map(|e| e.end_date).max() {
        Some(latest) if latest >= start => latest,
        _ => Duration::try_days(config.empty_window_days)
            .and_then(|span| start.checked_add_signed(span))
            .unwrap_or(NaiveDate::MAX),
    };

    Bounds::new(start, end)
}

/// Hours invested so far: business days in `[bounds.start, min(today, bounds.end)]`.
///
/// Returns 0 when that range is empty.
pub fn hours_spent(bounds: &Bounds, calendar: &BusinessCalendar, now: DateTime<Utc>) -> u32 {
    let cap = now.date_naive().min(bounds.end);
    calendar.hours(bounds.start, cap)
}

/// Elapsed share (0–100) of the declared timeline window at `now`.
pub fn global_progress(project: &Project, now: DateTime<Utc>) -> f64 {
    tolerance::elapsed_percentage(
        tolerance::start_of_day(project.timeline_start),
        tolerance::start_of_day(project.timeline_end),
        now,
    )
}

/// Elapsed share (0–100) of `[created_at, bounds.end]` at `now`.
pub fn progress_percentage(project: &Project, bounds: &Bounds, now: DateTime<Utc>) -> f64 {
    tolerance::elapsed_percentage(project.created_at, tolerance::start_of_day(bounds.end), now)
}
