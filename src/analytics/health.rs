//! Schedule health classification.
//!
//! Three-state judgment recomputed on every call; nothing is persisted.
//!
//! | Order | Condition | Label |
//! |-------|-----------|-------|
//! | 1 | any incomplete event with `end_date < today` | `LATE` |
//! | 2 | `rate - progress < 0` | `AT_RISK` |
//! | 3 | otherwise (ties included) | `ON_TRACK` |
//!
//! `rate` is the checklist completion rate ([`CompletionStats`]) and
//! `progress` the elapsed work time ([`progress_percentage`]).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bounds::{progress_percentage, project_bounds};
use super::stats::CompletionStats;
use crate::config::EngineConfig;
use crate::models::Project;

/// Health label of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Health {
    /// At least one incomplete event is past its end date.
    Late,
    /// Completion lags elapsed time.
    AtRisk,
    /// Completion keeps pace with elapsed time.
    OnTrack,
}

impl Health {
    /// Applies the classification order to precomputed signals.
    pub fn classify(any_late: bool, rate: f64, progress: f64) -> Self {
        if any_late {
            Self::Late
        } else if rate - progress < 0.0 {
            Self::AtRisk
        } else {
            Self::OnTrack
        }
    }

    /// Canonical label (`LATE`, `AT_RISK`, `ON_TRACK`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Late => "LATE",
            Self::AtRisk => "AT_RISK",
            Self::OnTrack => "ON_TRACK",
        }
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Health label together with the signals it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Resulting label.
    pub health: Health,
    /// Completion rate used (0–100).
    pub rate: u32,
    /// Elapsed work-time percentage used (0–100).
    pub progress: f64,
    /// Number of late events.
    pub late_count: usize,
}

impl HealthReport {
    /// Evaluates the health of `project` at `now`.
    pub fn evaluate(project: &Project, config: &EngineConfig, now: DateTime<Utc>) -> Self {
        let stats = CompletionStats::calculate(project, now);
        let bounds = project_bounds(project, config);
        let progress = progress_percentage(project, &bounds, now);
        Self::from_parts(&stats, progress)
    }

    /// Builds a report from already computed statistics and progress.
    pub fn from_parts(stats: &CompletionStats, progress: f64) -> Self {
        Self {
            health: Health::classify(stats.has_late(), f64::from(stats.rate), progress),
            rate: stats.rate,
            progress,
            late_count: stats.late_count,
        }
    }
}

/// Shorthand for [`HealthReport::evaluate`] returning only the label.
pub fn evaluate(project: &Project, config: &EngineConfig, now: DateTime<Utc>) -> Health {
    HealthReport::evaluate(project, config, now).health
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChecklistItem, Event, Scope};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap()
    }

    /// Created 10 days ago, one event ending in 10 days: progress is 50%.
    fn half_elapsed_project(done: usize, total: usize) -> Project {
        let today = now().date_naive();
        let mut event = Event::new("e1", "Drawings", today - Duration::days(10), today + Duration::days(10));
        for i in 0..total {
            let text = format!("item {i}");
            event = event.with_item(if i < done {
                ChecklistItem::done(text)
            } else {
                ChecklistItem::new(text)
            });
        }
        let start = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        Project::new(
            1,
            "P",
            now() - Duration::days(10),
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        )
        .with_scope(Scope::new("sc1", "ARQ", start).with_event(event))
    }

    #[test]
    fn test_classify_order() {
        assert_eq!(Health::classify(true, 100.0, 0.0), Health::Late);
        assert_eq!(Health::classify(false, 20.0, 50.0), Health::AtRisk);
        assert_eq!(Health::classify(false, 60.0, 50.0), Health::OnTrack);
        // Tie
        assert_eq!(Health::classify(false, 50.0, 50.0), Health::OnTrack);
    }

    #[test]
    fn test_late_event_dominates() {
        let today = now().date_naive();
        let yesterday = today - Duration::days(1);
        let event = Event::new("e1", "a", yesterday - Duration::days(5), yesterday)
            .with_item(ChecklistItem::done("x"));
        let p = Project::new(1, "P", now() - Duration::days(30), today, today)
            .with_scope(Scope::new("sc1", "ARQ", yesterday - Duration::days(5)).with_event(event));
        // The only item is ticked but the event is not completed.
        let report = HealthReport::evaluate(&p, &EngineConfig::default(), now());
        assert_eq!(report.health, Health::Late);
        assert_eq!(report.rate, 100);
        assert_eq!(report.late_count, 1);
    }

    #[test]
    fn test_on_track_when_rate_ahead() {
        let p = half_elapsed_project(3, 5);
        let report = HealthReport::evaluate(&p, &EngineConfig::default(), now());
        assert_eq!(report.rate, 60);
        assert!((report.progress - 50.0).abs() < 1e-10);
        assert_eq!(report.health, Health::OnTrack);
    }

    #[test]
    fn test_at_risk_when_rate_behind() {
        let p = half_elapsed_project(1, 5);
        assert_eq!(evaluate(&p, &EngineConfig::default(), now()), Health::AtRisk);
    }

    #[test]
    fn test_completed_past_event_is_not_late() {
        let today = now().date_naive();
        let event = Event::new("e1", "a", today - Duration::days(9), today - Duration::days(2))
            .with_completed(true);
        let p = Project::new(1, "P", now() - Duration::days(10), today, today)
            .with_scope(Scope::new("sc1", "ARQ", today - Duration::days(9)).with_event(event));
        assert_eq!(evaluate(&p, &EngineConfig::default(), now()), Health::OnTrack);
    }

    #[test]
    fn test_window_ending_before_creation_counts_as_elapsed() {
        let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
        let created = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        // Completed so it is not late, but only half of its checklist is ticked.
        let event = Event::new("e1", "Survey", d(2, 1), d(3, 1))
            .with_item(ChecklistItem::done("site visit"))
            .with_item(ChecklistItem::new("report"))
            .with_completed(true);
        let p = Project::new(1, "P", created, d(1, 1), d(12, 31))
            .with_scope(Scope::new("sc1", "ARQ", d(2, 1)).with_event(event));

        let report = HealthReport::evaluate(&p, &EngineConfig::default(), now());
        assert_eq!(report.rate, 50);
        assert_eq!(report.late_count, 0);
        assert_eq!(report.progress, 100.0);
        assert_eq!(report.health, Health::AtRisk);
    }

    #[test]
    fn test_serialized_labels() {
        assert_eq!(serde_json::to_string(&Health::AtRisk).unwrap(), "\"AT_RISK\"");
        assert_eq!(Health::OnTrack.to_string(), "ON_TRACK");
        assert_eq!(Health::Late.label(), "LATE");
    }
}
