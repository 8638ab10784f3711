//! Precomputed project summary and assistant digest.
//!
//! [`ProjectSummary`] gathers every derived figure in one pass so that
//! export layers never recompute business logic. [`AssistantDigest`] is
//! the reduced, read-only view handed to a text summarizer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::bounds::{global_progress, hours_spent, progress_percentage, project_bounds, Bounds};
use super::health::{Health, HealthReport};
use super::stats::CompletionStats;
use super::wave::DensityWave;
use super::workload::{MemberLoad, Workload};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Project, TeamRoster};

/// An event whose actual end slipped past its baseline end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayedEvent {
    /// Event ID.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Responsible member.
    pub resp: String,
    /// Baseline end.
    pub planned_end_date: NaiveDate,
    /// Actual end.
    pub end_date: NaiveDate,
    /// `end_date - planned_end_date` in days.
    pub slip_days: i64,
}

/// Every derived figure of a project at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Project name.
    pub name: String,
    /// Discovered content window.
    pub bounds: Bounds,
    /// Completion counters.
    pub stats: CompletionStats,
    /// Health label.
    pub health: Health,
    /// Elapsed share of the declared timeline.
    pub global_progress: f64,
    /// Elapsed share of `[created_at, bounds.end]`.
    pub progress: f64,
    /// Business hours invested so far.
    pub hours_spent: u32,
    /// Per-member load.
    pub workload: Workload,
    /// Density curve.
    pub wave: DensityWave,
    /// Events past their baseline end.
    pub delayed: Vec<DelayedEvent>,
}

impl ProjectSummary {
    /// Computes the summary of `project` at `now`.
    pub fn compute(
        project: &Project,
        roster: &TeamRoster,
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let bounds = project_bounds(project, config);
        let stats = CompletionStats::calculate(project, now);
        let progress = progress_percentage(project, &bounds, now);
        let health = HealthReport::from_parts(&stats, progress).health;
        let calendar = config.calendar();

        Self {
            name: project.name.clone(),
            bounds,
            stats,
            health,
            global_progress: global_progress(project, now),
            progress,
            hours_spent: hours_spent(&bounds, &calendar, now),
            workload: Workload::calculate(project, roster),
            wave: DensityWave::calculate(project, &bounds, config),
            delayed: delayed_events(project),
        }
    }

    /// Reduces the summary to the assistant digest.
    pub fn digest(&self) -> AssistantDigest {
        AssistantDigest {
            project: self.name.clone(),
            health: self.health.label().to_string(),
            completion_rate: format!("{}%", self.stats.rate),
            delayed_items: self
                .delayed
                .iter()
                .map(|d| format!("{} (Resp: {})", d.title, d.resp))
                .collect(),
            team_load: self.workload.active().cloned().collect(),
            total_tasks: self.stats.task_count,
            tasks_in_progress: self.stats.in_progress,
        }
    }
}

/// Events with a baseline end earlier than their actual end, in scope order.
pub fn delayed_events(project: &Project) -> Vec<DelayedEvent> {
    project
        .events()
        .filter_map(|e| {
            let planned = e.planned_end_date?;
            e.is_delayed().then(|| DelayedEvent {
                id: e.id.clone(),
                title: e.title.clone(),
                resp: e.resp.clone(),
                planned_end_date: planned,
                end_date: e.end_date,
                slip_days: e.slip_days(),
            })
        })
        .collect()
}

/// Read-only digest for a text summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantDigest {
    /// Project name.
    pub project: String,
    /// Health label.
    pub health: String,
    /// Completion rate, e.g. `"60%"`.
    pub completion_rate: String,
    /// `"<title> (Resp: <resp>)"` per delayed event.
    pub delayed_items: Vec<String>,
    /// Members with assignments or scope leadership, in roster order.
    pub team_load: Vec<MemberLoad>,
    /// Number of events.
    pub total_tasks: usize,
    /// Number of events in progress.
    pub tasks_in_progress: usize,
}

impl AssistantDigest {
    /// Pretty-printed JSON text.
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChecklistItem, Event, Scope};
    use chrono::TimeZone;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    fn sample_project() -> Project {
        let created = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        Project::new(7, "Casa Verde", created, d(1, 1), d(12, 31)).with_scope(
            Scope::new("sc1", "ARQ", d(10, 1))
                .with_resp("Ana")
                .with_event(
                    Event::new("e1", "Floor plan", d(10, 1), d(10, 20))
                        .with_resp("Ana")
                        .with_baseline(d(10, 1), d(10, 15))
                        .with_item(ChecklistItem::done("draft"))
                        .with_item(ChecklistItem::new("review")),
                )
                .with_event(
                    Event::new("e2", "Survey", d(10, 1), d(10, 10))
                        .with_resp("Bruno")
                        .with_baseline(d(10, 1), d(10, 10))
                        .with_completed(true),
                ),
        )
    }

    fn roster() -> TeamRoster {
        TeamRoster::new().with_member("Ana").with_member("Bruno")
    }

    #[test]
    fn test_summary_figures() {
        let s = ProjectSummary::compute(&sample_project(), &roster(), &EngineConfig::default(), now());
        assert_eq!(s.bounds, Bounds::new(d(10, 1), d(10, 20)));
        assert_eq!(s.stats.total_items, 3);
        assert_eq!(s.stats.done_items, 2);
        assert_eq!(s.stats.rate, 67);
        assert_eq!(s.stats.in_progress, 1);
        // Thu 1 .. Wed 14 October: 10 business days.
        assert_eq!(s.hours_spent, 80);
        assert_eq!(s.wave.total(), 3);
        assert_eq!(s.delayed.len(), 1);
        assert_eq!(s.delayed[0].slip_days, 5);
    }

    #[test]
    fn test_summary_health_matches_classifier() {
        let p = sample_project();
        let cfg = EngineConfig::default();
        let s = ProjectSummary::compute(&p, &roster(), &cfg, now());
        assert_eq!(s.health, crate::analytics::health::evaluate(&p, &cfg, now()));
    }

    #[test]
    fn test_digest_contents() {
        let s = ProjectSummary::compute(&sample_project(), &roster(), &EngineConfig::default(), now());
        let digest = s.digest();
        assert_eq!(digest.project, "Casa Verde");
        assert_eq!(digest.completion_rate, "67%");
        assert_eq!(digest.delayed_items, vec!["Floor plan (Resp: Ana)"]);
        assert_eq!(digest.team_load.len(), 2);
        let ana = &digest.team_load[0];
        assert_eq!((ana.name.as_str(), ana.count), ("Ana", 1));
        assert_eq!(ana.leader_of, vec!["ARQ"]);
        let bruno = &digest.team_load[1];
        assert_eq!((bruno.name.as_str(), bruno.count), ("Bruno", 1));
        assert!(bruno.leader_of.is_empty());
        assert_eq!(digest.total_tasks, 2);
        assert_eq!(digest.tasks_in_progress, 1);

        let json = digest.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["completionRate"], "67%");
        assert_eq!(value["tasksInProgress"], 1);
        assert_eq!(value["teamLoad"][0]["leaderOf"][0], "ARQ");
        assert_eq!(value["teamLoad"][0]["count"], 1);
    }

    #[test]
    fn test_no_baseline_is_never_delayed() {
        let created = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let p = Project::new(1, "P", created, d(1, 1), d(12, 31)).with_scope(
            Scope::new("sc1", "ARQ", d(10, 1)).with_event(Event::new("e1", "a", d(10, 1), d(11, 1))),
        );
        assert!(delayed_events(&p).is_empty());
    }
}
