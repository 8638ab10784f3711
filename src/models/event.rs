//! Event (task) model.
//!
//! An event is a unit of work inside a scope: a date range, a responsible
//! team member, an optional baseline, a checklist, and links to the
//! events it depends on.
//!
//! # Completion
//! Completion fraction is never stored. It is derived from the checklist
//! (see [`crate::analytics::CompletionStats`]); an event without a checklist
//! counts as a single unit of work, done iff `completed` is set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Dependency;

/// One checklist entry of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Item text.
    pub text: String,
    /// Whether the item is ticked.
    pub done: bool,
}

impl ChecklistItem {
    /// Creates an unticked item.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: false,
        }
    }

    /// Creates a ticked item.
    pub fn done(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            done: true,
        }
    }
}

/// A scheduled event (task) owned by a scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique event identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Responsible team member (free text, not reconciled with the roster).
    pub resp: String,
    /// Actual start date.
    pub start_date: NaiveDate,
    /// Actual end date.
    pub end_date: NaiveDate,
    /// Baseline start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_start_date: Option<NaiveDate>,
    /// Baseline end date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_end_date: Option<NaiveDate>,
    /// Checklist sub-items.
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// Explicit completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Predecessor links (at most one per predecessor).
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Event {
    /// Creates an event spanning `[start_date, end_date]`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            resp: String::new(),
            start_date,
            end_date,
            planned_start_date: None,
            planned_end_date: None,
            checklist: Vec::new(),
            completed: false,
            dependencies: Vec::new(),
        }
    }

    /// Sets the responsible member.
    pub fn with_resp(mut self, resp: impl Into<String>) -> Self {
        self.resp = resp.into();
        self
    }

    /// Sets the baseline window.
    pub fn with_baseline(mut self, planned_start: NaiveDate, planned_end: NaiveDate) -> Self {
        self.planned_start_date = Some(planned_start);
        self.planned_end_date = Some(planned_end);
        self
    }

    /// Appends a checklist item.
    pub fn with_item(mut self, item: ChecklistItem) -> Self {
        self.checklist.push(item);
        self
    }

    /// Replaces the checklist.
    pub fn with_checklist(mut self, checklist: Vec<ChecklistItem>) -> Self {
        self.checklist = checklist;
        self
    }

    /// Marks the event completed.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Adds a predecessor link.
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Units of work this event contributes: checklist length, or 1 without a checklist.
    pub fn work_units(&self) -> usize {
        if self.checklist.is_empty() {
            1
        } else {
            self.checklist.len()
        }
    }

    /// Units of work done: ticked items, or the completion flag without a checklist.
    pub fn done_units(&self) -> usize {
        if self.checklist.is_empty() {
            usize::from(self.completed)
        } else {
            self.checklist.iter().filter(|i| i.done).count()
        }
    }

    /// Whether the event is past its end date without being completed.
    pub fn is_late(&self, today: NaiveDate) -> bool {
        !self.completed && self.end_date < today
    }

    /// Whether the event has started and is not yet completed.
    pub fn is_in_progress(&self, today: NaiveDate) -> bool {
        !self.completed && self.start_date <= today
    }

    /// Days the actual end slipped past the baseline end (0 if on time or no baseline).
    pub fn slip_days(&self) -> i64 {
        self.planned_end_date
            .map(|planned| (self.end_date - planned).num_days().max(0))
            .unwrap_or(0)
    }

    /// Whether the actual end lies after the baseline end.
    pub fn is_delayed(&self) -> bool {
        self.slip_days() > 0
    }

    /// Finds the link to a given predecessor.
    pub fn dependency_on(&self, predecessor_id: &str) -> Option<&Dependency> {
        self.dependencies
            .iter()
            .find(|d| d.event_id == predecessor_id)
    }

    /// Whether this event already depends on `predecessor_id`.
    pub fn depends_on(&self, predecessor_id: &str) -> bool {
        self.dependency_on(predecessor_id).is_some()
    }
}

/// Parses newline-separated checklist text into unticked items.
///
/// Lines are trimmed; blank lines are dropped.
pub fn parse_checklist(text: &str) -> Vec<ChecklistItem> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ChecklistItem::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_event_builder() {
        let ev = Event::new("ev1", "Floor plan", d(2026, 2, 6), d(2026, 2, 25))
            .with_resp("Arq. Isabela")
            .with_baseline(d(2026, 2, 6), d(2026, 2, 19))
            .with_item(ChecklistItem::done("PLANTA BAIXA"))
            .with_dependency(Dependency::finish_to_start("ev0"));

        assert_eq!(ev.id, "ev1");
        assert_eq!(ev.resp, "Arq. Isabela");
        assert_eq!(ev.checklist.len(), 1);
        assert!(ev.depends_on("ev0"));
        assert!(!ev.depends_on("ev9"));
    }

    #[test]
    fn test_work_units_with_checklist() {
        let ev = Event::new("e", "t", d(2026, 1, 1), d(2026, 1, 2))
            .with_item(ChecklistItem::done("a"))
            .with_item(ChecklistItem::new("b"));
        assert_eq!(ev.work_units(), 2);
        assert_eq!(ev.done_units(), 1);
    }

    #[test]
    fn test_work_units_without_checklist() {
        let ev = Event::new("e", "t", d(2026, 1, 1), d(2026, 1, 2));
        assert_eq!(ev.work_units(), 1);
        assert_eq!(ev.done_units(), 0);
        assert_eq!(ev.with_completed(true).done_units(), 1);
    }

    #[test]
    fn test_checklist_overrides_completed_flag() {
        // A completed event with unticked items still reports ticked items only.
        let ev = Event::new("e", "t", d(2026, 1, 1), d(2026, 1, 2))
            .with_item(ChecklistItem::new("a"))
            .with_completed(true);
        assert_eq!(ev.done_units(), 0);
    }

    #[test]
    fn test_late_and_in_progress() {
        let ev = Event::new("e", "t", d(2026, 3, 1), d(2026, 3, 10));
        assert!(!ev.is_late(d(2026, 3, 10)));
        assert!(ev.is_late(d(2026, 3, 11)));
        assert!(ev.is_in_progress(d(2026, 3, 1)));
        assert!(!ev.is_in_progress(d(2026, 2, 28)));

        let done = ev.with_completed(true);
        assert!(!done.is_late(d(2026, 4, 1)));
        assert!(!done.is_in_progress(d(2026, 3, 5)));
    }

    #[test]
    fn test_slip_days() {
        let ev = Event::new("e", "t", d(2026, 2, 6), d(2026, 2, 25))
            .with_baseline(d(2026, 2, 6), d(2026, 2, 19));
        assert_eq!(ev.slip_days(), 6);
        assert!(ev.is_delayed());

        let early = Event::new("e", "t", d(2026, 2, 6), d(2026, 2, 10))
            .with_baseline(d(2026, 2, 6), d(2026, 2, 19));
        assert_eq!(early.slip_days(), 0);

        let no_baseline = Event::new("e", "t", d(2026, 2, 6), d(2026, 2, 10));
        assert!(!no_baseline.is_delayed());
    }

    #[test]
    fn test_parse_checklist() {
        let items = parse_checklist("  Plan \n\n Sections\n   \nFacade");
        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Plan", "Sections", "Facade"]);
        assert!(items.iter().all(|i| !i.done));
    }

    #[test]
    fn test_deserialize_board_snapshot_shape() {
        let json = r#"{
            "id": "ev1770419256185",
            "title": "ARQ",
            "resp": "Arq. Isabela",
            "startDate": "2026-02-06",
            "endDate": "2026-02-25",
            "plannedEndDate": "2026-02-19",
            "checklist": [{ "text": "PLANTA BAIXA", "done": true }],
            "completed": false
        }"#;
        let ev: Event = serde_json::from_str(json).unwrap();
        assert_eq!(ev.end_date, d(2026, 2, 25));
        assert_eq!(ev.planned_end_date, Some(d(2026, 2, 19)));
        assert!(ev.planned_start_date.is_none());
        assert!(ev.dependencies.is_empty());
    }
}
