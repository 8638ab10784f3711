//! Completion and rate statistics.
//!
//! Project-wide work counters derived from checklists.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total items | Σ checklist length, or 1 for an event without a checklist |
//! | Done items | Σ ticked items, or the `completed` flag without a checklist |
//! | Rate | round(100 · done / total), 0 when total is 0 |
//! | Task count | Number of events |
//! | In progress | Not completed and `start_date <= today` |
//! | Late | Not completed and `end_date < today` |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Project;

/// Completion counters of a project at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    /// Units of work across all events.
    pub total_items: usize,
    /// Units of work done.
    pub done_items: usize,
    /// Completion rate in whole percent (0..=100).
    pub rate: u32,
    /// Number of events.
    pub task_count: usize,
    /// Events started but not completed.
    pub in_progress: usize,
    /// Events past their end date and not completed.
    pub late_count: usize,
}

impl CompletionStats {
    /// Computes the counters over every event of `project`.
    pub fn calculate(project: &Project, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let mut stats = Self::default();

        for event in project.events() {
            stats.task_count += 1;
            stats.total_items += event.work_units();
            stats.done_items += event.done_units();
            if event.is_in_progress(today) {
                stats.in_progress += 1;
            }
            if event.is_late(today) {
                stats.late_count += 1;
            }
        }

        stats.rate = completion_rate(stats.done_items, stats.total_items);
        stats
    }

    /// Whether any event is late.
    pub fn has_late(&self) -> bool {
        self.late_count > 0
    }
}

/// `round(100 · done / total)`, or 0 without work.
pub fn completion_rate(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * 100.0).round() as u32
}
