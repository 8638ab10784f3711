//! Scope (discipline work package) model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::Event;

/// An opaque file reference attached to a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLink {
    /// Display label.
    pub label: String,
    /// Path or URL.
    pub path: String,
}

impl FileLink {
    /// Creates a file link.
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

/// A discipline-level work package that exclusively owns its events.
///
/// Events are held behind `Arc` so that a copy-on-write edit of one event
/// shares every untouched sibling with the previous snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    /// Unique scope identifier.
    pub id: String,
    /// Discipline code (e.g. "ARQ", "EST").
    pub name: String,
    /// Display color.
    pub color_class: String,
    /// Start date of the scope.
    pub start_date: NaiveDate,
    /// Baseline start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_start_date: Option<NaiveDate>,
    /// Responsible team member (scope leader).
    pub resp: String,
    /// Free-form status label.
    #[serde(default)]
    pub status: String,
    /// Protocol week number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_week: Option<u32>,
    /// Events in display order.
    #[serde(default)]
    pub events: Vec<Arc<Event>>,
    /// Attached file links.
    #[serde(default)]
    pub file_links: Vec<FileLink>,
}

impl Scope {
    /// Creates an empty scope for a discipline.
    pub fn new(id: impl Into<String>, name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color_class: String::new(),
            start_date,
            planned_start_date: None,
            resp: String::new(),
            status: String::new(),
            protocol_week: None,
            events: Vec::new(),
            file_links: Vec::new(),
        }
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color_class = color.into();
        self
    }

    /// Sets the scope leader.
    pub fn with_resp(mut self, resp: impl Into<String>) -> Self {
        self.resp = resp.into();
        self
    }

    /// Sets the status label.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the protocol week.
    pub fn with_protocol_week(mut self, week: u32) -> Self {
        self.protocol_week = Some(week);
        self
    }

    /// Appends an event.
    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(Arc::new(event));
        self
    }

    /// Finds an event by ID.
    pub fn event(&self, event_id: &str) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| e.as_ref())
    }

    /// Whether this scope owns the event.
    pub fn contains_event(&self, event_id: &str) -> bool {
        self.events.iter().any(|e| e.id == event_id)
    }

    /// Mutable access to an event, cloning it first if shared with another snapshot.
    pub(crate) fn event_mut(&mut self, event_id: &str) -> Option<&mut Event> {
        self.events
            .iter_mut()
            .find(|e| e.id == event_id)
            .map(Arc::make_mut)
    }

    /// Number of events.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}
