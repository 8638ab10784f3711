//! Project model: the owning aggregate of scopes, events, and the activity log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Activity, Event, Scope};

/// A project schedule.
///
/// Owns its scopes exclusively; scopes own their events. The timeline
/// window is the user-declared plan and may be inverted (start after
/// end); derivations degrade instead of failing in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project identifier.
    pub id: i64,
    /// Owning company identifier.
    pub company_id: i64,
    /// Phase (level of development) label.
    pub lod: String,
    /// Display name.
    pub name: String,
    /// Opaque logo reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Opaque cover image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp (never before `created_at`).
    pub updated_at: DateTime<Utc>,
    /// Baseline plan start.
    pub timeline_start: NaiveDate,
    /// Baseline plan end.
    pub timeline_end: NaiveDate,
    /// Activity log, oldest first.
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Scopes in display order.
    #[serde(default)]
    pub scopes: Vec<Arc<Scope>>,
}

impl Project {
    /// Creates an empty project created at `created_at`.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
        timeline_start: NaiveDate,
        timeline_end: NaiveDate,
    ) -> Self {
        Self {
            id,
            company_id: 0,
            lod: String::new(),
            name: name.into(),
            logo_url: None,
            cover_url: None,
            created_at,
            updated_at: created_at,
            timeline_start,
            timeline_end,
            activities: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// Sets the owning company.
    pub fn with_company(mut self, company_id: i64) -> Self {
        self.company_id = company_id;
        self
    }

    /// Sets the phase label.
    pub fn with_lod(mut self, lod: impl Into<String>) -> Self {
        self.lod = lod.into();
        self
    }

    /// Appends a scope.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scopes.push(Arc::new(scope));
        self
    }

    /// Appends a log entry.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    /// Updates the modification timestamp, keeping `updated_at >= created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Finds a scope by ID.
    pub fn scope(&self, scope_id: &str) -> Option<&Scope> {
        self.scopes
            .iter()
            .find(|s| s.id == scope_id)
            .map(|s| s.as_ref())
    }

    /// Mutable access to a scope, cloning it first if shared with another snapshot.
    pub(crate) fn scope_mut(&mut self, scope_id: &str) -> Option<&mut Scope> {
        self.scopes
            .iter_mut()
            .find(|s| s.id == scope_id)
            .map(Arc::make_mut)
    }

    /// The scope that owns `event_id`.
    pub fn scope_of_event(&self, event_id: &str) -> Option<&Scope> {
        self.scopes
            .iter()
            .find(|s| s.contains_event(event_id))
            .map(|s| s.as_ref())
    }

    /// Finds an event anywhere in the project.
    pub fn event(&self, event_id: &str) -> Option<&Event> {
        self.scopes.iter().find_map(|s| s.event(event_id))
    }

    /// Whether any scope owns `event_id`.
    pub fn contains_event(&self, event_id: &str) -> bool {
        self.scope_of_event(event_id).is_some()
    }

    /// Iterates over every event in scope order.
    pub fn events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.scopes
            .iter()
            .flat_map(|s| s.events.iter().map(|e| e.as_ref()))
    }

    /// Total number of events.
    pub fn event_count(&self) -> usize {
        self.scopes.iter().map(|s| s.event_count()).sum()
    }

    /// Whether the project has any events.
    pub fn has_events(&self) -> bool {
        self.scopes.iter().any(|s| !s.events.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_project() -> Project {
        let created = Utc.with_ymd_and_hms(2026, 2, 6, 23, 5, 26).unwrap();
        Project::new(1, "SKY VIEW", created, d(2026, 1, 1), d(2026, 12, 31))
            .with_company(7)
            .with_lod("EV")
            .with_scope(
                Scope::new("sc1", "ARQ", d(2026, 2, 6))
                    .with_event(Event::new("ev1", "Plan", d(2026, 2, 6), d(2026, 2, 19)))
                    .with_event(Event::new("ev2", "Cuts", d(2026, 2, 10), d(2026, 2, 25))),
            )
            .with_scope(
                Scope::new("sc2", "EST", d(2026, 3, 1))
                    .with_event(Event::new("ev3", "Slab", d(2026, 3, 1), d(2026, 3, 20))),
            )
    }

    #[test]
    fn test_lookup() {
        let p = sample_project();
        assert_eq!(p.event_count(), 3);
        assert!(p.has_events());
        assert_eq!(p.scope_of_event("ev3").unwrap().id, "sc2");
        assert_eq!(p.event("ev2").unwrap().title, "Cuts");
        assert!(p.event("nope").is_none());
        assert!(p.scope("sc9").is_none());
    }

    #[test]
    fn test_events_iterate_in_scope_order() {
        let p = sample_project();
        let ids: Vec<&str> = p.events().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ev1", "ev2", "ev3"]);
    }

    #[test]
    fn test_touch_never_precedes_creation() {
        let mut p = sample_project();
        let before = p.created_at - chrono::Duration::days(1);
        p.touch(before);
        assert_eq!(p.updated_at, p.created_at);

        let later = p.created_at + chrono::Duration::hours(2);
        p.touch(later);
        assert_eq!(p.updated_at, later);
    }

    #[test]
    fn test_json_round_trip_keeps_camel_case() {
        let p = sample_project();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["timelineStart"], "2026-01-01");
        assert_eq!(json["scopes"][0]["events"][0]["endDate"], "2026-02-19");

        let back: Project = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
