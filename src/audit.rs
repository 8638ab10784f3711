//! Read-only integrity audit of a project snapshot.
//!
//! Reports the inconsistencies the engine tolerates at read time so a
//! host can surface them. The audit never blocks or repairs an edit.
//! Detects:
//! - Duplicate scope and event IDs
//! - Self links and duplicate links
//! - Dangling dependency references
//! - An inverted timeline window
//! - Event assignees and scope leads outside the roster
//!
//! Dependency cycles are not checked.

use std::collections::HashSet;

use crate::models::{Project, TeamRoster};
use crate::tolerance;

/// One detected inconsistency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityIssue {
    /// Issue category.
    pub kind: IssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of integrity issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Two scopes or two events share an ID.
    DuplicateId,
    /// An event depends on itself.
    SelfLink,
    /// An event lists the same predecessor twice.
    DuplicateLink,
    /// A dependency points at an event that no longer exists.
    DanglingReference,
    /// `timeline_end` precedes `timeline_start`.
    InvertedTimeline,
    /// An assignee or scope lead is not on the roster.
    UnknownMember,
}

impl IntegrityIssue {
    fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Audits `project` against `roster`.
///
/// Returns every issue found, in discovery order; an empty list means the
/// snapshot is consistent.
pub fn audit_project(project: &Project, roster: &TeamRoster) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    if project.timeline_end < project.timeline_start {
        issues.push(IntegrityIssue::new(
            IssueKind::InvertedTimeline,
            format!(
                "Timeline ends ({}) before it starts ({})",
                project.timeline_end, project.timeline_start
            ),
        ));
    }

    let mut scope_ids = HashSet::new();
    let mut event_ids = HashSet::new();
    let mut unknown = HashSet::new();

    for scope in &project.scopes {
        if !scope_ids.insert(scope.id.as_str()) {
            issues.push(IntegrityIssue::new(
                IssueKind::DuplicateId,
                format!("Duplicate scope ID: {}", scope.id),
            ));
        }
        let lead = scope.resp.trim();
        if !lead.is_empty() && !roster.contains(lead) && unknown.insert(lead) {
            issues.push(IntegrityIssue::new(
                IssueKind::UnknownMember,
                format!("Scope '{}' is led by '{}', who is not on the team", scope.id, lead),
            ));
        }

        for event in &scope.events {
            if !event_ids.insert(event.id.as_str()) {
                issues.push(IntegrityIssue::new(
                    IssueKind::DuplicateId,
                    format!("Duplicate event ID: {}", event.id),
                ));
            }
            let resp = event.resp.trim();
            if !resp.is_empty() && !roster.contains(resp) && unknown.insert(resp) {
                issues.push(IntegrityIssue::new(
                    IssueKind::UnknownMember,
                    format!("Event '{}' is assigned to '{}', who is not on the team", event.id, resp),
                ));
            }

            let mut seen = HashSet::new();
            for dep in &event.dependencies {
                if dep.event_id == event.id {
                    issues.push(IntegrityIssue::new(
                        IssueKind::SelfLink,
                        format!("Event '{}' depends on itself", event.id),
                    ));
                }
                if !seen.insert(dep.event_id.as_str()) {
                    issues.push(IntegrityIssue::new(
                        IssueKind::DuplicateLink,
                        format!("Event '{}' lists '{}' more than once", event.id, dep.event_id),
                    ));
                }
            }
            for dep in tolerance::dangling_dependencies(project, event) {
                issues.push(IntegrityIssue::new(
                    IssueKind::DanglingReference,
                    format!(
                        "Event '{}' depends on missing event '{}' ({})",
                        event.id, dep.event_id, dep.relation
                    ),
                ));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dependency, Event, RelationType, Scope};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn project(tl_start: NaiveDate, tl_end: NaiveDate) -> Project {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Project::new(1, "P", created, tl_start, tl_end)
    }

    fn kinds(issues: &[IntegrityIssue]) -> Vec<IssueKind> {
        issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_clean_project() {
        let roster = TeamRoster::new().with_member("Ana");
        let p = project(d(1, 1), d(12, 31)).with_scope(
            Scope::new("sc1", "ARQ", d(2, 1))
                .with_resp("Ana")
                .with_event(Event::new("e1", "a", d(2, 1), d(2, 5)).with_resp("Ana"))
                .with_event(
                    Event::new("e2", "b", d(2, 6), d(2, 9))
                        .with_dependency(Dependency::finish_to_start("e1")),
                ),
        );
        assert!(audit_project(&p, &roster).is_empty());
    }

    #[test]
    fn test_inverted_timeline() {
        let issues = audit_project(&project(d(12, 31), d(1, 1)), &TeamRoster::new());
        assert_eq!(kinds(&issues), vec![IssueKind::InvertedTimeline]);
    }

    #[test]
    fn test_link_issues() {
        let p = project(d(1, 1), d(12, 31)).with_scope(
            Scope::new("sc1", "ARQ", d(2, 1))
                .with_event(Event::new("e1", "a", d(2, 1), d(2, 5)))
                .with_event(
                    Event::new("e2", "b", d(2, 6), d(2, 9))
                        .with_dependency(Dependency::finish_to_start("e2"))
                        .with_dependency(Dependency::finish_to_start("e1"))
                        .with_dependency(Dependency::new("e1", RelationType::SS))
                        .with_dependency(Dependency::finish_to_start("gone")),
                ),
        );
        let issues = audit_project(&p, &TeamRoster::new());
        assert_eq!(
            kinds(&issues),
            vec![
                IssueKind::SelfLink,
                IssueKind::DuplicateLink,
                IssueKind::DanglingReference
            ]
        );
        assert!(issues[2].message.contains("gone"));
    }

    #[test]
    fn test_duplicate_ids() {
        let p = project(d(1, 1), d(12, 31))
            .with_scope(Scope::new("sc1", "ARQ", d(2, 1)).with_event(Event::new("e1", "a", d(2, 1), d(2, 5))))
            .with_scope(Scope::new("sc1", "EST", d(2, 1)).with_event(Event::new("e1", "b", d(2, 1), d(2, 5))));
        let issues = audit_project(&p, &TeamRoster::new());
        assert_eq!(kinds(&issues), vec![IssueKind::DuplicateId, IssueKind::DuplicateId]);
    }

    #[test]
    fn test_unknown_members_reported_once() {
        let p = project(d(1, 1), d(12, 31)).with_scope(
            Scope::new("sc1", "ARQ", d(2, 1))
                .with_resp("Legacy")
                .with_event(Event::new("e1", "a", d(2, 1), d(2, 5)).with_resp("Legacy"))
                .with_event(Event::new("e2", "b", d(2, 1), d(2, 5)).with_resp("Other")),
        );
        let issues = audit_project(&p, &TeamRoster::new().with_member("Ana"));
        assert_eq!(kinds(&issues), vec![IssueKind::UnknownMember, IssueKind::UnknownMember]);
    }
}
