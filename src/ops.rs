//! Copy-on-write edits of scopes, events and project settings.
//!
//! Every function takes the current project by reference and returns a
//! new one, rebuilding only the edited branch of the ownership tree.
//! Scopes and events off that branch stay shared (`Arc`) with the input.
//! On rejection the input is the only snapshot and nothing changes.
//!
//! Inputs arrive from an editor as primitive values, so dates are ISO
//! strings parsed through [`tolerance::parse_iso_date`].
//!
//! Successful edits touch `updated_at` and, where the board records it,
//! append a `SYSTEM` entry to the activity log:
//!
//! | Edit | Log text |
//! |------|----------|
//! | [`add_scope`] | `NEW SCOPE: <name>` |
//! | [`update_scope`] | `SCOPE UPDATED: <name>` |
//! | [`delete_scope`] | `SCOPE REMOVED` |
//! | [`add_file_link`] | `FILE LINKED: <label>` |
//! | [`add_event`] | `NEW ACTION: <title>` |
//! | [`update_event`] | `ACTION UPDATED: <title>` |
//! | [`delete_event`] | `ACTION REMOVED` |
//! | [`toggle_completed`] | `ACTION COMPLETED` (only when it becomes completed) |

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::activity_log;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::models::{parse_checklist, Event, FileLink, Project, Scope};
use crate::tolerance;

/// Editable fields of a scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFields {
    /// Discipline code.
    pub name: String,
    /// Display color token.
    pub color_class: String,
    /// Start date (ISO).
    pub start_date: String,
    /// Status label.
    pub status: String,
    /// Protocol week.
    pub protocol_week: Option<u32>,
    /// Scope lead.
    pub resp: String,
}

impl ScopeFields {
    /// Fields with the required name and start date.
    pub fn new(name: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_date: start_date.into(),
            ..Self::default()
        }
    }

    /// Sets the color token.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color_class = color.into();
        self
    }

    /// Sets the lead.
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
}

/// Editable fields of an event.
///
/// `checklist` is newline-separated text; blank lines are dropped and
/// every item starts unticked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFields {
    /// Title.
    pub title: String,
    /// Responsible member.
    pub resp: String,
    /// Start date (ISO).
    pub start_date: String,
    /// End date (ISO).
    pub end_date: String,
    /// Checklist text, one item per line.
    pub checklist: String,
}

impl EventFields {
    /// Fields with title and date range.
    pub fn new(
        title: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            ..Self::default()
        }
    }

    /// Sets the responsible member.
    pub fn with_resp(mut self, resp: impl Into<String>) -> Self {
        self.resp = resp.into();
        self
    }

    /// Sets the checklist text.
    pub fn with_checklist(mut self, checklist: impl Into<String>) -> Self {
        self.checklist = checklist.into();
        self
    }

    fn dates(&self) -> EngineResult<(NaiveDate, NaiveDate)> {
        Ok((
            tolerance::parse_iso_date(&self.start_date)?,
            tolerance::parse_iso_date(&self.end_date)?,
        ))
    }
}

/// A fresh, empty project on the configured default timeline.
pub fn new_project(
    id: i64,
    name: impl Into<String>,
    company_id: i64,
    lod: impl Into<String>,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Project {
    Project::new(
        id,
        name,
        now,
        config.default_timeline_start,
        config.default_timeline_end,
    )
    .with_company(company_id)
    .with_lod(lod)
}

/// Renames the project.
pub fn rename(project: &Project, name: &str, now: DateTime<Utc>) -> Project {
    let mut next = project.clone();
    next.name = name.to_string();
    next.touch(now);
    next
}

/// Replaces the declared timeline window.
///
/// The order of `start` and `end` is not enforced.
pub fn set_timeline(
    project: &Project,
    start: &str,
    end: &str,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    let start = tolerance::parse_iso_date(start)?;
    let end = tolerance::parse_iso_date(end)?;
    let mut next = project.clone();
    next.timeline_start = start;
    next.timeline_end = end;
    next.touch(now);
    Ok(next)
}

/// Appends a new scope with no events.
pub fn add_scope(
    project: &Project,
    scope_id: &str,
    fields: &ScopeFields,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    let start = tolerance::parse_iso_date(&fields.start_date)?;
    let mut scope = Scope::new(scope_id, fields.name.clone(), start)
        .with_color(fields.color_class.clone())
        .with_resp(fields.resp.clone())
        .with_status(fields.status.clone());
    scope.protocol_week = fields.protocol_week;

    let mut next = project.clone();
    next.scopes.push(Arc::new(scope));
    next.touch(now);
    activity_log::push_system(&mut next, now, format!("NEW SCOPE: {}", fields.name));
    Ok(next)
}

/// Replaces the editable fields of a scope, keeping its events and links.
pub fn update_scope(
    project: &Project,
    scope_id: &str,
    fields: &ScopeFields,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    let start = tolerance::parse_iso_date(&fields.start_date)?;
    let mut next = project.clone();
    let scope = next
        .scope_mut(scope_id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Scope, scope_id))?;
    scope.name = fields.name.clone();
    scope.color_class = fields.color_class.clone();
    scope.start_date = start;
    scope.status = fields.status.clone();
    scope.protocol_week = fields.protocol_week;
    scope.resp = fields.resp.clone();

    next.touch(now);
    activity_log::push_system(&mut next, now, format!("SCOPE UPDATED: {}", fields.name));
    Ok(next)
}

/// Removes a scope together with its events.
///
/// Links held by other scopes' events on the removed events are left
/// dangling.
pub fn delete_scope(project: &Project, scope_id: &str, now: DateTime<Utc>) -> EngineResult<Project> {
    if project.scope(scope_id).is_none() {
        return Err(EngineError::not_found(EntityKind::Scope, scope_id));
    }
    let mut next = project.clone();
    next.scopes.retain(|s| s.id != scope_id);
    next.touch(now);
    activity_log::push_system(&mut next, now, "SCOPE REMOVED");
    Ok(next)
}

/// Appends a file link to a scope.
pub fn add_file_link(
    project: &Project,
    scope_id: &str,
    label: &str,
    path: &str,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    let mut next = project.clone();
    next.scope_mut(scope_id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Scope, scope_id))?
        .file_links
        .push(FileLink::new(label, path));
    next.touch(now);
    activity_log::push_system(&mut next, now, format!("FILE LINKED: {label}"));
    Ok(next)
}

/// Appends a new, incomplete event to a scope.
pub fn add_event(
    project: &Project,
    scope_id: &str,
    event_id: &str,
    fields: &EventFields,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    let (start, end) = fields.dates()?;
    let event = Event::new(event_id, fields.title.clone(), start, end)
        .with_resp(fields.resp.clone())
        .with_checklist(parse_checklist(&fields.checklist));

    let mut next = project.clone();
    next.scope_mut(scope_id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Scope, scope_id))?
        .events
        .push(Arc::new(event));
    next.touch(now);
    activity_log::push_system(&mut next, now, format!("NEW ACTION: {}", fields.title));
    Ok(next)
}

/// Replaces title, assignee, dates and checklist of an event.
///
/// The new checklist is parsed from `fields.checklist` with every item
/// unticked. Baseline, completion flag and links are kept.
pub fn update_event(
    project: &Project,
    scope_id: &str,
    event_id: &str,
    fields: &EventFields,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    let (start, end) = fields.dates()?;
    let mut next = edit_event(project, scope_id, event_id, now, |event| {
        event.title = fields.title.clone();
        event.resp = fields.resp.clone();
        event.start_date = start;
        event.end_date = end;
        event.checklist = parse_checklist(&fields.checklist);
        Ok(())
    })?;
    activity_log::push_system(&mut next, now, format!("ACTION UPDATED: {}", fields.title));
    Ok(next)
}

/// Removes an event from its scope.
///
/// Links on it held by other events are left dangling.
pub fn delete_event(
    project: &Project,
    scope_id: &str,
    event_id: &str,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    let scope = project
        .scope(scope_id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Scope, scope_id))?;
    if !scope.contains_event(event_id) {
        return Err(EngineError::not_found(EntityKind::Event, event_id));
    }

    let mut next = project.clone();
    if let Some(scope) = next.scope_mut(scope_id) {
        scope.events.retain(|e| e.id != event_id);
    }
    next.touch(now);
    activity_log::push_system(&mut next, now, "ACTION REMOVED");
    Ok(next)
}

/// Flips the `done` state of the checklist item at `index`.
pub fn toggle_checklist_item(
    project: &Project,
    scope_id: &str,
    event_id: &str,
    index: usize,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    edit_event(project, scope_id, event_id, now, |event| {
        let item = event.checklist.get_mut(index).ok_or_else(|| {
            EngineError::not_found(EntityKind::ChecklistItem, format!("{event_id}[{index}]"))
        })?;
        item.done = !item.done;
        Ok(())
    })
}

/// Flips the `completed` flag of an event.
pub fn toggle_completed(
    project: &Project,
    scope_id: &str,
    event_id: &str,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    let mut completed = false;
    let mut next = edit_event(project, scope_id, event_id, now, |event| {
        event.completed = !event.completed;
        completed = event.completed;
        Ok(())
    })?;
    if completed {
        activity_log::push_system(&mut next, now, "ACTION COMPLETED");
    }
    Ok(next)
}

/// Applies `edit` to one event of a fresh copy of `project`.
fn edit_event<F>(
    project: &Project,
    scope_id: &str,
    event_id: &str,
    now: DateTime<Utc>,
    edit: F,
) -> EngineResult<Project>
where
    F: FnOnce(&mut Event) -> EngineResult<()>,
{
    let scope = project
        .scope(scope_id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Scope, scope_id))?;
    if !scope.contains_event(event_id) {
        return Err(EngineError::not_found(EntityKind::Event, event_id));
    }

    let mut next = project.clone();
    let event = next
        .scope_mut(scope_id)
        .and_then(|s| s.event_mut(event_id))
        .ok_or_else(|| EngineError::not_found(EntityKind::Event, event_id))?;
    edit(event)?;
    next.touch(now);
    Ok(next)
}
