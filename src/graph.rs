//! Dependency graph manager.
//!
//! Adds, removes, and re-types links between events of one project. Links
//! are stored on the successor event and point at the predecessor. Every
//! edit is copy-on-write: the input project is left untouched and a new
//! project is returned, sharing all scopes and events not on the edited
//! path.
//!
//! # Invariants
//! - At most one link per (successor, predecessor) pair.
//! - No self links.
//!
//! Cycles are not detected. Dangling links (predecessor deleted) are kept
//! as-is and skipped by the read queries below.

use chrono::{DateTime, Utc};

use crate::activity_log;
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::models::{Dependency, Event, Project, RelationType};
use crate::tolerance;

/// A live edge of the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<'a> {
    /// Predecessor event ID.
    pub predecessor: &'a str,
    /// Successor event ID (the event storing the link).
    pub successor: &'a str,
    /// Relation type.
    pub relation: RelationType,
}

/// Toggles the link from `event_id` (in `scope_id`) to `target_id`.
///
/// Removes the link if present, otherwise inserts it as Finish–Start.
/// Inserting requires `target_id` to exist and differ from `event_id`;
/// removing does not, so a dangling link can always be cleared.
pub fn toggle_link(
    project: &Project,
    scope_id: &str,
    event_id: &str,
    target_id: &str,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    let existing = locate_event(project, scope_id, event_id)?.depends_on(target_id);
    if !existing {
        if target_id == event_id {
            return Err(reject(EngineError::SelfLink {
                id: event_id.to_string(),
            }));
        }
        if !project.contains_event(target_id) {
            return Err(reject(EngineError::not_found(EntityKind::Event, target_id)));
        }
    }

    let mut next = project.clone();
    let event = next
        .scope_mut(scope_id)
        .and_then(|s| s.event_mut(event_id))
        .ok_or_else(|| EngineError::not_found(EntityKind::Event, event_id))?;

    if existing {
        event.dependencies.retain(|d| d.event_id != target_id);
        log::debug!("unlinked {event_id} from {target_id}");
    } else {
        event
            .dependencies
            .push(Dependency::finish_to_start(target_id));
        log::debug!("linked {event_id} to {target_id} (FS)");
    }
    next.touch(now);
    Ok(next)
}

/// Makes `target_id` depend on `source_id` with the given relation.
///
/// The two events may live in different scopes; only the target is
/// modified. On success a `LINK CREATED` entry is appended to the log.
///
/// # Errors
/// - [`EngineError::NotFound`] if either event is unknown.
/// - [`EngineError::SelfLink`] if `source_id == target_id`.
/// - [`EngineError::DuplicateLink`] if the target already depends on the source.
pub fn add_dependency(
    project: &Project,
    source_id: &str,
    target_id: &str,
    relation: RelationType,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    if project.scope_of_event(source_id).is_none() {
        return Err(reject(EngineError::not_found(EntityKind::Event, source_id)));
    }
    let target_scope = project
        .scope_of_event(target_id)
        .ok_or_else(|| reject(EngineError::not_found(EntityKind::Event, target_id)))?;

    if source_id == target_id {
        return Err(reject(EngineError::SelfLink {
            id: source_id.to_string(),
        }));
    }
    let target_scope_id = target_scope.id.clone();
    if target_scope
        .event(target_id)
        .is_some_and(|e| e.depends_on(source_id))
    {
        return Err(reject(EngineError::DuplicateLink {
            predecessor: source_id.to_string(),
            successor: target_id.to_string(),
        }));
    }

    let mut next = project.clone();
    let target = next
        .scope_mut(&target_scope_id)
        .and_then(|s| s.event_mut(target_id))
        .ok_or_else(|| EngineError::not_found(EntityKind::Event, target_id))?;
    target.dependencies.push(Dependency::new(source_id, relation));

    next.touch(now);
    activity_log::push_system(&mut next, now, format!("LINK CREATED: {relation}"));
    log::debug!("linked {target_id} to {source_id} ({relation})");
    Ok(next)
}

/// Advances the relation type of the link from `event_id` to `target_id`.
///
/// Follows `FS → SS → FF → SF → FS`.
pub fn rotate_type(
    project: &Project,
    scope_id: &str,
    event_id: &str,
    target_id: &str,
    now: DateTime<Utc>,
) -> EngineResult<Project> {
    if !locate_event(project, scope_id, event_id)?.depends_on(target_id) {
        return Err(reject(EngineError::not_found(
            EntityKind::Dependency,
            format!("{event_id}->{target_id}"),
        )));
    }

    let mut next = project.clone();
    let dependency = next
        .scope_mut(scope_id)
        .and_then(|s| s.event_mut(event_id))
        .and_then(|e| e.dependencies.iter_mut().find(|d| d.event_id == target_id))
        .ok_or_else(|| EngineError::not_found(EntityKind::Dependency, target_id))?;
    dependency.relation = dependency.relation.next();
    log::debug!(
        "link {event_id} -> {target_id} is now {}",
        dependency.relation
    );

    next.touch(now);
    Ok(next)
}

/// Live predecessors of an event, with the relation type.
pub fn predecessors<'a>(project: &'a Project, event_id: &str) -> Vec<Edge<'a>> {
    let Some(event) = project.event(event_id) else {
        return Vec::new();
    };
    tolerance::live_dependencies(project, event)
        .map(|(dep, pred)| Edge {
            predecessor: pred.id.as_str(),
            successor: event.id.as_str(),
            relation: dep.relation,
        })
        .collect()
}

/// Live successors of an event, with the relation type.
pub fn successors<'a>(project: &'a Project, event_id: &str) -> Vec<Edge<'a>> {
    edges(project)
        .into_iter()
        .filter(|e| e.predecessor == event_id)
        .collect()
}

/// All live edges of the project, in successor order.
pub fn edges(project: &Project) -> Vec<Edge<'_>> {
    project
        .events()
        .flat_map(|event| {
            tolerance::live_dependencies(project, event).map(move |(dep, pred)| Edge {
                predecessor: pred.id.as_str(),
                successor: event.id.as_str(),
                relation: dep.relation,
            })
        })
        .collect()
}

fn locate_event<'a>(
    project: &'a Project,
    scope_id: &str,
    event_id: &str,
) -> EngineResult<&'a Event> {
    let scope = project
        .scope(scope_id)
        .ok_or_else(|| reject(EngineError::not_found(EntityKind::Scope, scope_id)))?;
    scope
        .event(event_id)
        .ok_or_else(|| reject(EngineError::not_found(EntityKind::Event, event_id)))
}

fn reject(err: EngineError) -> EngineError {
    log::warn!("graph edit rejected: {err}");
    err
}
