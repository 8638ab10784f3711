//! Explicit snapshot store.
//!
//! The store holds the current [`Database`] snapshot behind an `Arc` and
//! applies one [`Mutation`] at a time:
//!
//! ```text
//! apply(mutation) -> (snapshot, result)
//! ```
//!
//! A successful mutation that changes state produces a new snapshot and
//! notifies the registered [`CommitObserver`]s (persistence, for example).
//! A rejected or ineffective mutation returns the very same `Arc`, so
//! callers detect change with `Arc::ptr_eq`.
//!
//! The store performs no locking; a host with several actors must
//! serialize calls to [`Store::apply`].

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::activity_log;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, EntityKind};
use crate::graph;
use crate::ids::IdGenerator;
use crate::models::{Company, Database, Discipline, Project, RelationType};
use crate::ops::{self, EventFields, ScopeFields};

/// Source of the current instant.
pub trait Clock {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic runs.
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    /// Clock frozen at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(now.timestamp_millis()),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        self.millis.store(now.timestamp_millis(), Ordering::Relaxed);
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: chrono::Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::Relaxed);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::Relaxed)).unwrap_or_default()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Receives every committed snapshot.
pub trait CommitObserver {
    /// Called after `mutation` produced `snapshot`.
    fn committed(&self, snapshot: &Arc<Database>, mutation: &Mutation);
}

/// A state change request.
///
/// Project-level variants target the active project.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Selects the phase label.
    SelectLod { lod: String },
    /// Appends a phase label.
    AddLod { lod: String },
    /// Removes a phase label.
    RemoveLod { lod: String },
    /// Moves the listed phase labels to the front.
    ReorderLods { order: Vec<String> },
    /// Adds a company.
    AddCompany {
        name: String,
        logo_url: Option<String>,
    },
    /// Removes a company.
    RemoveCompany { company_id: i64 },
    /// Moves the listed companies to the front.
    ReorderCompanies { order: Vec<i64> },
    /// Selects a company and clears the project selection.
    SelectCompany { company_id: i64 },
    /// Appends a discipline.
    AddDiscipline { discipline: Discipline },
    /// Replaces the discipline stored under `code`.
    UpdateDiscipline { code: String, discipline: Discipline },
    /// Removes a discipline.
    RemoveDiscipline { code: String },
    /// Moves the listed discipline codes to the front.
    ReorderDisciplines { order: Vec<String> },
    /// Adds a project under the active company and phase.
    AddProject { name: String },
    /// Selects a project.
    SelectProject { project_id: i64 },
    /// Deletes a project.
    DeleteProject { project_id: i64 },
    /// Adds a roster member.
    AddMember { name: String },
    /// Removes a roster member.
    RemoveMember { name: String },
    /// Renames the active project.
    RenameProject { name: String },
    /// Replaces the active project's timeline window (ISO dates).
    SetTimeline { start: String, end: String },
    /// Appends a user entry to the activity log.
    AddActivity {
        author: String,
        text: String,
        image_url: Option<String>,
    },
    /// Adds a scope.
    AddScope { fields: ScopeFields },
    /// Edits a scope.
    UpdateScope {
        scope_id: String,
        fields: ScopeFields,
    },
    /// Deletes a scope and its events.
    DeleteScope { scope_id: String },
    /// Attaches a file link to a scope.
    AddFileLink {
        scope_id: String,
        label: String,
        path: String,
    },
    /// Adds an event.
    AddEvent {
        scope_id: String,
        fields: EventFields,
    },
    /// Edits an event.
    UpdateEvent {
        scope_id: String,
        event_id: String,
        fields: EventFields,
    },
    /// Deletes an event.
    DeleteEvent { scope_id: String, event_id: String },
    /// Flips one checklist item.
    ToggleChecklistItem {
        scope_id: String,
        event_id: String,
        index: usize,
    },
    /// Flips the completion flag.
    ToggleCompleted { scope_id: String, event_id: String },
    /// Inserts or removes a Finish–Start link.
    ToggleLink {
        scope_id: String,
        event_id: String,
        target_id: String,
    },
    /// Makes `target_id` depend on `source_id`.
    AddDependency {
        source_id: String,
        target_id: String,
        relation: RelationType,
    },
    /// Advances the relation type of a link.
    RotateType {
        scope_id: String,
        event_id: String,
        target_id: String,
    },
}

impl Mutation {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectLod { .. } => "select-lod",
            Self::AddLod { .. } => "add-lod",
            Self::RemoveLod { .. } => "remove-lod",
            Self::ReorderLods { .. } => "reorder-lods",
            Self::AddCompany { .. } => "add-company",
            Self::RemoveCompany { .. } => "remove-company",
            Self::ReorderCompanies { .. } => "reorder-companies",
            Self::SelectCompany { .. } => "select-company",
            Self::AddDiscipline { .. } => "add-discipline",
            Self::UpdateDiscipline { .. } => "update-discipline",
            Self::RemoveDiscipline { .. } => "remove-discipline",
            Self::ReorderDisciplines { .. } => "reorder-disciplines",
            Self::AddProject { .. } => "add-project",
            Self::SelectProject { .. } => "select-project",
            Self::DeleteProject { .. } => "delete-project",
            Self::AddMember { .. } => "add-member",
            Self::RemoveMember { .. } => "remove-member",
            Self::RenameProject { .. } => "rename-project",
            Self::SetTimeline { .. } => "set-timeline",
            Self::AddActivity { .. } => "add-activity",
            Self::AddScope { .. } => "add-scope",
            Self::UpdateScope { .. } => "update-scope",
            Self::DeleteScope { .. } => "delete-scope",
            Self::AddFileLink { .. } => "add-file-link",
            Self::AddEvent { .. } => "add-event",
            Self::UpdateEvent { .. } => "update-event",
            Self::DeleteEvent { .. } => "delete-event",
            Self::ToggleChecklistItem { .. } => "toggle-checklist-item",
            Self::ToggleCompleted { .. } => "toggle-completed",
            Self::ToggleLink { .. } => "toggle-link",
            Self::AddDependency { .. } => "add-dependency",
            Self::RotateType { .. } => "rotate-type",
        }
    }
}

/// Owner of the current snapshot.
pub struct Store {
    snapshot: Arc<Database>,
    config: EngineConfig,
    ids: IdGenerator,
    clock: Box<dyn Clock>,
    observers: Vec<Box<dyn CommitObserver>>,
}

impl Store {
    /// Creates a store over `database` using the system clock.
    pub fn new(database: Database, config: EngineConfig) -> Self {
        Self::with_clock(database, config, SystemClock)
    }

    /// Creates a store with an explicit clock.
    pub fn with_clock(database: Database, config: EngineConfig, clock: impl Clock + 'static) -> Self {
        Self {
            snapshot: Arc::new(database),
            config,
            ids: IdGenerator::new(),
            clock: Box::new(clock),
            observers: Vec::new(),
        }
    }

    /// Registers an observer of successful commits.
    pub fn subscribe(&mut self, observer: impl CommitObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Current snapshot.
    pub fn get(&self) -> Arc<Database> {
        Arc::clone(&self.snapshot)
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Applies `mutation` and returns the resulting snapshot.
    ///
    /// On error the returned snapshot is the unchanged current one.
    pub fn apply(&mut self, mutation: Mutation) -> (Arc<Database>, EngineResult<()>) {
        let now = self.clock.now();
        match self.evaluate(&mutation, now) {
            Ok(Some(next)) => {
                self.snapshot = Arc::new(next);
                log::debug!("committed {}", mutation.name());
                for observer in &self.observers {
                    observer.committed(&self.snapshot, &mutation);
                }
                (self.get(), Ok(()))
            }
            Ok(None) => {
                log::debug!("{} left the snapshot unchanged", mutation.name());
                (self.get(), Ok(()))
            }
            Err(err) => {
                log::warn!("rejected {}: {err}", mutation.name());
                (self.get(), Err(err))
            }
        }
    }

    /// Computes the next database, or `None` when nothing changes.
    fn evaluate(&self, mutation: &Mutation, now: DateTime<Utc>) -> EngineResult<Option<Database>> {
        let db = self.snapshot.as_ref();
        let mut next = match mutation {
            Mutation::SelectLod { lod } => {
                let mut next = db.clone();
                next.active_lod = lod.clone();
                next
            }
            Mutation::AddLod { lod } => {
                let mut next = db.clone();
                if !next.add_lod(lod) {
                    return Ok(None);
                }
                next
            }
            Mutation::RemoveLod { lod } => {
                let mut next = db.clone();
                next.remove_lod(lod)?;
                next
            }
            Mutation::ReorderLods { order } => {
                let mut next = db.clone();
                next.reorder_lods(order)?;
                next
            }
            Mutation::AddCompany { name, logo_url } => {
                let mut next = db.clone();
                next.companies.push(Company {
                    id: self.ids.next_numeric(now),
                    name: name.clone(),
                    logo_url: logo_url.clone(),
                });
                next
            }
            Mutation::RemoveCompany { company_id } => {
                let mut next = db.clone();
                next.remove_company(*company_id)?;
                next
            }
            Mutation::ReorderCompanies { order } => {
                let mut next = db.clone();
                next.reorder_companies(order)?;
                next
            }
            Mutation::AddDiscipline { discipline } => {
                let mut next = db.clone();
                if !next.add_discipline(discipline.clone()) {
                    return Ok(None);
                }
                next
            }
            Mutation::UpdateDiscipline { code, discipline } => {
                let mut next = db.clone();
                next.update_discipline(code, discipline.clone())?;
                next
            }
            Mutation::RemoveDiscipline { code } => {
                let mut next = db.clone();
                next.remove_discipline(code)?;
                next
            }
            Mutation::ReorderDisciplines { order } => {
                let mut next = db.clone();
                next.reorder_disciplines(order)?;
                next
            }
            Mutation::SelectCompany { company_id } => {
                if !db.companies.iter().any(|c| c.id == *company_id) {
                    return Err(EngineError::not_found(
                        EntityKind::Company,
                        company_id.to_string(),
                    ));
                }
                let mut next = db.clone();
                next.active_company_id = Some(*company_id);
                next.active_project_id = None;
                next
            }
            Mutation::AddProject { name } => {
                let company_id = db.active_company_id.ok_or(EngineError::NoActiveCompany)?;
                let project = ops::new_project(
                    self.ids.next_numeric(now),
                    name.clone(),
                    company_id,
                    db.active_lod.clone(),
                    &self.config,
                    now,
                );
                let mut next = db.clone();
                next.projects.push(Arc::new(project));
                next
            }
            Mutation::SelectProject { project_id } => {
                if db.project(*project_id).is_none() {
                    return Err(EngineError::not_found(EntityKind::Project, project_id.to_string()));
                }
                let mut next = db.clone();
                next.active_project_id = Some(*project_id);
                next
            }
            Mutation::DeleteProject { project_id } => {
                if db.project(*project_id).is_none() {
                    return Err(EngineError::not_found(EntityKind::Project, project_id.to_string()));
                }
                let mut next = db.clone();
                next.projects.retain(|p| p.id != *project_id);
                if next.active_project_id == Some(*project_id) {
                    next.active_project_id = None;
                }
                next
            }
            Mutation::AddMember { name } => {
                let mut next = db.clone();
                if !next.team.add(name.clone()) {
                    return Ok(None);
                }
                next
            }
            Mutation::RemoveMember { name } => {
                let mut next = db.clone();
                if !next.team.remove(name) {
                    return Err(EngineError::not_found(EntityKind::Member, name.clone()));
                }
                next
            }
            project_mutation => {
                let project = db.active_project().ok_or(EngineError::NoActiveProject)?;
                let updated = self.apply_to_project(project, project_mutation, now)?;
                let mut next = db.clone();
                if let Some(slot) = next.projects.iter_mut().find(|p| p.id == updated.id) {
                    *slot = Arc::new(updated);
                }
                next
            }
        };
        next.active_project_id = next
            .active_project_id
            .filter(|id| next.projects.iter().any(|p| p.id == *id));
        Ok(Some(next))
    }

    fn apply_to_project(
        &self,
        project: &Project,
        mutation: &Mutation,
        now: DateTime<Utc>,
    ) -> EngineResult<Project> {
        match mutation {
            Mutation::RenameProject { name } => Ok(ops::rename(project, name, now)),
            Mutation::SetTimeline { start, end } => ops::set_timeline(project, start, end, now),
            Mutation::AddActivity {
                author,
                text,
                image_url,
            } => Ok(activity_log::append(
                project,
                now,
                author,
                text,
                image_url.clone(),
                &self.config,
            )),
            Mutation::AddScope { fields } => {
                ops::add_scope(project, &self.ids.next_scope_id(now), fields, now)
            }
            Mutation::UpdateScope { scope_id, fields } => {
                ops::update_scope(project, scope_id, fields, now)
            }
            Mutation::DeleteScope { scope_id } => ops::delete_scope(project, scope_id, now),
            Mutation::AddFileLink {
                scope_id,
                label,
                path,
            } => ops::add_file_link(project, scope_id, label, path, now),
            Mutation::AddEvent { scope_id, fields } => {
                ops::add_event(project, scope_id, &self.ids.next_event_id(now), fields, now)
            }
            Mutation::UpdateEvent {
                scope_id,
                event_id,
                fields,
            } => ops::update_event(project, scope_id, event_id, fields, now),
            Mutation::DeleteEvent { scope_id, event_id } => {
                ops::delete_event(project, scope_id, event_id, now)
            }
            Mutation::ToggleChecklistItem {
                scope_id,
                event_id,
                index,
            } => ops::toggle_checklist_item(project, scope_id, event_id, *index, now),
            Mutation::ToggleCompleted { scope_id, event_id } => {
                ops::toggle_completed(project, scope_id, event_id, now)
            }
            Mutation::ToggleLink {
                scope_id,
                event_id,
                target_id,
            } => graph::toggle_link(project, scope_id, event_id, target_id, now),
            Mutation::AddDependency {
                source_id,
                target_id,
                relation,
            } => graph::add_dependency(project, source_id, target_id, *relation, now),
            Mutation::RotateType {
                scope_id,
                event_id,
                target_id,
            } => graph::rotate_type(project, scope_id, event_id, target_id, now),
            // Database-level variants never reach a project.
            Mutation::SelectLod { .. }
            | Mutation::AddLod { .. }
            | Mutation::RemoveLod { .. }
            | Mutation::ReorderLods { .. }
            | Mutation::AddCompany { .. }
            | Mutation::RemoveCompany { .. }
            | Mutation::ReorderCompanies { .. }
            | Mutation::SelectCompany { .. }
            | Mutation::AddDiscipline { .. }
            | Mutation::UpdateDiscipline { .. }
            | Mutation::RemoveDiscipline { .. }
            | Mutation::ReorderDisciplines { .. }
            | Mutation::AddProject { .. }
            | Mutation::SelectProject { .. }
            | Mutation::DeleteProject { .. }
            | Mutation::AddMember { .. }
            | Mutation::RemoveMember { .. } => Ok(project.clone()),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("snapshot", &self.snapshot)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}
