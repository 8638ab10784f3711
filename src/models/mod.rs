//! Board domain models.
//!
//! Plain value types describing a project schedule. They carry shape and
//! a few derived accessors but no engine behavior; every derivation lives
//! in [`crate::analytics`] and every edit in [`crate::ops`] / [`crate::graph`].
//!
//! # Ownership
//!
//! | Owner | Owns | Link |
//! |-------|------|------|
//! | Database | Project | `Arc`, shared between snapshots |
//! | Project | Scope, Activity | `Arc` / inline |
//! | Scope | Event, FileLink | `Arc` / inline |
//! | Event | ChecklistItem, Dependency | inline |
//!
//! A [`Dependency`] is a weak reference (event ID + relation type), never
//! an owning link.

mod activity;
mod database;
mod dependency;
mod event;
mod project;
mod roster;
mod scope;

pub use activity::{Activity, ACTIVITY_DATE_FORMAT, SYSTEM_AUTHOR};
pub use database::{default_disciplines, default_lods, Company, Database, Discipline};
pub use dependency::{Dependency, RelationType};
pub use event::{parse_checklist, ChecklistItem, Event};
pub use project::Project;
pub use roster::TeamRoster;
pub use scope::{FileLink, Scope};
