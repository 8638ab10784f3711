//! Engine error taxonomy.
//!
//! Every variant is a non-fatal rejection: the caller keeps its current
//! snapshot and may surface the message. Degenerate date windows and
//! dangling dependency targets are not errors at all; they degrade to
//! documented defaults (see [`crate::tolerance`]).

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Kind of entity a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Company,
    Project,
    Scope,
    Event,
    Dependency,
    ChecklistItem,
    Member,
    Lod,
    Discipline,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Company => "company",
            Self::Project => "project",
            Self::Scope => "scope",
            Self::Event => "event",
            Self::Dependency => "dependency",
            Self::ChecklistItem => "checklist item",
            Self::Member => "team member",
            Self::Lod => "phase",
            Self::Discipline => "discipline",
        };
        f.write_str(name)
    }
}

/// Rejections reported by engine mutations and parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A referenced ID does not resolve against the active project.
    #[error("{kind} not found: \"{id}\"")]
    NotFound { kind: EntityKind, id: String },

    /// The successor already depends on the predecessor.
    #[error("link already exists: \"{successor}\" already depends on \"{predecessor}\"")]
    DuplicateLink {
        predecessor: String,
        successor: String,
    },

    /// A catalog key is already taken by another entry.
    #[error("{kind} already exists: \"{id}\"")]
    AlreadyExists { kind: EntityKind, id: String },

    /// An event cannot depend on itself.
    #[error("event \"{id}\" cannot depend on itself")]
    SelfLink { id: String },

    /// A project mutation was applied with no project selected.
    #[error("no active project selected")]
    NoActiveProject,

    /// A project was added with no company selected.
    #[error("no active company selected")]
    NoActiveCompany,

    /// A date string is not an ISO calendar date.
    #[error("invalid date \"{value}\": expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// A relation type string is not one of FS, SS, FF, SF.
    #[error("invalid relation type \"{value}\": expected FS, SS, FF or SF")]
    InvalidRelation { value: String },

    /// Engine configuration could not be parsed or is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl EngineError {
    /// Shorthand for a [`EngineError::NotFound`].
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Whether this is a link rejection (duplicate or self link).
    pub fn is_link_rejection(&self) -> bool {
        matches!(self, Self::DuplicateLink { .. } | Self::SelfLink { .. })
    }
}
