//! Typed temporal links between events.
//!
//! A dependency is stored on the *successor* event and names its
//! predecessor by ID. It is a weak reference: the predecessor may be
//! deleted later, leaving the entry dangling (see [`crate::tolerance`]).
//!
//! # Relation Types
//!
//! | Code | Meaning |
//! |------|---------|
//! | FS | Finish–Start: successor starts after predecessor finishes |
//! | SS | Start–Start: both start together |
//! | FF | Finish–Finish: both finish together |
//! | SF | Start–Finish: successor finishes after predecessor starts |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Temporal relation between a predecessor and a successor event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    /// Finish–Start (the default for new links).
    #[default]
    FS,
    /// Start–Start.
    SS,
    /// Finish–Finish.
    FF,
    /// Start–Finish.
    SF,
}

impl RelationType {
    /// All relation types in rotation order.
    pub const ALL: [RelationType; 4] = [Self::FS, Self::SS, Self::FF, Self::SF];

    /// Next type in the fixed cycle `FS → SS → FF → SF → FS`.
    pub fn next(self) -> Self {
        match self {
            Self::FS => Self::SS,
            Self::SS => Self::FF,
            Self::FF => Self::SF,
            Self::SF => Self::FS,
        }
    }

    /// Two-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Self::FS => "FS",
            Self::SS => "SS",
            Self::FF => "FF",
            Self::SF => "SF",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RelationType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FS" => Ok(Self::FS),
            "SS" => Ok(Self::SS),
            "FF" => Ok(Self::FF),
            "SF" => Ok(Self::SF),
            _ => Err(EngineError::InvalidRelation {
                value: s.to_string(),
            }),
        }
    }
}

/// A link from the owning (successor) event to a predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Predecessor event ID.
    #[serde(rename = "id")]
    pub event_id: String,
    /// Relation type.
    #[serde(rename = "type", default)]
    pub relation: RelationType,
}

impl Dependency {
    /// Creates a dependency on `event_id`.
    pub fn new(event_id: impl Into<String>, relation: RelationType) -> Self {
        Self {
            event_id: event_id.into(),
            relation,
        }
    }

    /// Creates a Finish–Start dependency.
    pub fn finish_to_start(event_id: impl Into<String>) -> Self {
        Self::new(event_id, RelationType::FS)
    }
}
