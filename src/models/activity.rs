//! Activity (log entry) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display format of an activity date (`dd/mm HH:MM`).
pub const ACTIVITY_DATE_FORMAT: &str = "%d/%m %H:%M";

/// Author used for entries written by the engine itself.
pub const SYSTEM_AUTHOR: &str = "SYSTEM";

/// One entry of a project's append-only activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Display date string (not parsed by the engine).
    pub date: String,
    /// Author name.
    pub author: String,
    /// Entry text.
    pub text: String,
    /// Opaque image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Activity {
    /// Creates an entry with a preformatted date string.
    pub fn new(date: impl Into<String>, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            author: author.into(),
            text: text.into(),
            image_url: None,
        }
    }

    /// Creates an entry stamped with `now`.
    pub fn at(now: DateTime<Utc>, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(now.format(ACTIVITY_DATE_FORMAT).to_string(), author, text)
    }

    /// Attaches an image reference.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Whether the entry was written by the engine.
    pub fn is_system(&self) -> bool {
        self.author == SYSTEM_AUTHOR
    }
}
