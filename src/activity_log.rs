//! Activity log: append-only record of project changes.
//!
//! Entries are stored oldest first in insertion order. Display layers may
//! reverse them; the engine never reorders or edits existing entries.
//!
//! Filtering is independent on two axes:
//! - **text**: case-insensitive substring match on the entry text
//! - **author**: exact match against the upper-cased filter value
//!
//! An empty filter value matches everything.

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::models::{Activity, Project, SYSTEM_AUTHOR};

/// Appends a user-authored entry and returns the new project.
///
/// Author and text are upper-cased when `config.log_uppercase` is set.
pub fn append(
    project: &Project,
    now: DateTime<Utc>,
    author: &str,
    text: &str,
    image_url: Option<String>,
    config: &EngineConfig,
) -> Project {
    let (author, text) = if config.log_uppercase {
        (author.to_uppercase(), text.to_uppercase())
    } else {
        (author.to_string(), text.to_string())
    };
    let mut entry = Activity::at(now, author, text);
    entry.image_url = image_url;

    let mut next = project.clone();
    next.activities.push(entry);
    next.touch(now);
    next
}

/// Appends an engine-authored entry in place.
pub(crate) fn push_system(project: &mut Project, now: DateTime<Utc>, text: impl Into<String>) {
    project
        .activities
        .push(Activity::at(now, SYSTEM_AUTHOR, text));
    project.touch(now);
}

/// Free-text and author filter over a log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Substring to look for in entry text (case-insensitive).
    pub text: String,
    /// Author to match (compared upper-cased).
    pub author: String,
}

impl LogFilter {
    /// Filter that matches everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text query.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Whether an entry passes both filters.
    pub fn matches(&self, entry: &Activity) -> bool {
        let text_ok = self.text.is_empty()
            || entry
                .text
                .to_lowercase()
                .contains(&self.text.to_lowercase());
        let author_ok = self.author.is_empty() || entry.author == self.author.to_uppercase();
        text_ok && author_ok
    }

    /// Matching entries, oldest first.
    pub fn apply<'a>(&self, log: &'a [Activity]) -> Vec<&'a Activity> {
        log.iter().filter(|a| self.matches(a)).collect()
    }

    /// Matching entries, newest first.
    pub fn apply_newest_first<'a>(&self, log: &'a [Activity]) -> Vec<&'a Activity> {
        let mut entries = self.apply(log);
        entries.reverse();
        entries
    }
}

/// Distinct authors in order of first appearance.
pub fn authors(log: &[Activity]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for entry in log {
        if !seen.contains(&entry.author.as_str()) {
            seen.push(entry.author.as_str());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 6, 20, 5, 0).unwrap()
    }

    fn empty_project() -> Project {
        let created = Utc.with_ymd_and_hms(2026, 2, 6, 0, 0, 0).unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        Project::new(1, "P", created, start, end)
    }

    fn sample_log() -> Vec<Activity> {
        vec![
            Activity::new("06/02 20:05", "SYSTEM", "RESP. ARQ: ENG. ROBERTO"),
            Activity::new("06/02 20:06", "ADMIN", "PROJECT STARTED"),
            Activity::new("06/02 20:10", "SYSTEM", "RESP. TOP: YURI"),
        ]
    }

    #[test]
    fn test_append_uppercases_and_touches() {
        let p0 = empty_project();
        let p1 = append(&p0, now(), "Arq. Yuri", "site visit", None, &EngineConfig::default());
        assert!(p0.activities.is_empty());
        let entry = p1.activities.last().unwrap();
        assert_eq!(entry.author, "ARQ. YURI");
        assert_eq!(entry.text, "SITE VISIT");
        assert_eq!(entry.date, "06/02 20:05");
        assert_eq!(p1.updated_at, now());
    }

    #[test]
    fn test_append_keeps_case_when_disabled() {
        let cfg = EngineConfig {
            log_uppercase: false,
            ..EngineConfig::default()
        };
        let p = append(&empty_project(), now(), "Ana", "note", Some("img://1".into()), &cfg);
        let entry = &p.activities[0];
        assert_eq!(entry.author, "Ana");
        assert_eq!(entry.image_url.as_deref(), Some("img://1"));
    }

    #[test]
    fn test_append_preserves_order() {
        let cfg = EngineConfig::default();
        let p = append(&empty_project(), now(), "a", "first", None, &cfg);
        let p = append(&p, now(), "b", "second", None, &cfg);
        let texts: Vec<&str> = p.activities.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["FIRST", "SECOND"]);
    }

    #[test]
    fn test_filter_text_case_insensitive() {
        let log = sample_log();
        let hits = LogFilter::new().with_text("resp.").apply(&log);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_filter_author() {
        let log = sample_log();
        let hits = LogFilter::new().with_author("admin").apply(&log);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "PROJECT STARTED");
    }

    #[test]
    fn test_filter_combined_and_reversed() {
        let log = sample_log();
        let filter = LogFilter::new().with_text("resp").with_author("system");
        let newest = filter.apply_newest_first(&log);
        assert_eq!(newest[0].text, "RESP. TOP: YURI");
        assert_eq!(newest[1].text, "RESP. ARQ: ENG. ROBERTO");
        assert!(LogFilter::new().with_author("nobody").apply(&log).is_empty());
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert_eq!(LogFilter::new().apply(&sample_log()).len(), 3);
    }

    #[test]
    fn test_authors() {
        assert_eq!(authors(&sample_log()), vec!["SYSTEM", "ADMIN"]);
    }
}
