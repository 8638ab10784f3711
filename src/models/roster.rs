//! Team roster: ordered set of member display names.

use serde::{Deserialize, Serialize};

/// Ordered set of team member names.
///
/// Uniqueness is by trimmed display name. Renames are not reconciled
/// against existing assignments, so events may reference names that are
/// no longer (or never were) in the roster.
///
/// Serializes as a plain list; deserializing goes through [`add`](Self::add),
/// so duplicates and blanks in stored data are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct TeamRoster {
    members: Vec<String>,
}

impl TeamRoster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member under its trimmed name. Returns `false` if the name is
    /// blank or already present.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        let name = if trimmed.len() == name.len() {
            name
        } else {
            trimmed.to_string()
        };
        self.members.push(name);
        true
    }

    /// Builder form of [`add`](Self::add).
    pub fn with_member(mut self, name: impl Into<String>) -> Self {
        self.add(name);
        self
    }

    /// Removes a member by name. Returns `true` if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = name.trim();
        let before = self.members.len();
        self.members.retain(|m| m != name);
        self.members.len() != before
    }

    /// Whether `name` is a roster member.
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.members.iter().any(|m| m == name)
    }

    /// Members in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(String::as_str)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TeamRoster {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut roster = Self::new();
        for name in iter {
            roster.add(name);
        }
        roster
    }
}

impl From<Vec<String>> for TeamRoster {
    fn from(members: Vec<String>) -> Self {
        members.into_iter().collect()
    }
}

impl From<TeamRoster> for Vec<String> {
    fn from(roster: TeamRoster) -> Self {
        roster.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_uniqueness() {
        let mut roster = TeamRoster::new();
        assert!(roster.add("Arq. Yuri"));
        assert!(!roster.add("Arq. Yuri"));
        assert!(!roster.add("   "));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_roster_order_and_removal() {
        let mut roster: TeamRoster = ["Eng. Lucas", "Arq. Isabela", "Eng. Lucas"]
            .into_iter()
            .collect();
        assert_eq!(roster.iter().collect::<Vec<_>>(), vec!["Eng. Lucas", "Arq. Isabela"]);

        assert!(roster.remove("Eng. Lucas"));
        assert!(!roster.remove("Eng. Lucas"));
        assert!(!roster.contains("Eng. Lucas"));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_roster_serializes_as_list() {
        let roster = TeamRoster::new().with_member("A").with_member("B");
        assert_eq!(serde_json::to_string(&roster).unwrap(), r#"["A","B"]"#);
    }

    #[test]
    fn test_roster_deserialize_drops_duplicates_and_blanks() {
        let roster: TeamRoster = serde_json::from_str(r#"["Ana", "Ana", " ", "Bruno "]"#).unwrap();
        assert_eq!(roster.iter().collect::<Vec<_>>(), vec!["Ana", "Bruno"]);
    }

    #[test]
    fn test_roster_names_are_trimmed() {
        let mut roster = TeamRoster::new();
        assert!(roster.add("  Ana "));
        assert!(!roster.add("Ana"));
        assert_eq!(roster.iter().collect::<Vec<_>>(), vec!["Ana"]);
        assert!(roster.contains(" Ana"));
        assert!(roster.remove("Ana  "));
        assert!(roster.is_empty());
    }
}
