//! Per-member workload aggregation.
//!
//! For every roster member: number of events whose `resp` is the member,
//! and the scopes the member leads (`Scope::resp`). Event assignees that
//! are not on the roster get a synthesized entry so their work is not
//! dropped; scope leads outside the roster are only attached to an
//! existing entry.
//!
//! Entries are ordered roster first (roster order), then synthesized
//! members in order of first appearance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Event, Project, TeamRoster};

/// Load carried by one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberLoad {
    /// Member display name.
    pub name: String,
    /// Events assigned to the member.
    pub count: usize,
    /// Names (discipline codes) of scopes the member leads.
    pub leader_of: Vec<String>,
    /// Whether the member is on the roster.
    pub in_roster: bool,
}

impl MemberLoad {
    fn new(name: &str, in_roster: bool) -> Self {
        Self {
            name: name.to_string(),
            count: 0,
            leader_of: Vec::new(),
            in_roster,
        }
    }

    /// Whether the member has any assignment or leadership.
    pub fn is_active(&self) -> bool {
        self.count > 0 || !self.leader_of.is_empty()
    }
}

/// Workload of a whole project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    /// One entry per roster member plus synthesized assignees.
    pub members: Vec<MemberLoad>,
}

impl Workload {
    /// Aggregates the workload of `project` over `roster`.
    pub fn calculate(project: &Project, roster: &TeamRoster) -> Self {
        let mut members: Vec<MemberLoad> = roster.iter().map(|n| MemberLoad::new(n, true)).collect();

        for event in project.events() {
            let resp = event.resp.trim();
            if resp.is_empty() {
                continue;
            }
            match members.iter_mut().find(|m| m.name == resp) {
                Some(member) => member.count += 1,
                None => {
                    log::debug!("synthesizing workload entry for unlisted assignee {resp:?}");
                    let mut member = MemberLoad::new(resp, false);
                    member.count = 1;
                    members.push(member);
                }
            }
        }

        for scope in &project.scopes {
            let lead = scope.resp.trim();
            if let Some(member) = members.iter_mut().find(|m| m.name == lead) {
                member.leader_of.push(scope.name.clone());
            }
        }

        Self { members }
    }

    /// Entry of one member.
    pub fn get(&self, name: &str) -> Option<&MemberLoad> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Members with at least one assignment or leadership.
    pub fn active(&self) -> impl Iterator<Item = &MemberLoad> + '_ {
        self.members.iter().filter(|m| m.is_active())
    }

    /// Event counts of active members, keyed by name.
    pub fn load_map(&self) -> BTreeMap<String, usize> {
        self.active().map(|m| (m.name.clone(), m.count)).collect()
    }
}

/// Events assigned to `name`, in scope order.
pub fn events_for_member<'a>(project: &'a Project, name: &str) -> Vec<&'a Event> {
    let name = name.trim();
    project.events().filter(|e| e.resp.trim() == name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scope;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn sample_project() -> Project {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Project::new(1, "P", created, d(1, 1), d(12, 31))
            .with_scope(
                Scope::new("sc1", "ARQ", d(2, 1))
                    .with_resp("Ana")
                    .with_event(Event::new("e1", "a", d(2, 1), d(2, 5)).with_resp("Ana"))
                    .with_event(Event::new("e2", "b", d(2, 1), d(2, 5)).with_resp("Bruno"))
                    .with_event(Event::new("e3", "c", d(2, 1), d(2, 5)).with_resp("Legacy")),
            )
            .with_scope(
                Scope::new("sc2", "EST", d(2, 1))
                    .with_resp("Bruno")
                    .with_event(Event::new("e4", "d", d(2, 1), d(2, 5)).with_resp("Ana"))
                    .with_event(Event::new("e5", "e", d(2, 1), d(2, 5))),
            )
    }

    fn roster() -> TeamRoster {
        TeamRoster::new()
            .with_member("Ana")
            .with_member("Bruno")
            .with_member("Carla")
    }

    #[test]
    fn test_counts_and_leadership() {
        let w = Workload::calculate(&sample_project(), &roster());
        let ana = w.get("Ana").unwrap();
        assert_eq!(ana.count, 2);
        assert_eq!(ana.leader_of, vec!["ARQ"]);
        let bruno = w.get("Bruno").unwrap();
        assert_eq!(bruno.count, 1);
        assert_eq!(bruno.leader_of, vec!["EST"]);
    }

    #[test]
    fn test_unlisted_assignee_is_synthesized() {
        let w = Workload::calculate(&sample_project(), &roster());
        let legacy = w.get("Legacy").unwrap();
        assert_eq!(legacy.count, 1);
        assert!(!legacy.in_roster);
        let names: Vec<&str> = w.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla", "Legacy"]);
    }

    #[test]
    fn test_idle_members_omitted_from_active_view() {
        let w = Workload::calculate(&sample_project(), &roster());
        assert!(w.get("Carla").is_some());
        assert!(w.active().all(|m| m.name != "Carla"));
        let map = w.load_map();
        assert_eq!(map.get("Ana"), Some(&2));
        assert!(!map.contains_key("Carla"));
    }

    #[test]
    fn test_leader_only_member_is_active() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let p = Project::new(1, "P", created, d(1, 1), d(12, 31))
            .with_scope(Scope::new("sc1", "TOP", d(2, 1)).with_resp("Carla"));
        let w = Workload::calculate(&p, &roster());
        let carla = w.get("Carla").unwrap();
        assert_eq!(carla.count, 0);
        assert!(carla.is_active());
    }

    #[test]
    fn test_events_for_member() {
        let p = sample_project();
        let ids: Vec<&str> = events_for_member(&p, "Ana").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e4"]);
        assert!(events_for_member(&p, "Nobody").is_empty());
    }
}
