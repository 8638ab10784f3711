//! The full board snapshot handed to and received from persistence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::{Project, TeamRoster};
use crate::error::{EngineError, EngineResult, EntityKind};

/// A client company owning projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Company identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Opaque logo reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// An entry of the discipline catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discipline {
    /// Short code used as scope name (e.g. "ARQ").
    pub code: String,
    /// Full name.
    pub name: String,
    /// Display color.
    pub color: String,
}

impl Discipline {
    /// Creates a discipline entry.
    pub fn new(code: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// The built-in discipline catalog.
pub fn default_disciplines() -> Vec<Discipline> {
    [
        ("EST", "Structure", "#9D9DFF"),
        ("ARQ", "Architecture", "#FF8000"),
        ("AUT", "Building automation", "#EFBB4E"),
        ("VCE", "Ventilation, air conditioning and exhaust", "#3382D0"),
        ("ELE", "Electrical, telecom", "#3A985B"),
        ("INT", "Interior architecture", "#646464"),
        ("COR", "Coordination and compatibility", "#FF8C8C"),
        ("SDR", "Sanitary", "#5402B7"),
        ("HID", "Hydraulics", "#78BEE0"),
        ("LUM", "Lighting", "#E691C1"),
        ("PCI", "Fire protection", "#EA0000"),
        ("PL", "Legal approval", "#804000"),
        ("PSG", "Landscaping", "#7EA431"),
        ("EPR", "Pressurized stairwell", "#800080"),
        ("ALV", "Masonry and partitions", "#9B3200"),
        ("SPD", "Lightning protection", "#006C6C"),
        ("TOP", "Topography", "#CD853F"),
    ]
    .into_iter()
    .map(|(code, name, color)| Discipline::new(code, name, color))
    .collect()
}

/// The built-in phase (level of development) labels.
pub fn default_lods() -> Vec<String> {
    [
        "EV_ FEASIBILITY STUDY",
        "EP_ PRELIMINARY STUDY",
        "AP_ DRAFT DESIGN",
        "PL_ LEGAL DESIGN",
        "EX_ EXECUTIVE DESIGN",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Complete board state: catalogs, roster, projects, and the active selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    /// Selected phase label.
    #[serde(default)]
    pub active_lod: String,
    /// Selected company.
    #[serde(default)]
    pub active_company_id: Option<i64>,
    /// Selected project (the target of every project mutation).
    #[serde(default)]
    pub active_project_id: Option<i64>,
    /// Phase labels.
    #[serde(default)]
    pub lods: Vec<String>,
    /// Companies.
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Discipline catalog.
    #[serde(default)]
    pub disciplines: Vec<Discipline>,
    /// Projects, shared structurally between snapshots.
    #[serde(default)]
    pub projects: Vec<Arc<Project>>,
    /// Team roster.
    #[serde(default)]
    pub team: TeamRoster,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            active_lod: String::new(),
            active_company_id: None,
            active_project_id: None,
            lods: default_lods(),
            companies: Vec::new(),
            disciplines: default_disciplines(),
            projects: Vec::new(),
            team: TeamRoster::new(),
        }
    }
}

impl Database {
    /// Creates a database with the default catalogs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a project by ID.
    pub fn project(&self, project_id: i64) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == project_id)
            .map(|p| p.as_ref())
    }

    /// The currently selected project.
    pub fn active_project(&self) -> Option<&Project> {
        self.active_project_id.and_then(|id| self.project(id))
    }

    /// Looks up a discipline by code.
    pub fn discipline(&self, code: &str) -> Option<&Discipline> {
        self.disciplines.iter().find(|d| d.code == code)
    }

    /// Projects of a company within a phase.
    pub fn projects_for(&self, company_id: i64, lod: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.company_id == company_id && p.lod == lod)
            .map(|p| p.as_ref())
            .collect()
    }

    /// Appends a phase label. Returns `false` if it is blank or already listed.
    pub fn add_lod(&mut self, lod: &str) -> bool {
        let lod = lod.trim();
        if lod.is_empty() || self.lods.iter().any(|l| l == lod) {
            return false;
        }
        self.lods.push(lod.to_string());
        true
    }

    /// Removes a phase label, clearing it from the selection if active.
    ///
    /// Projects filed under the label keep it.
    pub fn remove_lod(&mut self, lod: &str) -> EngineResult<()> {
        let index = self
            .lods
            .iter()
            .position(|l| l == lod)
            .ok_or_else(|| EngineError::not_found(EntityKind::Lod, lod))?;
        self.lods.remove(index);
        if self.active_lod == lod {
            self.active_lod.clear();
        }
        Ok(())
    }

    /// Moves the listed phase labels to the front, in the given order.
    pub fn reorder_lods(&mut self, order: &[String]) -> EngineResult<()> {
        reorder(&mut self.lods, order, |l, k| l == k, EntityKind::Lod)
    }

    /// Removes a company. If it was selected, the company and project
    /// selections are both cleared. Its projects are kept.
    pub fn remove_company(&mut self, company_id: i64) -> EngineResult<()> {
        let index = self
            .companies
            .iter()
            .position(|c| c.id == company_id)
            .ok_or_else(|| EngineError::not_found(EntityKind::Company, company_id.to_string()))?;
        self.companies.remove(index);
        if self.active_company_id == Some(company_id) {
            self.active_company_id = None;
            self.active_project_id = None;
        }
        Ok(())
    }

    /// Moves the listed companies to the front, in the given order.
    pub fn reorder_companies(&mut self, order: &[i64]) -> EngineResult<()> {
        reorder(&mut self.companies, order, |c, id| c.id == *id, EntityKind::Company)
    }

    /// Appends a discipline. Returns `false` if its code is blank or taken.
    pub fn add_discipline(&mut self, discipline: Discipline) -> bool {
        if discipline.code.trim().is_empty() || self.discipline(&discipline.code).is_some() {
            return false;
        }
        self.disciplines.push(discipline);
        true
    }

    /// Replaces the discipline stored under `code`, keeping its position.
    ///
    /// The replacement may carry a new code as long as no other entry uses it.
    /// Scopes named after the old code are not renamed.
    pub fn update_discipline(&mut self, code: &str, discipline: Discipline) -> EngineResult<()> {
        let index = self
            .disciplines
            .iter()
            .position(|d| d.code == code)
            .ok_or_else(|| EngineError::not_found(EntityKind::Discipline, code))?;
        if discipline.code != code && self.discipline(&discipline.code).is_some() {
            return Err(EngineError::AlreadyExists {
                kind: EntityKind::Discipline,
                id: discipline.code,
            });
        }
        self.disciplines[index] = discipline;
        Ok(())
    }

    /// Removes a discipline by code.
    pub fn remove_discipline(&mut self, code: &str) -> EngineResult<()> {
        let index = self
            .disciplines
            .iter()
            .position(|d| d.code == code)
            .ok_or_else(|| EngineError::not_found(EntityKind::Discipline, code))?;
        self.disciplines.remove(index);
        Ok(())
    }

    /// Moves the listed discipline codes to the front, in the given order.
    pub fn reorder_disciplines(&mut self, order: &[String]) -> EngineResult<()> {
        reorder(&mut self.disciplines, order, |d, code| d.code == *code, EntityKind::Discipline)
    }

    /// Serializes the snapshot to JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Restores a snapshot from JSON.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}

/// Moves the entries named by `order` to the front, in that order; the rest
/// keep their relative order behind them. Repeated keys are ignored.
///
/// Fails without touching `items` if any key matches no entry.
fn reorder<T, K: fmt::Display>(
    items: &mut Vec<T>,
    order: &[K],
    matches: impl Fn(&T, &K) -> bool,
    kind: EntityKind,
) -> EngineResult<()> {
    if let Some(missing) = order.iter().find(|k| !items.iter().any(|t| matches(t, k))) {
        return Err(EngineError::not_found(kind, missing.to_string()));
    }
    let mut rest: Vec<Option<T>> = items.drain(..).map(Some).collect();
    for key in order {
        if let Some(slot) = rest
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|t| matches(t, key)))
        {
            items.extend(slot.take());
        }
    }
    items.extend(rest.into_iter().flatten());
    Ok(())
}
