//! Schedule analytics and dependency-graph engine for multi-discipline
//! project boards.
//!
//! A project is split into scopes (disciplines), each holding events
//! (tasks) that may depend on one another through typed temporal links.
//! This crate derives bounds, progress, health, workload and a density
//! curve from that data, and keeps the dependency graph consistent while
//! it is edited interactively.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Database`, `Project`, `Scope`, `Event`,
//!   `Dependency`, `RelationType`, `Activity`, `TeamRoster`
//! - **`graph`**: Link toggling, typed dependencies, relation rotation, edge queries
//! - **`analytics`**: Bounds, progress, stats, health, workload, wave, summary
//! - **`ops`**: Copy-on-write scope, event and timeline edits
//! - **`activity_log`**: Append-only log with text and author filters
//! - **`store`**: Snapshot store with `get()` / `apply(mutation)` and commit observers
//! - **`audit`**: Read-only integrity report
//! - **`tolerance`**: Degenerate windows, dangling references, lenient dates
//! - **`calendar`**, **`config`**, **`ids`**, **`error`**: Supporting types
//!
//! # Architecture
//!
//! Every derivation is a pure function of a snapshot and an explicit
//! `now`. Every mutation returns a new project that shares all untouched
//! scopes and events with its input, so a store can detect change by
//! pointer identity. The engine performs no I/O.
//!
//! # Example
//!
//! ```
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use design_board::analytics::{Health, HealthReport};
//! use design_board::config::EngineConfig;
//! use design_board::graph;
//! use design_board::models::{Event, Project, RelationType, Scope};
//!
//! let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
//! let now = Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap();
//! let created = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
//!
//! let project = Project::new(1, "Sky View", created, d(1, 1), d(12, 31)).with_scope(
//!     Scope::new("sc1", "ARQ", d(2, 1))
//!         .with_event(Event::new("ev1", "Survey", d(2, 1), d(2, 20)))
//!         .with_event(Event::new("ev2", "Plans", d(2, 21), d(3, 10))),
//! );
//!
//! let linked = graph::add_dependency(&project, "ev1", "ev2", RelationType::FS, now).unwrap();
//! assert_eq!(graph::predecessors(&linked, "ev2").len(), 1);
//!
//! let report = HealthReport::evaluate(&linked, &EngineConfig::default(), now);
//! assert_eq!(report.health, Health::AtRisk);
//! ```

pub mod activity_log;
pub mod analytics;
pub mod audit;
pub mod calendar;
pub mod config;
pub mod error;
pub mod graph;
pub mod ids;
pub mod models;
pub mod ops;
pub mod store;
pub mod tolerance;

pub use error::{EngineError, EngineResult};
