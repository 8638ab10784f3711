//! Derived schedule metrics.
//!
//! Pure functions of a project snapshot. None of them mutate, cache, or
//! depend on each other's call order, so they may run in any order or in
//! parallel over the same snapshot.
//!
//! # Metrics
//!
//! | Module | Output |
//! |--------|--------|
//! | [`bounds`] | content window, business hours, both progress ratios |
//! | [`stats`] | checklist completion rate and event counters |
//! | [`health`] | `LATE` / `AT_RISK` / `ON_TRACK` |
//! | [`workload`] | per-member event count and scope leadership |
//! | [`wave`] | bucketed checklist density curve |
//! | [`summary`] | all of the above plus the assistant digest |

pub mod bounds;
pub mod health;
pub mod stats;
pub mod summary;
pub mod wave;
pub mod workload;

pub use bounds::{global_progress, hours_spent, progress_percentage, project_bounds, Bounds};
pub use health::{Health, HealthReport};
pub use stats::{completion_rate, CompletionStats};
pub use summary::{delayed_events, AssistantDigest, DelayedEvent, ProjectSummary};
pub use wave::{DensityWave, WavePoint};
pub use workload::{events_for_member, MemberLoad, Workload};
