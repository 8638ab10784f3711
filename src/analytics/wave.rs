//! Density histogram ("wave") over the project bounds.
//!
//! The window `[start, end]` is cut into `segments` equal-width pieces,
//! giving `segments + 1` boundary buckets. Every event whose `end_date`
//! falls inside the window adds its work units (checklist length, or 1)
//! to bucket `floor((end_date - start) / width)`, clamped to the last one.
//!
//! Heights are normalized against the densest bucket and inverted for a
//! top-down drawing surface:
//!
//! ```text
//! x = i / segments · 100
//! y = 100 − count / max(peak, 1) · peak_height
//! ```
//!
//! The engine stops at the point series; path smoothing is left to the
//! renderer.

use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use crate::config::{EngineConfig, MAX_WAVE_SEGMENTS};
use crate::models::Project;

/// One vertex of the density curve, both axes in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavePoint {
    /// Position along the window (0–100).
    pub x: f64,
    /// Inverted height (100 is empty, `100 - peak_height` is densest).
    pub y: f64,
}

/// Bucketed checklist volume and its normalized curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityWave {
    /// Raw weight per boundary bucket.
    pub buckets: Vec<usize>,
    /// Normalized curve, one point per bucket.
    pub points: Vec<WavePoint>,
}

impl DensityWave {
    /// Buckets the events of `project` over `bounds`.
    ///
    /// A degenerate window yields all-zero buckets and a flat curve.
    pub fn calculate(project: &Project, bounds: &Bounds, config: &EngineConfig) -> Self {
        let segments = config.wave_segments.clamp(1, MAX_WAVE_SEGMENTS);
        let mut buckets = vec![0usize; segments + 1];

        if !bounds.is_degenerate() {
            let width = bounds.duration_days() as f64 / segments as f64;
            for event in project.events() {
                if !bounds.contains(event.end_date) {
                    continue;
                }
                let offset = (event.end_date - bounds.start).num_days() as f64;
                let index = ((offset / width).floor() as usize).min(segments);
                buckets[index] += event.work_units();
            }
        }

        let peak = buckets.iter().copied().max().unwrap_or(0).max(1) as f64;
        let points = buckets
            .iter()
            .enumerate()
            .map(|(i, &count)| WavePoint {
                x: i as f64 / segments as f64 * 100.0,
                y: 100.0 - count as f64 / peak * config.wave_peak_height,
            })
            .collect();

        Self { buckets, points }
    }

    /// Total weight placed in the window.
    pub fn total(&self) -> usize {
        self.buckets.iter().sum()
    }

    /// Index of the densest bucket (first on ties), `None` if empty.
    pub fn peak_bucket(&self) -> Option<usize> {
        let max = self.buckets.iter().copied().max().filter(|&m| m > 0)?;
        self.buckets.iter().position(|&c| c == max)
    }
}
