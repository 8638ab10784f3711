//! Engine configuration.
//!
//! All constants the derivations depend on, loadable from TOML. Missing
//! keys fall back to the defaults below.
//!
//! ```
//! use design_board::config::EngineConfig;
//!
//! let cfg = EngineConfig::from_toml_str("hours_per_business_day = 6").unwrap();
//! assert_eq!(cfg.hours_per_business_day, 6);
//! assert_eq!(cfg.wave_segments, 10);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::BusinessCalendar;
use crate::error::{EngineError, EngineResult};

/// Upper bound of `hours_per_business_day`.
pub const MAX_HOURS_PER_BUSINESS_DAY: u32 = 24;
/// Upper bound of `wave_segments`.
pub const MAX_WAVE_SEGMENTS: usize = 1_000;
/// Upper bound of `empty_window_days` (about a century).
pub const MAX_EMPTY_WINDOW_DAYS: i64 = 36_500;

/// Tunable engine constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hours credited per business day by `hours_spent`.
    pub hours_per_business_day: u32,
    /// Number of equal-width segments of the density wave.
    pub wave_segments: usize,
    /// Height (percent of the nominal unit) of the densest wave bucket.
    pub wave_peak_height: f64,
    /// Bounds end fallback, in days after start, when no event ends after it.
    pub empty_window_days: i64,
    /// Timeline start assigned to new projects.
    pub default_timeline_start: NaiveDate,
    /// Timeline end assigned to new projects.
    pub default_timeline_end: NaiveDate,
    /// Whether activity author and text are upper-cased on append.
    pub log_uppercase: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hours_per_business_day: 8,
            wave_segments: 10,
            wave_peak_height: 60.0,
            empty_window_days: 30,
            default_timeline_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            default_timeline_end: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap_or_default(),
            log_uppercase: true,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        let cfg: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Business calendar crediting `hours_per_business_day`.
    pub fn calendar(&self) -> BusinessCalendar {
        BusinessCalendar::new(self.hours_per_business_day)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> EngineResult<()> {
        if self.hours_per_business_day > MAX_HOURS_PER_BUSINESS_DAY {
            return Err(EngineError::Config(format!(
                "hours_per_business_day must be at most {MAX_HOURS_PER_BUSINESS_DAY}"
            )));
        }
        if !(1..=MAX_WAVE_SEGMENTS).contains(&self.wave_segments) {
            return Err(EngineError::Config(format!(
                "wave_segments must be within 1..={MAX_WAVE_SEGMENTS}"
            )));
        }
        if !(0.0..=100.0).contains(&self.wave_peak_height) {
            return Err(EngineError::Config(
                "wave_peak_height must be within 0..=100".into(),
            ));
        }
        if !(0..=MAX_EMPTY_WINDOW_DAYS).contains(&self.empty_window_days) {
            return Err(EngineError::Config(format!(
                "empty_window_days must be within 0..={MAX_EMPTY_WINDOW_DAYS}"
            )));
        }
        Ok(())
    }
}
