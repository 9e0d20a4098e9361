//! Cycle prediction, weekly wellness summaries and supplement correlations.
//!
//! Every analysis is a pure function over an in-memory snapshot of records
//! and an explicit reference date. Insufficient data yields `None` or an
//! empty list, never an error.

pub mod config;
pub mod correlation;
pub mod cycle_math;
pub mod error;
pub mod models;
pub mod prediction;
pub mod snapshot;
pub mod weekly;

pub use config::{AnalysisConfig, CorrelationConfig, CycleConfig, WeeklyConfig};
pub use correlation::compute_correlations;
pub use cycle_math::{
    average_cycle_length, average_period_length, current_cycle_day, current_phase,
};
pub use error::{ConfigError, SnapshotError};
pub use models::*;
pub use prediction::{cycle_stats, predict_cycle};
pub use snapshot::HealthSnapshot;
pub use weekly::compute_weekly_summary;
