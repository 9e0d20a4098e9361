use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Cycle length used when history is too short or too irregular.
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
/// Period length used when no plausible period has been logged.
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;
/// Shortest and longest plausible period, in days.
pub const MIN_PERIOD_LENGTH: u32 = 2;
pub const MAX_PERIOD_LENGTH: u32 = 10;
/// Days from ovulation to the next period.
pub const LUTEAL_PHASE_DAYS: u32 = 14;

/// Thresholds for cycle averaging, phase bucketing and fertile window placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    pub default_cycle_length: u32,
    /// Start-to-start deltas outside `[min, max]` are treated as outliers.
    pub min_cycle_length: u32,
    pub max_cycle_length: u32,
    /// Fewer plausible deltas than this falls back to the default length.
    pub min_usable_deltas: usize,
    pub default_period_length: u32,
    pub min_period_length: u32,
    pub max_period_length: u32,
    pub luteal_phase_days: u32,
    pub fertile_days_before_ovulation: u32,
    pub fertile_days_after_ovulation: u32,
    /// Follicular phase ends this many days before ovulation.
    pub follicular_margin_days: u32,
    /// Ovulation phase runs this many days past ovulation.
    pub ovulation_tail_days: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            default_cycle_length: DEFAULT_CYCLE_LENGTH,
            min_cycle_length: 21,
            max_cycle_length: 35,
            min_usable_deltas: 2,
            default_period_length: DEFAULT_PERIOD_LENGTH,
            min_period_length: MIN_PERIOD_LENGTH,
            max_period_length: MAX_PERIOD_LENGTH,
            luteal_phase_days: LUTEAL_PHASE_DAYS,
            fertile_days_before_ovulation: 5,
            fertile_days_after_ovulation: 1,
            follicular_margin_days: 2,
            ovulation_tail_days: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyConfig {
    pub window_days: u32,
    /// Half-week mean difference needed before a metric counts as moving.
    pub trend_threshold: f64,
}

impl Default for WeeklyConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            trend_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Logs up to this many days before the start date form the baseline.
    pub before_window_days: i64,
    pub after_window_min_days: i64,
    pub after_window_max_days: i64,
    pub min_samples: usize,
    /// Absolute percentage change below which a result is dropped as noise.
    pub min_change_percent: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            before_window_days: 14,
            after_window_min_days: 7,
            after_window_max_days: 30,
            min_samples: 3,
            min_change_percent: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub cycle: CycleConfig,
    pub weekly: WeeklyConfig,
    pub correlation: CorrelationConfig,
}

impl AnalysisConfig {
    /// Load configuration from `CYCLE_INSIGHTS_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            cycle: CycleConfig {
                default_cycle_length: env_or(
                    "CYCLE_INSIGHTS_DEFAULT_CYCLE_LENGTH",
                    defaults.cycle.default_cycle_length,
                )?,
                min_cycle_length: env_or(
                    "CYCLE_INSIGHTS_MIN_CYCLE_LENGTH",
                    defaults.cycle.min_cycle_length,
                )?,
                max_cycle_length: env_or(
                    "CYCLE_INSIGHTS_MAX_CYCLE_LENGTH",
                    defaults.cycle.max_cycle_length,
                )?,
                default_period_length: env_or(
                    "CYCLE_INSIGHTS_DEFAULT_PERIOD_LENGTH",
                    defaults.cycle.default_period_length,
                )?,
                luteal_phase_days: env_or(
                    "CYCLE_INSIGHTS_LUTEAL_PHASE_DAYS",
                    defaults.cycle.luteal_phase_days,
                )?,
                ..defaults.cycle
            },
            weekly: WeeklyConfig {
                trend_threshold: env_or(
                    "CYCLE_INSIGHTS_TREND_THRESHOLD",
                    defaults.weekly.trend_threshold,
                )?,
                ..defaults.weekly
            },
            correlation: CorrelationConfig {
                min_samples: env_or(
                    "CYCLE_INSIGHTS_MIN_SAMPLES",
                    defaults.correlation.min_samples,
                )?,
                min_change_percent: env_or(
                    "CYCLE_INSIGHTS_MIN_CHANGE_PERCENT",
                    defaults.correlation.min_change_percent,
                )?,
                ..defaults.correlation
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cycle = &self.cycle;
        if cycle.min_cycle_length == 0 || cycle.min_cycle_length > cycle.max_cycle_length {
            return Err(ConfigError::InvalidRange("cycle length"));
        }
        if cycle.min_period_length == 0 || cycle.min_period_length > cycle.max_period_length {
            return Err(ConfigError::InvalidRange("period length"));
        }
        if cycle.default_cycle_length <= cycle.luteal_phase_days {
            return Err(ConfigError::ValueOutOfRange(
                "default cycle length must exceed the luteal phase",
            ));
        }
        if cycle.default_period_length == 0 {
            return Err(ConfigError::ValueOutOfRange("default period length"));
        }

        if self.weekly.window_days == 0 {
            return Err(ConfigError::ValueOutOfRange("weekly window"));
        }
        if !(self.weekly.trend_threshold >= 0.0) {
            return Err(ConfigError::ValueOutOfRange("trend threshold"));
        }

        let correlation = &self.correlation;
        if correlation.before_window_days <= 0 {
            return Err(ConfigError::ValueOutOfRange("before window"));
        }
        if correlation.after_window_min_days < 0
            || correlation.after_window_min_days > correlation.after_window_max_days
        {
            return Err(ConfigError::InvalidRange("after window"));
        }
        if correlation.min_samples == 0 {
            return Err(ConfigError::ValueOutOfRange("minimum samples"));
        }
        if !(correlation.min_change_percent >= 0.0) {
            return Err(ConfigError::ValueOutOfRange("minimum change percent"));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => Ok(value),
            Err(_) => Err(ConfigError::Parse { name, value: raw }),
        },
        Err(_) => Ok(default),
    }
}
