use chrono::NaiveDate;
use tracing::debug;

use crate::config::CycleConfig;
use crate::models::{CycleRecord, CyclePhase};

/// Start-to-start gaps between consecutive cycles, oldest first.
/// Sorts a copy; the caller's slice is left untouched.
pub fn cycle_deltas(cycles: &[CycleRecord]) -> Vec<i64> {
    let mut starts: Vec<NaiveDate> = cycles.iter().map(|c| c.start_date).collect();
    starts.sort();
    starts
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect()
}

/// Deltas that fall inside the plausible cycle length range.
pub fn plausible_deltas(cycles: &[CycleRecord], config: &CycleConfig) -> Vec<f64> {
    let range = i64::from(config.min_cycle_length)..=i64::from(config.max_cycle_length);
    cycle_deltas(cycles)
        .into_iter()
        .filter(|delta| {
            let keep = range.contains(delta);
            if !keep {
                debug!(delta, "discarding implausible cycle length");
            }
            keep
        })
        .map(|delta| delta as f64)
        .collect()
}

/// Rounded mean of plausible start-to-start gaps, or the configured default
/// when there are too few of them.
pub fn average_cycle_length(cycles: &[CycleRecord], config: &CycleConfig) -> u32 {
    if cycles.len() < 2 {
        return config.default_cycle_length;
    }
    let deltas = plausible_deltas(cycles, config);
    if deltas.len() < config.min_usable_deltas.max(1) {
        return config.default_cycle_length;
    }
    mean(&deltas).round() as u32
}

/// Rounded mean of logged period lengths (inclusive), ignoring implausible ones.
pub fn average_period_length(cycles: &[CycleRecord], config: &CycleConfig) -> u32 {
    let range = i64::from(config.min_period_length)..=i64::from(config.max_period_length);
    let lengths: Vec<f64> = cycles
        .iter()
        .filter_map(CycleRecord::period_length)
        .filter(|len| range.contains(len))
        .map(|len| len as f64)
        .collect();

    if lengths.is_empty() {
        return config.default_period_length;
    }
    mean(&lengths).round() as u32
}

/// 1-based day of the cycle. Zero or negative when `today` precedes the start.
pub fn current_cycle_day(last_period_start: NaiveDate, today: NaiveDate) -> i64 {
    (today - last_period_start).num_days() + 1
}

pub fn current_phase(
    cycle_day: i64,
    cycle_length: u32,
    period_length: u32,
    config: &CycleConfig,
) -> CyclePhase {
    let ovulation_day = i64::from(cycle_length) - i64::from(config.luteal_phase_days);

    if cycle_day <= i64::from(period_length) {
        CyclePhase::Menstrual
    } else if cycle_day < ovulation_day - i64::from(config.follicular_margin_days) {
        CyclePhase::Follicular
    } else if cycle_day <= ovulation_day + i64::from(config.ovulation_tail_days) {
        CyclePhase::Ovulation
    } else {
        CyclePhase::Luteal
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub(crate) fn std_deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Round to one decimal place for display.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
