use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::config::CycleConfig;
use crate::cycle_math::{
    average_cycle_length, average_period_length, current_cycle_day, current_phase, mean,
    plausible_deltas, std_deviation,
};
use crate::models::{CyclePrediction, CycleRecord, CycleStats};

/// Predict the next period, ovulation and fertile window as of `today`.
/// Returns `None` when no cycle has been logged.
pub fn predict_cycle(
    cycles: &[CycleRecord],
    today: NaiveDate,
    config: &CycleConfig,
) -> Option<CyclePrediction> {
    let last_start = cycles.iter().map(|c| c.start_date).max()?;

    let avg_cycle = average_cycle_length(cycles, config);
    let avg_period = average_period_length(cycles, config);
    let cycle_len = Duration::days(i64::from(avg_cycle));
    let luteal = Duration::days(i64::from(config.luteal_phase_days));

    // Roll forward over unlogged cycles until the prediction is not in the past.
    let mut next_period_start = last_start + cycle_len;
    if avg_cycle > 0 {
        while next_period_start < today {
            next_period_start += cycle_len;
        }
    }
    let next_period_end =
        next_period_start + Duration::days(i64::from(avg_period.max(1)) - 1);

    let ovulation_date = next_period_start - luteal;
    let fertile_window_start =
        ovulation_date - Duration::days(i64::from(config.fertile_days_before_ovulation));
    let fertile_window_end =
        ovulation_date + Duration::days(i64::from(config.fertile_days_after_ovulation));

    let days_until_next_period = (next_period_start - today).num_days();
    let mut days_until_ovulation = (ovulation_date - today).num_days();
    if days_until_ovulation < 0 {
        days_until_ovulation = (next_period_start + cycle_len - luteal - today).num_days();
    }

    let raw_day = current_cycle_day(last_start, today);
    if raw_day < 1 {
        warn!(
            %last_start,
            %today,
            "reference date precedes last period start, clamping cycle day to 1"
        );
    }
    let cycle_day = raw_day.max(1);

    Some(CyclePrediction {
        next_period_start,
        next_period_end,
        fertile_window_start,
        fertile_window_end,
        ovulation_date,
        current_phase: current_phase(cycle_day, avg_cycle, avg_period, config),
        cycle_day,
        days_until_next_period,
        days_until_ovulation,
        avg_cycle_length: avg_cycle,
        avg_period_length: avg_period,
        confidence: confidence(cycles, avg_cycle, config),
    })
}

/// How regular the plausible cycle history is, from 0.1 to 0.95.
fn confidence(cycles: &[CycleRecord], avg_cycle: u32, config: &CycleConfig) -> f32 {
    let lengths = plausible_deltas(cycles, config);
    if lengths.len() < 2 || avg_cycle == 0 {
        return 0.5;
    }
    let std_dev = std_deviation(&lengths);
    (1.0 - (std_dev / f64::from(avg_cycle)) as f32).clamp(0.1, 0.95)
}

/// Compute raw cycle statistics for the history view. Unlike the prediction
/// averages these include every logged gap, outliers and all.
pub fn cycle_stats(cycles: &[CycleRecord]) -> CycleStats {
    let mut sorted: Vec<&CycleRecord> = cycles.iter().collect();
    sorted.sort_by_key(|c| c.start_date);

    let Some(last) = sorted.last() else {
        return CycleStats {
            total_cycles: 0,
            avg_cycle_length: None,
            avg_period_length: None,
            shortest_cycle: None,
            longest_cycle: None,
            last_period_start: None,
            last_period_end: None,
        };
    };

    let period_lengths: Vec<f64> = sorted
        .iter()
        .filter_map(|c| c.period_length())
        .map(|len| len as f64)
        .collect();

    let cycle_lengths: Vec<i64> = sorted
        .windows(2)
        .map(|w| (w[1].start_date - w[0].start_date).num_days())
        .collect();
    let cycle_lengths_f: Vec<f64> = cycle_lengths.iter().map(|&len| len as f64).collect();

    CycleStats {
        total_cycles: sorted.len(),
        avg_cycle_length: if cycle_lengths.is_empty() {
            None
        } else {
            Some(mean(&cycle_lengths_f) as f32)
        },
        avg_period_length: if period_lengths.is_empty() {
            None
        } else {
            Some(mean(&period_lengths) as f32)
        },
        shortest_cycle: cycle_lengths.iter().copied().min(),
        longest_cycle: cycle_lengths.iter().copied().max(),
        last_period_start: Some(last.start_date),
        last_period_end: last.end_date,
    }
}
