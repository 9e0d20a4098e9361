use chrono::{Duration, NaiveDate};

use crate::config::WeeklyConfig;
use crate::cycle_math::{mean, round1};
use crate::models::{DayScore, Metric, MetricMap, SymptomLog, Trend, WeeklySummary};

/// Summarize the trailing week of symptom logs ending on `today`.
/// Returns `None` if nothing was logged inside the window.
pub fn compute_weekly_summary(
    logs: &[SymptomLog],
    today: NaiveDate,
    config: &WeeklyConfig,
) -> Option<WeeklySummary> {
    let week_start = today - Duration::days(i64::from(config.window_days.max(1)) - 1);

    let mut week: Vec<&SymptomLog> = logs
        .iter()
        .filter(|log| log.log_date >= week_start && log.log_date <= today)
        .collect();
    if week.is_empty() {
        return None;
    }
    week.sort_by_key(|log| log.log_date);

    let averages = MetricMap::from_fn(|metric| round1(mean(&values(&week, metric))));

    let midpoint = week.len() / 2;
    let (first_half, second_half) = week.split_at(midpoint);
    let trends = MetricMap::from_fn(|metric| {
        trend(
            &values(first_half, metric),
            &values(second_half, metric),
            config.trend_threshold,
        )
    });

    let scored: Vec<DayScore> = week
        .iter()
        .filter_map(|log| {
            log.composite_score().map(|score| DayScore {
                date: log.log_date,
                score,
            })
        })
        .collect();

    // Strict comparisons keep the earliest day on ties.
    let best_day = scored
        .iter()
        .fold(None::<&DayScore>, |best, day| match best {
            Some(b) if day.score <= b.score => Some(b),
            _ => Some(day),
        })
        .cloned();
    let worst_day = scored
        .iter()
        .fold(None::<&DayScore>, |worst, day| match worst {
            Some(w) if day.score >= w.score => Some(w),
            _ => Some(day),
        })
        .cloned();

    Some(WeeklySummary {
        week_start,
        week_end: today,
        averages,
        trends,
        days_logged: scored.len(),
        best_day,
        worst_day,
    })
}

fn values(logs: &[&SymptomLog], metric: Metric) -> Vec<f64> {
    logs.iter()
        .filter_map(|log| log.metric(metric))
        .map(f64::from)
        .collect()
}

fn trend(first: &[f64], second: &[f64], threshold: f64) -> Trend {
    if first.is_empty() || second.is_empty() {
        return Trend::Stable;
    }
    let diff = mean(second) - mean(first);
    if diff > threshold {
        Trend::Up
    } else if diff < -threshold {
        Trend::Down
    } else {
        Trend::Stable
    }
}
