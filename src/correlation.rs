use tracing::debug;

use crate::config::CorrelationConfig;
use crate::cycle_math::{mean, round1};
use crate::models::{CorrelationResult, Metric, SupplementRecord, SymptomLog};

/// Compare each metric before and after every supplement's start date.
///
/// Pairs without enough samples on both sides, or whose change is below the
/// noise threshold, are left out rather than reported as zero. Results are
/// ordered by the size of the change, largest first.
pub fn compute_correlations(
    logs: &[SymptomLog],
    supplements: &[SupplementRecord],
    config: &CorrelationConfig,
) -> Vec<CorrelationResult> {
    let mut results = Vec::new();

    for supplement in supplements {
        let before: Vec<&SymptomLog> = logs
            .iter()
            .filter(|log| {
                let days = (supplement.start_date - log.log_date).num_days();
                days > 0 && days <= config.before_window_days
            })
            .collect();
        let after: Vec<&SymptomLog> = logs
            .iter()
            .filter(|log| {
                let days = (log.log_date - supplement.start_date).num_days();
                days >= config.after_window_min_days && days <= config.after_window_max_days
            })
            .collect();

        if before.len() < config.min_samples || after.len() < config.min_samples {
            debug!(
                supplement = %supplement.name,
                before = before.len(),
                after = after.len(),
                "not enough logs around supplement start"
            );
            continue;
        }

        for metric in Metric::ALL {
            if let Some(result) = compare_metric(supplement, metric, &before, &after, config) {
                results.push(result);
            }
        }
    }

    // Stable sort: ties keep supplement then metric order.
    results.sort_by_key(|r| std::cmp::Reverse(r.change_percent.abs()));
    results
}

fn compare_metric(
    supplement: &SupplementRecord,
    metric: Metric,
    before: &[&SymptomLog],
    after: &[&SymptomLog],
    config: &CorrelationConfig,
) -> Option<CorrelationResult> {
    let before_values: Vec<f64> = before
        .iter()
        .filter_map(|log| log.metric(metric))
        .map(f64::from)
        .collect();
    let after_values: Vec<f64> = after
        .iter()
        .filter_map(|log| log.metric(metric))
        .map(f64::from)
        .collect();

    if before_values.len() < config.min_samples || after_values.len() < config.min_samples {
        debug!(
            supplement = %supplement.name,
            %metric,
            "metric too sparse to compare"
        );
        return None;
    }

    let before_avg = mean(&before_values);
    let after_avg = mean(&after_values);
    let change = after_avg - before_avg;
    let change_percent = if before_avg == 0.0 {
        0.0
    } else {
        change / before_avg * 100.0
    };

    if change_percent.abs() < config.min_change_percent {
        return None;
    }

    Some(CorrelationResult {
        supplement_name: supplement.name.clone(),
        metric,
        before_avg: round1(before_avg),
        after_avg: round1(after_avg),
        change: round1(change),
        change_percent: change_percent.round() as i64,
        is_positive: change > 0.0,
        data_points: before_values.len() + after_values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// One log per offset (days relative to `start`), each with the given metric value.
    fn logs_at(start: NaiveDate, offsets: &[i64], metric: Metric, values: &[u8]) -> Vec<SymptomLog> {
        offsets
            .iter()
            .zip(values)
            .map(|(offset, value)| {
                SymptomLog::new(start + Duration::days(*offset)).with(metric, *value)
            })
            .collect()
    }

    fn magnesium() -> SupplementRecord {
        SupplementRecord::new("Magnesium", date("2024-03-01"))
    }

    #[test]
    fn small_change_is_filtered_out() {
        let supp = magnesium();
        // 7.0 -> 7.2, about 2.9 %
        let mut logs = logs_at(supp.start_date, &[-3, -2, -1], Metric::Sleep, &[7, 7, 7]);
        logs.extend(logs_at(
            supp.start_date,
            &[7, 8, 9, 10, 11],
            Metric::Sleep,
            &[7, 7, 7, 8, 7],
        ));
        let results = compute_correlations(&logs, &[supp], &CorrelationConfig::default());
        assert!(results.is_empty());
    }

    #[test]
    fn meaningful_change_is_reported() {
        let supp = magnesium();
        // 7.0 -> 7.5, about 7.1 %
        let mut logs = logs_at(supp.start_date, &[-3, -2, -1], Metric::Sleep, &[7, 7, 7]);
        logs.extend(logs_at(
            supp.start_date,
            &[7, 8, 9, 10],
            Metric::Sleep,
            &[7, 8, 7, 8],
        ));
        let results = compute_correlations(&logs, &[supp], &CorrelationConfig::default());

        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.supplement_name, "Magnesium");
        assert_eq!(r.metric, Metric::Sleep);
        assert_eq!(r.before_avg, 7.0);
        assert_eq!(r.after_avg, 7.5);
        assert_eq!(r.change, 0.5);
        assert_eq!(r.change_percent, 7);
        assert!(r.is_positive);
        assert_eq!(r.data_points, 7);
    }

    #[test]
    fn sparse_before_window_skips_supplement() {
        let supp = magnesium();
        let mut logs = logs_at(supp.start_date, &[-2, -1], Metric::Energy, &[3, 3]);
        logs.extend(logs_at(
            supp.start_date,
            &[7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
            Metric::Energy,
            &[9; 10],
        ));
        assert!(compute_correlations(&logs, &[supp], &CorrelationConfig::default()).is_empty());
    }

    #[test]
    fn window_boundaries() {
        let supp = magnesium();
        // Start day itself, day -15, day +6 and day +31 are all outside the windows.
        let mut logs = logs_at(
            supp.start_date,
            &[-15, 0, 6, 31],
            Metric::Mood,
            &[1, 1, 1, 1],
        );
        logs.extend(logs_at(supp.start_date, &[-14, -7, -1], Metric::Mood, &[4, 4, 4]));
        logs.extend(logs_at(supp.start_date, &[7, 20, 30], Metric::Mood, &[6, 6, 6]));

        let results = compute_correlations(&logs, &[supp], &CorrelationConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].before_avg, 4.0);
        assert_eq!(results[0].after_avg, 6.0);
        assert_eq!(results[0].change_percent, 50);
    }

    #[test]
    fn sparse_metric_is_skipped_but_others_kept() {
        let supp = magnesium();
        let mut logs = logs_at(supp.start_date, &[-3, -2, -1], Metric::Energy, &[5, 5, 5]);
        logs.extend(logs_at(supp.start_date, &[7, 8, 9], Metric::Energy, &[4, 4, 4]));
        logs[0].libido = Some(2);
        logs[3].libido = Some(9);

        let results = compute_correlations(&logs, &[supp], &CorrelationConfig::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].metric, Metric::Energy);
        assert_eq!(results[0].change_percent, -20);
        assert!(!results[0].is_positive);
    }

    #[test]
    fn results_sorted_by_magnitude_with_stable_ties() {
        let start = date("2024-03-01");
        let a = SupplementRecord::new("A", start);
        let b = SupplementRecord::new("B", start);

        let mut logs = Vec::new();
        for offset in [-3, -2, -1] {
            logs.push(
                SymptomLog::new(start + Duration::days(offset))
                    .with(Metric::Energy, 5)
                    .with(Metric::Mood, 4)
                    .with(Metric::Sleep, 5),
            );
        }
        for offset in [7, 8, 9] {
            logs.push(
                SymptomLog::new(start + Duration::days(offset))
                    .with(Metric::Energy, 6)
                    .with(Metric::Mood, 6)
                    .with(Metric::Sleep, 4),
            );
        }

        let results = compute_correlations(&logs, &[a, b], &CorrelationConfig::default());
        let order: Vec<(&str, Metric, i64)> = results
            .iter()
            .map(|r| (r.supplement_name.as_str(), r.metric, r.change_percent))
            .collect();
        assert_eq!(
            order,
            vec![
                ("A", Metric::Mood, 50),
                ("B", Metric::Mood, 50),
                ("A", Metric::Energy, 20),
                ("A", Metric::Sleep, -20),
                ("B", Metric::Energy, 20),
                ("B", Metric::Sleep, -20),
            ]
        );
    }

    #[test]
    fn no_supplements_no_results() {
        let logs = vec![SymptomLog::new(date("2024-03-01")).with(Metric::Energy, 5)];
        assert!(compute_correlations(&logs, &[], &CorrelationConfig::default()).is_empty());
    }
}
