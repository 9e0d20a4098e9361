use chrono::NaiveDate;
use cycle_insights::{AnalysisConfig, CyclePhase, HealthSnapshot, Metric, Trend};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

const SNAPSHOT: &str = r#"{
    "cycles": [
        {"start_date": "2024-01-01", "end_date": "2024-01-05"},
        {"start_date": "2024-01-29", "end_date": "2024-02-02"}
    ],
    "symptom_logs": [
        {"log_date": "2024-01-20", "energy": 5, "sleep": 6},
        {"log_date": "2024-01-21", "energy": 5, "sleep": 6},
        {"log_date": "2024-01-22", "energy": 4, "sleep": 6},
        {"log_date": "2024-01-23", "energy": 5, "sleep": 6},
        {"log_date": "2024-02-04", "energy": 5, "mood": 6, "sleep": 6},
        {"log_date": "2024-02-05", "energy": 5, "mood": 6, "sleep": 6},
        {"log_date": "2024-02-06", "energy": 5, "mood": 7, "sleep": 7},
        {"log_date": "2024-02-08", "energy": 6, "mood": 7, "sleep": 6},
        {"log_date": "2024-02-09", "energy": 7, "mood": 7, "sleep": 6},
        {"log_date": "2024-02-10", "energy": 7, "mood": 7, "sleep": 6}
    ],
    "supplements": [
        {"name": "Vitamin D", "start_date": "2024-01-28"}
    ]
}"#;

#[test]
fn full_report_for_february_tenth() {
    let snapshot = HealthSnapshot::from_json(SNAPSHOT).unwrap();
    snapshot.validate().unwrap();
    let original = snapshot.clone();

    let report = snapshot.analyze(date("2024-02-10"), &AnalysisConfig::default());

    let prediction = report.prediction.unwrap();
    assert_eq!(prediction.avg_cycle_length, 28);
    assert_eq!(prediction.next_period_start, date("2024-02-26"));
    assert_eq!(prediction.cycle_day, 13);
    assert_eq!(prediction.current_phase, CyclePhase::Ovulation);

    assert_eq!(report.stats.total_cycles, 2);
    assert_eq!(report.stats.last_period_end, Some(date("2024-02-02")));

    let weekly = report.weekly.unwrap();
    assert_eq!(weekly.days_logged, 6);
    assert_eq!(weekly.averages.energy, 5.8);
    assert_eq!(weekly.trends.energy, Trend::Up);
    assert_eq!(weekly.trends.sleep, Trend::Stable);
    // 02-09 and 02-10 tie on composite score; the earlier day wins.
    assert_eq!(weekly.best_day.unwrap().date, date("2024-02-09"));
    assert_eq!(weekly.worst_day.unwrap().date, date("2024-02-04"));

    // Energy 4.75 -> 5.83 (+23 %); sleep and mood don't qualify.
    assert_eq!(report.correlations.len(), 1);
    let energy = &report.correlations[0];
    assert_eq!(energy.supplement_name, "Vitamin D");
    assert_eq!(energy.metric, Metric::Energy);
    assert_eq!(energy.before_avg, 4.8);
    assert_eq!(energy.after_avg, 5.8);
    assert_eq!(energy.change_percent, 23);
    assert!(energy.is_positive);

    // Analysis never touches its input.
    assert_eq!(snapshot, original);
}
