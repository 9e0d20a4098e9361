use chrono::NaiveDate;

use crate::models::Metric;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid range: {0}")]
    InvalidRange(&'static str),
    #[error("value out of range: {0}")]
    ValueOutOfRange(&'static str),
    #[error("environment variable {name} could not be parsed: {value}")]
    Parse { name: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("{metric} on {date} is {value}, expected 1-10")]
    MetricOutOfRange {
        date: NaiveDate,
        metric: Metric,
        value: u8,
    },
    #[error("cycle starting {start} ends before it starts ({end})")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("a cycle already starts on {0}")]
    DuplicateCycleStart(NaiveDate),
    #[error("no cycle starts on or before {0}")]
    NoCycleToClose(NaiveDate),
    #[error("the cycle starting {0} already has an end date")]
    CycleAlreadyClosed(NaiveDate),
    #[error("more than one symptom log for {0}")]
    DuplicateLogDate(NaiveDate),
}
