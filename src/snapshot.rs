use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, MAX_PERIOD_LENGTH, MIN_PERIOD_LENGTH};
use crate::correlation::compute_correlations;
use crate::error::SnapshotError;
use crate::models::{CycleRecord, InsightReport, Metric, SupplementRecord, SymptomLog};
use crate::prediction::{cycle_stats, predict_cycle};
use crate::weekly::compute_weekly_summary;

const METRIC_MIN: u8 = 1;
const METRIC_MAX: u8 = 10;

/// An in-memory copy of one user's health history, as handed over by the data layer.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HealthSnapshot {
    #[serde(default)]
    pub cycles: Vec<CycleRecord>,
    #[serde(default)]
    pub symptom_logs: Vec<SymptomLog>,
    #[serde(default)]
    pub supplements: Vec<SupplementRecord>,
}

impl HealthSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Insert a daily log, replacing any existing log for the same date.
    pub fn upsert_symptom_log(&mut self, log: SymptomLog) {
        if let Some(existing) = self
            .symptom_logs
            .iter_mut()
            .find(|l| l.log_date == log.log_date)
        {
            *existing = log;
        } else {
            self.symptom_logs.push(log);
            self.symptom_logs.sort_by_key(|l| l.log_date);
        }
    }

    /// Record the start of a new period.
    pub fn log_period_start(&mut self, date: NaiveDate) -> Result<(), SnapshotError> {
        if self.cycles.iter().any(|c| c.start_date == date) {
            return Err(SnapshotError::DuplicateCycleStart(date));
        }
        self.cycles.push(CycleRecord::new(date, None));
        self.cycles.sort_by_key(|c| c.start_date);
        Ok(())
    }

    /// Record the end of the current period. Only the most recent cycle can be
    /// closed, and only once; earlier cycles are settled history.
    pub fn log_period_end(&mut self, date: NaiveDate) -> Result<(), SnapshotError> {
        let cycle = self
            .cycles
            .iter_mut()
            .max_by_key(|c| c.start_date)
            .ok_or(SnapshotError::NoCycleToClose(date))?;
        if cycle.end_date.is_some() {
            return Err(SnapshotError::CycleAlreadyClosed(cycle.start_date));
        }
        if date < cycle.start_date {
            return Err(SnapshotError::EndBeforeStart {
                start: cycle.start_date,
                end: date,
            });
        }

        cycle.end_date = Some(date);
        let length = (date - cycle.start_date).num_days() + 1;
        if !(i64::from(MIN_PERIOD_LENGTH)..=i64::from(MAX_PERIOD_LENGTH)).contains(&length) {
            warn!(
                start = %cycle.start_date,
                end = %date,
                length,
                "logged period length is implausible and will be ignored by averages"
            );
        }
        Ok(())
    }

    /// Check every metric is on the 1-10 scale, every cycle ends after it starts,
    /// and no cycle start or log date appears twice.
    /// The analyses themselves trust their input; call this at the trust boundary.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut starts = HashSet::new();
        for cycle in &self.cycles {
            if !starts.insert(cycle.start_date) {
                return Err(SnapshotError::DuplicateCycleStart(cycle.start_date));
            }
            if let Some(end) = cycle.end_date {
                if end < cycle.start_date {
                    return Err(SnapshotError::EndBeforeStart {
                        start: cycle.start_date,
                        end,
                    });
                }
            }
        }
        let mut log_dates = HashSet::new();
        for log in &self.symptom_logs {
            if !log_dates.insert(log.log_date) {
                return Err(SnapshotError::DuplicateLogDate(log.log_date));
            }
            for metric in Metric::ALL {
                if let Some(value) = log.metric(metric) {
                    if !(METRIC_MIN..=METRIC_MAX).contains(&value) {
                        return Err(SnapshotError::MetricOutOfRange {
                            date: log.log_date,
                            metric,
                            value,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Run every analysis over the snapshot as of `today`.
    pub fn analyze(&self, today: NaiveDate, config: &AnalysisConfig) -> InsightReport {
        debug!(
            %today,
            cycles = self.cycles.len(),
            logs = self.symptom_logs.len(),
            supplements = self.supplements.len(),
            "analyzing health snapshot"
        );

        InsightReport {
            reference_date: today,
            prediction: predict_cycle(&self.cycles, today, &config.cycle),
            stats: cycle_stats(&self.cycles),
            weekly: compute_weekly_summary(&self.symptom_logs, today, &config.weekly),
            correlations: compute_correlations(
                &self.symptom_logs,
                &self.supplements,
                &config.correlation,
            ),
        }
    }
}
