use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One observed menstrual cycle, anchored on the day the period started.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl CycleRecord {
    pub fn new(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_date,
            end_date,
        }
    }

    /// Inclusive period length in days, if the end has been logged.
    pub fn period_length(&self) -> Option<i64> {
        self.end_date.map(|end| (end - self.start_date).num_days() + 1)
    }
}

/// The six self-reported wellness metrics, in canonical order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Energy,
    Mood,
    Sleep,
    MentalClarity,
    Libido,
    PerformanceStamina,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Energy,
        Metric::Mood,
        Metric::Sleep,
        Metric::MentalClarity,
        Metric::Libido,
        Metric::PerformanceStamina,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Energy => "energy",
            Metric::Mood => "mood",
            Metric::Sleep => "sleep",
            Metric::MentalClarity => "mental_clarity",
            Metric::Libido => "libido",
            Metric::PerformanceStamina => "performance_stamina",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One daily self-report. Each metric is on a 1-10 scale; `None` means not reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymptomLog {
    pub log_date: NaiveDate,
    #[serde(default)]
    pub energy: Option<u8>,
    #[serde(default)]
    pub mood: Option<u8>,
    #[serde(default)]
    pub sleep: Option<u8>,
    #[serde(default)]
    pub mental_clarity: Option<u8>,
    #[serde(default)]
    pub libido: Option<u8>,
    #[serde(default)]
    pub performance_stamina: Option<u8>,
}

impl SymptomLog {
    pub fn new(log_date: NaiveDate) -> Self {
        Self {
            log_date,
            energy: None,
            mood: None,
            sleep: None,
            mental_clarity: None,
            libido: None,
            performance_stamina: None,
        }
    }

    pub fn metric(&self, metric: Metric) -> Option<u8> {
        match metric {
            Metric::Energy => self.energy,
            Metric::Mood => self.mood,
            Metric::Sleep => self.sleep,
            Metric::MentalClarity => self.mental_clarity,
            Metric::Libido => self.libido,
            Metric::PerformanceStamina => self.performance_stamina,
        }
    }

    pub fn set_metric(&mut self, metric: Metric, value: Option<u8>) {
        let slot = match metric {
            Metric::Energy => &mut self.energy,
            Metric::Mood => &mut self.mood,
            Metric::Sleep => &mut self.sleep,
            Metric::MentalClarity => &mut self.mental_clarity,
            Metric::Libido => &mut self.libido,
            Metric::PerformanceStamina => &mut self.performance_stamina,
        };
        *slot = value;
    }

    /// Builder-style setter, handy for fixtures.
    pub fn with(mut self, metric: Metric, value: u8) -> Self {
        self.set_metric(metric, Some(value));
        self
    }

    /// Mean of every metric reported that day, `None` if nothing was logged.
    pub fn composite_score(&self) -> Option<f64> {
        let values: Vec<f64> = Metric::ALL
            .iter()
            .filter_map(|m| self.metric(*m))
            .map(f64::from)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

/// A tracked supplement regimen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplementRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
}

impl SupplementRecord {
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CyclePrediction {
    pub next_period_start: NaiveDate,
    pub next_period_end: NaiveDate,
    pub fertile_window_start: NaiveDate,
    pub fertile_window_end: NaiveDate,
    pub ovulation_date: NaiveDate,
    pub current_phase: CyclePhase,
    pub cycle_day: i64,
    pub days_until_next_period: i64,
    pub days_until_ovulation: i64,
    pub avg_cycle_length: u32,
    pub avg_period_length: u32,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleStats {
    pub total_cycles: usize,
    pub avg_cycle_length: Option<f32>,
    pub avg_period_length: Option<f32>,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,
    pub last_period_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// Per-metric values, one slot per [`Metric`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricMap<T> {
    pub energy: T,
    pub mood: T,
    pub sleep: T,
    pub mental_clarity: T,
    pub libido: T,
    pub performance_stamina: T,
}

impl<T> MetricMap<T> {
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        Self {
            energy: f(Metric::Energy),
            mood: f(Metric::Mood),
            sleep: f(Metric::Sleep),
            mental_clarity: f(Metric::MentalClarity),
            libido: f(Metric::Libido),
            performance_stamina: f(Metric::PerformanceStamina),
        }
    }

    pub fn get(&self, metric: Metric) -> &T {
        match metric {
            Metric::Energy => &self.energy,
            Metric::Mood => &self.mood,
            Metric::Sleep => &self.sleep,
            Metric::MentalClarity => &self.mental_clarity,
            Metric::Libido => &self.libido,
            Metric::PerformanceStamina => &self.performance_stamina,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayScore {
    pub date: NaiveDate,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub averages: MetricMap<f64>,
    pub trends: MetricMap<Trend>,
    pub days_logged: usize,
    pub best_day: Option<DayScore>,
    pub worst_day: Option<DayScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrelationResult {
    pub supplement_name: String,
    pub metric: Metric,
    pub before_avg: f64,
    pub after_avg: f64,
    pub change: f64,
    pub change_percent: i64,
    pub is_positive: bool,
    pub data_points: usize,
}

/// Everything derived from one snapshot, returned to the consumer in one piece.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub reference_date: NaiveDate,
    pub prediction: Option<CyclePrediction>,
    pub stats: CycleStats,
    pub weekly: Option<WeeklySummary>,
    pub correlations: Vec<CorrelationResult>,
}
