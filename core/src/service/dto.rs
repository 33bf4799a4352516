use serde::Serialize;

use crate::model::metric::{Metric, MetricKind};
use crate::model::metric_set::MetricSet;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MetricDto {
    pub kind: MetricKind,
    pub label: String,
    pub unit: String,
    pub current: f64,
    pub target: f64,
    pub percentage: i64,
    pub remaining: f64,
}

impl MetricDto {
    pub fn from_entity(kind: MetricKind, metric: &Metric) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            unit: kind.unit().to_string(),
            current: metric.current,
            target: metric.target,
            percentage: metric.percentage,
            remaining: metric.remaining(),
        }
    }

    /// Gauge fill in `[0, 1]`; negative percentages show as empty.
    pub fn ratio(&self) -> f64 {
        (self.percentage as f64 / 100.0).clamp(0.0, 1.0)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DashboardDto {
    pub date: String,
    pub last_reset: Option<String>,
    pub overall_percentage: i64,
    pub metrics: Vec<MetricDto>,
}

impl DashboardDto {
    pub fn from_set(set: &MetricSet, date: String, last_reset: Option<String>) -> Self {
        Self {
            date,
            last_reset,
            overall_percentage: set.overall_percentage(),
            metrics: set
                .iter()
                .map(|(kind, metric)| MetricDto::from_entity(kind, metric))
                .collect(),
        }
    }
}
