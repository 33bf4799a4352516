use serde::{Deserialize, Serialize};

use crate::model::metric::{Metric, MetricKind};

/// The fixed collection of tracked metrics for one session.
///
/// Serialized as an object keyed by metric name, e.g.
/// `{"steps":{"current":4000.0,"target":10000.0,"percentage":40}, ...}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MetricSet {
    pub steps: Metric,
    pub water: Metric,
    pub sleep: Metric,
    pub nutrition: Metric,
    pub calories: Metric,
    pub mental: Metric,
}

impl Default for MetricSet {
    fn default() -> Self {
        Self {
            steps: Metric::new(MetricKind::Steps.default_target()),
            water: Metric::new(MetricKind::Water.default_target()),
            sleep: Metric::new(MetricKind::Sleep.default_target()),
            nutrition: Metric::new(MetricKind::Nutrition.default_target()),
            calories: Metric::new(MetricKind::Calories.default_target()),
            mental: Metric::new(MetricKind::Mental.default_target()),
        }
    }
}

impl MetricSet {
    pub fn get(&self, kind: MetricKind) -> &Metric {
        match kind {
            MetricKind::Steps => &self.steps,
            MetricKind::Water => &self.water,
            MetricKind::Sleep => &self.sleep,
            MetricKind::Nutrition => &self.nutrition,
            MetricKind::Calories => &self.calories,
            MetricKind::Mental => &self.mental,
        }
    }

    fn get_mut(&mut self, kind: MetricKind) -> &mut Metric {
        match kind {
            MetricKind::Steps => &mut self.steps,
            MetricKind::Water => &mut self.water,
            MetricKind::Sleep => &mut self.sleep,
            MetricKind::Nutrition => &mut self.nutrition,
            MetricKind::Calories => &mut self.calories,
            MetricKind::Mental => &mut self.mental,
        }
    }

    pub fn update(&mut self, kind: MetricKind, current: f64) -> &Metric {
        let metric = self.get_mut(kind);
        metric.set_current(current);
        metric
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, &Metric)> + '_ {
        MetricKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Re-derives every percentage from `current` and `target`.
    pub fn recompute(&mut self) {
        for kind in MetricKind::ALL {
            self.get_mut(kind).recompute();
        }
    }

    pub fn has_valid_targets(&self) -> bool {
        self.iter().all(|(_, m)| m.has_valid_target())
    }

    /// Mean completion across all metrics, rounded half up.
    pub fn overall_percentage(&self) -> i64 {
        let total: i64 = self.iter().map(|(_, m)| m.percentage).sum();
        let mean = total as f64 / MetricKind::ALL.len() as f64;
        (mean + 0.5).floor() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets() {
        let set = MetricSet::default();
        let targets: Vec<(MetricKind, f64)> = set.iter().map(|(k, m)| (k, m.target)).collect();
        assert_eq!(
            targets,
            vec![
                (MetricKind::Steps, 10000.0),
                (MetricKind::Water, 2.5),
                (MetricKind::Sleep, 8.0),
                (MetricKind::Nutrition, 2000.0),
                (MetricKind::Calories, 600.0),
                (MetricKind::Mental, 100.0),
            ]
        );
        assert!(set.iter().all(|(_, m)| m.current == 0.0 && m.percentage == 0));
    }

    #[test]
    fn test_update_touches_only_named_metric() {
        let mut set = MetricSet::default();
        set.update(MetricKind::Water, 1.25);
        assert_eq!(set.water.percentage, 50);
        assert_eq!(set.steps, Metric::new(10000.0));
        assert_eq!(set.mental, Metric::new(100.0));
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut once = MetricSet::default();
        once.update(MetricKind::Sleep, 6.0);
        let mut twice = once.clone();
        twice.update(MetricKind::Sleep, 6.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_recompute_ignores_stored_percentage() {
        let mut set = MetricSet::default();
        set.steps.current = 5000.0;
        set.steps.percentage = 99;
        set.recompute();
        assert_eq!(set.steps.percentage, 50);
    }

    #[test]
    fn test_overall_percentage() {
        let mut set = MetricSet::default();
        set.update(MetricKind::Steps, 12000.0); // 100
        set.update(MetricKind::Water, 1.25); // 50
        // (100 + 50) / 6 = 25
        assert_eq!(set.overall_percentage(), 25);
    }

    #[test]
    fn test_serialized_layout() {
        let mut set = MetricSet::default();
        set.update(MetricKind::Steps, 4000.0);
        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["steps"]["current"], 4000.0);
        assert_eq!(value["steps"]["target"], 10000.0);
        assert_eq!(value["steps"]["percentage"], 40);
        assert!(value.get("mental").is_some());
    }
}
