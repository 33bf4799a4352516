use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::input::expand_key;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Steps,
    Water,
    Sleep,
    Nutrition,
    Calories,
    Mental,
}

#[derive(Debug, Error, PartialEq)]
pub enum MetricParseError {
    #[error("unknown metric '{0}'")]
    Unknown(String),
    #[error("ambiguous metric '{input}' matches {candidates:?}")]
    Ambiguous {
        input: String,
        candidates: Vec<String>,
    },
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Steps,
        MetricKind::Water,
        MetricKind::Sleep,
        MetricKind::Nutrition,
        MetricKind::Calories,
        MetricKind::Mental,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Steps => "steps",
            MetricKind::Water => "water",
            MetricKind::Sleep => "sleep",
            MetricKind::Nutrition => "nutrition",
            MetricKind::Calories => "calories",
            MetricKind::Mental => "mental",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Steps => "Steps",
            MetricKind::Water => "Water",
            MetricKind::Sleep => "Sleep",
            MetricKind::Nutrition => "Nutrition",
            MetricKind::Calories => "Calories Burned",
            MetricKind::Mental => "Mental Wellness",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Steps => "steps",
            MetricKind::Water => "L",
            MetricKind::Sleep => "h",
            MetricKind::Nutrition => "kcal",
            MetricKind::Calories => "kcal",
            MetricKind::Mental => "pts",
        }
    }

    /// Daily goal a fresh or reset set starts with.
    pub fn default_target(&self) -> f64 {
        match self {
            MetricKind::Steps => 10000.0,
            MetricKind::Water => 2.5,
            MetricKind::Sleep => 8.0,
            MetricKind::Nutrition => 2000.0,
            MetricKind::Calories => 600.0,
            MetricKind::Mental => 100.0,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = MetricParseError;

    /// Accepts the full name or any unambiguous prefix, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let names: Vec<&str> = MetricKind::ALL.iter().map(|k| k.name()).collect();

        let matched = expand_key(&key, &names).map_err(|_| {
            let candidates: Vec<String> = names
                .iter()
                .filter(|n| !key.is_empty() && n.starts_with(key.as_str()))
                .map(|n| n.to_string())
                .collect();
            if candidates.len() > 1 {
                MetricParseError::Ambiguous {
                    input: s.to_string(),
                    candidates,
                }
            } else {
                MetricParseError::Unknown(s.to_string())
            }
        })?;

        MetricKind::ALL
            .into_iter()
            .find(|k| k.name() == matched)
            .ok_or_else(|| MetricParseError::Unknown(s.to_string()))
    }
}

/// Rounds half-way values toward positive infinity (`-0.5` becomes `0`, `0.5` becomes `1`).
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Completion percentage for `current` against `target`, capped at 100.
///
/// Only the upper end is clamped: a negative `current` produces a negative
/// percentage.
pub fn completion_percentage(current: f64, target: f64) -> i64 {
    let raw = round_half_up(current / target * 100.0);
    raw.min(100.0) as i64
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Metric {
    pub current: f64,
    pub target: f64,
    pub percentage: i64,
}

impl Metric {
    pub fn new(target: f64) -> Self {
        Self {
            current: 0.0,
            target,
            percentage: 0,
        }
    }

    pub fn set_current(&mut self, value: f64) {
        self.current = value;
        self.recompute();
    }

    pub fn recompute(&mut self) {
        self.percentage = completion_percentage(self.current, self.target);
    }

    pub fn has_valid_target(&self) -> bool {
        self.target.is_finite() && self.target > 0.0
    }

    pub fn remaining(&self) -> f64 {
        (self.target - self.current).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_basic() {
        assert_eq!(completion_percentage(4000.0, 10000.0), 40);
        assert_eq!(completion_percentage(1.25, 2.5), 50);
        assert_eq!(completion_percentage(0.0, 8.0), 0);
    }

    #[test]
    fn test_percentage_clamped_at_hundred() {
        assert_eq!(completion_percentage(12000.0, 10000.0), 100);
        assert_eq!(completion_percentage(f64::INFINITY, 10.0), 100);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 1/8 = 12.5%
        assert_eq!(completion_percentage(1.0, 8.0), 13);
        assert_eq!(completion_percentage(2.0, 3.0), 67);
        assert_eq!(completion_percentage(-0.005, 1.0), 0);
    }

    #[test]
    fn test_negative_current_is_not_floored() {
        // Known boundary: the clamp only caps the upper end.
        assert_eq!(completion_percentage(-500.0, 10000.0), -5);
        let mut metric = Metric::new(2.5);
        metric.set_current(-2.5);
        assert_eq!(metric.percentage, -100);
    }

    #[test]
    fn test_set_current_keeps_target() {
        let mut metric = Metric::new(600.0);
        metric.set_current(300.0);
        assert_eq!(metric.target, 600.0);
        assert_eq!(metric.percentage, 50);
        assert_eq!(metric.remaining(), 300.0);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("steps".parse::<MetricKind>(), Ok(MetricKind::Steps));
        assert_eq!("W".parse::<MetricKind>(), Ok(MetricKind::Water));
        assert_eq!("sl".parse::<MetricKind>(), Ok(MetricKind::Sleep));
        assert_eq!("m".parse::<MetricKind>(), Ok(MetricKind::Mental));
        assert_eq!("cal".parse::<MetricKind>(), Ok(MetricKind::Calories));
    }

    #[test]
    fn test_parse_kind_rejects() {
        assert!(matches!(
            "s".parse::<MetricKind>(),
            Err(MetricParseError::Ambiguous { .. })
        ));
        assert_eq!(
            "heart".parse::<MetricKind>(),
            Err(MetricParseError::Unknown("heart".to_string()))
        );
        assert!("".parse::<MetricKind>().is_err());
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MetricKind::Calories).unwrap(), "\"calories\"");
    }
}
