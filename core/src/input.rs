use anyhow::{anyhow, Context, Result};

use crate::model::metric::MetricKind;

/// Parses `name:value` tokens such as `steps:4000 w:1.25` into metric values.
///
/// Names go through [`MetricKind`] prefix matching; a token without a colon
/// or with a non-numeric value is rejected.
pub fn parse_metric_args(args: &[String]) -> Result<Vec<(MetricKind, f64)>> {
    let mut values = Vec::new();

    for arg in args {
        let (key, value) = arg
            .split_once(':')
            .or_else(|| arg.split_once('='))
            .ok_or_else(|| anyhow!("Expected name:value, got '{}'", arg))?;

        let kind: MetricKind = key.parse()?;
        let amount: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: '{}'", kind, value))?;
        if !amount.is_finite() {
            return Err(anyhow!("Invalid value for {}: '{}'", kind, value));
        }
        values.push((kind, amount));
    }

    Ok(values)
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_metric_args() {
        let parsed = parse_metric_args(&args(&["steps:4000", "w:1.25", "mental=-5"])).unwrap();
        assert_eq!(
            parsed,
            vec![
                (MetricKind::Steps, 4000.0),
                (MetricKind::Water, 1.25),
                (MetricKind::Mental, -5.0),
            ]
        );
    }

    #[test]
    fn test_parse_metric_args_errors() {
        assert!(parse_metric_args(&args(&["steps"])).is_err());
        assert!(parse_metric_args(&args(&["s:10"])).is_err()); // steps or sleep
        assert!(parse_metric_args(&args(&["water:lots"])).is_err());
        assert!(parse_metric_args(&args(&["water:NaN"])).is_err());
        assert!(parse_metric_args(&args(&[])).unwrap().is_empty());
    }

    #[test]
    fn test_expand_key() {
        let candidates = vec!["steps", "sleep", "water"];

        assert_eq!(expand_key("st", &candidates).unwrap(), "steps");
        assert_eq!(expand_key("sle", &candidates).unwrap(), "sleep");
        assert_eq!(expand_key("water", &candidates).unwrap(), "water");

        // Ambiguous
        assert!(expand_key("s", &candidates).is_err());

        // Unknown
        assert!(expand_key("x", &candidates).is_err());
    }
}
