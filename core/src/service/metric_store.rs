use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::model::metric::{Metric, MetricKind};
use crate::model::metric_set::MetricSet;
use crate::repository::{KeyValueStore, LAST_RESET_KEY, STATS_KEY};

/// Owns the session's [`MetricSet`] and writes it back after every change.
pub struct MetricStore<S: KeyValueStore> {
    storage: S,
    metrics: MetricSet,
}

impl<S: KeyValueStore> MetricStore<S> {
    /// Restores the persisted set, falling back to defaults when it is
    /// missing, unreadable or malformed. Never fails.
    pub fn load(storage: S) -> Self {
        let metrics = read_metrics(&storage);
        Self { storage, metrics }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn metrics(&self) -> &MetricSet {
        &self.metrics
    }

    pub fn get(&self, kind: MetricKind) -> &Metric {
        self.metrics.get(kind)
    }

    /// Overwrites `current` for one metric and persists the whole set.
    ///
    /// The in-memory value changes even if the write fails.
    pub fn update(&mut self, kind: MetricKind, current: f64) -> Result<&Metric> {
        self.metrics.update(kind, current);
        debug!(metric = %kind, current, percentage = self.metrics.get(kind).percentage, "metric updated");
        self.persist()?;
        Ok(self.metrics.get(kind))
    }

    pub fn increment(&mut self, kind: MetricKind, delta: f64) -> Result<&Metric> {
        let current = self.metrics.get(kind).current + delta;
        self.update(kind, current)
    }

    /// Replaces every metric with its default and persists.
    pub fn reset(&mut self) -> Result<()> {
        self.metrics = MetricSet::default();
        debug!("metrics reset to defaults");
        self.persist()
    }

    /// Drops all persisted state; the in-memory set returns to defaults.
    pub fn clear(&mut self) -> Result<()> {
        self.metrics = MetricSet::default();
        self.storage.remove(STATS_KEY)?;
        self.storage.remove(LAST_RESET_KEY)?;
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.metrics)?;
        self.storage
            .save(STATS_KEY, &json)
            .context("Failed to persist wellness stats")
    }
}

fn read_metrics<S: KeyValueStore>(storage: &S) -> MetricSet {
    let raw = match storage.load(STATS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("no persisted stats, starting from defaults");
            return MetricSet::default();
        }
        Err(e) => {
            warn!(error = %e, "could not read persisted stats, starting from defaults");
            return MetricSet::default();
        }
    };

    match serde_json::from_str::<MetricSet>(&raw) {
        Ok(mut metrics) if metrics.has_valid_targets() => {
            metrics.recompute();
            metrics
        }
        Ok(_) => {
            warn!("persisted stats contain an invalid target, starting from defaults");
            MetricSet::default()
        }
        Err(e) => {
            warn!(error = %e, "persisted stats are malformed, starting from defaults");
            MetricSet::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;
    use anyhow::anyhow;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }
        fn save(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[test]
    fn test_fresh_load_gives_defaults() {
        let store = MetricStore::load(MemoryStore::new());
        assert_eq!(store.metrics(), &MetricSet::default());
        assert_eq!(store.get(MetricKind::Steps).target, 10000.0);
        assert_eq!(store.get(MetricKind::Water).target, 2.5);
    }

    #[test]
    fn test_update_scenarios() {
        let mut store = MetricStore::load(MemoryStore::new());
        assert_eq!(store.update(MetricKind::Steps, 12000.0).unwrap().percentage, 100);
        assert_eq!(store.update(MetricKind::Water, 1.25).unwrap().percentage, 50);
        assert_eq!(store.get(MetricKind::Steps).current, 12000.0);
    }

    #[test]
    fn test_update_formula_for_every_metric() {
        let mut store = MetricStore::load(MemoryStore::new());
        for kind in MetricKind::ALL {
            let target = kind.default_target();
            for v in [0.0, target * 0.333, target * 0.5, target, target * 1.7] {
                let expected = ((v / target * 100.0 + 0.5).floor()).min(100.0) as i64;
                assert_eq!(store.update(kind, v).unwrap().percentage, expected, "{kind} at {v}");
            }
        }
    }

    #[test]
    fn test_reload_returns_equal_set() {
        let storage = MemoryStore::new();
        let mut store = MetricStore::load(storage.clone());
        let fixed = [
            15.719786905311869,
            120.88581275524673,
            249.60129896012742,
            113.71640670497287,
            0.1 + 0.2,
            1e-300,
            -3.75,
        ];
        for v in fixed {
            store.update(MetricKind::Water, v).unwrap();
            let reloaded = MetricStore::load(storage.clone());
            assert_eq!(reloaded.metrics(), store.metrics(), "water at {v}");
        }

        // xorshift, so every metric sees a few thousand arbitrary values.
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        for i in 0..5000 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let kind = MetricKind::ALL[i % MetricKind::ALL.len()];
            let v = (seed >> 11) as f64 / (1u64 << 53) as f64 * kind.default_target() * 1.5;
            store.update(kind, v).unwrap();

            let reloaded = MetricStore::load(storage.clone());
            assert_eq!(reloaded.metrics(), store.metrics(), "{kind} at {v}");
        }
    }

    #[test]
    fn test_reset_round_trips() {
        let storage = MemoryStore::new();
        let mut store = MetricStore::load(storage.clone());
        store.update(MetricKind::Sleep, 6.1234567).unwrap();
        store.reset().unwrap();
        assert_eq!(MetricStore::load(storage).metrics(), store.metrics());
    }

    #[test]
    fn test_update_twice_same_state() {
        let storage = MemoryStore::new();
        let mut store = MetricStore::load(storage.clone());
        store.update(MetricKind::Mental, 40.0).unwrap();
        let first = storage.get(STATS_KEY);
        store.update(MetricKind::Mental, 40.0).unwrap();
        assert_eq!(storage.get(STATS_KEY), first);
    }

    #[test]
    fn test_increment() {
        let mut store = MetricStore::load(MemoryStore::new());
        store.increment(MetricKind::Water, 0.25).unwrap();
        store.increment(MetricKind::Water, 0.25).unwrap();
        let water = store.get(MetricKind::Water);
        assert_eq!(water.current, 0.5);
        assert_eq!(water.percentage, 20);
    }

    #[test]
    fn test_reset_zeroes_everything() {
        let storage = MemoryStore::new();
        let mut store = MetricStore::load(storage.clone());
        for kind in MetricKind::ALL {
            store.update(kind, kind.default_target() * 2.0).unwrap();
        }
        store.reset().unwrap();
        assert!(store.metrics().iter().all(|(_, m)| m.current == 0.0 && m.percentage == 0));
        assert_eq!(MetricStore::load(storage).metrics(), &MetricSet::default());
    }

    #[test]
    fn test_corrupt_state_falls_back() {
        let storage = MemoryStore::with_entries([(STATS_KEY, "{not json")]);
        assert_eq!(MetricStore::load(storage).metrics(), &MetricSet::default());

        let partial = MemoryStore::with_entries([(STATS_KEY, r#"{"steps":{"current":1,"target":10,"percentage":10}}"#)]);
        assert_eq!(MetricStore::load(partial).metrics(), &MetricSet::default());
    }

    #[test]
    fn test_zero_target_falls_back() {
        let mut set = MetricSet::default();
        set.water.target = 0.0;
        let storage = MemoryStore::with_entries([(STATS_KEY, serde_json::to_string(&set).unwrap())]);
        assert_eq!(MetricStore::load(storage).metrics(), &MetricSet::default());
    }

    #[test]
    fn test_load_recomputes_percentage() {
        let mut set = MetricSet::default();
        set.steps.current = 2500.0;
        set.steps.percentage = 90;
        let storage = MemoryStore::with_entries([(STATS_KEY, serde_json::to_string(&set).unwrap())]);
        assert_eq!(MetricStore::load(storage).get(MetricKind::Steps).percentage, 25);
    }

    #[test]
    fn test_unreadable_storage() {
        let mut store = MetricStore::load(BrokenStore);
        assert_eq!(store.metrics(), &MetricSet::default());
        // The write fails but the in-memory state still moves.
        assert!(store.update(MetricKind::Steps, 5000.0).is_err());
        assert_eq!(store.get(MetricKind::Steps).percentage, 50);
    }

    #[test]
    fn test_clear_removes_persisted_keys() {
        let storage = MemoryStore::with_entries([(LAST_RESET_KEY, "Mon Jan 01 2024")]);
        let mut store = MetricStore::load(storage.clone());
        store.update(MetricKind::Steps, 100.0).unwrap();
        store.clear().unwrap();
        assert_eq!(storage.get(STATS_KEY), None);
        assert_eq!(storage.get(LAST_RESET_KEY), None);
        assert_eq!(store.metrics(), &MetricSet::default());
    }
}
