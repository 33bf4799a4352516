use anyhow::Result;
use tracing::{debug, info};

use crate::config::QuickAddSettings;
use crate::model::metric::{Metric, MetricKind};
use crate::model::metric_set::MetricSet;
use crate::repository::{KeyValueStore, LAST_RESET_KEY};
use crate::service::dto::DashboardDto;
use crate::service::metric_store::MetricStore;
use crate::service::reset_gate::{DailyResetGate, ResetOutcome};
use crate::time::{date_key, Clock};

/// Session context handed to the front ends: the metric store plus the
/// daily reset gate, already run once.
pub struct WellnessService<S: KeyValueStore> {
    store: MetricStore<S>,
    gate: DailyResetGate,
    quick_add: QuickAddSettings,
    today: String,
    startup: ResetOutcome,
}

impl<S: KeyValueStore> WellnessService<S> {
    /// Storage failures during startup are logged, never returned, so a
    /// read-only data directory still opens.
    pub fn open<C: Clock + ?Sized>(storage: S, clock: &C, quick_add: QuickAddSettings) -> Self {
        let mut store = MetricStore::load(storage);
        let mut gate = DailyResetGate::new();
        let startup = gate.check(&mut store, clock);
        match &startup {
            ResetOutcome::Reset { .. } => info!("starting a new day"),
            _ => debug!(outcome = ?startup, "reset gate checked"),
        }

        Self {
            store,
            gate,
            quick_add,
            today: date_key(clock.today()),
            startup,
        }
    }

    pub fn startup_outcome(&self) -> &ResetOutcome {
        &self.startup
    }

    pub fn gate(&self) -> &DailyResetGate {
        &self.gate
    }

    pub fn today(&self) -> &str {
        &self.today
    }

    pub fn metrics(&self) -> &MetricSet {
        self.store.metrics()
    }

    pub fn get(&self, kind: MetricKind) -> &Metric {
        self.store.get(kind)
    }

    pub fn update(&mut self, kind: MetricKind, current: f64) -> Result<&Metric> {
        self.store.update(kind, current)
    }

    pub fn increment(&mut self, kind: MetricKind, delta: f64) -> Result<&Metric> {
        self.store.increment(kind, delta)
    }

    /// Adds the configured quick-add step for `kind`, or removes it when
    /// `undo` is set.
    pub fn quick_add(&mut self, kind: MetricKind, undo: bool) -> Result<&Metric> {
        let step = self.quick_add.step(kind);
        let delta = if undo { -step } else { step };
        self.store.increment(kind, delta)
    }

    pub fn quick_add_step(&self, kind: MetricKind) -> f64 {
        self.quick_add.step(kind)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.store.reset()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()
    }

    pub fn last_reset(&self) -> Result<Option<String>> {
        self.store.storage().load(LAST_RESET_KEY)
    }

    pub fn snapshot(&self) -> DashboardDto {
        let last_reset = self.last_reset().ok().flatten();
        DashboardDto::from_set(self.store.metrics(), self.today.clone(), last_reset)
    }
}
