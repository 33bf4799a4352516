use tracing::{info, warn};

use crate::repository::{KeyValueStore, LAST_RESET_KEY};
use crate::service::metric_store::MetricStore;
use crate::time::{date_key, Clock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Unchecked,
    Checked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Metrics were reset; `previous` is the stored date that did not match.
    /// `persisted` is false when the reset could not be written back.
    Reset {
        previous: Option<String>,
        today: String,
        persisted: bool,
    },
    UpToDate,
    /// The gate already ran in this process.
    AlreadyChecked,
}

/// Zeroes the metrics once per local calendar day, checked at startup.
///
/// The check runs at most once per process; a session left open past
/// midnight keeps its numbers until the next start.
#[derive(Debug, Default)]
pub struct DailyResetGate {
    state: GateState,
}

impl DailyResetGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Never fails: storage errors are logged and the in-memory reset stands.
    pub fn check<S, C>(&mut self, store: &mut MetricStore<S>, clock: &C) -> ResetOutcome
    where
        S: KeyValueStore,
        C: Clock + ?Sized,
    {
        if self.state == GateState::Checked {
            return ResetOutcome::AlreadyChecked;
        }
        self.state = GateState::Checked;

        let today = date_key(clock.today());
        let previous = match store.storage().load(LAST_RESET_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "could not read last reset date");
                None
            }
        };

        // Plain string comparison: a timezone change can repeat or skip a reset.
        if previous.as_deref() == Some(today.as_str()) {
            return ResetOutcome::UpToDate;
        }

        let persisted = match store
            .reset()
            .and_then(|()| store.storage().save(LAST_RESET_KEY, &today))
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "daily reset applied in memory only");
                false
            }
        };
        info!(previous = previous.as_deref().unwrap_or("never"), today = %today, persisted, "daily stats reset");

        ResetOutcome::Reset {
            previous,
            today,
            persisted,
        }
    }
}
