pub mod config;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use crate::config::{QuickAddSettings, Settings};
pub use input::{expand_key, parse_metric_args};
pub use model::{completion_percentage, Metric, MetricKind, MetricParseError, MetricSet};
pub use repository::{default_data_dir, FileStore, KeyValueStore, MemoryStore, LAST_RESET_KEY, STATS_KEY};
pub use service::dto::{DashboardDto, MetricDto};
pub use service::metric_store::MetricStore;
pub use service::reset_gate::{DailyResetGate, GateState, ResetOutcome};
pub use service::wellness_service::WellnessService;
pub use time::{date_key, parse_day, Clock, FixedClock, SystemClock};
