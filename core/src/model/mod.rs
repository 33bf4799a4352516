pub mod metric;
pub mod metric_set;

pub use metric::{completion_percentage, Metric, MetricKind, MetricParseError};
pub use metric_set::MetricSet;
