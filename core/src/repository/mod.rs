pub mod file;
pub mod memory;
pub mod traits;

// Re-export
pub use file::{default_data_dir, FileStore};
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Storage key of the serialized metric set.
pub const STATS_KEY: &str = "wellnessStats";
/// Storage key of the date string of the last daily reset.
pub const LAST_RESET_KEY: &str = "lastStatsReset";
