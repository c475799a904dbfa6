//! Cache Module
//!
//! The storage engine: entries with TTL expiration, the in-memory table and
//! the engine that keeps it in step with the transaction log.

pub mod engine;
mod entry;
mod stats;
mod table;


// Re-export public types
pub use engine::Engine;
pub use entry::{current_timestamp_ns, Entry};
pub use stats::{EngineStats, StatsSnapshot};
pub use table::Table;
