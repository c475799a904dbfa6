//! Persistence Module
//!
//! The append-only transaction log and the replay that rebuilds the table
//! from it at startup.

mod log_store;
mod record;
pub mod recovery;

pub use log_store::{LogReplay, LogStore};
pub use record::Record;
pub use recovery::RecoveryReport;
