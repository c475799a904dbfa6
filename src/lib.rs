//! walcache - An in-memory key-value cache server
//!
//! Values expire after a per-entry TTL and every mutation is written to an
//! append-only transaction log that is replayed on startup.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod tasks;

pub use api::AppState;
pub use cache::Engine;
pub use config::Config;
pub use error::CacheError;
pub use tasks::spawn_janitor;
