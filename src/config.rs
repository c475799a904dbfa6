//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Path of the append-only transaction log
    pub log_path: PathBuf,
    /// Janitor sweep interval in seconds
    pub cleanup_interval: u64,
    /// Whether every append is followed by `sync_data`
    pub sync_writes: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 6969)
    /// - `TRANSACTION_LOG` - Transaction log path (default: transaction.log)
    /// - `CLEANUP_INTERVAL` - Janitor frequency in seconds (default: 1)
    /// - `SYNC_WRITES` - fsync each log append (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            log_path: env::var("TRANSACTION_LOG")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.log_path),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            sync_writes: env::var("SYNC_WRITES")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.sync_writes),
        }
    }

    /// Returns a copy of this config writing to `path`.
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 6969,
            log_path: PathBuf::from("transaction.log"),
            cleanup_interval: 1,
            sync_writes: true,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
