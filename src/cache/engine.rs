//! Engine Module
//!
//! Composition root of the cache: the table, the transaction log and the
//! counters, behind one reader/writer lock.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{error, warn};

use crate::cache::entry::current_timestamp_ns;
use crate::cache::{EngineStats, Entry, StatsSnapshot, Table};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::persistence::{recovery, LogStore, Record};

/// State guarded by the engine lock. Keeping the log next to the table means
/// every append happens inside the critical section of the mutation it
/// describes.
#[derive(Debug)]
struct EngineState {
    table: Table,
    log: LogStore,
}

// == Engine ==
/// The storage engine shared by the HTTP handlers and the janitor.
///
/// Mutations are made durable before they become visible: the record is
/// appended to the log first and the table is only updated once the append
/// succeeded.
#[derive(Debug)]
pub struct Engine {
    state: RwLock<EngineState>,
    stats: EngineStats,
    log_path: PathBuf,
}

impl Engine {
    // == Constructors ==
    /// Opens the transaction log and rebuilds the table from it.
    ///
    /// Fails if the log cannot be opened for appending.
    pub fn open(config: &Config) -> Result<Self> {
        let log = LogStore::open(&config.log_path, config.sync_writes)?;
        let (table, report) = recovery::load_path(&config.log_path)?;

        let engine = Self::with_log(log, table);
        engine.stats.record_recovery(report.applied, report.skipped);
        Ok(engine)
    }

    /// Assembles an engine from an already opened log and table.
    pub fn with_log(log: LogStore, table: Table) -> Self {
        Self {
            log_path: log.path().to_path_buf(),
            state: RwLock::new(EngineState { table, log }),
            stats: EngineStats::new(),
        }
    }

    // == Get ==
    /// Returns the value stored under `key`.
    ///
    /// Entries past their expiration are reported as not found even if the
    /// janitor has not swept them yet.
    pub async fn get(&self, key: &str) -> Result<Value> {
        let state = self.state.read().await;

        match state.table.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Ok(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// A `ttl_seconds` of zero or less means the entry never expires.
    pub async fn set(
        &self,
        key: impl Into<String>,
        value: Value,
        ttl_seconds: i64,
        priority: i64,
    ) -> Result<()> {
        let record = Record::set(key, Entry::new(value, ttl_seconds, priority));

        let mut state = self.state.write().await;
        self.commit(&mut state, record)?;
        self.stats.record_set();
        Ok(())
    }

    // == Delete ==
    /// Removes `key`. The delete is logged even when the key is absent.
    pub async fn delete(&self, key: impl Into<String>) -> Result<()> {
        let record = Record::delete(key);

        let mut state = self.state.write().await;
        self.commit(&mut state, record)?;
        self.stats.record_delete();
        Ok(())
    }

    /// Appends `record` and, only if that succeeded, applies it to the table.
    fn commit(&self, state: &mut EngineState, record: Record) -> Result<()> {
        if let Err(err) = state.log.append(&record) {
            self.stats.record_append_failure();
            error!(key = record.key(), error = %err, "Log append failed, mutation rejected");
            return Err(err);
        }
        state.table.apply(record);
        Ok(())
    }

    // == Sweep Expired ==
    /// Removes every entry whose expiration has passed, logging a delete
    /// record for each.
    ///
    /// Holds the write lock for the whole scan. An entry whose delete cannot
    /// be logged stays in the table and is retried on the next sweep.
    pub async fn sweep_expired(&self) -> usize {
        let mut guard = self.state.write().await;
        let EngineState { table, log } = &mut *guard;
        let now = current_timestamp_ns();
        let mut removed = 0;

        table.retain(|key, entry| {
            if !entry.is_expired_at(now) {
                return true;
            }
            match log.append(&Record::delete(key)) {
                Ok(()) => {
                    removed += 1;
                    false
                }
                Err(err) => {
                    self.stats.record_append_failure();
                    warn!(key, error = %err, "Could not log expiry, keeping entry for next sweep");
                    true
                }
            }
        });

        self.stats.record_expired(removed);
        removed
    }

    // == Introspection ==
    /// Number of entries currently in the table, expired or not.
    pub async fn len(&self) -> usize {
        self.state.read().await.table.len()
    }

    /// Returns true if the table holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.table.is_empty()
    }

    /// Returns current engine statistics.
    pub async fn stats(&self) -> StatsSnapshot {
        let entries = self.len().await;
        self.stats.snapshot(entries)
    }

    /// Path of the transaction log.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
