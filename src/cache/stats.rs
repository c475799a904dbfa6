//! Engine Statistics Module
//!
//! Counters for reads, writes, expirations and log health. Counters are
//! atomic so lookups can record hits and misses under the shared lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Engine Stats ==
/// Live counters owned by the engine.
#[derive(Debug, Default)]
pub struct EngineStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    expired: AtomicU64,
    append_failures: AtomicU64,
    records_replayed: AtomicU64,
    records_skipped: AtomicU64,
}

/// Point-in-time copy of the counters, as served by `/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Successful lookups
    pub hits: u64,
    /// Lookups of absent or expired keys
    pub misses: u64,
    /// Committed set operations
    pub sets: u64,
    /// Committed delete operations
    pub deletes: u64,
    /// Entries removed by the janitor
    pub expired: u64,
    /// Log appends that failed
    pub append_failures: u64,
    /// Records applied during startup recovery
    pub records_replayed: u64,
    /// Log lines skipped during startup recovery
    pub records_skipped: u64,
    /// Current number of entries in the table
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired(&self, count: usize) {
        self.expired.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_append_failure(&self) {
        self.append_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recovery(&self, replayed: usize, skipped: usize) {
        self.records_replayed.store(replayed as u64, Ordering::Relaxed);
        self.records_skipped.store(skipped as u64, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the counters, pairing them with the current entry count.
    pub fn snapshot(&self, total_entries: usize) -> StatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };

        StatsSnapshot {
            hits,
            misses,
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            append_failures: self.append_failures.load(Ordering::Relaxed),
            records_replayed: self.records_replayed.load(Ordering::Relaxed),
            records_skipped: self.records_skipped.load(Ordering::Relaxed),
            total_entries,
            hit_rate,
        }
    }
}
