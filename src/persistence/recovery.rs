//! Startup Recovery
//!
//! Rebuilds the table by replaying the transaction log from the beginning.
//! There is no snapshot; the log alone describes the final state.

use std::path::Path;

use tracing::{info, warn};

use crate::cache::Table;
use crate::error::Result;
use crate::persistence::{LogReplay, LogStore};

/// Outcome of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Records folded into the table
    pub applied: usize,
    /// Lines dropped because they could not be parsed
    pub skipped: usize,
}

/// Folds every record of `replay` into a fresh table.
pub fn load(mut replay: LogReplay) -> (Table, RecoveryReport) {
    let mut table = Table::new();
    let mut applied = 0;

    for record in replay.by_ref() {
        table.apply(record);
        applied += 1;
    }

    let report = RecoveryReport {
        applied,
        skipped: replay.skipped(),
    };
    (table, report)
}

/// Replays the log at `path` and returns the rebuilt table.
pub fn load_path(path: &Path) -> Result<(Table, RecoveryReport)> {
    let (table, report) = load(LogStore::replay(path)?);

    if report.skipped > 0 {
        warn!(
            skipped = report.skipped,
            "Recovered with corrupt records dropped from {}",
            path.display()
        );
    }
    info!(
        records = report.applied,
        keys = table.len(),
        "Recovered state from {}",
        path.display()
    );

    Ok((table, report))
}
