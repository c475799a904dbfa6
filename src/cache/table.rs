//! Table Module
//!
//! The in-memory key to entry mapping. The table itself is not synchronized;
//! the engine wraps it in a single reader/writer lock.

use std::collections::HashMap;

use crate::cache::Entry;
use crate::persistence::Record;

// == Table ==
/// Key-value storage backing the engine.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Table {
    entries: HashMap<String, Entry>,
}

impl Table {
    // == Constructor ==
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table by folding `records` in order over an empty map.
    ///
    /// A `set` overwrites its key and a `delete` removes it, so the last
    /// record for a key wins.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut table = Self::new();
        for record in records {
            table.apply(record);
        }
        table
    }

    /// Applies one record to the table.
    pub fn apply(&mut self, record: Record) {
        match record {
            Record::Set { key, item } => {
                self.set(key, item);
            }
            Record::Delete { key } => {
                self.delete(&key);
            }
        }
    }

    // == Get ==
    /// Looks up an entry. Expiration is not checked here.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    // == Set ==
    /// Replaces any existing entry for `key`, returning the previous one.
    pub fn set(&mut self, key: String, entry: Entry) -> Option<Entry> {
        self.entries.insert(key, entry)
    }

    // == Delete ==
    /// Removes `key` if present. Removing an absent key is a no-op.
    pub fn delete(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    // == Retain ==
    /// Visits every entry, removing those for which `keep` returns false.
    ///
    /// The caller must hold exclusive access; the entry being visited may be
    /// removed during the visit.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &Entry) -> bool,
    {
        self.entries.retain(|key, entry| keep(key, entry));
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
