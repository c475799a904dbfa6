//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NANOS_PER_SEC: i64 = 1_000_000_000;

// == Cache Entry ==
/// One stored value plus its expiration and priority metadata.
///
/// Entries are never mutated after construction; a set replaces the whole
/// entry for its key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The stored value, opaque to the engine
    #[serde(default)]
    pub value: Value,
    /// Expiration timestamp (Unix nanoseconds), None = no expiration
    #[serde(rename = "expiration", default, with = "never_as_zero")]
    pub expires_at: Option<i64>,
    /// Carried with the entry and persisted, never consulted
    #[serde(default)]
    pub priority: i64,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_seconds` from now.
    ///
    /// A TTL of zero or less means the entry never expires.
    pub fn new(value: Value, ttl_seconds: i64, priority: i64) -> Self {
        let expires_at = (ttl_seconds > 0).then(|| {
            current_timestamp_ns().saturating_add(ttl_seconds.saturating_mul(NANOS_PER_SEC))
        });

        Self {
            value,
            expires_at,
            priority,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired relative to the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ns())
    }

    /// Checks expiration against a caller-supplied instant.
    ///
    /// An entry is expired only once `now` is strictly past its expiration;
    /// entries without an expiration never are.
    pub fn is_expired_at(&self, now_ns: i64) -> bool {
        match self.expires_at {
            Some(expires) => now_ns > expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in nanoseconds.
pub fn current_timestamp_ns() -> i64 {
    // Out of range only after the year 2262.
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Persists `None` as `0`, the on-disk "never expires" sentinel.
mod never_as_zero {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.unwrap_or(0))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok((raw > 0).then_some(raw))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation_no_ttl() {
        let entry = Entry::new(json!("test_value"), 0, 0);

        assert_eq!(entry.value, json!("test_value"));
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_negative_ttl_never_expires() {
        let entry = Entry::new(json!(1), -5, 0);
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(i64::MAX));
    }

    #[test]
    fn test_entry_creation_with_ttl() {
        let before = current_timestamp_ns();
        let entry = Entry::new(json!({"a": [1, 2]}), 60, 7);

        let expires = entry.expires_at.unwrap();
        assert!(expires >= before + 60 * NANOS_PER_SEC);
        assert_eq!(entry.priority, 7);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = Entry::new(json!("test_value"), 1, 0);

        assert!(!entry.is_expired());

        // Wait for expiration
        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ns();
        let entry = Entry {
            value: json!("test"),
            expires_at: Some(now),
            priority: 0,
        };

        // Expired only once strictly past the deadline
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + 1));
    }

    #[test]
    fn test_serialized_form_uses_zero_sentinel() {
        let entry = Entry::new(json!([1, "two"]), 0, 3);
        let encoded = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            encoded,
            json!({"value": [1, "two"], "expiration": 0, "priority": 3})
        );
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let entry: Entry = serde_json::from_str(r#"{"value": "x"}"#).unwrap();
        assert_eq!(entry.expires_at, None);
        assert_eq!(entry.priority, 0);

        let entry: Entry =
            serde_json::from_str(r#"{"value": null, "expiration": 42, "priority": 1}"#).unwrap();
        assert_eq!(entry.expires_at, Some(42));
        assert_eq!(entry.value, Value::Null);
    }
}
