//! Transaction Records
//!
//! One record per mutation, encoded as a single JSON object per log line.

use serde::{Deserialize, Serialize};

use crate::cache::Entry;

/// A durable description of one `set` or `delete` mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Record {
    /// Overwrite `key` with `item`
    Set { key: String, item: Entry },
    /// Remove `key`; a stray `item` field on the line is ignored
    Delete { key: String },
}

impl Record {
    pub fn set(key: impl Into<String>, item: Entry) -> Self {
        Record::Set {
            key: key.into(),
            item,
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Record::Delete { key: key.into() }
    }

    /// The key this record mutates.
    pub fn key(&self) -> &str {
        match self {
            Record::Set { key, .. } | Record::Delete { key } => key,
        }
    }

    /// Encodes the record as one line, including the trailing newline.
    pub fn encode_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_record_layout() {
        let record = Record::set("a", Entry::new(json!({"n": 1}), 0, 2));
        let encoded: serde_json::Value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            encoded,
            json!({
                "action": "set",
                "key": "a",
                "item": {"value": {"n": 1}, "expiration": 0, "priority": 2}
            })
        );
    }

    #[test]
    fn test_delete_record_has_no_item() {
        let line = Record::delete("gone").encode_line().unwrap();
        assert_eq!(line, b"{\"action\":\"delete\",\"key\":\"gone\"}\n");
    }

    #[test]
    fn test_delete_record_tolerates_item() {
        let line = r#"{"action":"delete","key":"b","item":{"value":null,"expiration":0,"priority":0}}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record, Record::delete("b"));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let line = r#"{"action":"get","key":"b"}"#;
        assert!(serde_json::from_str::<Record>(line).is_err());
    }

    #[test]
    fn test_record_key() {
        assert_eq!(Record::delete("x").key(), "x");
        assert_eq!(Record::set("y", Entry::new(json!(0), 0, 0)).key(), "y");
    }
}
