//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

/// Request body for the SET operation (POST/PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: TTL in seconds, zero or less for no expiration
/// - `priority`: Stored alongside the entry
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    #[serde(default)]
    pub key: String,
    /// The value to store
    #[serde(default)]
    pub value: Value,
    /// TTL in seconds
    #[serde(default)]
    pub ttl: i64,
    /// Entry priority
    #[serde(default)]
    pub priority: i64,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("missing key".to_string());
        }
        None
    }
}

/// Query string for GET /get and DELETE /delete
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

impl KeyQuery {
    /// Returns the key, or an error message if it is missing or empty.
    pub fn require(self) -> Result<String, String> {
        match self.key {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err("missing key".to_string()),
        }
    }
}
