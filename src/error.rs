//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the engine, the transaction log and the HTTP layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache (or expired and not yet swept)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The transaction log could not be opened; the server cannot start
    #[error("Failed to open transaction log {}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A log line could not be parsed during replay
    #[error("Corrupt log record at line {line}: {source}")]
    CorruptRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded for the log
    #[error("Failed to encode log record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing a record to the log failed
    #[error("Failed to append to transaction log: {0}")]
    Append(#[from] io::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::LogOpen { .. }
            | CacheError::CorruptRecord { .. }
            | CacheError::Serialize(_)
            | CacheError::Append(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self {
            CacheError::NotFound(key) => format!("key not found: {}", key),
            CacheError::InvalidRequest(msg) => msg,
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
