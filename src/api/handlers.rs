//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Handlers only
//! validate input and translate between JSON and engine calls.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::cache::{Engine, StatsSnapshot};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{GetResponse, HealthResponse, KeyQuery, SetRequest, SetResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage engine
    pub engine: Arc<Engine>,
}

impl AppState {
    /// Creates a new AppState owning the given engine.
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Opens the engine described by `config`, replaying its log.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Engine::open(config)?))
    }
}

/// Handler for POST/PUT /set
///
/// Stores a value with optional TTL and priority. A body that is not a
/// valid `SetRequest` is answered with the usual `{"error": ...}` shape.
pub async fn set_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SetRequest>, JsonRejection>,
) -> Result<Json<SetResponse>> {
    let Json(req) =
        payload.map_err(|rejection| CacheError::InvalidRequest(rejection.body_text()))?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state
        .engine
        .set(req.key.clone(), req.value, req.ttl, req.priority)
        .await?;
    debug!(key = %req.key, ttl = req.ttl, "Key set");

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get?key=
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<GetResponse>> {
    let key = query.require().map_err(CacheError::InvalidRequest)?;
    let value = state.engine.get(&key).await?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /delete?key=
///
/// Deletes a key. Succeeds whether or not the key existed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<StatusCode> {
    let key = query.require().map_err(CacheError::InvalidRequest)?;
    state.engine.delete(key).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.engine.stats().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    fn test_state() -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        let config = Config::default().with_log_path(dir.path().join("tx.log"));
        let state = AppState::from_config(&config).unwrap();
        (dir, state)
    }

    fn key_query(key: &str) -> Query<KeyQuery> {
        Query(KeyQuery {
            key: Some(key.to_string()),
        })
    }

    fn set_request(key: &str, value: serde_json::Value) -> SetRequest {
        SetRequest {
            key: key.to_string(),
            value,
            ttl: 0,
            priority: 0,
        }
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let (_dir, state) = test_state();

        let req = set_request("test_key", json!({"deep": true}));
        let result = set_handler(State(state.clone()), Ok(Json(req))).await;
        assert!(result.is_ok());

        let response = get_handler(State(state.clone()), key_query("test_key"))
            .await
            .unwrap();
        assert_eq!(response.value, json!({"deep": true}));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let (_dir, state) = test_state();

        let result = get_handler(State(state), key_query("nonexistent")).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_missing_key_param() {
        let (_dir, state) = test_state();

        let result = get_handler(State(state), Query(KeyQuery::default())).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let (_dir, state) = test_state();

        set_handler(State(state.clone()), Ok(Json(set_request("to_delete", json!(1)))))
            .await
            .unwrap();

        let status = delete_handler(State(state.clone()), key_query("to_delete"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = get_handler(State(state), key_query("to_delete")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_absent_key_succeeds() {
        let (_dir, state) = test_state();

        let status = delete_handler(State(state), key_query("absent"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (_dir, state) = test_state();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let (_dir, state) = test_state();

        let req = set_request("", json!("value"));
        let result = set_handler(State(state.clone()), Ok(Json(req))).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert!(state.engine.is_empty().await);
    }
}
