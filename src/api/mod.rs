//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `POST|PUT /set` - Store a value with optional TTL and priority
//! - `GET /get?key=` - Retrieve a value by key
//! - `DELETE /delete?key=` - Delete a key
//! - `GET /stats` - Engine statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
