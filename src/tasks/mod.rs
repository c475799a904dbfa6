//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Janitor: sweeps expired entries and logs their removal

mod janitor;

pub use janitor::{spawn_janitor, JanitorHandle};
