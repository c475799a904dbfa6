//! Janitor Task
//!
//! Background task that periodically sweeps expired entries out of the
//! engine, logging a delete record for each.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::Engine;

/// Handle on a running janitor. Dropping it also stops the task.
#[derive(Debug)]
pub struct JanitorHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl JanitorHandle {
    /// Signals the janitor to stop and waits for it to exit.
    ///
    /// The signal is observed between sweeps; a sweep already in progress
    /// runs to completion.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(err) = self.task.await {
            if !err.is_cancelled() {
                error!(error = %err, "Janitor task panicked");
            }
        }
    }
}

/// Spawns the janitor, sweeping `engine` once every `interval`.
///
/// # Example
/// ```ignore
/// let engine = Arc::new(Engine::open(&config)?);
/// let janitor = spawn_janitor(engine.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// janitor.shutdown().await;
/// ```
pub fn spawn_janitor(engine: Arc<Engine>, interval: Duration) -> JanitorHandle {
    let (stop, mut stopped) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Starting janitor with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = stopped.changed() => {
                    if changed.is_err() || *stopped.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let removed = engine.sweep_expired().await;

            if removed > 0 {
                info!("Janitor: removed {} expired entries", removed);
            } else {
                debug!("Janitor: no expired entries found");
            }
        }

        info!("Janitor stopped");
    });

    JanitorHandle { stop, task }
}
