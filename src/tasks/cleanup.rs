//! Stale Purge Task
//!
//! Background task that periodically removes expired entries from every
//! domain cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::orchestration::CacheOrchestrator;

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep walks every domain cache and removes entries
/// whose TTL has elapsed, so memory is reclaimed even for keys that are
/// never read again.
///
/// # Arguments
/// * `orchestrator` - Shared reference to the cache orchestration layer
/// * `purge_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_purge_task(
    orchestrator: Arc<CacheOrchestrator>,
    purge_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(purge_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting stale purge task with interval of {} seconds",
            purge_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let removed = orchestrator.purge_stale().await;
            let total: usize = removed.values().sum();

            // Log sweep statistics
            if total > 0 {
                for (domain, count) in &removed {
                    if *count > 0 {
                        debug!("Stale purge: {} removed {} entries", domain, count);
                    }
                }
                info!("Stale purge: removed {} expired entries", total);
            } else {
                debug!("Stale purge: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::UserInfo;

    fn test_orchestrator() -> Arc<CacheOrchestrator> {
        Arc::new(CacheOrchestrator::new(&Config::default()).unwrap())
    }

    fn user(id: &str) -> UserInfo {
        UserInfo {
            id: id.to_string(),
            name: "user".to_string(),
            real_name: None,
            is_bot: false,
        }
    }

    #[tokio::test]
    async fn test_purge_task_removes_expired_entries() {
        let orchestrator = test_orchestrator();

        orchestrator
            .users
            .set(
                "users:info:expiring",
                user("U1"),
                Some(Duration::from_millis(50)),
            )
            .await;

        let handle = spawn_purge_task(orchestrator.clone(), 1);

        // Wait for the entry to expire and the sweep to run
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(!orchestrator.users.has("users:info:expiring").await);

        handle.abort();
    }

    #[tokio::test]
    async fn test_purge_task_preserves_valid_entries() {
        let orchestrator = test_orchestrator();

        orchestrator
            .users
            .set(
                "users:info:stable",
                user("U2"),
                Some(Duration::from_secs(3600)),
            )
            .await;

        let handle = spawn_purge_task(orchestrator.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(orchestrator.users.has("users:info:stable").await);

        handle.abort();
    }

    #[tokio::test]
    async fn test_purge_task_can_be_aborted() {
        let handle = spawn_purge_task(test_orchestrator(), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
