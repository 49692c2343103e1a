//! Timer-driven sweep that purges session records past their soft expiry.
//!
//! The task is owned by the process lifecycle: `main` spawns it next to the
//! server and tests can spawn and stop it deterministically. It only ever
//! deletes records already past `expires_at`, so it is safe to run against
//! live validations; the gate tolerates a record vanishing after its expiry
//! check.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct SessionCleanupTask {
    handle: JoinHandle<()>,
}

impl SessionCleanupTask {
    /// Starts the periodic sweep. The first tick fires immediately, so every
    /// boot begins with a sweep.
    pub fn spawn(pool: PgPool, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                sweep_expired_sessions(&pool).await;
            }
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the sweep. Requests in flight are unaffected; expired records
    /// simply wait for the next process to purge them.
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

/// One sweep pass. Failures are logged, never swallowed silently, and the
/// sweep retries on the next tick.
pub async fn sweep_expired_sessions(pool: &PgPool) {
    match crate::repositories::session::delete_expired_before(pool, Utc::now()).await {
        Ok(0) => tracing::debug!("Session sweep: nothing to purge"),
        Ok(purged) => tracing::info!(purged, "Session sweep purged expired records"),
        Err(err) => {
            tracing::warn!(error = ?err, "Session sweep failed; retrying on next tick")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn task_runs_until_shutdown() {
        // A lazy pool never connects; sweeps fail and are retried, which is
        // exactly the error path the task must survive.
        let pool = PgPool::connect_lazy("postgres://localhost/unreachable").expect("lazy pool");
        let task = SessionCleanupTask::spawn(pool, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());

        task.shutdown();
    }
}
