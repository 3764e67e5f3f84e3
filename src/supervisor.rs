//! Background task supervision
//!
//! Every long-lived loop in the service runs under a supervisor: a panic
//! inside one iteration is caught at the task boundary, logged with a running
//! restart count, and the loop is relaunched after a bounded backoff. A
//! supervised task never takes the process down and never surfaces its
//! failure to a foreground caller.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Longest pause between restarts of a repeatedly panicking task
const MAX_RESTART_DELAY: Duration = Duration::from_secs(60);

/// Spawn a task that is restarted whenever it panics.
///
/// `task` is a factory: each (re)start gets a fresh future. A task that
/// returns normally is considered done and is not restarted.
pub fn spawn_supervised<F, Fut>(name: &'static str, task: F) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut restarts: u32 = 0;
        loop {
            let run = tokio::spawn(task());
            match run.await {
                Ok(()) => {
                    info!(task = name, "background task exited cleanly");
                    break;
                }
                Err(e) if e.is_panic() => {
                    restarts += 1;
                    let delay = restart_delay(restarts);
                    error!(
                        task = name,
                        restarts,
                        delay_secs = delay.as_secs(),
                        "background task panicked, restarting"
                    );
                    tokio::time::sleep(delay).await;
                }
                // Cancelled at shutdown
                Err(_) => break,
            }
        }
    })
}

fn restart_delay(restarts: u32) -> Duration {
    let secs = 1u64 << restarts.min(6);
    Duration::from_secs(secs).min(MAX_RESTART_DELAY)
}
