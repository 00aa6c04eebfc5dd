//! Fixed-interval sync loop for `--watch` mode.

use tokio::time::{interval, Duration};
use tracing::{info, warn};

use ledgerlink_connect::bank::{SyncOptions, SyncOrchestrator, SyncProgressReporter};

/// Runs the orchestrator on a fixed interval, forever.
///
/// The first sync fires immediately; afterwards one run per interval.
/// Failures are logged and the loop keeps going - a transient gateway
/// outage should not kill a long-running watcher.
pub async fn run_sync_loop<P: SyncProgressReporter>(
    orchestrator: &SyncOrchestrator<P>,
    options: &SyncOptions,
    interval_secs: u64,
) {
    info!("watch mode: syncing every {interval_secs}s");
    let mut sync_interval = interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        sync_interval.tick().await;

        match orchestrator.execute(options).await {
            Ok(result) => {
                if result.is_success() {
                    info!("scheduled sync completed: {}", result.summary());
                } else {
                    for error in &result.errors {
                        warn!("{error}");
                    }
                    warn!(
                        "scheduled sync completed with {} errors",
                        result.errors.len()
                    );
                }
            }
            Err(err) => {
                warn!("scheduled sync failed: {err}");
            }
        }
    }
}
