//! Inter-request pacing for gateway calls.
//!
//! The bank API enforces a single global rate limit, so the engine runs
//! sequentially and sleeps between requests. The strategy is injected so
//! tests run delay-free.

use async_trait::async_trait;
use std::time::Duration;

/// Strategy invoked between consecutive gateway requests.
#[async_trait]
pub trait RequestPacer: Send + Sync {
    /// Suspend the current task for the configured delay.
    async fn pause(&self, delay: Duration);
}

/// Real pacer backed by the tokio timer.
#[derive(Debug, Clone, Default)]
pub struct TokioPacer;

#[async_trait]
impl RequestPacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// A pacer that never sleeps, for deterministic tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct NoopPacer;

#[async_trait]
impl RequestPacer for NoopPacer {
    async fn pause(&self, _delay: Duration) {}
}
