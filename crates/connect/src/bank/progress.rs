//! Progress reporting for bank sync operations.
//!
//! The engine never reads process-wide logging configuration; callers
//! inject a reporter (CLI progress line, SSE stream, or nothing at all).

use serde::{Deserialize, Serialize};

use super::models::SyncResult;

/// Status of a sync operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Sync is starting
    Starting,
    /// Sync is in progress
    Syncing,
    /// Sync completed successfully
    Complete,
    /// Sync failed
    Failed,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Starting => write!(f, "starting"),
            SyncStatus::Syncing => write!(f, "syncing"),
            SyncStatus::Complete => write!(f, "complete"),
            SyncStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Payload for sync progress events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgressPayload {
    /// The local account ID being synced
    pub account_id: String,
    /// Human-readable account name
    pub account_name: String,
    /// Current sync status
    pub status: String,
    /// Chunks completed so far for this account
    pub chunks_completed: usize,
    /// Transactions fetched so far for this account
    pub transactions_fetched: usize,
    /// Optional status message
    pub message: Option<String>,
}

impl SyncProgressPayload {
    /// Create a new progress payload.
    pub fn new(
        account_id: impl Into<String>,
        account_name: impl Into<String>,
        status: SyncStatus,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            account_name: account_name.into(),
            status: status.to_string(),
            chunks_completed: 0,
            transactions_fetched: 0,
            message: None,
        }
    }

    /// Set the completed chunk count.
    pub fn with_chunks_completed(mut self, chunks: usize) -> Self {
        self.chunks_completed = chunks;
        self
    }

    /// Set the fetched transaction count.
    pub fn with_transactions_fetched(mut self, count: usize) -> Self {
        self.transactions_fetched = count;
        self
    }

    /// Set an optional message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Trait for reporting sync progress.
pub trait SyncProgressReporter: Send + Sync {
    /// Report progress for an account sync.
    fn report_progress(&self, payload: SyncProgressPayload);

    /// Report that a full sync run is starting.
    fn report_sync_start(&self);

    /// Report that a full sync run completed (successfully or with errors).
    fn report_sync_complete(&self, result: &SyncResult);
}

/// A no-op progress reporter for contexts where progress reporting is not needed.
#[derive(Debug, Clone, Default)]
pub struct NoOpProgressReporter;

impl SyncProgressReporter for NoOpProgressReporter {
    fn report_progress(&self, _payload: SyncProgressPayload) {}

    fn report_sync_start(&self) {}

    fn report_sync_complete(&self, _result: &SyncResult) {}
}
