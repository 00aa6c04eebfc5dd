//! Bank synchronization engine.

pub mod account_sync;
pub mod chunker;
pub mod models;
pub mod orchestrator;
pub mod pacing;
pub mod progress;
pub mod traits;
pub mod transaction_sync;
pub mod webhook;

pub use account_sync::AccountSynchronizer;
pub use chunker::{chunk_range, DateChunk, GATEWAY_MAX_WINDOW_DAYS, SYNC_CHUNK_SPAN_DAYS};
pub use models::{
    AccountSyncSummary, BankAccount, BankTransaction, SyncOptions, SyncResult,
    TransactionSyncSummary, WebhookTransactionData,
};
pub use orchestrator::SyncOrchestrator;
pub use pacing::{NoopPacer, RequestPacer, TokioPacer};
pub use progress::{NoOpProgressReporter, SyncProgressPayload, SyncProgressReporter, SyncStatus};
pub use traits::BankApiClient;
pub use transaction_sync::TransactionSynchronizer;
pub use webhook::{WebhookIngestOutcome, WebhookIngestor};

#[cfg(test)]
pub(crate) mod support;
