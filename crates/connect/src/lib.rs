//! Ledgerlink Connect - bank gateway client and synchronization engine.
//!
//! This crate owns the reconciliation pipeline between the external bank
//! aggregator API and the canonical store:
//!
//! ```text
//! SyncOrchestrator
//!       │
//!       ├─► AccountSynchronizer (gateway accounts → account repository)
//!       └─► TransactionSynchronizer (per account)
//!               ├─► chunk_range (bounded date windows)
//!               ├─► RequestPacer (inter-request delay)
//!               └─► TransactionRepository (dedup by (account, external id))
//! ```
//!
//! The engine depends only on the repository traits from `ledgerlink-core`
//! and on the [`bank::BankApiClient`] trait; the HTTP adapter in
//! [`client`] is one implementation of that trait.

pub mod bank;
pub mod client;

pub use bank::{
    chunk_range, AccountSynchronizer, BankApiClient, DateChunk, NoOpProgressReporter,
    NoopPacer, RequestPacer, SyncOptions, SyncOrchestrator, SyncProgressReporter, SyncResult,
    TokioPacer, TransactionSynchronizer, WebhookIngestor,
};
pub use client::BankHttpClient;
