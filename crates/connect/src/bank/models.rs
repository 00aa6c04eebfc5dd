//! Models representing bank data from the gateway API, plus the result DTOs
//! produced by the synchronizers and orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bank account as returned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BankAccount {
    /// Bank-assigned identifier, stable across syncs.
    pub id: String,

    /// Display name for the account as reported by the bank.
    pub name: Option<String>,

    /// Account type from the API (e.g. "checking", "credit_card").
    #[serde(rename = "type")]
    pub account_type: Option<String>,

    /// ISO currency code.
    pub currency: Option<String>,

    /// Current balance in integer minor units.
    #[serde(default)]
    pub balance: i64,

    /// Credit limit in integer minor units, for credit accounts.
    #[serde(default)]
    pub credit_limit: Option<i64>,

    #[serde(default)]
    pub iban: Option<String>,
}

impl BankAccount {
    /// Best-effort display name for logging and account creation.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// A posted transaction as returned by the gateway for one account window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransaction {
    /// Bank-assigned identifier, unique within the owning account.
    pub id: String,

    /// When the transaction was posted.
    pub posted_at: DateTime<Utc>,

    /// Signed amount in integer minor units.
    pub amount: i64,

    /// Counterparty / description text.
    #[serde(default)]
    pub description: Option<String>,

    /// ISO currency code; falls back to the account currency when absent.
    #[serde(default)]
    pub currency: Option<String>,
}

/// Parsed payload of a bank webhook: a single transaction event for one
/// account, ingested through the same dedup rule as bulk sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookTransactionData {
    pub account_external_id: String,
    pub transaction: BankTransaction,
}

/// Configuration for one orchestrator run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Delay between consecutive gateway requests, in milliseconds.
    pub request_delay_ms: u64,
    /// Inclusive lower bound for transaction fetches.
    pub earliest_sync_date: Option<DateTime<Utc>>,
    /// When set, `earliest_sync_date` overrides each account's stored
    /// checkpoint (manual backfill).
    pub force_from_date: bool,
}

/// Result of reconciling the gateway's account list.
#[derive(Debug, Clone, Default)]
pub struct AccountSyncSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub errors: Vec<String>,
}

/// Result of syncing transactions for a single account.
#[derive(Debug, Clone, Default)]
pub struct TransactionSyncSummary {
    pub new_transactions: usize,
    pub updated_transactions: usize,
    pub skipped_transactions: usize,
    pub errors: Vec<String>,
}

impl TransactionSyncSummary {
    /// A sync counts as successful when no chunk failed.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Account-level counts in the aggregate [`SyncResult`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSyncCounts {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Transaction-level counts in the aggregate [`SyncResult`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSyncCounts {
    pub synced_accounts: usize,
    pub total_accounts: usize,
    pub new_transactions: usize,
    pub updated_transactions: usize,
    pub skipped_transactions: usize,
}

/// Write-once aggregate produced by one orchestrator run.
///
/// Errors are ordered: account reconciliation errors first, then each
/// account's transaction errors in processing order. Counts reflect exactly
/// what was committed; partial results are never discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub accounts: AccountSyncCounts,
    pub transactions: TransactionSyncCounts,
    pub errors: Vec<String>,
}

impl SyncResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// One-line summary for logs and the CLI.
    pub fn summary(&self) -> String {
        format!(
            "{} accounts created, {} updated, {} unchanged; {}/{} accounts synced, {} new transactions ({} updated, {} skipped), {} errors",
            self.accounts.created,
            self.accounts.updated,
            self.accounts.unchanged,
            self.transactions.synced_accounts,
            self.transactions.total_accounts,
            self.transactions.new_transactions,
            self.transactions.updated_transactions,
            self.transactions.skipped_transactions,
            self.errors.len(),
        )
    }
}
