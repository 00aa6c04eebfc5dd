//! Traits defining the contract for bank gateway access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::{BankAccount, BankTransaction, WebhookTransactionData};
use ledgerlink_core::errors::Result;

/// Trait for fetching data from the bank aggregator API.
///
/// The sync engine depends only on this trait; the reqwest adapter in
/// `client` and the in-test mocks are interchangeable implementations.
/// All calls may fail with a transport error (`Error::Gateway`).
#[async_trait]
pub trait BankApiClient: Send + Sync {
    /// Fetch all accounts visible to the configured credentials.
    async fn list_accounts(&self) -> Result<Vec<BankAccount>>;

    /// Fetch transactions for one account in the window `[from, to)`.
    ///
    /// The gateway rejects or truncates windows wider than its limit, so
    /// callers chunk ranges via `chunk_range` before calling this.
    async fn list_transactions(
        &self,
        account_external_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BankTransaction>>;

    /// Register a webhook URL for transaction push notifications.
    async fn register_webhook(&self, url: &str) -> Result<()>;

    /// Parse a raw webhook body into a transaction event.
    fn parse_webhook_payload(&self, raw: &[u8]) -> Result<WebhookTransactionData>;
}
