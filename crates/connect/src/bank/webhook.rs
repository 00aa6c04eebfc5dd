//! Webhook ingestion: the single-record counterpart to bulk sync.
//!
//! The bank pushes individual transaction events between scheduled runs.
//! Ingestion applies exactly the same `(account, external id)` dedup rule
//! as the transaction synchronizer, so a webhook delivery followed by a
//! bulk sync over the same window stays idempotent.

use log::{debug, info};
use std::sync::Arc;

use super::traits::BankApiClient;
use ledgerlink_core::accounts::AccountRepositoryTrait;
use ledgerlink_core::errors::{Error, Result, ValidationError};
use ledgerlink_core::transactions::{
    NewTransaction, TransactionRepositoryTrait, TransactionUpdate,
};

/// Outcome of ingesting one webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookIngestOutcome {
    /// The transaction was not known and has been inserted.
    Created,
    /// The transaction existed with different content and was amended.
    Updated,
    /// The transaction existed with identical content; nothing written.
    Skipped,
}

/// Registers the webhook endpoint and ingests pushed transaction events.
pub struct WebhookIngestor {
    api_client: Arc<dyn BankApiClient>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
}

impl WebhookIngestor {
    pub fn new(
        api_client: Arc<dyn BankApiClient>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        Self {
            api_client,
            accounts,
            transactions,
        }
    }

    /// Registers `url` with the gateway for transaction push notifications.
    pub async fn register(&self, url: &str) -> Result<()> {
        info!("Registering webhook: {url}");
        self.api_client.register_webhook(url).await
    }

    /// Parses a raw webhook body and upserts the single transaction it
    /// carries. Events for unknown or non-syncable accounts are rejected;
    /// the bank keeps redelivering until the account exists locally.
    pub async fn ingest(&self, raw: &[u8]) -> Result<WebhookIngestOutcome> {
        let data = self.api_client.parse_webhook_payload(raw)?;

        let account = self
            .accounts
            .get_by_external_id(&data.account_external_id)?
            .ok_or_else(|| {
                Error::Validation(ValidationError::InvalidInput(format!(
                    "webhook for unknown account {}",
                    data.account_external_id
                )))
            })?;

        if !account.is_syncable() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "webhook for non-syncable account {}",
                data.account_external_id
            ))));
        }

        let bank_tx = data.transaction;
        let incoming = NewTransaction {
            account_id: account.id.clone(),
            external_id: bank_tx.id,
            posted_at: bank_tx.posted_at,
            amount: bank_tx.amount,
            description: bank_tx.description.unwrap_or_default(),
            currency: bank_tx.currency.unwrap_or_else(|| account.currency.clone()),
            is_raw: true,
        };

        match self
            .transactions
            .get_by_external_id(&account.id, &incoming.external_id)?
        {
            None => {
                self.transactions.insert_many(vec![incoming]).await?;
                debug!("Webhook: inserted new transaction");
                Ok(WebhookIngestOutcome::Created)
            }
            Some(existing) if existing.content_matches(&incoming) => {
                debug!("Webhook: transaction already known, skipping");
                Ok(WebhookIngestOutcome::Skipped)
            }
            Some(existing) => {
                self.transactions
                    .update(TransactionUpdate::amending(&existing, &incoming))
                    .await?;
                debug!("Webhook: amended existing transaction");
                Ok(WebhookIngestOutcome::Updated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::models::{BankTransaction, WebhookTransactionData};
    use crate::bank::support::{
        bank_sourced_account, InMemoryAccountRepository, InMemoryTransactionRepository,
        MockBankApiClient,
    };
    use chrono::{TimeZone, Utc};

    fn payload(account: &str, tx_id: &str, amount: i64) -> Vec<u8> {
        serde_json::to_vec(&WebhookTransactionData {
            account_external_id: account.to_string(),
            transaction: BankTransaction {
                id: tx_id.to_string(),
                posted_at: Utc.with_ymd_and_hms(2024, 2, 20, 10, 0, 0).unwrap(),
                amount,
                description: Some("PUSHED".to_string()),
                currency: Some("EUR".to_string()),
            },
        })
        .unwrap()
    }

    fn fixture() -> (
        Arc<InMemoryAccountRepository>,
        Arc<InMemoryTransactionRepository>,
        WebhookIngestor,
    ) {
        let api = Arc::new(MockBankApiClient::default());
        let accounts = Arc::new(InMemoryAccountRepository::default());
        let transactions = Arc::new(InMemoryTransactionRepository::default());
        let ingestor = WebhookIngestor::new(api, accounts.clone(), transactions.clone());
        (accounts, transactions, ingestor)
    }

    #[tokio::test]
    async fn test_ingest_creates_then_skips() {
        let (accounts, transactions, ingestor) = fixture();
        let account = accounts.seed(bank_sourced_account("ext-1", None));

        let outcome = ingestor.ingest(&payload("ext-1", "tx-1", -5_00)).await.unwrap();
        assert_eq!(outcome, WebhookIngestOutcome::Created);

        let outcome = ingestor.ingest(&payload("ext-1", "tx-1", -5_00)).await.unwrap();
        assert_eq!(outcome, WebhookIngestOutcome::Skipped);

        assert_eq!(transactions.count_for_account(&account.id), 1);
    }

    #[tokio::test]
    async fn test_ingest_amends_changed_content() {
        let (_accounts, _transactions, ingestor) = {
            let (a, t, i) = fixture();
            a.seed(bank_sourced_account("ext-1", None));
            (a, t, i)
        };

        ingestor.ingest(&payload("ext-1", "tx-1", -5_00)).await.unwrap();
        let outcome = ingestor.ingest(&payload("ext-1", "tx-1", -7_50)).await.unwrap();
        assert_eq!(outcome, WebhookIngestOutcome::Updated);
    }

    #[tokio::test]
    async fn test_ingest_rejects_unknown_account() {
        let (_accounts, _transactions, ingestor) = fixture();
        let err = ingestor.ingest(&payload("ext-missing", "tx-1", -5_00)).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_ingest_rejects_archived_account() {
        let (accounts, _transactions, ingestor) = fixture();
        let mut archived = bank_sourced_account("ext-1", None);
        archived.is_archived = true;
        accounts.seed(archived);

        assert!(ingestor.ingest(&payload("ext-1", "tx-1", -5_00)).await.is_err());
    }
}
