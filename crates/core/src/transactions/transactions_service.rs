use std::sync::Arc;

use super::transactions_model::Transaction;
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::errors::Result;

/// Read-side service over the transaction repository.
///
/// Writes go through the synchronizer and webhook ingestion paths, which
/// own the dedup rule; this service only exposes lookups.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
}

impl TransactionService {
    pub fn new(repository: Arc<dyn TransactionRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transaction(
        &self,
        account_id: &str,
        external_id: &str,
    ) -> Result<Option<Transaction>> {
        self.repository.get_by_external_id(account_id, external_id)
    }

    fn get_account_transactions(&self, account_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list_for_account(account_id)
    }

    fn get_uncategorized_transactions(&self) -> Result<Vec<Transaction>> {
        self.repository.list_uncategorized()
    }
}
