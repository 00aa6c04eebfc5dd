//! Transaction repository and service traits.

use async_trait::async_trait;

use super::transactions_model::{NewTransaction, Transaction, TransactionUpdate};
use crate::errors::Result;

/// Trait defining the contract for Transaction repository operations.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Looks up a transaction by its dedup key `(account, external id)`.
    fn get_by_external_id(
        &self,
        account_id: &str,
        external_id: &str,
    ) -> Result<Option<Transaction>>;

    /// Lists all transactions for an account, oldest first.
    fn list_for_account(&self, account_id: &str) -> Result<Vec<Transaction>>;

    /// Lists transactions still awaiting categorization, for the external
    /// categorization subsystem.
    fn list_uncategorized(&self) -> Result<Vec<Transaction>>;

    /// Bulk-inserts new transactions. Returns the number inserted.
    async fn insert_many(&self, new_transactions: Vec<NewTransaction>) -> Result<usize>;

    /// Amends the bank-reported content of an existing transaction.
    async fn update(&self, update: TransactionUpdate) -> Result<Transaction>;
}

/// Trait defining the contract for Transaction service operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transaction(&self, account_id: &str, external_id: &str)
        -> Result<Option<Transaction>>;

    fn get_account_transactions(&self, account_id: &str) -> Result<Vec<Transaction>>;

    fn get_uncategorized_transactions(&self) -> Result<Vec<Transaction>>;
}
