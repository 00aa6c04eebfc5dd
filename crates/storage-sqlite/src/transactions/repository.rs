//! Repository for transaction persistence.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::transactions;

use super::model::{TransactionDB, STATUS_PENDING};
use ledgerlink_core::errors::Result;
use ledgerlink_core::transactions::{
    NewTransaction, Transaction, TransactionRepositoryTrait, TransactionUpdate,
};

/// Repository for managing transaction data in the database
pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository instance
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_external_id(
        &self,
        account_id: &str,
        external_id: &str,
    ) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let transaction = transactions::table
            .select(TransactionDB::as_select())
            .filter(transactions::account_id.eq(account_id))
            .filter(transactions::external_id.eq(external_id))
            .first::<TransactionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(transaction.map(Into::into))
    }

    fn list_for_account(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let results = transactions::table
            .select(TransactionDB::as_select())
            .filter(transactions::account_id.eq(account_id))
            .order(transactions::posted_at.asc())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(Transaction::from).collect())
    }

    fn list_uncategorized(&self) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let results = transactions::table
            .select(TransactionDB::as_select())
            .filter(transactions::categorization_status.eq(STATUS_PENDING))
            .order(transactions::posted_at.asc())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(Transaction::from).collect())
    }

    async fn insert_many(&self, new_transactions: Vec<NewTransaction>) -> Result<usize> {
        if new_transactions.is_empty() {
            return Ok(0);
        }

        for new_tx in &new_transactions {
            new_tx.validate()?;
        }

        self.writer
            .exec(move |conn| {
                let rows: Vec<TransactionDB> = new_transactions
                    .into_iter()
                    .map(TransactionDB::from)
                    .collect();

                let inserted = diesel::insert_into(transactions::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(inserted)
            })
            .await
    }

    async fn update(&self, update: TransactionUpdate) -> Result<Transaction> {
        self.writer
            .exec(move |conn| {
                // Only the bank-amendable content fields; categorization is
                // owned by the categorization subsystem.
                diesel::update(transactions::table.find(&update.id))
                    .set((
                        transactions::posted_at.eq(update.posted_at.naive_utc()),
                        transactions::amount.eq(update.amount),
                        transactions::description.eq(&update.description),
                        transactions::currency.eq(&update.currency),
                        transactions::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let updated = transactions::table
                    .select(TransactionDB::as_select())
                    .find(&update.id)
                    .first::<TransactionDB>(conn)
                    .map_err(StorageError::from)?;

                Ok(updated.into())
            })
            .await
    }
}
