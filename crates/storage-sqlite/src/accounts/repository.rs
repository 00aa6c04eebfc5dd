//! Repository for account persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::accounts;

use super::model::{account_type_to_db, AccountDB};
use ledgerlink_core::accounts::{
    Account, AccountRepositoryTrait, AccountUpdate, NewAccount,
};
use ledgerlink_core::errors::Result;

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        self.writer
            .exec(move |conn| {
                let mut account_db: AccountDB = new_account.into();
                if account_db.id.is_empty() {
                    account_db.id = uuid::Uuid::new_v4().to_string();
                }

                diesel::insert_into(accounts::table)
                    .values(&account_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(account_db.into())
            })
            .await
    }

    async fn update(&self, account_update: AccountUpdate) -> Result<Account> {
        account_update.validate()?;

        self.writer
            .exec(move |conn| {
                let account_id = account_update.id.clone().unwrap_or_default();

                // Identity, source, and the sync checkpoint are not part of
                // the update surface.
                diesel::update(accounts::table.find(&account_id))
                    .set((
                        accounts::name.eq(&account_update.name),
                        accounts::external_name.eq(&account_update.external_name),
                        accounts::account_type
                            .eq(account_type_to_db(account_update.account_type)),
                        accounts::currency.eq(&account_update.currency),
                        accounts::balance.eq(account_update.balance),
                        accounts::credit_limit.eq(account_update.credit_limit),
                        accounts::iban.eq(&account_update.iban),
                        accounts::is_archived.eq(account_update.is_archived),
                        accounts::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let updated = accounts::table
                    .select(AccountDB::as_select())
                    .find(&account_id)
                    .first::<AccountDB>(conn)
                    .map_err(StorageError::from)?;

                Ok(updated.into())
            })
            .await
    }

    async fn set_last_sync_time(
        &self,
        account_id: &str,
        last_sync_time: DateTime<Utc>,
    ) -> Result<()> {
        let account_id = account_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(accounts::table.find(&account_id))
                    .set((
                        accounts::last_sync_time.eq(Some(last_sync_time.naive_utc())),
                        accounts::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;

        let account = accounts::table
            .select(AccountDB::as_select())
            .find(account_id)
            .first::<AccountDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(account.into())
    }

    fn get_by_external_id(&self, external_id: &str) -> Result<Option<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let account = accounts::table
            .select(AccountDB::as_select())
            .filter(accounts::external_id.eq(external_id))
            .first::<AccountDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(account.map(Into::into))
    }

    fn list(&self, archived_filter: Option<bool>) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = accounts::table.into_boxed();

        if let Some(archived) = archived_filter {
            query = query.filter(accounts::is_archived.eq(archived));
        }

        let results = query
            .select(AccountDB::as_select())
            .order(accounts::created_at.asc())
            .load::<AccountDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(Account::from).collect())
    }
}
