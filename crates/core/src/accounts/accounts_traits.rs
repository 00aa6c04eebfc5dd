//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
///
/// Implementations of this trait handle the persistence of account data.
/// The trait is database-agnostic - storage-specific details are handled
/// by concrete implementations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new account.
    async fn create(&self, new_account: NewAccount) -> Result<Account>;

    /// Updates an existing account (full replace of mutable fields).
    async fn update(&self, account_update: AccountUpdate) -> Result<Account>;

    /// Advances the sync checkpoint for an account (partial update).
    ///
    /// This is the only write path for `last_sync_time`.
    async fn set_last_sync_time(
        &self,
        account_id: &str,
        last_sync_time: DateTime<Utc>,
    ) -> Result<()>;

    /// Retrieves an account by its internal ID.
    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    /// Retrieves an account by its bank-assigned external ID, if present.
    fn get_by_external_id(&self, external_id: &str) -> Result<Option<Account>>;

    /// Lists accounts, optionally filtering by archived status.
    fn list(&self, archived_filter: Option<bool>) -> Result<Vec<Account>>;
}

/// Trait defining the contract for Account service operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Creates a new account with business validation.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;

    /// Updates an existing account with business validation.
    async fn update_account(&self, account_update: AccountUpdate) -> Result<Account>;

    /// Retrieves an account by internal ID.
    fn get_account(&self, account_id: &str) -> Result<Account>;

    /// Retrieves an account by its external ID, if present.
    fn get_account_by_external_id(&self, external_id: &str) -> Result<Option<Account>>;

    /// Gets all accounts regardless of status.
    fn get_all_accounts(&self) -> Result<Vec<Account>>;

    /// Gets only non-archived accounts.
    fn get_active_accounts(&self) -> Result<Vec<Account>>;
}
