use log::debug;
use std::sync::Arc;

use super::accounts_model::{Account, AccountUpdate, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::Result;

/// Service for managing accounts.
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        debug!(
            "Creating account '{}' ({:?})",
            new_account.name, new_account.source
        );
        self.repository.create(new_account).await
    }

    async fn update_account(&self, account_update: AccountUpdate) -> Result<Account> {
        account_update.validate()?;
        self.repository.update(account_update).await
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.repository.get_by_id(account_id)
    }

    fn get_account_by_external_id(&self, external_id: &str) -> Result<Option<Account>> {
        self.repository.get_by_external_id(external_id)
    }

    fn get_all_accounts(&self) -> Result<Vec<Account>> {
        self.repository.list(None)
    }

    fn get_active_accounts(&self) -> Result<Vec<Account>> {
        self.repository.list(Some(false))
    }
}
