//! Account reconciliation against the gateway's account list.

use log::{debug, info};
use std::sync::Arc;

use super::models::{AccountSyncSummary, BankAccount};
use super::traits::BankApiClient;
use ledgerlink_core::accounts::{
    Account, AccountRepositoryTrait, AccountSource, AccountType, AccountUpdate, NewAccount,
};
use ledgerlink_core::errors::{Error, Result, ValidationError};

/// Classification of a single gateway account after reconciliation.
enum ReconcileOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Reconciles the gateway's account list into the account repository.
///
/// Each gateway account is classified as created, updated, or unchanged.
/// Unchanged accounts produce zero writes, so re-running against an
/// unmodified upstream is a no-op. Manual accounts are structurally out of
/// reach: they carry no external id, and reconciliation only ever looks up
/// by external id.
pub struct AccountSynchronizer {
    api_client: Arc<dyn BankApiClient>,
    accounts: Arc<dyn AccountRepositoryTrait>,
}

impl AccountSynchronizer {
    pub fn new(
        api_client: Arc<dyn BankApiClient>,
        accounts: Arc<dyn AccountRepositoryTrait>,
    ) -> Self {
        Self {
            api_client,
            accounts,
        }
    }

    /// Fetches all gateway accounts and reconciles each one.
    ///
    /// A failure on a single account is recorded with its external id and
    /// does not abort the remaining accounts. Only the initial gateway list
    /// call is fatal to this step.
    pub async fn execute(&self) -> Result<AccountSyncSummary> {
        info!("Fetching bank accounts...");
        let bank_accounts = self.api_client.list_accounts().await?;
        info!("Fetched {} bank accounts from gateway", bank_accounts.len());

        let mut summary = AccountSyncSummary::default();

        for bank_account in &bank_accounts {
            if bank_account.id.trim().is_empty() {
                summary
                    .errors
                    .push(format!(
                        "account '{}': missing external id",
                        bank_account.display_name()
                    ));
                continue;
            }

            match self.reconcile(bank_account).await {
                Ok(ReconcileOutcome::Created) => {
                    info!(
                        "Created account: {} ({})",
                        bank_account.display_name(),
                        bank_account.id
                    );
                    summary.created += 1;
                }
                Ok(ReconcileOutcome::Updated) => {
                    debug!(
                        "Updated account: {} ({})",
                        bank_account.display_name(),
                        bank_account.id
                    );
                    summary.updated += 1;
                }
                Ok(ReconcileOutcome::Unchanged) => {
                    debug!("Account unchanged: {}", bank_account.id);
                    summary.unchanged += 1;
                }
                Err(err) => {
                    summary
                        .errors
                        .push(format!("account {}: {}", bank_account.id, err));
                }
            }
        }

        info!(
            "Accounts synced: {} created, {} updated, {} unchanged, {} errors",
            summary.created,
            summary.updated,
            summary.unchanged,
            summary.errors.len()
        );

        Ok(summary)
    }

    async fn reconcile(&self, bank_account: &BankAccount) -> Result<ReconcileOutcome> {
        let existing = self.accounts.get_by_external_id(&bank_account.id)?;

        match existing {
            None => {
                let currency = bank_account
                    .currency
                    .clone()
                    .filter(|c| !c.trim().is_empty())
                    .ok_or_else(|| {
                        Error::Validation(ValidationError::MissingField("currency".to_string()))
                    })?;

                let new_account = NewAccount {
                    id: None,
                    external_id: Some(bank_account.id.clone()),
                    name: bank_account.display_name(),
                    external_name: bank_account.name.clone(),
                    account_type: AccountType::from_external(bank_account.account_type.as_deref()),
                    currency,
                    balance: bank_account.balance,
                    credit_limit: bank_account.credit_limit,
                    iban: bank_account.iban.clone(),
                    source: AccountSource::Bank,
                    is_archived: false,
                };

                self.accounts.create(new_account).await?;
                Ok(ReconcileOutcome::Created)
            }
            Some(existing) => {
                if Self::content_matches(&existing, bank_account) {
                    return Ok(ReconcileOutcome::Unchanged);
                }

                // Bank-reported fields changed; internal id, user name, and
                // the archived flag are preserved.
                let update = AccountUpdate::reconciling(
                    &existing,
                    bank_account.name.clone(),
                    bank_account.balance,
                    bank_account.credit_limit,
                    bank_account.iban.clone(),
                );
                self.accounts.update(update).await?;
                Ok(ReconcileOutcome::Updated)
            }
        }
    }

    /// Whether the stored account already reflects the gateway's view of
    /// the mutable fields.
    fn content_matches(existing: &Account, bank_account: &BankAccount) -> bool {
        existing.external_name == bank_account.name
            && existing.balance == bank_account.balance
            && existing.credit_limit == bank_account.credit_limit
            && existing.iban == bank_account.iban
    }
}
