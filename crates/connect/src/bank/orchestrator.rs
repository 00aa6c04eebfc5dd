//! Centralized bank sync orchestrator.

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use super::account_sync::AccountSynchronizer;
use super::models::{AccountSyncCounts, SyncOptions, SyncResult, TransactionSyncCounts};
use super::pacing::RequestPacer;
use super::progress::{SyncProgressPayload, SyncProgressReporter, SyncStatus};
use super::traits::BankApiClient;
use super::transaction_sync::TransactionSynchronizer;
use ledgerlink_core::accounts::{Account, AccountRepositoryTrait};
use ledgerlink_core::errors::Result;
use ledgerlink_core::transactions::TransactionRepositoryTrait;

/// Orchestrates a full bank data synchronization.
///
/// Accounts are reconciled first (transaction sync needs current account
/// records), then transactions are synced per account, strictly in
/// sequence: the shared gateway rate limit makes fan-out counterproductive,
/// so correctness comes from sequential execution plus the injected pacer.
///
/// The orchestrator performs no retries. Re-running after a failure is safe
/// because both reconciliation paths upsert by external id and the
/// transaction checkpoint never advances past a failed window.
pub struct SyncOrchestrator<P: SyncProgressReporter> {
    accounts: Arc<dyn AccountRepositoryTrait>,
    account_sync: AccountSynchronizer,
    transaction_sync: TransactionSynchronizer,
    pacer: Arc<dyn RequestPacer>,
    progress_reporter: Arc<P>,
}

impl<P: SyncProgressReporter> SyncOrchestrator<P> {
    pub fn new(
        api_client: Arc<dyn BankApiClient>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
        pacer: Arc<dyn RequestPacer>,
        progress_reporter: Arc<P>,
    ) -> Self {
        let account_sync = AccountSynchronizer::new(api_client.clone(), accounts.clone());
        let transaction_sync = TransactionSynchronizer::new(
            api_client,
            accounts.clone(),
            transactions,
            pacer.clone(),
        );
        Self {
            accounts,
            account_sync,
            transaction_sync,
            pacer,
            progress_reporter,
        }
    }

    /// Performs a full sync: accounts, then transactions per account.
    ///
    /// Always returns a `SyncResult` when the configuration is valid, even
    /// if every account failed; the caller decides exit status from the
    /// error list.
    pub async fn execute(&self, options: &SyncOptions) -> Result<SyncResult> {
        self.execute_at(options, Utc::now()).await
    }

    /// Deterministic entry point; `now` bounds every account's sync range.
    pub async fn execute_at(
        &self,
        options: &SyncOptions,
        now: DateTime<Utc>,
    ) -> Result<SyncResult> {
        info!("Starting bank data sync...");
        self.progress_reporter.report_sync_start();

        let result = self.execute_internal(options, now).await;

        match &result {
            Ok(sync_result) => {
                self.progress_reporter.report_sync_complete(sync_result);
            }
            Err(err) => {
                let failed = SyncResult {
                    errors: vec![err.to_string()],
                    ..Default::default()
                };
                self.progress_reporter.report_sync_complete(&failed);
            }
        }

        result
    }

    async fn execute_internal(
        &self,
        options: &SyncOptions,
        now: DateTime<Utc>,
    ) -> Result<SyncResult> {
        let mut errors: Vec<String> = Vec::new();

        // Step 1: reconcile accounts. A wholesale gateway failure here is
        // recorded and the run continues against the stored account set, so
        // partial progress stays visible.
        let account_counts = match self.account_sync.execute().await {
            Ok(summary) => {
                errors.extend(summary.errors.iter().cloned());
                AccountSyncCounts {
                    created: summary.created,
                    updated: summary.updated,
                    unchanged: summary.unchanged,
                }
            }
            Err(err) => {
                warn!("Account sync failed: {err}");
                errors.push(format!("account sync: {err}"));
                AccountSyncCounts::default()
            }
        };

        // Step 2: transactions for every non-archived bank account, in the
        // repository's natural order.
        let candidates: Vec<Account> = self
            .accounts
            .list(Some(false))?
            .into_iter()
            .filter(Account::is_syncable)
            .collect();

        let mut transaction_counts = TransactionSyncCounts {
            total_accounts: candidates.len(),
            ..Default::default()
        };

        let delay = StdDuration::from_millis(options.request_delay_ms);

        for (idx, account) in candidates.iter().enumerate() {
            if idx > 0 {
                self.pacer.pause(delay).await;
            }

            self.progress_reporter.report_progress(SyncProgressPayload::new(
                &account.id,
                &account.name,
                SyncStatus::Syncing,
            ));

            let summary = self.transaction_sync.execute_at(account, options, now).await?;

            let status = if summary.is_success() {
                transaction_counts.synced_accounts += 1;
                SyncStatus::Complete
            } else {
                SyncStatus::Failed
            };
            self.progress_reporter.report_progress(
                SyncProgressPayload::new(&account.id, &account.name, status)
                    .with_transactions_fetched(
                        summary.new_transactions
                            + summary.updated_transactions
                            + summary.skipped_transactions,
                    ),
            );

            transaction_counts.new_transactions += summary.new_transactions;
            transaction_counts.updated_transactions += summary.updated_transactions;
            transaction_counts.skipped_transactions += summary.skipped_transactions;
            errors.extend(summary.errors);
        }

        let result = SyncResult {
            accounts: account_counts,
            transactions: transaction_counts,
            errors,
        };

        info!("Sync completed: {}", result.summary());
        Ok(result)
    }
}
