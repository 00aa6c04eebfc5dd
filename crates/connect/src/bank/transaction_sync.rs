//! Per-account transaction synchronization.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use super::chunker::{chunk_range, DateChunk, SYNC_CHUNK_SPAN_DAYS};
use super::models::{SyncOptions, TransactionSyncSummary};
use super::pacing::RequestPacer;
use super::traits::BankApiClient;
use ledgerlink_core::accounts::{Account, AccountRepositoryTrait};
use ledgerlink_core::errors::Result;
use ledgerlink_core::transactions::{
    NewTransaction, TransactionRepositoryTrait, TransactionUpdate,
};

/// Fallback lookback for accounts with no checkpoint and no explicit start:
/// a fresh account never triggers an unbounded history fetch.
pub const DEFAULT_SYNC_LOOKBACK_DAYS: i64 = 90;

/// Walks an account's unsynced date range in bounded chunks and reconciles
/// each fetched transaction against the repository.
///
/// Chunks are processed oldest first, and the account checkpoint
/// (`last_sync_time`) is persisted immediately after every fully completed
/// chunk, so an interrupted run loses at most the in-flight chunk. A chunk
/// failure abandons the rest of the account's range: advancing past it
/// would silently skip unsynced history.
pub struct TransactionSynchronizer {
    api_client: Arc<dyn BankApiClient>,
    accounts: Arc<dyn AccountRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
    pacer: Arc<dyn RequestPacer>,
}

impl TransactionSynchronizer {
    pub fn new(
        api_client: Arc<dyn BankApiClient>,
        accounts: Arc<dyn AccountRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
        pacer: Arc<dyn RequestPacer>,
    ) -> Self {
        Self {
            api_client,
            accounts,
            transactions,
            pacer,
        }
    }

    /// Syncs an account's transactions up to the current instant.
    pub async fn execute(
        &self,
        account: &Account,
        options: &SyncOptions,
    ) -> Result<TransactionSyncSummary> {
        self.execute_at(account, options, Utc::now()).await
    }

    /// Deterministic entry point: `now` is the upper bound of the sync
    /// range and the reference point for the lookback fallback.
    ///
    /// Chunk- and account-scoped failures land in the summary's error list;
    /// an `Err` here only signals a configuration problem detected before
    /// any gateway call.
    pub async fn execute_at(
        &self,
        account: &Account,
        options: &SyncOptions,
        now: DateTime<Utc>,
    ) -> Result<TransactionSyncSummary> {
        let mut summary = TransactionSyncSummary::default();

        let Some(external_id) = account.external_id.as_deref() else {
            summary
                .errors
                .push(format!("account {}: no external id, cannot sync", account.id));
            return Ok(summary);
        };

        let start = Self::effective_start(account, options, now);
        let chunks = chunk_range(start, now, Duration::days(SYNC_CHUNK_SPAN_DAYS))?;

        if chunks.is_empty() {
            debug!("Account {external_id}: nothing to sync ({start} >= {now})");
            return Ok(summary);
        }

        info!(
            "Syncing account {} in {} window(s): {} -> {}",
            external_id,
            chunks.len(),
            start.date_naive(),
            now.date_naive()
        );

        let delay = StdDuration::from_millis(options.request_delay_ms);

        for (idx, chunk) in chunks.iter().enumerate() {
            if idx > 0 {
                self.pacer.pause(delay).await;
            }

            match self.sync_chunk(account, external_id, chunk).await {
                Ok((new, updated, skipped)) => {
                    summary.new_transactions += new;
                    summary.updated_transactions += updated;
                    summary.skipped_transactions += skipped;

                    // Advance the checkpoint now, not at end of run: a crash
                    // after this point loses only the in-flight chunk.
                    if let Err(err) =
                        self.accounts.set_last_sync_time(&account.id, chunk.to).await
                    {
                        warn!(
                            "Account {external_id}: checkpoint advance failed after window {} -> {}: {err}",
                            chunk.from.date_naive(),
                            chunk.to.date_naive()
                        );
                        summary.errors.push(format!(
                            "account {}: window {} -> {}: failed to advance checkpoint: {}",
                            external_id,
                            chunk.from.date_naive(),
                            chunk.to.date_naive(),
                            err
                        ));
                        break;
                    }
                }
                Err(err) => {
                    summary.errors.push(format!(
                        "account {}: window {} -> {}: {}",
                        external_id,
                        chunk.from.date_naive(),
                        chunk.to.date_naive(),
                        err
                    ));
                    break;
                }
            }
        }

        info!(
            "Account {}: {} new, {} updated, {} skipped, {} errors",
            external_id,
            summary.new_transactions,
            summary.updated_transactions,
            summary.skipped_transactions,
            summary.errors.len()
        );

        Ok(summary)
    }

    /// Computes the effective window start for an account.
    ///
    /// Resume policy: `max(checkpoint, earliest_sync_date)`, unless a
    /// forced backfill overrides the checkpoint with the explicit date.
    pub fn effective_start(
        account: &Account,
        options: &SyncOptions,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        if options.force_from_date {
            if let Some(earliest) = options.earliest_sync_date {
                return earliest;
            }
        }

        match (account.last_sync_time, options.earliest_sync_date) {
            (Some(checkpoint), Some(earliest)) => checkpoint.max(earliest),
            (Some(checkpoint), None) => checkpoint,
            (None, Some(earliest)) => earliest,
            (None, None) => now - Duration::days(DEFAULT_SYNC_LOOKBACK_DAYS),
        }
    }

    /// Fetches one window and reconciles every record in it.
    ///
    /// Returns `(new, updated, skipped)` counts. Any gateway or persistence
    /// failure aborts the chunk so the checkpoint is withheld.
    async fn sync_chunk(
        &self,
        account: &Account,
        external_id: &str,
        chunk: &DateChunk,
    ) -> Result<(usize, usize, usize)> {
        let fetched = self
            .api_client
            .list_transactions(external_id, chunk.from, chunk.to)
            .await?;

        debug!(
            "Account {external_id}: fetched {} transactions for {} -> {}",
            fetched.len(),
            chunk.from.date_naive(),
            chunk.to.date_naive()
        );

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut to_insert: Vec<NewTransaction> = Vec::new();
        let mut updated = 0;
        let mut skipped = 0;

        for bank_tx in fetched {
            // Gateways occasionally repeat a record within one response.
            if !seen_ids.insert(bank_tx.id.clone()) {
                continue;
            }

            let incoming = NewTransaction {
                account_id: account.id.clone(),
                external_id: bank_tx.id,
                posted_at: bank_tx.posted_at,
                amount: bank_tx.amount,
                description: bank_tx.description.unwrap_or_default(),
                currency: bank_tx
                    .currency
                    .unwrap_or_else(|| account.currency.clone()),
                is_raw: true,
            };

            match self
                .transactions
                .get_by_external_id(&account.id, &incoming.external_id)?
            {
                None => to_insert.push(incoming),
                Some(existing) if existing.content_matches(&incoming) => skipped += 1,
                Some(existing) => {
                    self.transactions
                        .update(TransactionUpdate::amending(&existing, &incoming))
                        .await?;
                    updated += 1;
                }
            }
        }

        let inserted = if to_insert.is_empty() {
            0
        } else {
            self.transactions.insert_many(to_insert).await?
        };

        Ok((inserted, updated, skipped))
    }
}
