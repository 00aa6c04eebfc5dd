//! In-memory test doubles for the sync engine.
//!
//! These implement the same traits as the real gateway client and the
//! sqlite repositories, so the synchronizers under test cannot tell the
//! difference.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use super::models::{BankAccount, BankTransaction, WebhookTransactionData};
use super::pacing::RequestPacer;
use super::traits::BankApiClient;
use ledgerlink_core::accounts::{
    Account, AccountRepositoryTrait, AccountSource, AccountType, AccountUpdate, NewAccount,
};
use ledgerlink_core::errors::{DatabaseError, Error, Result};
use ledgerlink_core::transactions::{
    CategorizationStatus, NewTransaction, Transaction, TransactionRepositoryTrait,
    TransactionUpdate,
};

/// Builds a bank-sourced account ready for transaction sync.
pub fn bank_sourced_account(external_id: &str, last_sync_time: Option<DateTime<Utc>>) -> Account {
    let now = Utc::now().naive_utc();
    Account {
        id: format!("acc-{external_id}"),
        external_id: Some(external_id.to_string()),
        name: format!("Account {external_id}"),
        external_name: Some(format!("Account {external_id}")),
        account_type: AccountType::Debit,
        currency: "EUR".to_string(),
        balance: 0,
        credit_limit: None,
        iban: None,
        source: AccountSource::Bank,
        is_archived: false,
        last_sync_time,
        created_at: now,
        updated_at: now,
    }
}

/// Scripted gateway: fixed account list, per-account transaction feeds,
/// call recording, and programmable failures.
#[derive(Default)]
pub struct MockBankApiClient {
    accounts: Mutex<Vec<BankAccount>>,
    transactions: Mutex<HashMap<String, Vec<BankTransaction>>>,
    transaction_calls: Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>)>>,
    fail_transaction_call: Mutex<Option<usize>>,
    fail_accounts: Mutex<bool>,
}

impl MockBankApiClient {
    pub fn set_accounts(&self, accounts: Vec<BankAccount>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub fn add_transactions(&self, account_external_id: &str, mut transactions: Vec<BankTransaction>) {
        self.transactions
            .lock()
            .unwrap()
            .entry(account_external_id.to_string())
            .or_default()
            .append(&mut transactions);
    }

    pub fn set_transactions(&self, account_external_id: &str, transactions: Vec<BankTransaction>) {
        self.transactions
            .lock()
            .unwrap()
            .insert(account_external_id.to_string(), transactions);
    }

    /// Makes the Nth (0-based) `list_transactions` call fail.
    pub fn fail_on_transaction_call(&self, call_index: usize) {
        *self.fail_transaction_call.lock().unwrap() = Some(call_index);
    }

    /// Makes `list_accounts` fail.
    pub fn fail_account_listing(&self) {
        *self.fail_accounts.lock().unwrap() = true;
    }

    pub fn transaction_calls(&self) -> Vec<(String, DateTime<Utc>, DateTime<Utc>)> {
        self.transaction_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BankApiClient for MockBankApiClient {
    async fn list_accounts(&self) -> Result<Vec<BankAccount>> {
        if *self.fail_accounts.lock().unwrap() {
            return Err(Error::Gateway("scripted account listing failure".to_string()));
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn list_transactions(
        &self,
        account_external_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BankTransaction>> {
        let call_index = {
            let mut calls = self.transaction_calls.lock().unwrap();
            calls.push((account_external_id.to_string(), from, to));
            calls.len() - 1
        };

        if *self.fail_transaction_call.lock().unwrap() == Some(call_index) {
            return Err(Error::Gateway("scripted transaction fetch failure".to_string()));
        }

        Ok(self
            .transactions
            .lock()
            .unwrap()
            .get(account_external_id)
            .map(|txs| {
                txs.iter()
                    .filter(|tx| tx.posted_at >= from && tx.posted_at < to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn register_webhook(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    fn parse_webhook_payload(&self, raw: &[u8]) -> Result<WebhookTransactionData> {
        Ok(serde_json::from_slice(raw)?)
    }
}

/// In-memory account store preserving insertion order, with write counting
/// and checkpoint history for idempotence and resume assertions.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
    writes: AtomicUsize,
    checkpoints: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
    next_id: AtomicUsize,
}

impl InMemoryAccountRepository {
    /// Inserts a fixture account as-is, without counting a write.
    pub fn seed(&self, account: Account) -> Account {
        self.accounts.lock().unwrap().push(account.clone());
        account
    }

    /// Replaces a fixture account in place, without counting a write.
    pub fn replace(&self, account: Account) {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(slot) = accounts.iter_mut().find(|a| a.id == account.id) {
            *slot = account;
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Every checkpoint value persisted for an account, in order.
    pub fn checkpoint_history(&self, account_id: &str) -> Vec<DateTime<Utc>> {
        self.checkpoints
            .lock()
            .unwrap()
            .get(account_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl AccountRepositoryTrait for InMemoryAccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        let now = Utc::now().naive_utc();
        let account = Account {
            id: new_account
                .id
                .unwrap_or_else(|| format!("acc-{}", self.next_id.fetch_add(1, Ordering::SeqCst))),
            external_id: new_account.external_id,
            name: new_account.name,
            external_name: new_account.external_name,
            account_type: new_account.account_type,
            currency: new_account.currency,
            balance: new_account.balance,
            credit_limit: new_account.credit_limit,
            iban: new_account.iban,
            source: new_account.source,
            is_archived: new_account.is_archived,
            last_sync_time: None,
            created_at: now,
            updated_at: now,
        };
        self.accounts.lock().unwrap().push(account.clone());
        Ok(account)
    }

    async fn update(&self, account_update: AccountUpdate) -> Result<Account> {
        account_update.validate()?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        let id = account_update.id.clone().unwrap();
        let mut accounts = self.accounts.lock().unwrap();
        let slot = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(id.clone())))?;

        slot.name = account_update.name;
        slot.external_name = account_update.external_name;
        slot.account_type = account_update.account_type;
        slot.currency = account_update.currency;
        slot.balance = account_update.balance;
        slot.credit_limit = account_update.credit_limit;
        slot.iban = account_update.iban;
        slot.is_archived = account_update.is_archived;
        slot.updated_at = Utc::now().naive_utc();
        Ok(slot.clone())
    }

    async fn set_last_sync_time(
        &self,
        account_id: &str,
        last_sync_time: DateTime<Utc>,
    ) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut accounts = self.accounts.lock().unwrap();
        let slot = accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(account_id.to_string())))?;
        slot.last_sync_time = Some(last_sync_time);

        self.checkpoints
            .lock()
            .unwrap()
            .entry(account_id.to_string())
            .or_default()
            .push(last_sync_time);
        Ok(())
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(account_id.to_string())))
    }

    fn get_by_external_id(&self, external_id: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    fn list(&self, archived_filter: Option<bool>) -> Result<Vec<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| archived_filter.map_or(true, |archived| a.is_archived == archived))
            .cloned()
            .collect())
    }
}

/// In-memory transaction store enforcing the `(account, external id)`
/// unique constraint like the sqlite schema does.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    transactions: Mutex<Vec<Transaction>>,
    next_id: AtomicUsize,
}

impl InMemoryTransactionRepository {
    pub fn count_for_account(&self, account_id: &str) -> usize {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.account_id == account_id)
            .count()
    }

    /// Simulates the external categorization subsystem.
    pub fn set_categorization(
        &self,
        account_id: &str,
        external_id: &str,
        status: CategorizationStatus,
    ) {
        let mut transactions = self.transactions.lock().unwrap();
        if let Some(tx) = transactions
            .iter_mut()
            .find(|t| t.account_id == account_id && t.external_id == external_id)
        {
            tx.categorization_status = status;
        }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for InMemoryTransactionRepository {
    fn get_by_external_id(
        &self,
        account_id: &str,
        external_id: &str,
    ) -> Result<Option<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.account_id == account_id && t.external_id == external_id)
            .cloned())
    }

    fn list_for_account(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let mut result: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        result.sort_by_key(|t| t.posted_at);
        Ok(result)
    }

    fn list_uncategorized(&self) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.categorization_status == CategorizationStatus::Pending)
            .cloned()
            .collect())
    }

    async fn insert_many(&self, new_transactions: Vec<NewTransaction>) -> Result<usize> {
        let mut transactions = self.transactions.lock().unwrap();
        let now = Utc::now().naive_utc();
        let mut inserted = 0;

        for new_tx in new_transactions {
            new_tx.validate()?;
            if transactions
                .iter()
                .any(|t| t.account_id == new_tx.account_id && t.external_id == new_tx.external_id)
            {
                return Err(Error::Database(DatabaseError::UniqueViolation(format!(
                    "transaction {} already exists for account {}",
                    new_tx.external_id, new_tx.account_id
                ))));
            }

            transactions.push(Transaction {
                id: format!("tx-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
                account_id: new_tx.account_id,
                external_id: new_tx.external_id,
                posted_at: new_tx.posted_at,
                amount: new_tx.amount,
                description: new_tx.description,
                currency: new_tx.currency,
                categorization_status: CategorizationStatus::Pending,
                is_raw: new_tx.is_raw,
                created_at: now,
                updated_at: now,
            });
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn update(&self, update: TransactionUpdate) -> Result<Transaction> {
        let mut transactions = self.transactions.lock().unwrap();
        let slot = transactions
            .iter_mut()
            .find(|t| t.id == update.id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(update.id.clone())))?;

        slot.posted_at = update.posted_at;
        slot.amount = update.amount;
        slot.description = update.description;
        slot.currency = update.currency;
        slot.updated_at = Utc::now().naive_utc();
        Ok(slot.clone())
    }
}

/// Pacer that records pauses instead of sleeping.
#[derive(Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<StdDuration>>,
}

impl RecordingPacer {
    pub fn pause_count(&self) -> usize {
        self.pauses.lock().unwrap().len()
    }
}

#[async_trait]
impl RequestPacer for RecordingPacer {
    async fn pause(&self, delay: StdDuration) {
        self.pauses.lock().unwrap().push(delay);
    }
}
