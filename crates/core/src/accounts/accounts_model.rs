//! Account domain models.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Origin of an account record - determines whether the synchronizer may touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountSource {
    /// Created by hand; never written by the bank synchronizer.
    #[default]
    Manual,
    /// Created from the bank gateway; reconciled on every sync.
    Bank,
}

/// Account kind as reported by the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    #[default]
    Debit,
    Credit,
}

impl AccountType {
    /// Parses a bank-reported type string, defaulting to debit for unknown values.
    pub fn from_external(raw: Option<&str>) -> Self {
        match raw.map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("credit") | Some("credit_card") => AccountType::Credit,
            _ => AccountType::Debit,
        }
    }
}

/// Domain model representing an account in the system.
///
/// Monetary fields (`balance`, `credit_limit`) are integer minor units
/// (cents) in the account currency.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    /// Bank-assigned identifier, immutable and unique per bank source.
    /// Manual accounts have none.
    pub external_id: Option<String>,
    /// User-editable display name.
    pub name: String,
    /// Name as reported by the bank.
    pub external_name: Option<String>,
    pub account_type: AccountType,
    pub currency: String,
    pub balance: i64,
    pub credit_limit: Option<i64>,
    pub iban: Option<String>,
    pub source: AccountSource,
    pub is_archived: bool,
    /// Upper bound of the last successfully synced transaction window.
    /// Written only by the transaction synchronizer's checkpoint advance.
    pub last_sync_time: Option<DateTime<Utc>>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Whether the bank synchronizer is allowed to write this account.
    pub fn is_syncable(&self) -> bool {
        self.source == AccountSource::Bank && !self.is_archived && self.external_id.is_some()
    }
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub external_id: Option<String>,
    pub name: String,
    pub external_name: Option<String>,
    pub account_type: AccountType,
    pub currency: String,
    pub balance: i64,
    pub credit_limit: Option<i64>,
    pub iban: Option<String>,
    pub source: AccountSource,
    pub is_archived: bool,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency cannot be empty".to_string(),
            )));
        }
        if self.source == AccountSource::Bank && self.external_id.is_none() {
            return Err(Error::Validation(ValidationError::MissingField(
                "externalId".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for updating an existing account.
///
/// The internal `id`, `source`, `external_id`, and checkpoint are never
/// changed through an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: Option<String>,
    pub name: String,
    pub external_name: Option<String>,
    pub account_type: AccountType,
    pub currency: String,
    pub balance: i64,
    pub credit_limit: Option<i64>,
    pub iban: Option<String>,
    pub is_archived: bool,
}

impl AccountUpdate {
    /// Validates the account update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account ID is required for updates".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        Ok(())
    }

    /// Builds an update that keeps the user-owned fields of `existing`
    /// (name, archived flag) while taking the bank-reported fields from
    /// the caller.
    pub fn reconciling(
        existing: &Account,
        external_name: Option<String>,
        balance: i64,
        credit_limit: Option<i64>,
        iban: Option<String>,
    ) -> Self {
        Self {
            id: Some(existing.id.clone()),
            name: existing.name.clone(),
            external_name,
            account_type: existing.account_type,
            currency: existing.currency.clone(),
            balance,
            credit_limit,
            iban,
            is_archived: existing.is_archived,
        }
    }
}
