//! Transaction domain models.
//!
//! A transaction's identity within its account is the bank-assigned
//! `external_id`; the pair `(account_id, external_id)` is the dedup key
//! used by the synchronizer and the webhook ingestion path.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Categorization lifecycle of a transaction.
///
/// Categorization is owned by an external subsystem; the synchronizer only
/// ever creates transactions as `Pending` and never overwrites these fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategorizationStatus {
    #[default]
    Pending,
    Categorized,
    Verified,
}

/// Domain model representing a posted bank transaction.
///
/// `amount` is signed integer minor units in the transaction currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Internal ID of the owning account.
    pub account_id: String,
    /// Bank-assigned identifier, unique within the owning account and
    /// never reassigned once persisted.
    pub external_id: String,
    pub posted_at: DateTime<Utc>,
    pub amount: i64,
    /// Counterparty / bank-reported description.
    pub description: String,
    pub currency: String,
    pub categorization_status: CategorizationStatus,
    /// Set when the record came straight from the bank feed rather than
    /// manual entry.
    pub is_raw: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Transaction {
    /// Compares the bank-amendable content fields against an incoming
    /// record. Banks amend posted transactions (e.g. merchant name
    /// corrections), so equality here decides skip-vs-update during sync.
    /// Categorization fields are deliberately excluded.
    pub fn content_matches(&self, incoming: &NewTransaction) -> bool {
        self.posted_at == incoming.posted_at
            && self.amount == incoming.amount
            && self.description == incoming.description
            && self.currency == incoming.currency
    }
}

/// Input model for creating a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub account_id: String,
    pub external_id: String,
    pub posted_at: DateTime<Utc>,
    pub amount: i64,
    pub description: String,
    pub currency: String,
    pub is_raw: bool,
}

impl NewTransaction {
    /// Validates the new transaction data.
    pub fn validate(&self) -> Result<()> {
        if self.external_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "externalId".to_string(),
            )));
        }
        if self.account_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "accountId".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for amending the bank-reported content of an existing
/// transaction. Categorization fields are not part of this surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub id: String,
    pub posted_at: DateTime<Utc>,
    pub amount: i64,
    pub description: String,
    pub currency: String,
}

impl TransactionUpdate {
    /// Builds an update that carries the incoming bank content onto an
    /// existing record.
    pub fn amending(existing: &Transaction, incoming: &NewTransaction) -> Self {
        Self {
            id: existing.id.clone(),
            posted_at: incoming.posted_at,
            amount: incoming.amount,
            description: incoming.description.clone(),
            currency: incoming.currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn existing() -> Transaction {
        Transaction {
            id: "tx-1".to_string(),
            account_id: "acc-1".to_string(),
            external_id: "ext-tx-1".to_string(),
            posted_at: Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap(),
            amount: -4_200,
            description: "COFFEE SHOP".to_string(),
            currency: "EUR".to_string(),
            categorization_status: CategorizationStatus::Categorized,
            is_raw: true,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    fn incoming_like(tx: &Transaction) -> NewTransaction {
        NewTransaction {
            account_id: tx.account_id.clone(),
            external_id: tx.external_id.clone(),
            posted_at: tx.posted_at,
            amount: tx.amount,
            description: tx.description.clone(),
            currency: tx.currency.clone(),
            is_raw: true,
        }
    }

    #[test]
    fn test_content_matches_identical() {
        let tx = existing();
        assert!(tx.content_matches(&incoming_like(&tx)));
    }

    #[test]
    fn test_content_matches_ignores_categorization() {
        let mut tx = existing();
        tx.categorization_status = CategorizationStatus::Verified;
        assert!(tx.content_matches(&incoming_like(&tx)));
    }

    #[test]
    fn test_content_differs_on_amended_description() {
        let tx = existing();
        let mut incoming = incoming_like(&tx);
        incoming.description = "COFFEE SHOP BERLIN".to_string();
        assert!(!tx.content_matches(&incoming));
    }

    #[test]
    fn test_amending_update_keeps_id() {
        let tx = existing();
        let mut incoming = incoming_like(&tx);
        incoming.amount = -4_500;
        let update = TransactionUpdate::amending(&tx, &incoming);
        assert_eq!(update.id, "tx-1");
        assert_eq!(update.amount, -4_500);
    }

    #[test]
    fn test_new_transaction_validation() {
        let tx = existing();
        let mut incoming = incoming_like(&tx);
        assert!(incoming.validate().is_ok());
        incoming.external_id = String::new();
        assert!(incoming.validate().is_err());
    }
}
