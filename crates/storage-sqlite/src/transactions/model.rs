//! Database model for transactions.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use ledgerlink_core::transactions::{CategorizationStatus, NewTransaction, Transaction};

/// Database model for transactions
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub external_id: String,
    pub posted_at: NaiveDateTime,
    pub amount: i64,
    pub description: String,
    pub currency: String,
    pub categorization_status: String,
    pub is_raw: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub(crate) const STATUS_PENDING: &str = "PENDING";

fn status_from_db(raw: &str) -> CategorizationStatus {
    match raw {
        "CATEGORIZED" => CategorizationStatus::Categorized,
        "VERIFIED" => CategorizationStatus::Verified,
        _ => CategorizationStatus::Pending,
    }
}

// Conversion implementations
impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            account_id: db.account_id,
            external_id: db.external_id,
            posted_at: Utc.from_utc_datetime(&db.posted_at),
            amount: db.amount,
            description: db.description,
            currency: db.currency,
            categorization_status: status_from_db(&db.categorization_status),
            is_raw: db.is_raw,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewTransaction> for TransactionDB {
    fn from(domain: NewTransaction) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: domain.account_id,
            external_id: domain.external_id,
            posted_at: domain.posted_at.naive_utc(),
            amount: domain.amount,
            description: domain.description,
            currency: domain.currency,
            categorization_status: STATUS_PENDING.to_string(),
            is_raw: domain.is_raw,
            created_at: now,
            updated_at: now,
        }
    }
}
