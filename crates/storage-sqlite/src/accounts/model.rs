//! Database model for accounts.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use ledgerlink_core::accounts::{Account, AccountSource, AccountType, NewAccount};

/// Database model for accounts
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
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub external_id: Option<String>,
    pub name: String,
    pub external_name: Option<String>,
    pub account_type: String,
    pub currency: String,
    pub balance: i64,
    pub credit_limit: Option<i64>,
    pub iban: Option<String>,
    pub source: String,
    pub is_archived: bool,
    pub last_sync_time: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub(crate) fn source_to_db(source: AccountSource) -> String {
    match source {
        AccountSource::Manual => "MANUAL".to_string(),
        AccountSource::Bank => "BANK".to_string(),
    }
}

fn source_from_db(raw: &str) -> AccountSource {
    match raw {
        "BANK" => AccountSource::Bank,
        _ => AccountSource::Manual,
    }
}

pub(crate) fn account_type_to_db(account_type: AccountType) -> String {
    match account_type {
        AccountType::Debit => "DEBIT".to_string(),
        AccountType::Credit => "CREDIT".to_string(),
    }
}

fn account_type_from_db(raw: &str) -> AccountType {
    match raw {
        "CREDIT" => AccountType::Credit,
        _ => AccountType::Debit,
    }
}

// Conversion implementations
impl From<AccountDB> for Account {
    fn from(db: AccountDB) -> Self {
        Self {
            id: db.id,
            external_id: db.external_id,
            name: db.name,
            external_name: db.external_name,
            account_type: account_type_from_db(&db.account_type),
            currency: db.currency,
            balance: db.balance,
            credit_limit: db.credit_limit,
            iban: db.iban,
            source: source_from_db(&db.source),
            is_archived: db.is_archived,
            last_sync_time: db.last_sync_time.map(|ts| Utc.from_utc_datetime(&ts)),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            external_id: domain.external_id,
            name: domain.name,
            external_name: domain.external_name,
            account_type: account_type_to_db(domain.account_type),
            currency: domain.currency,
            balance: domain.balance,
            credit_limit: domain.credit_limit,
            iban: domain.iban,
            source: source_to_db(domain.source),
            is_archived: domain.is_archived,
            last_sync_time: None,
            created_at: now,
            updated_at: now,
        }
    }
}
