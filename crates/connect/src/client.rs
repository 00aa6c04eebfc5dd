//! HTTP client for the bank aggregator API.
//!
//! This module provides the reqwest-backed implementation of
//! [`BankApiClient`]. Both the CLI and the scheduled watch loop use this
//! client; tests substitute in-memory mocks behind the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::bank::{BankAccount, BankApiClient, BankTransaction, WebhookTransactionData};
use ledgerlink_core::errors::{Error, Result};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// API Response Types (internal, for parsing gateway responses)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
struct ApiAccountsResponse {
    #[serde(default)]
    accounts: Vec<BankAccount>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiTransactionsResponse {
    #[serde(default)]
    transactions: Vec<BankTransaction>,
}

#[derive(Debug, serde::Serialize)]
struct RegisterWebhookRequest<'a> {
    url: &'a str,
}

/// HTTP client for the bank aggregator API.
pub struct BankHttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl BankHttpClient {
    /// Creates a client with a bearer token for the aggregator API.
    pub fn new(base_url: impl Into<String>, api_token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_token}"))
            .map_err(|e| Error::Gateway(format!("invalid API token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Gateway(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T> {
        debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!("{url} returned {status}: {body}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Gateway(format!("{url} returned invalid body: {e}")))
    }
}

#[async_trait]
impl BankApiClient for BankHttpClient {
    async fn list_accounts(&self) -> Result<Vec<BankAccount>> {
        let url = format!("{}/v1/accounts", self.base_url);
        let response: ApiAccountsResponse = self.get_json(url).await?;
        Ok(response.accounts)
    }

    async fn list_transactions(
        &self,
        account_external_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<BankTransaction>> {
        let url = format!(
            "{}/v1/accounts/{}/transactions?from={}&to={}",
            self.base_url,
            account_external_id,
            from.to_rfc3339(),
            to.to_rfc3339()
        );
        let response: ApiTransactionsResponse = self.get_json(url).await?;
        Ok(response.transactions)
    }

    async fn register_webhook(&self, url: &str) -> Result<()> {
        let endpoint = format!("{}/v1/webhooks", self.base_url);
        debug!("POST {endpoint}");
        let response = self
            .http
            .post(&endpoint)
            .json(&RegisterWebhookRequest { url })
            .send()
            .await
            .map_err(|e| Error::Gateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Gateway(format!(
                "webhook registration returned {status}: {body}"
            )));
        }
        Ok(())
    }

    fn parse_webhook_payload(&self, raw: &[u8]) -> Result<WebhookTransactionData> {
        Ok(serde_json::from_slice(raw)?)
    }
}
