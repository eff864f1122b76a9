//! The Intrade Bar HTTP client: authenticated open/settle requests over
//! `reqwest`.

use super::wire::{OpenOrderRequest, OpenOrderResponse, SettlementResponse};
use crate::error::AdapterError;
use crate::session::{SessionStore, SessionToken};
use std::sync::Arc;

/// A thin `reqwest`-backed client for the Intrade Bar REST endpoints.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    account_id: String,
    session_store: Arc<dyn SessionStore>,
}

impl HttpClient {
    /// Build a client that authenticates every request against
    /// `account_id` using `session_store`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, account_id: impl Into<String>, session_store: Arc<dyn SessionStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            account_id: account_id.into(),
            session_store,
        }
    }

    fn token(&self) -> Result<SessionToken, AdapterError> {
        self.session_store
            .token(&self.account_id)
            .ok_or_else(|| AdapterError::Session(format!("no session for account {}", self.account_id)))
    }

    /// Open a new option position.
    pub async fn open_order(&self, request: OpenOrderRequest<'_>) -> Result<OpenOrderResponse, AdapterError> {
        let token = self.token()?;
        let response = self
            .http
            .post(format!("{}/option/open", self.base_url))
            .bearer_auth(token.as_str())
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<OpenOrderResponse>().await?)
    }

    /// Poll the current settlement status of an already-open option.
    pub async fn poll_settlement(&self, option_id: &str) -> Result<SettlementResponse, AdapterError> {
        let token = self.token()?;
        let response = self
            .http
            .get(format!("{}/option/{option_id}", self.base_url))
            .bearer_auth(token.as_str())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<SettlementResponse>().await?)
    }
}
