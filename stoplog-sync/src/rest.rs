//! HTTP reference implementation of the persistence gateway.
//!
//! Talks to a document-style JSON API: one log collection and one
//! payment-config document per user, plus a drain endpoint for writes
//! the service queued while the client was offline. HTTP status codes
//! are mapped onto the sync error taxonomy here so the orchestrator
//! never sees transport details.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stoplog_types::{DeliveryLog, PaymentConfig, UserId};
use tracing::{debug, error};

use crate::error::{SyncError, SyncResult};
use crate::gateway::{RemotePersistenceGateway, RemoteSnapshot};

/// Configuration for the HTTP gateway.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestGatewayConfig {
    /// Base URL of the API, without a trailing slash.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RestGatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.stoplog.app".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl RestGatewayConfig {
    /// Configuration pointed at a local test server.
    #[cfg(test)]
    pub fn test() -> Self {
        Self {
            api_base_url: "http://localhost:3002".to_string(),
            request_timeout_secs: 5,
        }
    }
}

/// JSON document client implementing [`RemotePersistenceGateway`].
pub struct RestGateway {
    client: Client,
    config: RestGatewayConfig,
    bearer_token: Option<String>,
}

impl RestGateway {
    pub fn new(config: RestGatewayConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            config,
            bearer_token: None,
        }
    }

    /// Attaches a bearer token to every request.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    fn url(&self, user: &UserId, suffix: &str) -> String {
        format!(
            "{}/users/{}/{}",
            self.config.api_base_url,
            urlencoding::encode(user.as_str()),
            suffix
        )
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SyncResult<T> {
        let resp = self
            .apply_auth(self.client.get(url))
            .send()
            .await
            .map_err(map_transport_error)?;
        let resp = check_status(resp)?;
        resp.json::<T>().await.map_err(|e| {
            error!("malformed response body from {url}: {e}");
            SyncError::Persistence(format!("invalid response body: {e}"))
        })
    }

    async fn put_json(&self, url: &str, body: &impl Serialize) -> SyncResult<()> {
        let resp = self
            .apply_auth(self.client.put(url))
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(resp)?;
        Ok(())
    }
}

/// Maps transport-level errors (no HTTP status) onto the taxonomy.
fn map_transport_error(err: reqwest::Error) -> SyncError {
    if err.is_timeout() || err.is_connect() {
        SyncError::Transient(err.to_string())
    } else {
        SyncError::Persistence(err.to_string())
    }
}

/// Maps HTTP status codes onto the taxonomy. 404 is an absent document,
/// timeouts and server-side failures are retryable, everything else is
/// a persistence failure.
fn check_status(resp: reqwest::Response) -> SyncResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(SyncError::NotFound);
    }
    if status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
    {
        return Err(SyncError::Transient(format!("HTTP {status}")));
    }
    Err(SyncError::Persistence(format!("HTTP {status}")))
}

#[async_trait]
impl RemotePersistenceGateway for RestGateway {
    async fn fetch_logs(&self, user: &UserId) -> SyncResult<Vec<DeliveryLog>> {
        self.get_json(&self.url(user, "logs")).await
    }

    async fn fetch_payment_config(&self, user: &UserId) -> SyncResult<PaymentConfig> {
        self.get_json(&self.url(user, "payment-config")).await
    }

    async fn save_logs(&self, user: &UserId, logs: &[DeliveryLog]) -> SyncResult<()> {
        self.put_json(&self.url(user, "logs"), &logs).await
    }

    async fn save_payment_config(&self, user: &UserId, config: &PaymentConfig) -> SyncResult<()> {
        self.put_json(&self.url(user, "payment-config"), config).await
    }

    async fn drain_pending_transactions(&self, user: &UserId) -> SyncResult<()> {
        let url = self.url(user, "pending/drain");
        debug!("draining pending transactions via {url}");
        let resp = self
            .apply_auth(self.client.post(&url))
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(resp)?;
        Ok(())
    }

    async fn force_refresh_all(&self, user: &UserId) -> SyncResult<RemoteSnapshot> {
        self.get_json(&self.url(user, "snapshot")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_percent_encode_the_user_id() {
        let gateway = RestGateway::new(RestGatewayConfig::test());
        let user = UserId::from("auth0|driver 42");
        assert_eq!(
            gateway.url(&user, "logs"),
            "http://localhost:3002/users/auth0%7Cdriver%2042/logs"
        );
    }

    #[test]
    fn urls_join_each_document_suffix() {
        let gateway = RestGateway::new(RestGatewayConfig::test());
        let user = UserId::from("u1");
        assert_eq!(
            gateway.url(&user, "payment-config"),
            "http://localhost:3002/users/u1/payment-config"
        );
        assert_eq!(
            gateway.url(&user, "pending/drain"),
            "http://localhost:3002/users/u1/pending/drain"
        );
    }
}
