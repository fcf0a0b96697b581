//! Storefront HTTP client
//!
//! `StorefrontApi` is the capability boundary the sync engine depends on;
//! `WooClient` implements it against the WooCommerce REST v3 API with basic
//! auth over rustls. Every call carries a timeout — a hung fetch fails the
//! run, a hung push fails only that unit.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shared::order::{MetaEntry, OrderPayload};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::db::repository::settings::StorefrontSettings;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Storefront returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response payload: {0}")]
    Decode(String),

    #[error("Client configuration invalid: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Storefront client capability consumed by the sync engine.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Fetch all orders currently in any of the given statuses.
    async fn fetch_orders(&self, statuses: &[&str]) -> Result<Vec<OrderPayload>, ClientError>;

    /// Set a remote order's status and attach metadata entries.
    async fn update_order_status(
        &self,
        order_id: &str,
        status: &str,
        metadata: Vec<MetaEntry>,
    ) -> Result<(), ClientError>;
}

/// Builds a client from the current persisted settings. Settings are mutable
/// at runtime through the config API, so the coordinator constructs a fresh
/// client per run instead of holding one.
pub trait StorefrontClientFactory: Send + Sync {
    fn build(&self, settings: &StorefrontSettings) -> Result<Arc<dyn StorefrontApi>, ClientError>;
}

// ============================================================================
// WooCommerce implementation
// ============================================================================

const API_BASE: &str = "wp-json/wc/v3";

/// WooCommerce REST v3 client.
pub struct WooClient {
    client: Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
}

impl WooClient {
    pub fn new(settings: &StorefrontSettings, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
            consumer_key: settings.consumer_key.clone(),
            consumer_secret: settings.consumer_secret.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{API_BASE}/{path}", self.base_url)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl StorefrontApi for WooClient {
    async fn fetch_orders(&self, statuses: &[&str]) -> Result<Vec<OrderPayload>, ClientError> {
        let response = self
            .client
            .get(self.url("orders"))
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .query(&[("status", statuses.join(",")), ("per_page", "100".into())])
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let orders: Vec<OrderPayload> = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("Failed to parse orders: {e}")))?;
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: &str,
        metadata: Vec<MetaEntry>,
    ) -> Result<(), ClientError> {
        #[derive(Serialize)]
        struct OrderUpdate {
            status: String,
            meta_data: Vec<MetaEntry>,
        }

        let response = self
            .client
            .put(self.url(&format!("orders/{order_id}")))
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .json(&OrderUpdate {
                status: status.to_string(),
                meta_data: metadata,
            })
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}

/// Production factory: a fresh `WooClient` per run from current settings.
pub struct WooClientFactory {
    timeout: Duration,
}

impl WooClientFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl StorefrontClientFactory for WooClientFactory {
    fn build(&self, settings: &StorefrontSettings) -> Result<Arc<dyn StorefrontApi>, ClientError> {
        Ok(Arc::new(WooClient::new(settings, self.timeout)?))
    }
}
