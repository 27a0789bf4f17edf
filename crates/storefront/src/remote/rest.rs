//! Realtime database REST client.
//!
//! Talks to a Firebase-style JSON tree over HTTP:
//! - `GET {base}/products.json` - read the collection
//! - `PUT {base}/products.json` - replace the collection
//! - `PATCH {base}/.json` - multi-path update (`{"products/1/stock": 3}`)
//!
//! The subscription polls the collection and forwards only snapshots that
//! differ from the last one delivered.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};
use url::Url;
use valentina_core::Product;

use crate::config::RemoteConfig;

use super::{PRODUCTS_PATH, ProductStore, StockUpdates, StoreError, Subscription};

/// Client for the realtime database REST API.
///
/// Cheaply cloneable; clones share the HTTP connection pool.
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<RestStoreInner>,
}

struct RestStoreInner {
    client: reqwest::Client,
    base_url: Url,
    auth: Option<SecretString>,
    poll_interval: Duration,
}

impl RestStore {
    /// Create a client for the database at `config.url`.
    #[must_use]
    pub fn new(config: &RemoteConfig) -> Self {
        let mut base_url = config.url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(RestStoreInner {
                client: reqwest::Client::new(),
                base_url,
                auth: config.secret.clone(),
                poll_interval: config.poll_interval,
            }),
        }
    }

    /// JSON endpoint for a tree path (`""` is the root).
    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        let mut url = self
            .inner
            .base_url
            .join(&format!("{path}.json"))
            .map_err(|e| StoreError::InvalidPath(format!("{path}: {e}")))?;
        if let Some(auth) = &self.inner.auth {
            url.query_pairs_mut()
                .append_pair("auth", auth.expose_secret());
        }
        Ok(url)
    }

    /// Read the product collection once.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the request fails or the payload is not a
    /// product collection.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, StoreError> {
        let url = self.endpoint(PRODUCTS_PATH)?;
        let response = self.inner.client.get(url).send().await?;
        let body = check_status(response).await?;
        let value: Value = serde_json::from_str(&body)?;
        decode_snapshot(value)
    }
}

impl ProductStore for RestStore {
    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = self.clone();

        info!(interval_ms = ?store.inner.poll_interval.as_millis(), "Starting product subscription");
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(store.inner.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut last: Option<Vec<Product>> = None;
            let mut failing = false;

            loop {
                interval.tick().await;
                if tx.is_closed() {
                    break;
                }

                let delivered = match store.fetch_products().await {
                    Ok(products) => {
                        failing = false;
                        if last.as_ref() == Some(&products) {
                            continue;
                        }
                        last = Some(products.clone());
                        tx.send(Ok(products))
                    }
                    // Report an outage once, not on every poll.
                    Err(e) if failing => {
                        debug!(error = %e, "product poll still failing");
                        continue;
                    }
                    Err(e) => {
                        warn!(error = %e, "product poll failed");
                        failing = true;
                        tx.send(Err(e))
                    }
                };

                if delivered.is_err() {
                    break;
                }
            }
            debug!("product subscription ended");
        });

        rx
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn replace_products(&self, products: &[Product]) -> Result<(), StoreError> {
        let url = self.endpoint(PRODUCTS_PATH)?;
        let response = self.inner.client.put(url).json(products).send().await?;
        check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, updates), fields(paths = updates.len()))]
    async fn update_stock(&self, updates: &StockUpdates) -> Result<(), StoreError> {
        let url = self.endpoint("")?;
        let body = Value::Object(updates.to_patch_body());
        let response = self.inner.client.patch(url).json(&body).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Return the body of a successful response, or a `Status` error.
async fn check_status(response: reqwest::Response) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }
    Ok(body)
}

/// Decode a product collection as the realtime database returns it.
///
/// - `null` - the collection does not exist (empty)
/// - array - products by index, `null` holes skipped
/// - object - products keyed by index, ordered numerically
///
/// # Errors
///
/// Returns `StoreError::Parse` if any entry is not a product.
pub fn decode_snapshot(value: Value) -> Result<Vec<Product>, StoreError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| serde_json::from_value(item).map_err(StoreError::from))
            .collect(),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            });
            entries
                .into_iter()
                .filter(|(_, item)| !item.is_null())
                .map(|(_, item)| serde_json::from_value(item).map_err(StoreError::from))
                .collect()
        }
        other => Ok(serde_json::from_value(other)?),
    }
}
