//! JSON fetch layer.
//!
//! The resolver only ever talks to a [`JsonFetcher`]; it performs no retries
//! and no caching of its own. [`CachedFetcher`] adds memoization on top of any
//! fetcher for callers that want it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pokedex_common::{LruCache, create_client_with_timeout};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{EvolutionError, EvolutionResult};

/// Fetches a URL and decodes the body as JSON.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> EvolutionResult<Value>;
}

#[async_trait]
impl<T: JsonFetcher + ?Sized> JsonFetcher for Arc<T> {
    async fn fetch_json(&self, url: &str) -> EvolutionResult<Value> {
        (**self).fetch_json(url).await
    }
}

/// Fetch a URL and decode it into `T`.
pub async fn fetch_typed<T: DeserializeOwned>(
    fetcher: &dyn JsonFetcher,
    url: &str,
) -> EvolutionResult<T> {
    let value = fetcher.fetch_json(url).await?;
    Ok(serde_json::from_value(value)?)
}

/// [`JsonFetcher`] backed by reqwest.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout.
    pub fn new(timeout: Duration) -> EvolutionResult<Self> {
        let client = create_client_with_timeout(timeout).map_err(EvolutionError::Internal)?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> EvolutionResult<Value> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EvolutionError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Memoizes successful responses of an inner fetcher in a bounded LRU.
///
/// Failures are never cached.
pub struct CachedFetcher<F> {
    inner: F,
    cache: Mutex<LruCache<String, Value>>,
}

impl<F: JsonFetcher> CachedFetcher<F> {
    pub fn new(inner: F, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }
}

#[async_trait]
impl<F: JsonFetcher> JsonFetcher for CachedFetcher<F> {
    async fn fetch_json(&self, url: &str) -> EvolutionResult<Value> {
        if let Some(hit) = self.cache.lock().await.get(&url.to_string()) {
            debug!(url, "cache hit");
            return Ok(hit.clone());
        }

        let value = self.inner.fetch_json(url).await?;
        self.cache
            .lock()
            .await
            .insert(url.to_string(), value.clone());
        Ok(value)
    }
}
