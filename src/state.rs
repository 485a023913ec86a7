//! Session-scoped shared resources: the HTTP connection pool and the
//! outbound-request limiter.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::{RwLock, Semaphore};
use tracing::{debug, warn};

use crate::clients::otlas::{FetchOutcome, OtlasClient, SearchFetcher};
use crate::config::Config;
use crate::query::SearchParams;

/// Build a shared HTTP client with reasonable defaults for scraping calls.
/// One client per session enables connection pooling and avoids socket
/// exhaustion across repeated searches.
fn build_shared_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout())
        .pool_max_idle_per_host(10)
        .build()
}

/// One logical scraping session against the platform.
///
/// The connection pool is created lazily on the first fetch and released
/// by [`Session::close`]; `close` is idempotent and safe to call even if
/// no request was ever made. Concurrent fetches are bounded by a permit
/// pool sized from the config.
pub struct Session {
    config: Config,
    http_client: RwLock<Option<Client>>,
    limiter: Arc<Semaphore>,
}

impl Session {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let permits = config.http.concurrent_requests.max(1);
        Self {
            config,
            http_client: RwLock::new(None),
            limiter: Arc::new(Semaphore::new(permits)),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the shared client, building it on first use.
    async fn acquire_client(&self) -> Result<Client, reqwest::Error> {
        if let Some(client) = self.http_client.read().await.as_ref() {
            return Ok(client.clone());
        }

        let mut guard = self.http_client.write().await;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        debug!("Initializing shared HTTP client");
        let client = build_shared_http_client(&self.config)?;
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Whether the connection pool has been initialized and not released.
    pub async fn is_active(&self) -> bool {
        self.http_client.read().await.is_some()
    }

    /// Releases the connection pool. Idempotent; a no-op when the pool
    /// was never initialized.
    pub async fn close(&self) {
        let mut guard = self.http_client.write().await;
        if guard.take().is_some() {
            debug!("Released shared HTTP client");
        }
    }
}

#[async_trait]
impl SearchFetcher for Session {
    /// Fetches under a limiter permit, so at most `concurrent_requests`
    /// requests are in flight at once; excess callers queue in no
    /// particular order.
    async fn fetch(&self, params: &SearchParams) -> FetchOutcome {
        let Ok(_permit) = self.limiter.acquire().await else {
            // Only reachable if the semaphore is closed, which we never do.
            return FetchOutcome::failure("request limiter closed");
        };

        let client = match self.acquire_client().await {
            Ok(client) => client,
            Err(err) => {
                warn!("Failed to build HTTP client: {}", err);
                return FetchOutcome::failure(format!("failed to build HTTP client: {err}"));
            }
        };

        OtlasClient::new(
            client,
            self.config.platform.base_url.clone(),
            self.config.platform.user_agent.clone(),
            self.config.request_delay(),
        )
        .fetch(params)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn close_is_idempotent_and_safe_when_never_initialized() {
        let session = Session::new(Config::default());
        assert!(!session.is_active().await);
        session.close().await;
        session.close().await;
        assert!(!session.is_active().await);
    }

    #[tokio::test]
    async fn client_is_lazily_built_and_released() {
        let session = Session::new(Config::default());
        let first = session.acquire_client().await.unwrap();
        assert!(session.is_active().await);

        // Second acquisition reuses the same pool.
        let _second = session.acquire_client().await.unwrap();
        drop(first);

        session.close().await;
        assert!(!session.is_active().await);
    }
}
