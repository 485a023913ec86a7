//! HTTP client for the Otlas partner-finding search endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::SearchKind;
use crate::query::SearchParams;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid search URL: {0}")]
    BadUrl(#[from] url::ParseError),

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Structured result of one search request. Transport failures never
/// escape this boundary as errors; they fold into `success == false`.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub success: bool,

    pub raw_html: String,

    /// Final URL after any redirects; empty on failure.
    pub search_url: String,

    /// Count of kind marker substrings in the markup. A cheap upper-bound
    /// hint only; the extractor's parsed count is the real number.
    pub total_found: usize,

    pub error: Option<String>,
}

impl FetchOutcome {
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            raw_html: String::new(),
            search_url: String::new(),
            total_found: 0,
            error: Some(error.into()),
        }
    }
}

/// Seam for the pipeline: production code uses [`OtlasClient`], tests
/// substitute a stub serving fixture markup.
#[async_trait]
pub trait SearchFetcher: Send + Sync {
    async fn fetch(&self, params: &SearchParams) -> FetchOutcome;
}

#[derive(Clone)]
pub struct OtlasClient {
    client: Client,
    base_url: String,
    user_agent: String,
    request_delay: Duration,
}

impl OtlasClient {
    #[must_use]
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        request_delay: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            user_agent: user_agent.into(),
            request_delay,
        }
    }

    fn build_search_url(&self, params: &SearchParams) -> String {
        let mut url = format!(
            "{}/search?search={}&searchType={}&limit={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&params.query),
            params.kind.as_str(),
            params.limit
        );

        match params.kind {
            SearchKind::Organizations => {
                if let Some(country) = params.country.as_deref() {
                    url.push_str("&country=");
                    url.push_str(&urlencoding::encode(country));
                }
            }
            SearchKind::Projects => {
                if let Some(project_type) = params.project_type.as_deref() {
                    url.push_str("&projectType=");
                    url.push_str(&urlencoding::encode(project_type));
                }
            }
        }

        url
    }

    async fn perform(&self, params: &SearchParams) -> Result<(String, String), FetchError> {
        // A malformed base URL is rejected before any request goes out.
        let url = url::Url::parse(&self.build_search_url(params))?;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let resolved_url = response.url().to_string();
        let body = response.text().await?;
        Ok((resolved_url, body))
    }
}

#[async_trait]
impl SearchFetcher for OtlasClient {
    /// Exactly one outbound request, preceded unconditionally by the
    /// configured delay. The delay is per-call, not globally serialized.
    async fn fetch(&self, params: &SearchParams) -> FetchOutcome {
        tokio::time::sleep(self.request_delay).await;

        match self.perform(params).await {
            Ok((search_url, raw_html)) => {
                let total_found = raw_html.matches(params.kind.item_marker()).count();
                FetchOutcome {
                    success: true,
                    raw_html,
                    search_url,
                    total_found,
                    error: None,
                }
            }
            Err(err) => {
                warn!("Otlas search request failed: {}", err);
                FetchOutcome::failure(err.to_string())
            }
        }
    }
}
