//! Crossref HTTP client
//!
//! Searches the Crossref works index with a free-text bibliographic query.
//! See: https://api.crossref.org/swagger-ui/index.html
//!
//! Crossref asks API users to identify themselves with a `mailto:` in the
//! User-Agent ("polite pool") and to keep request rates modest. Every call goes
//! through the shared [`RateLimiter`] before touching the network.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;

use super::{adapter, dto};
use crate::config::CrossrefConfig;
use crate::enrichment::domain::{Candidate, LookupError, Query};
use crate::enrichment::limiter::RateLimiter;

/// Number of results requested per search
const ROWS: u32 = 5;

/// Crossref works search client
pub struct CrossrefClient {
    http_client: reqwest::Client,
    base_url: String,
    limiter: Arc<RateLimiter>,
}

/// User agent string, with the contact address when one is configured
fn user_agent(mailto: Option<&str>) -> String {
    let base = concat!("doizer/", env!("CARGO_PKG_VERSION"));
    match mailto {
        Some(address) if !address.is_empty() => format!("{} (mailto:{})", base, address),
        _ => base.to_string(),
    }
}

impl CrossrefClient {
    /// Create a client that draws request permits from `limiter`
    pub fn new(config: &CrossrefConfig, limiter: Arc<RateLimiter>) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(user_agent(config.mailto.as_deref()))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            limiter,
        })
    }

    /// Search for a query and return the best scoring candidate
    pub async fn search(
        &self,
        cancel: &CancellationToken,
        query: &Query,
    ) -> Result<Candidate, LookupError> {
        self.limiter.acquire(cancel).await?;

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LookupError::Cancelled),
            response = self.send_search_request(query) => response?,
        };
        adapter::to_candidate(response)
    }

    /// Send the HTTP request and parse the response
    async fn send_search_request(&self, query: &Query) -> Result<dto::WorksResponse, LookupError> {
        let rows = ROWS.to_string();

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("rows", rows.as_str()),
                ("query.bibliographic", query.as_str()),
                ("sort", "score"),
                ("order", "desc"),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))
    }
}
