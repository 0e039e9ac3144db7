//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured User-Agent and timeouts
//! - Single GET requests per URL (no automatic retry)
//! - Classifying network failures

use crate::config::Config;
use crate::url::{normalize, NormalizedUrl};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Network-level failure of a single fetch
///
/// A failed URL is dropped; it is neither retried nor re-queued.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read body: {0}")]
    Body(String),
}

/// A response that arrived, whatever its status
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value (empty when absent)
    pub content_type: String,
    /// Page body; only read for HTML responses
    pub body: String,
}

impl FetchedPage {
    /// Returns true if the Content-Type announces HTML
    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("text/html")
    }

    /// Returns true if the response came from a different URL than requested
    pub fn was_redirected(&self, requested: &NormalizedUrl) -> bool {
        normalize(&self.final_url) != *requested
    }

    /// Returns true if the server asked us to slow down (HTTP 429)
    pub fn is_rate_limited(&self) -> bool {
        self.status_code == StatusCode::TOO_MANY_REQUESTS.as_u16()
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// A response was received
    Fetched(FetchedPage),
    /// No usable response (network error, timeout, unreadable body)
    Failed(FetchError),
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sumi_sift::config::Config;
/// use sumi_sift::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.value.as_str())
        .timeout(Duration::from_secs(config.crawler.request_timeout))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// # Outcome Table
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Any HTTP status | `Fetched` |
/// | Non-HTML Content-Type | `Fetched` with empty body |
/// | Timeout | `Failed(Timeout)` |
/// | Connection refused / DNS | `Failed(Connect)` |
/// | Body read error | `Failed(Body)` |
///
/// The body is not downloaded for non-HTML responses.
pub async fn fetch_url(client: &Client, url: &NormalizedUrl) -> FetchOutcome {
    let response = match client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => return FetchOutcome::Failed(classify_error(e)),
    };

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let mut page = FetchedPage {
        final_url,
        status_code,
        content_type,
        body: String::new(),
    };

    if page.is_html() {
        match response.text().await {
            Ok(body) => page.body = body,
            Err(e) => return FetchOutcome::Failed(FetchError::Body(e.to_string())),
        }
    }

    FetchOutcome::Fetched(page)
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect(e.to_string())
    } else {
        FetchError::Request(e.to_string())
    }
}
