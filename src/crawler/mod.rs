//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with failure classification
//! - HTML parsing, metadata extraction and link discovery
//! - The shared frontier with at-most-once claiming per pass
//! - Overall crawl coordination across the initial and retry passes

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod retry;

pub use coordinator::{Coordinator, CrawlOutcome, Pass};
pub use fetcher::{build_http_client, fetch_url, FetchError, FetchOutcome, FetchedPage};
pub use frontier::{Claim, Frontier};
pub use parser::{extract, parse_html, ExtractedPage};
pub use retry::RetryList;

use crate::config::Config;
use crate::SiftError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Sanitize the seed URL and fix the crawl domain
/// 2. Build the HTTP client
/// 3. Drain the frontier with the initial worker pool
/// 4. Re-fetch rate-limited URLs with the retry pool
/// 5. Return the finalized report and statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - Raw seed URL, with or without scheme
///
/// # Example
///
/// ```no_run
/// use sumi_sift::config::Config;
/// use sumi_sift::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = crawl(Config::default(), "example.com").await?;
/// println!("{} pages", outcome.report.rows.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlOutcome, SiftError> {
    Ok(Coordinator::new(config, seed)?.run().await)
}
