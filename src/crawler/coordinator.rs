//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the worker pool that drives a crawl:
//! - Seeding the frontier with the sanitized seed URL
//! - Pass 1: a pool of workers drains the frontier, deferring HTTP 429s
//! - Pass 2: a smaller pool re-fetches the deferred URLs once
//! - Collecting records and statistics for the final report

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchOutcome};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{extract, ExtractedPage};
use crate::crawler::retry::RetryList;
use crate::output::{Aggregator, CrawlStatistics, Report};
use crate::state::UrlState;
use crate::url::{domain_of, is_pagination, sanitize, Domain, NormalizedUrl};
use crate::SiftError;
use reqwest::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// Which drain of the frontier a worker belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// First pass over everything reachable from the seed
    Initial,
    /// Single retry of URLs rate limited in the first pass
    Retry,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Initial => f.write_str("initial"),
            Pass::Retry => f.write_str("retry"),
        }
    }
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub report: Report,
    pub stats: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    seed: NormalizedUrl,
    domain: Domain,
    frontier: Arc<Frontier>,
    aggregator: Arc<Aggregator>,
    retry: Arc<RetryList>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `seed` - Raw seed URL, with or without scheme
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SiftError::Config)` - The configuration failed validation
    /// * `Err(SiftError::InvalidInput)` - The seed is not a usable URL
    /// * `Err(SiftError::Http)` - The HTTP client could not be built
    pub fn new(config: Config, seed: &str) -> Result<Self, SiftError> {
        validate(&config)?;
        let seed = sanitize(seed)?;
        let domain = domain_of(seed.as_str())?;
        let client = build_http_client(&config)?;

        Ok(Self {
            config: Arc::new(config),
            client,
            seed,
            domain,
            frontier: Arc::new(Frontier::new()),
            aggregator: Arc::new(Aggregator::new()),
            retry: Arc::new(RetryList::new()),
        })
    }

    pub fn seed(&self) -> &NormalizedUrl {
        &self.seed
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs both passes and returns the report
    ///
    /// Per-URL failures never abort the crawl, and neither does a worker
    /// task dying: whatever was recorded still makes it into the report.
    pub async fn run(&self) -> CrawlOutcome {
        let start_time = Instant::now();
        tracing::info!("Starting crawl of {} (domain {})", self.seed, self.domain);

        self.frontier.enqueue([self.seed.clone()]);
        self.run_pass(Pass::Initial, self.config.crawler.workers)
            .await;

        let deferred = self.retry.take();
        let retried = self.frontier.readmit(&deferred);
        let mut dropped_after_retry = 0;

        if retried > 0 {
            tracing::info!("Retrying {} rate-limited URLs", retried);
            self.run_pass(Pass::Retry, self.config.crawler.retry_workers)
                .await;

            let still_limited = self.retry.take();
            dropped_after_retry = still_limited.len();
            for url in &still_limited {
                tracing::warn!("Dropping {}: still rate limited after retry", url);
            }
        }

        let report = self.aggregator.finalize();
        let stats = CrawlStatistics {
            urls_by_state: self.frontier.state_counts(),
            pages_recorded: report.rows.len(),
            retried,
            dropped_after_retry,
            columns: report.columns.len(),
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} pages recorded, {} URLs seen in {:?}",
            stats.pages_recorded,
            stats.total_urls(),
            stats.elapsed
        );

        CrawlOutcome { report, stats }
    }

    /// Runs one pool of workers until the frontier drains
    async fn run_pass(&self, pass: Pass, workers: usize) {
        tracing::info!("Starting {} pass with {} workers", pass, workers);

        let mut pool = JoinSet::new();
        for id in 0..workers {
            let worker = Worker {
                id,
                pass,
                client: self.client.clone(),
                config: Arc::clone(&self.config),
                domain: self.domain.clone(),
                frontier: Arc::clone(&self.frontier),
                aggregator: Arc::clone(&self.aggregator),
                retry: Arc::clone(&self.retry),
            };
            pool.spawn(worker.run());
        }

        let processed = join_workers(pool).await;
        tracing::info!(
            "Finished {} pass: {} URLs processed, {} known",
            pass,
            processed,
            self.frontier.known_len()
        );
    }
}

/// Waits for every worker and sums the URLs they processed
///
/// A worker that panicked is logged and skipped. Its claim has already
/// settled as `Dropped`, so the rest of the pool keeps draining.
async fn join_workers(mut pool: JoinSet<usize>) -> usize {
    let mut processed = 0;
    while let Some(result) = pool.join_next().await {
        match result {
            Ok(count) => processed += count,
            Err(e) => tracing::error!("Worker task failed: {}", e),
        }
    }
    processed
}

/// One member of a pass's worker pool
///
/// Owns handles to the shared frontier, aggregator and retry list; each sits
/// behind its own lock.
struct Worker {
    id: usize,
    pass: Pass,
    client: Client,
    config: Arc<Config>,
    domain: Domain,
    frontier: Arc<Frontier>,
    aggregator: Arc<Aggregator>,
    retry: Arc<RetryList>,
}

impl Worker {
    /// Claims and processes URLs until the pass drains
    async fn run(self) -> usize {
        let mut processed = 0;

        while let Some(claim) = self.frontier.next().await {
            let outcome = self.process(claim.url()).await;
            claim.finish(outcome);
            processed += 1;
        }

        tracing::debug!("Worker {} ({} pass) exiting after {} URLs", self.id, self.pass, processed);
        processed
    }

    /// Processes a single claimed URL and returns its final state
    ///
    /// Discovered links are queued here, before the claim settles.
    async fn process(&self, url: &NormalizedUrl) -> UrlState {
        if is_pagination(url.as_str()) {
            tracing::debug!("Skipping pagination link {}", url);
            return UrlState::Dropped;
        }

        let page = match fetch_url(&self.client, url).await {
            FetchOutcome::Fetched(page) => {
                if page.was_redirected(url) {
                    tracing::debug!("{} redirected to {}", url, page.final_url);
                }
                page
            }
            FetchOutcome::Failed(e) => {
                tracing::warn!("Failed to retrieve {}: {}", url, e);
                return UrlState::Dropped;
            }
        };

        if page.is_rate_limited() {
            self.retry.push(url.clone());
            return match self.pass {
                Pass::Initial => {
                    tracing::info!("{} rate limited, deferring to retry pass", url);
                    UrlState::RateLimited
                }
                Pass::Retry => UrlState::Dropped,
            };
        }

        let Some(ExtractedPage { record, links }) =
            extract(url, &page, &self.domain, &self.config.crawler.heading_levels)
        else {
            return UrlState::Dropped;
        };

        self.aggregator.merge_fields(record.field_names());
        self.aggregator.record(record);

        let queued = self.frontier.enqueue(links);
        tracing::debug!("{}: queued {} new links", url, queued);
        tracing::info!("{} ✅", url);

        UrlState::Completed
    }
}
