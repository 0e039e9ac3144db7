//! Crawl statistics
//!
//! This module summarizes how every URL the frontier ever saw ended up,
//! and prints that summary once the report has been written.

use crate::state::UrlState;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Count of known URLs by final state
    pub urls_by_state: BTreeMap<UrlState, usize>,

    /// Number of records written to the report
    pub pages_recorded: usize,

    /// Number of URLs re-fetched in the retry pass
    pub retried: usize,

    /// URLs still rate limited after the retry pass
    pub dropped_after_retry: usize,

    /// Number of report columns
    pub columns: usize,

    /// Wall-clock time of both passes
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Total number of distinct URLs known to the frontier
    pub fn total_urls(&self) -> usize {
        self.urls_by_state.values().sum()
    }

    /// Number of URLs that ended in `state`
    pub fn count(&self, state: UrlState) -> usize {
        self.urls_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Percentage of known URLs that produced a record
    pub fn success_rate(&self) -> f64 {
        let total = self.total_urls();
        if total == 0 {
            return 0.0;
        }
        (self.count(UrlState::Completed) as f64 / total as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics, report_path: Option<&Path>) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  URLs discovered: {}", stats.total_urls());
    println!("  Pages recorded: {}", stats.pages_recorded);
    println!("  Report columns: {}", stats.columns);
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!("URLs by State:");
    for state in UrlState::all_states() {
        let count = stats.count(state);
        if count > 0 {
            println!("  {}: {}", state, count);
        }
    }
    println!();

    if stats.retried > 0 {
        println!(
            "Retry pass: {} retried, {} still rate limited and dropped",
            stats.retried, stats.dropped_after_retry
        );
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} URLs recorded)",
        stats.success_rate(),
        stats.count(UrlState::Completed),
        stats.total_urls()
    );

    if let Some(path) = report_path {
        println!("Report: {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut stats = CrawlStatistics::default();
        stats.urls_by_state.insert(UrlState::Completed, 8);
        stats.urls_by_state.insert(UrlState::Dropped, 2);

        assert_eq!(stats.total_urls(), 10);
        assert_eq!(stats.count(UrlState::Completed), 8);
        assert_eq!(stats.count(UrlState::RateLimited), 0);
    }

    #[test]
    fn test_success_rate() {
        let mut stats = CrawlStatistics::default();
        stats.urls_by_state.insert(UrlState::Completed, 3);
        stats.urls_by_state.insert(UrlState::Dropped, 1);

        assert!((stats.success_rate() - 75.0).abs() < 0.01);
    }

    #[test]
    fn test_success_rate_zero_urls() {
        assert_eq!(CrawlStatistics::default().success_rate(), 0.0);
    }
}
