/// URL state definitions for tracking crawl progress
///
/// This module defines all possible states a URL can be in during a crawl.
use std::fmt;

/// Represents the current state of a URL in the crawl process
///
/// ```text
/// Pending -> Claimed -> Completed
///                    -> RateLimited -> Pending (retry pass)
///                    -> Dropped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UrlState {
    // ===== Active States =====
    /// URL is known and waiting in the pending queue
    Pending,

    /// URL has been claimed by exactly one worker and is being processed
    Claimed,

    // ===== Terminal States =====
    /// URL was fetched and its record handed to the aggregator
    Completed,

    /// URL returned HTTP 429 and is waiting for the retry pass
    RateLimited,

    /// URL was dropped (pagination, fetch error, non-HTML, rate limited twice)
    Dropped,
}

impl UrlState {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: UrlState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Claimed)
                | (Self::Claimed, Self::Completed)
                | (Self::Claimed, Self::RateLimited)
                | (Self::Claimed, Self::Dropped)
                | (Self::RateLimited, Self::Pending)
        )
    }

    /// Short lowercase label used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Claimed => "claimed",
            Self::Completed => "completed",
            Self::RateLimited => "rate_limited",
            Self::Dropped => "dropped",
        }
    }

    /// Returns all possible URL states
    pub fn all_states() -> [Self; 5] {
        [
            Self::Pending,
            Self::Claimed,
            Self::Completed,
            Self::RateLimited,
            Self::Dropped,
        ]
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
