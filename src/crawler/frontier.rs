//! Crawl frontier: the pending queue and the per-URL state map
//!
//! The frontier is the only structure workers contend on for scheduling.
//! One mutex guards both the FIFO pending queue and the state map, so the
//! check-and-claim of a URL is a single critical section: a URL moves from
//! `Pending` to `Claimed` exactly once per pass, however many pages link
//! to it concurrently.
//!
//! A pass drains when the pending queue is empty and no claim is
//! outstanding. Workers waiting in [`Frontier::next`] are woken whenever a
//! URL is queued or the last outstanding claim settles, so shutdown does not
//! depend on a fixed idle timeout racing slow responses.

use crate::state::UrlState;
use crate::url::NormalizedUrl;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct FrontierState {
    /// URLs waiting to be claimed, in discovery order
    pending: VecDeque<NormalizedUrl>,

    /// Every URL ever queued and where it stands
    states: HashMap<NormalizedUrl, UrlState>,

    /// Claims handed out and not yet settled
    in_flight: usize,
}

impl FrontierState {
    fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.in_flight == 0
    }
}

/// Shared work queue plus visited states for one crawl
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<FrontierState>,
    notify: Notify,
}

/// Exclusive right to process one URL
///
/// Settles back into the frontier when dropped. The outcome defaults to
/// `Dropped`, so a worker that unwinds mid-fetch cannot leave the pass
/// waiting on a claim that will never finish.
#[derive(Debug)]
pub struct Claim {
    frontier: Arc<Frontier>,
    url: NormalizedUrl,
    outcome: UrlState,
}

impl Claim {
    pub fn url(&self) -> &NormalizedUrl {
        &self.url
    }

    /// Settles the claim with its final state for this pass
    ///
    /// Links discovered while processing must be queued before calling
    /// this, otherwise the pass may be seen as drained too early.
    pub fn finish(mut self, outcome: UrlState) {
        self.outcome = outcome;
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.frontier.settle(&self.url, self.outcome);
    }
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues every URL the frontier has never seen
    ///
    /// URLs already pending, claimed or finished are ignored. Returns the
    /// number of URLs actually queued.
    pub fn enqueue<I>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = NormalizedUrl>,
    {
        let mut inner = self.lock();
        let mut added = 0;

        for url in urls {
            if inner.states.contains_key(&url) {
                continue;
            }
            inner.states.insert(url.clone(), UrlState::Pending);
            inner.pending.push_back(url);
            added += 1;
        }

        if added > 0 {
            self.notify.notify_waiters();
        }

        added
    }

    /// Re-admits rate-limited URLs for the retry pass
    ///
    /// This is the one path that bypasses the visited check: each URL moves
    /// `RateLimited -> Pending` and is queued again. URLs in any other state
    /// are left alone. Returns the number of URLs re-queued.
    pub fn readmit(&self, urls: &[NormalizedUrl]) -> usize {
        let mut inner = self.lock();
        let mut added = 0;

        for url in urls {
            match inner.states.get_mut(url) {
                Some(state) if state.can_transition_to(UrlState::Pending) => {
                    *state = UrlState::Pending;
                }
                _ => continue,
            }
            inner.pending.push_back(url.clone());
            added += 1;
        }

        if added > 0 {
            self.notify.notify_waiters();
        }

        added
    }

    /// Waits for the next URL to process
    ///
    /// Returns `None` once the pass is drained: nothing pending and no claim
    /// outstanding that could still queue more work.
    pub async fn next(self: &Arc<Self>) -> Option<Claim> {
        loop {
            let notified = {
                let mut inner = self.lock();

                while let Some(url) = inner.pending.pop_front() {
                    let state = inner
                        .states
                        .entry(url.clone())
                        .or_insert(UrlState::Pending);

                    if !state.can_transition_to(UrlState::Claimed) {
                        tracing::trace!("Skipping already visited {}", url);
                        continue;
                    }
                    *state = UrlState::Claimed;
                    inner.in_flight += 1;

                    tracing::trace!("Claimed {}", url);
                    return Some(Claim {
                        frontier: Arc::clone(self),
                        url,
                        outcome: UrlState::Dropped,
                    });
                }

                if inner.in_flight == 0 {
                    // Wake the other idle workers so they see the drain too
                    self.notify.notify_waiters();
                    return None;
                }

                // Registered before the lock is released, so a wakeup sent
                // between unlock and await is not lost
                self.notify.notified()
            };

            notified.await;
        }
    }

    fn settle(&self, url: &NormalizedUrl, outcome: UrlState) {
        let mut inner = self.lock();

        if let Some(state) = inner.states.get_mut(url) {
            if state.can_transition_to(outcome) {
                *state = outcome;
            } else {
                // Runs from Drop, so never panic here
                tracing::error!("Illegal transition {} -> {} for {}", state, outcome, url);
                *state = UrlState::Dropped;
            }
        }
        inner.in_flight = inner.in_flight.saturating_sub(1);

        if inner.is_drained() {
            self.notify.notify_waiters();
        }
    }

    /// Current state of a URL, if the frontier has seen it
    pub fn state_of(&self, url: &NormalizedUrl) -> Option<UrlState> {
        self.lock().states.get(url).copied()
    }

    /// Number of distinct URLs the frontier has seen
    pub fn known_len(&self) -> usize {
        self.lock().states.len()
    }

    /// Returns true if nothing is pending and no claim is outstanding
    pub fn is_drained(&self) -> bool {
        self.lock().is_drained()
    }

    /// Count of known URLs by state
    pub fn state_counts(&self) -> BTreeMap<UrlState, usize> {
        let inner = self.lock();
        let mut counts = BTreeMap::new();
        for state in inner.states.values() {
            *counts.entry(*state).or_insert(0) += 1;
        }
        counts
    }
}
