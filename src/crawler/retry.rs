//! Rate-limited URLs collected during a pass

use crate::url::NormalizedUrl;
use std::sync::{Mutex, PoisonError};

/// URLs whose fetch returned HTTP 429
///
/// Filled by workers during a pass and drained once by the coordinator
/// afterwards. Guarded by its own lock, independent of the frontier.
#[derive(Debug, Default)]
pub struct RetryList {
    urls: Mutex<Vec<NormalizedUrl>>,
}

impl RetryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, url: NormalizedUrl) {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url);
    }

    /// Removes and returns every collected URL
    pub fn take(&self) -> Vec<NormalizedUrl> {
        std::mem::take(&mut *self.urls.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url::normalize;

    #[test]
    fn test_take_drains() {
        let list = RetryList::new();
        list.push(normalize("http://a.com/1"));
        list.push(normalize("http://a.com/2"));
        assert_eq!(list.len(), 2);

        let taken = list.take();
        assert_eq!(taken.len(), 2);
        assert!(list.is_empty());
        assert!(list.take().is_empty());
    }
}
