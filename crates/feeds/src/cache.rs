//! Time-stamped snapshot cache with a freshness window.
//!
//! The cache is an owned value: whoever runs detection passes keeps one and
//! hands the cached snapshot to the engine. Time is passed in explicitly as
//! milliseconds so callers (and tests) control the clock.

use tracing::debug;

/// Default freshness window (60 seconds).
pub const DEFAULT_FRESHNESS_MS: u64 = 60_000;

/// Something that can produce a complete snapshot on demand.
pub trait SnapshotSource {
    type Snapshot;
    type Error;

    fn fetch(&mut self) -> Result<Self::Snapshot, Self::Error>;
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    fetched_at_ms: u64,
}

/// Holds the last fetched snapshot and when it was fetched.
#[derive(Debug, Clone)]
pub struct SnapshotCache<T> {
    freshness_ms: u64,
    entry: Option<Entry<T>>,
}

impl<T> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS_MS)
    }
}

impl<T> SnapshotCache<T> {
    pub fn new(freshness_ms: u64) -> Self {
        Self {
            freshness_ms,
            entry: None,
        }
    }

    pub fn freshness_ms(&self) -> u64 {
        self.freshness_ms
    }

    /// True while `now_ms - fetched_at_ms < freshness_ms`.
    ///
    /// A clock that went backwards counts as age 0.
    pub fn is_fresh(&self, now_ms: u64) -> bool {
        self.entry
            .as_ref()
            .is_some_and(|entry| now_ms.saturating_sub(entry.fetched_at_ms) < self.freshness_ms)
    }

    /// Cached value and its fetch time, regardless of freshness.
    pub fn peek(&self) -> Option<(&T, u64)> {
        self.entry.as_ref().map(|entry| (&entry.value, entry.fetched_at_ms))
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Return the cached snapshot while fresh, otherwise fetch and store a new one.
    ///
    /// On a failed fetch the previous value is kept and the error returned.
    pub fn get_or_refresh<S>(&mut self, now_ms: u64, source: &mut S) -> Result<&T, S::Error>
    where
        S: SnapshotSource<Snapshot = T>,
    {
        let fresh = self.is_fresh(now_ms);
        let entry = match self.entry.take() {
            Some(entry) if fresh => entry,
            previous => {
                debug!("Snapshot cache stale at {}, refreshing", now_ms);
                match source.fetch() {
                    Ok(value) => Entry {
                        value,
                        fetched_at_ms: now_ms,
                    },
                    Err(err) => {
                        self.entry = previous;
                        return Err(err);
                    }
                }
            }
        };

        Ok(&self.entry.insert(entry).value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Counter {
        calls: u32,
        fail: bool,
    }

    impl SnapshotSource for Counter {
        type Snapshot = u32;
        type Error = &'static str;

        fn fetch(&mut self) -> Result<u32, &'static str> {
            if self.fail {
                return Err("down");
            }
            self.calls += 1;
            Ok(self.calls)
        }
    }

    #[test]
    fn test_fresh_value_is_reused() {
        let mut cache = SnapshotCache::new(1_000);
        let mut source = Counter { calls: 0, fail: false };

        assert_eq!(*cache.get_or_refresh(10_000, &mut source).unwrap(), 1);
        assert_eq!(*cache.get_or_refresh(10_999, &mut source).unwrap(), 1);
        assert_eq!(source.calls, 1);

        // window is exclusive
        assert_eq!(*cache.get_or_refresh(11_000, &mut source).unwrap(), 2);
        assert_eq!(cache.peek(), Some((&2, 11_000)));
    }

    #[test]
    fn test_invalidate_forces_refresh() {
        let mut cache = SnapshotCache::default();
        let mut source = Counter { calls: 0, fail: false };

        cache.get_or_refresh(0, &mut source).unwrap();
        assert!(cache.is_fresh(DEFAULT_FRESHNESS_MS - 1));
        cache.invalidate();
        assert!(!cache.is_fresh(1));
        assert_eq!(*cache.get_or_refresh(1, &mut source).unwrap(), 2);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_value() {
        let mut cache = SnapshotCache::new(100);
        let mut source = Counter { calls: 0, fail: false };
        cache.get_or_refresh(0, &mut source).unwrap();

        source.fail = true;
        assert_eq!(cache.get_or_refresh(500, &mut source), Err("down"));
        assert_eq!(cache.peek(), Some((&1, 0)));
    }

    #[test]
    fn test_clock_going_backwards_counts_as_fresh() {
        let mut cache = SnapshotCache::new(100);
        let mut source = Counter { calls: 0, fail: false };
        cache.get_or_refresh(1_000, &mut source).unwrap();
        assert!(cache.is_fresh(900));
    }
}
