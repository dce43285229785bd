//! Per-reason skip counters.

use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

/// Counts items skipped during a pass, grouped by reason.
///
/// Reasons are kept in first-seen order so log lines are stable
/// between identical runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipCounter<R: Hash + Eq> {
    counts: IndexMap<R, usize>,
}

impl<R: Hash + Eq> Default for SkipCounter<R> {
    fn default() -> Self {
        Self {
            counts: IndexMap::new(),
        }
    }
}

impl<R: Hash + Eq> SkipCounter<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reason: R) {
        *self.counts.entry(reason).or_insert(0) += 1;
    }

    pub fn get(&self, reason: &R) -> usize {
        self.counts.get(reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&R, usize)> {
        self.counts.iter().map(|(reason, count)| (reason, *count))
    }
}

impl<R: Hash + Eq + fmt::Display> fmt::Display for SkipCounter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return f.write_str("none");
        }
        for (i, (reason, count)) in self.counts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", reason, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_total() {
        let mut counter = SkipCounter::new();
        counter.record("low volume");
        counter.record("low volume");
        counter.record("bad price");

        assert_eq!(counter.get(&"low volume"), 2);
        assert_eq!(counter.get(&"bad price"), 1);
        assert_eq!(counter.get(&"missing"), 0);
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn test_display_keeps_first_seen_order() {
        let mut counter = SkipCounter::new();
        counter.record("b");
        counter.record("a");
        counter.record("b");

        assert_eq!(counter.to_string(), "b: 2, a: 1");
        assert_eq!(SkipCounter::<&str>::new().to_string(), "none");
    }
}
