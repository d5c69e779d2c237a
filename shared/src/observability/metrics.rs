//! In-process vote outcome counters

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

/// Simple counter registry shared by all request handlers
pub struct MetricsCollector {
    counters: RwLock<HashMap<&'static str, AtomicU64>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// Increment a counter, registering it on first use
    pub fn increment(&self, name: &'static str) {
        if let Some(counter) = self.counters.read().get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }

        self.counters
            .write()
            .entry(name)
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .read()
            .get(name)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let counters = self
            .counters
            .read()
            .iter()
            .map(|(name, value)| (name.to_string(), value.load(Ordering::Relaxed)))
            .collect();

        MetricsSnapshot { counters }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of all counters, ordered by name
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub counters: BTreeMap<String, u64>,
}

/// Vote pipeline metric names
pub mod metric_names {
    pub const VOTES_SUBMITTED: &str = "votes_submitted";
    pub const VOTES_DELIVERED: &str = "votes_delivered";
    pub const VOTES_REJECTED_INVALID: &str = "votes_rejected_invalid";
    pub const VOTES_MISSING_IDENTITY: &str = "votes_missing_identity";
    pub const VOTES_BUSY: &str = "votes_busy";
    pub const VOTES_FAILED: &str = "votes_failed";
    pub const VOTES_PRODUCER_UNAVAILABLE: &str = "votes_producer_unavailable";
    pub const VOTERS_MINTED: &str = "voters_minted";
}

#[cfg(test)]
mod tests {
    use super::metric_names::*;
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counter() {
        let metrics = MetricsCollector::new();
        assert_eq!(metrics.get(VOTES_SUBMITTED), 0);

        metrics.increment(VOTES_SUBMITTED);
        metrics.increment(VOTES_SUBMITTED);
        assert_eq!(metrics.get(VOTES_SUBMITTED), 2);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let metrics = MetricsCollector::new();
        metrics.increment(VOTES_FAILED);
        metrics.increment(VOTES_BUSY);

        let snapshot = metrics.snapshot();
        let names: Vec<_> = snapshot.counters.keys().cloned().collect();
        assert_eq!(names, vec![VOTES_BUSY.to_string(), VOTES_FAILED.to_string()]);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let metrics = Arc::new(MetricsCollector::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = metrics.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.increment(VOTES_DELIVERED);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.get(VOTES_DELIVERED), 8000);
    }
}
