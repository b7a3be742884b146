use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of a namespace's hit/miss counters.
///
/// Counters start at zero when the store is constructed and are never
/// persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
}

impl StoreStats {
    pub fn lookups(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }

    /// `100 * hits / (hits + misses)`, or `None` before the first lookup.
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.lookups();
        if total == 0 {
            return None;
        }
        Some(100.0 * self.hits as f64 / total as f64)
    }
}

#[derive(Debug, Default)]
pub(crate) struct HitCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HitCounters {
    pub(crate) fn record_hit(&self) -> StoreStats {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.snapshot()
    }

    pub(crate) fn record_miss(&self) -> StoreStats {
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.snapshot()
    }

    pub(crate) fn snapshot(&self) -> StoreStats {
        StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
