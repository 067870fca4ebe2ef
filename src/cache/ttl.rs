//! Single-value cache with a freshness window.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use metrics::counter;

use super::clock::Clock;
use super::lock::{rw_read, rw_write};

pub const METRIC_CACHE_HIT: &str = "pond_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "pond_cache_miss_total";

const SOURCE: &str = "cache::ttl";

struct Entry<T> {
    value: Arc<T>,
    stored_at: Instant,
}

/// Holds at most one value and treats it as stale once `ttl` has elapsed.
///
/// Refreshes are not coalesced: concurrent writers each store their own
/// value and the last one wins.
pub struct TtlCache<T> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<Entry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl,
            clock,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value if it is still fresh.
    pub fn get(&self) -> Option<Arc<T>> {
        let now = self.clock.now();
        let guard = rw_read(&self.entry, SOURCE, "get");
        let fresh = guard
            .as_ref()
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| Arc::clone(&entry.value));

        match fresh {
            Some(value) => {
                counter!(METRIC_CACHE_HIT, "cache" => self.name).increment(1);
                Some(value)
            }
            None => {
                counter!(METRIC_CACHE_MISS, "cache" => self.name).increment(1);
                None
            }
        }
    }

    /// Store `value`, restarting the freshness window.
    pub fn set(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        *rw_write(&self.entry, SOURCE, "set") = Some(Entry {
            value: Arc::clone(&value),
            stored_at: self.clock.now(),
        });
        value
    }

    pub fn clear(&self) {
        *rw_write(&self.entry, SOURCE, "clear") = None;
    }
}
