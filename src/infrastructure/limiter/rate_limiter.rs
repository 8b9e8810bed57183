use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::{mapref::entry::Entry, DashMap};

/// Per-client counter for the current fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRecord {
    pub count: u32,
    pub reset_at: Instant,
}

impl RateRecord {
    fn fresh(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: now + window,
        }
    }

    /// The window is over only once `now` is strictly past `reset_at`.
    fn is_expired(&self, now: Instant) -> bool {
        now > self.reset_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Admitted; `count` is the number of admissions in the current window.
    Allowed { count: u32 },
    Limited,
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// --- Rate limiter store & eviction ---
type Key = String;

/// Fixed-window request counter keyed by client address.
///
/// Each key gets its own window, started lazily by its first request.
/// The map is bounded: expired records are swept periodically and, when
/// `max_clients` is reached, the record closest to expiry is evicted.
#[derive(Clone)]
pub struct FixedWindowLimiterStore {
    map: Arc<DashMap<Key, RateRecord>>,
    limit: u32,
    window: Duration,
    max_clients: usize,
}

impl FixedWindowLimiterStore {
    pub fn new(limit: u32, window: Duration, max_clients: usize) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            limit,
            window,
            max_clients: max_clients.max(1),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        if !self.map.contains_key(key) && self.map.len() >= self.max_clients {
            self.make_room(now);
        }

        // The entry guard holds the shard lock, so the read-modify-write
        // below is atomic for a given key.
        match self.map.entry(key.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(RateRecord::fresh(now, self.window));
                RateDecision::Allowed { count: 1 }
            }
            Entry::Occupied(mut entry) => {
                let record = entry.get_mut();
                if record.is_expired(now) {
                    *record = RateRecord::fresh(now, self.window);
                    RateDecision::Allowed { count: 1 }
                } else if record.count >= self.limit {
                    RateDecision::Limited
                } else {
                    record.count += 1;
                    RateDecision::Allowed { count: record.count }
                }
            }
        }
    }

    pub fn record(&self, key: &str) -> Option<RateRecord> {
        self.map.get(key).map(|r| *r)
    }

    pub fn tracked_clients(&self) -> usize {
        self.map.len()
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// Drops every record whose window has elapsed; returns how many were removed.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.map.len();
        self.map.retain(|_, record| !record.is_expired(now));
        before.saturating_sub(self.map.len())
    }

    fn make_room(&self, now: Instant) {
        if self.purge_expired_at(now) > 0 && self.map.len() < self.max_clients {
            return;
        }

        let oldest = self
            .map
            .iter()
            .min_by_key(|entry| entry.value().reset_at)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            tracing::debug!("Rate limiter full, evicting {}", key);
            self.map.remove(&key);
        }
    }
}
