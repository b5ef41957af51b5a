//! Time-limited cache of the last successfully fetched review set
//!
//! The review payload and the time it was stored live under two separate
//! keys of a `KeyValueStore`. Stale entries are not deleted; the next
//! successful fetch overwrites them.

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use super::store::{KeyValueStore, StoreError};
use crate::data::Review;

/// Default key for the serialized review payload
pub const DEFAULT_PAYLOAD_KEY: &str = "google_reviews_cache";

/// Default key for the epoch-millisecond timestamp
pub const DEFAULT_TIMESTAMP_KEY: &str = "google_reviews_cache_time";

/// Default time-to-live for cached reviews in hours
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Where and for how long reviews are cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// Key holding the JSON review payload
    pub payload_key: String,
    /// Key holding the epoch-millisecond store time
    pub timestamp_key: String,
    /// Maximum age at which a cached set is still used
    pub ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            payload_key: DEFAULT_PAYLOAD_KEY.to_string(),
            timestamp_key: DEFAULT_TIMESTAMP_KEY.to_string(),
            ttl: Duration::hours(DEFAULT_TTL_HOURS),
        }
    }
}

impl CachePolicy {
    /// A policy whose keys share `prefix`, with the default ttl
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            payload_key: format!("{}_cache", prefix),
            timestamp_key: format!("{}_cache_time", prefix),
            ..Self::default()
        }
    }

    /// Replace the ttl
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Whether an entry stored at `stored_at_millis` is still usable at `now_millis`
    pub fn is_fresh(&self, stored_at_millis: i64, now_millis: i64) -> bool {
        now_millis.saturating_sub(stored_at_millis) < self.ttl.num_milliseconds()
    }
}

/// Reads and writes the cached review set through a store
#[derive(Debug)]
pub struct ReviewCache<S> {
    store: S,
    policy: CachePolicy,
}

impl<S: KeyValueStore> ReviewCache<S> {
    pub fn new(store: S, policy: CachePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the cached reviews if both keys are present, fresh and parseable
    ///
    /// An unparseable timestamp or payload is treated as a miss.
    pub fn get_cached_reviews(&self) -> Option<Vec<Review>> {
        self.read_at(Utc::now().timestamp_millis())
    }

    /// Like `get_cached_reviews`, evaluated at an explicit time
    pub fn read_at(&self, now_millis: i64) -> Option<Vec<Review>> {
        let payload = self.store.get(&self.policy.payload_key)?;
        let stamp = self.store.get(&self.policy.timestamp_key)?;

        let stored_at: i64 = match stamp.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "ignoring cached reviews with unreadable timestamp");
                return None;
            }
        };

        if !self.policy.is_fresh(stored_at, now_millis) {
            debug!(
                age_ms = now_millis.saturating_sub(stored_at),
                "cached reviews are stale"
            );
            return None;
        }

        match serde_json::from_str(&payload) {
            Ok(reviews) => Some(reviews),
            Err(e) => {
                debug!(error = %e, "ignoring unparseable cached reviews");
                None
            }
        }
    }

    /// Stores `reviews` with the current time, overwriting any previous entry
    ///
    /// Failures are logged and swallowed; the widget keeps working uncached.
    pub fn cache_reviews(&self, reviews: &[Review]) {
        if let Err(e) = self.write_at(reviews, Utc::now().timestamp_millis()) {
            warn!(error = %e, "failed to cache reviews");
        }
    }

    /// Stores `reviews` as if written at `now_millis`
    pub fn write_at(&self, reviews: &[Review], now_millis: i64) -> Result<(), StoreError> {
        let payload = serde_json::to_string(reviews)?;

        self.store.set(&self.policy.payload_key, &payload)?;
        self.store
            .set(&self.policy.timestamp_key, &now_millis.to_string())
    }
}
