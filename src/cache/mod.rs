//! Cache module for keeping the last fetched reviews
//!
//! This module provides key-value stores (file-backed and in-memory) and a
//! review cache that persists the review payload and its store time under
//! two configurable keys, with a time-to-live after which the entry is
//! ignored.

mod reviews;
mod store;

pub use reviews::{
    CachePolicy, ReviewCache, DEFAULT_PAYLOAD_KEY, DEFAULT_TIMESTAMP_KEY, DEFAULT_TTL_HOURS,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
