//! # JobScout Store
//!
//! Persistent job storage and the staleness-gated query cache.
//!
//! [`JobStore`] owns the indexed [`JobRecord`]s: the read path only ever
//! queries it, the background refresh upserts into it. [`QueryCache`] maps
//! query fingerprints to their last successful refresh time and decides,
//! per request, whether a background refresh must be triggered.
//!
//! [`JobRecord`]: jobscout_protocol::JobRecord

mod cache;
mod error;
mod store;

pub use cache::{CacheEntry, QueryCache};
pub use error::{Result, StoreError};
pub use store::{JobStore, SharedJobStore};
