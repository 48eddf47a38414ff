//! Cache Module
//!
//! Read cache placed in front of the skip list.
//!
//! ## Responsibilities
//! - Bound memory by entry count (LRU eviction on overflow)
//! - Bound staleness by time (absolute expiry per entry)
//! - Sweep expired entries in the background, independent of traffic
//!
//! ## Entry Lifecycle
//! ```text
//!            put                       get (live)
//!  Absent ─────────▶ Live ◀───────────────────────┐
//!    ▲                │ └──────────────────────────┘
//!    │                │ expiry seen by get/sweep,
//!    └────────────────┘ erase, or LRU eviction
//! ```

mod lru;
mod recency;
mod sweeper;

pub use lru::{CacheStats, LruTtlCache};
