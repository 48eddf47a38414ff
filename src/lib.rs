//! # SkipKV
//!
//! An ordered in-memory key-value index with:
//! - A skip list giving expected O(log n) insert/search/delete
//! - A read cache with LRU eviction and per-entry TTL
//! - A background sweeper that expires cache entries without traffic
//! - A plain-text dump/load format
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Engine                              │
//! │            insert / search / delete / dump / load            │
//! └──────────┬──────────────────────┬───────────────────────────┘
//!            │ search (read-through)│ insert / delete
//!            ▼                      ▼
//!   ┌─────────────────┐     ┌─────────────────┐
//!   │  LruTtlCache    │     │    SkipList     │
//!   │  (Mutex)        │◀────│   (RwLock)      │
//!   │  + sweeper      │erase│                 │
//!   └─────────────────┘     └────────┬────────┘
//!                                    │ level-0 walk / replay
//!                                    ▼
//!                           ┌─────────────────┐
//!                           │   Dump File     │
//!                           │  key:value\n    │
//!                           └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod skiplist;
pub mod cache;
pub mod persist;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SkipKvError, Result};
pub use config::Config;
pub use engine::Engine;
pub use skiplist::InsertStatus;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SkipKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
