//! Skip List Module
//!
//! Ordered in-memory index over totally-ordered keys.
//!
//! ## Responsibilities
//! - Expected O(log n) insert, lookup and removal
//! - Sorted level-0 walk for dumps
//! - Diagnostic rendering of every level
//!
//! ## Layout
//! ```text
//! Level 2: HEAD ──────────────────────▶ [7] ─────────────────▶ nil
//! Level 1: HEAD ──────────▶ [3] ──────▶ [7] ──────▶ [9] ─────▶ nil
//! Level 0: HEAD ─▶ [1] ───▶ [3] ─▶ [5] ▶ [7] ─▶ [8] ▶ [9] ───▶ nil
//! ```
//!
//! Nodes live in an arena and link to each other by slot index. The list
//! itself is not synchronized; `Engine` wraps it in a lock.

mod level;
mod list;
mod node;

pub use level::{CoinFlipLevels, LevelGenerator};
pub use list::{Iter, SkipList};

/// Outcome of an insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertStatus {
    /// The key was new and is now stored
    Inserted,

    /// The key was already present; nothing changed
    AlreadyExists,
}
