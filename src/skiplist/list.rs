//! Skip list implementation
//!
//! Arena-backed skip list. All structural work happens through `&mut self`;
//! callers that share a list across threads provide the locking.

use std::fmt;

use generational_arena::Arena;

use super::level::{CoinFlipLevels, LevelGenerator};
use super::node::{Link, Node, NodeId};
use super::InsertStatus;

/// Ordered map with expected logarithmic insert, lookup and removal
pub struct SkipList<K, V> {
    /// Highest level any node may be assigned
    max_level: usize,

    /// Current highest active level (0 when empty)
    level: usize,

    /// Header sentinel links; length is always `level + 1`
    head: Vec<Option<NodeId>>,

    /// Owns every node
    nodes: Arena<Node<K, V>>,

    levels: Box<dyn LevelGenerator>,
}

impl<K: Ord, V> SkipList<K, V> {
    /// Create an empty list with levels drawn from OS entropy
    pub fn new(max_level: usize) -> Self {
        Self::with_level_generator(max_level, Box::new(CoinFlipLevels::from_entropy()))
    }

    /// Create an empty list whose level assignment is reproducible
    pub fn with_seed(max_level: usize, seed: u64) -> Self {
        Self::with_level_generator(max_level, Box::new(CoinFlipLevels::seeded(seed)))
    }

    /// Create an empty list with a caller-supplied level source
    pub fn with_level_generator(max_level: usize, levels: Box<dyn LevelGenerator>) -> Self {
        Self {
            max_level,
            level: 0,
            head: vec![None],
            nodes: Arena::new(),
            levels,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Insert a key/value pair
    ///
    /// An existing key is left untouched and `AlreadyExists` is returned.
    pub fn insert(&mut self, key: K, value: V) -> InsertStatus {
        let mut update = self.predecessors(&key);

        if let Some(next) = self.next(update[0], 0) {
            if self.nodes[next].key == key {
                return InsertStatus::AlreadyExists;
            }
        }

        let node_level = self.levels.random_level(self.max_level).min(self.max_level);
        if node_level > self.level {
            // New top levels start straight from the header
            self.head.resize(node_level + 1, None);
            update.resize(node_level + 1, Link::Head);
            self.level = node_level;
        }

        let id = self.nodes.insert(Node::new(key, value, node_level));
        for (level, &pred) in update.iter().enumerate().take(node_level + 1) {
            let succ = self.next(pred, level);
            self.nodes[id].forward[level] = succ;
            self.set_next(pred, level, Some(id));
        }

        InsertStatus::Inserted
    }

    /// Look up a key
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.nodes[id].value)
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Remove a key, returning its value if it was present
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let update = self.predecessors(key);

        let target = match self.next(update[0], 0) {
            Some(id) if self.nodes[id].key == *key => id,
            _ => return None,
        };

        // A node occupies a contiguous run of levels from 0, so the first
        // level whose predecessor skips it ends the unlinking.
        for (level, &pred) in update.iter().enumerate() {
            if self.next(pred, level) != Some(target) {
                break;
            }
            let succ = self.nodes[target].forward[level];
            self.set_next(pred, level, succ);
        }

        while self.level > 0 && self.head[self.level].is_none() {
            self.head.pop();
            self.level -= 1;
        }

        self.nodes.remove(target).map(|node| node.value)
    }

    /// Drop every node and reset to a single empty level
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = vec![None];
        self.level = 0;
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current highest active level
    pub fn level(&self) -> usize {
        self.level
    }

    /// Configured level cap
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Entries in ascending key order (the level-0 chain)
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            next: self.head[0],
        }
    }

    /// Keys linked at `level`, in chain order. Empty above the active level.
    pub fn level_keys(&self, level: usize) -> Vec<&K> {
        let mut keys = Vec::new();
        let mut cursor = self.head.get(level).copied().flatten();
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            keys.push(&node.key);
            cursor = node.forward[level];
        }
        keys
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn next(&self, from: Link, level: usize) -> Option<NodeId> {
        match from {
            Link::Head => self.head[level],
            Link::Node(id) => self.nodes[id].forward[level],
        }
    }

    fn set_next(&mut self, from: Link, level: usize, to: Option<NodeId>) {
        match from {
            Link::Head => self.head[level] = to,
            Link::Node(id) => self.nodes[id].forward[level] = to,
        }
    }

    /// Walk down from the top level and record, per level, the last position
    /// whose successor is not less than `key`
    fn predecessors(&self, key: &K) -> Vec<Link> {
        let mut update = vec![Link::Head; self.level + 1];
        let mut cursor = Link::Head;

        for level in (0..=self.level).rev() {
            while let Some(next) = self.next(cursor, level) {
                if self.nodes[next].key < *key {
                    cursor = Link::Node(next);
                } else {
                    break;
                }
            }
            update[level] = cursor;
        }

        update
    }

    /// Same descent as `predecessors` without recording anything
    fn find(&self, key: &K) -> Option<NodeId> {
        let mut cursor = Link::Head;

        for level in (0..=self.level).rev() {
            while let Some(next) = self.next(cursor, level) {
                if self.nodes[next].key < *key {
                    cursor = Link::Node(next);
                } else {
                    break;
                }
            }
        }

        self.next(cursor, 0)
            .filter(|&id| self.nodes[id].key == *key)
    }
}

impl<K, V> SkipList<K, V>
where
    K: Ord + fmt::Display,
    V: fmt::Display,
{
    /// Render every active level as `Level i: k<delim>v;k<delim>v;...`
    pub fn render(&self, delimiter: &str) -> String {
        let mut out = String::new();
        let _ = self.write_levels(&mut out, delimiter);
        out
    }

    fn write_levels(&self, out: &mut impl fmt::Write, delimiter: &str) -> fmt::Result {
        writeln!(out, "*****Skip List*****")?;
        for level in 0..=self.level {
            write!(out, "Level {}: ", level)?;
            let mut cursor = self.head[level];
            while let Some(id) = cursor {
                let node = &self.nodes[id];
                write!(out, "{}{}{};", node.key, delimiter, node.value)?;
                cursor = node.forward[level];
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl<K, V> fmt::Display for SkipList<K, V>
where
    K: Ord + fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_levels(f, ":")
    }
}

impl<K, V> fmt::Debug for SkipList<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipList")
            .field("max_level", &self.max_level)
            .field("level", &self.level)
            .field("len", &self.nodes.len())
            .finish()
    }
}

/// Ascending iterator over a skip list's entries
pub struct Iter<'a, K, V> {
    list: &'a SkipList<K, V>,
    next: Option<NodeId>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = &self.list.nodes[id];
        self.next = node.forward[0];
        Some((&node.key, &node.value))
    }
}
