//! Recency ordering
//!
//! Doubly-linked list of keys held in an arena. The head is the most recently
//! used key, the tail the least.

use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Slot<K> {
    key: K,
    prev: Option<Index>,
    next: Option<Index>,
}

#[derive(Debug)]
pub(crate) struct RecencyList<K> {
    slots: Arena<Slot<K>>,
    head: Option<Index>,
    tail: Option<Index>,
}

impl<K> RecencyList<K> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Arena::new(),
            head: None,
            tail: None,
        }
    }

    /// Add a key as most recently used and return its position
    pub(crate) fn push_front(&mut self, key: K) -> Index {
        let id = self.slots.insert(Slot {
            key,
            prev: None,
            next: None,
        });
        self.link_front(id);
        id
    }

    /// Make an existing position the most recently used
    pub(crate) fn move_to_front(&mut self, id: Index) {
        if self.head != Some(id) {
            self.unlink(id);
            self.link_front(id);
        }
    }

    /// Remove a position, returning its key
    pub(crate) fn remove(&mut self, id: Index) -> Option<K> {
        self.slots.get(id)?;
        self.unlink(id);
        self.slots.remove(id).map(|slot| slot.key)
    }

    /// Remove and return the least recently used key
    pub(crate) fn pop_back(&mut self) -> Option<K> {
        let tail = self.tail?;
        self.remove(tail)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys from most to least recently used
    pub(crate) fn keys(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let slot = &self.slots[id];
            keys.push(&slot.key);
            cursor = slot.next;
        }
        keys
    }

    fn unlink(&mut self, id: Index) {
        let (prev, next) = {
            let slot = &self.slots[id];
            (slot.prev, slot.next)
        };

        match prev {
            Some(prev) => self.slots[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.slots[next].prev = prev,
            None => self.tail = prev,
        }
    }

    fn link_front(&mut self, id: Index) {
        let old_head = self.head;
        {
            let slot = &mut self.slots[id];
            slot.prev = None;
            slot.next = old_head;
        }
        if let Some(old_head) = old_head {
            self.slots[old_head].prev = Some(id);
        }
        self.head = Some(id);
        if self.tail.is_none() {
            self.tail = Some(id);
        }
    }
}
