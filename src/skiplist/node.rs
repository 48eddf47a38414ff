//! Skip list node

use generational_arena::Index;

pub(crate) type NodeId = Index;

/// A key/value entry and its forward links, one per level it occupies
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// `forward[i]` is the next node at level `i`; length is `level + 1`
    pub(crate) forward: Vec<Option<NodeId>>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, level: usize) -> Self {
        Self {
            key,
            value,
            forward: vec![None; level + 1],
        }
    }
}

/// A position to link from: the header sentinel or a real node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    Head,
    Node(NodeId),
}
