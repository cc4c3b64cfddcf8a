//! Storage for a single level of the tree.

use std::collections::BTreeMap;

use smtrie_core::Node;

/// The stored nodes of one level of the tree.
///
/// Nodes written contiguously from position 0 live in `dense`. Nodes written past the end of
/// `dense` are kept in `sparse` until the gap before them is filled, at which point they move
/// over. Every position stored in neither holds the zero hash of its height.
///
/// Invariant: every key of `sparse` is greater than `dense.len()`.
#[derive(Debug, Clone, Default)]
pub(crate) struct Layer {
    dense: Vec<Node>,
    sparse: BTreeMap<u64, Node>,
}

impl Layer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Layer {
            dense: Vec::with_capacity(capacity),
            sparse: BTreeMap::new(),
        }
    }

    pub(crate) fn from_dense(dense: Vec<Node>) -> Self {
        Layer {
            dense,
            sparse: BTreeMap::new(),
        }
    }

    /// The stored node at `position`, if any.
    pub(crate) fn get(&self, position: u64) -> Option<&Node> {
        match usize::try_from(position) {
            Ok(p) if p < self.dense.len() => Some(&self.dense[p]),
            _ => self.sparse.get(&position),
        }
    }

    pub(crate) fn set(&mut self, position: u64, node: Node) {
        let end = self.dense.len() as u64;
        if position < end {
            self.dense[position as usize] = node;
        } else if position == end {
            self.dense.push(node);
            while let Some(entry) = self.sparse.first_entry() {
                if *entry.key() != self.dense.len() as u64 {
                    break;
                }
                self.dense.push(entry.remove());
            }
        } else {
            self.sparse.insert(position, node);
        }
    }

    /// One past the highest stored position.
    pub(crate) fn end(&self) -> u64 {
        self.sparse
            .last_key_value()
            .map_or(self.dense.len() as u64, |(position, _)| position + 1)
    }

    /// The number of nodes physically stored.
    pub(crate) fn stored(&self) -> usize {
        self.dense.len() + self.sparse.len()
    }

    /// All stored positions, ascending.
    pub(crate) fn positions(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.dense.len() as u64).chain(self.sparse.keys().copied())
    }
}
