//! The transmissible form of a trie: its depth and every layer, flattened.

use serde::{Deserialize, Serialize};
use smtrie_core::{Node, TrieHasher};

use crate::{layer::Layer, SnapshotError, SparseMerkleTrie, TrieError, MAX_DEPTH};

/// A lossless, order-preserving snapshot of a [`SparseMerkleTrie`].
///
/// This is the only persisted or wire representation of a trie. Restoring a snapshot does not
/// replay any insertion: the layers are taken as they are, after checking their shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct LayeredSnapshot {
    /// The depth of the tree.
    pub depth: u64,
    /// The nodes of every layer, from the leaves (`layers[0]`) up to the root
    /// (`layers[depth]`).
    pub layers: Vec<Vec<Node>>,
}

impl LayeredSnapshot {
    /// Check that the layers describe a tree of the stated depth.
    ///
    /// Every layer must hold at most as many nodes as its height allows and half (rounded up) the
    /// nodes of the layer below. A layer of odd length may carry one extra trailing node, as
    /// written by implementations which pad odd layers with a zero hash.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.depth > MAX_DEPTH as u64 {
            return Err(SnapshotError::DepthTooLarge(self.depth));
        }
        let depth = self.depth as usize;
        if self.layers.len() != depth + 1 {
            return Err(SnapshotError::LayerCountMismatch {
                depth: self.depth,
                layers: self.layers.len(),
            });
        }

        for (level, layer) in self.layers.iter().enumerate() {
            let max = 1u64 << (depth - level);
            if layer.len() as u64 > max {
                return Err(SnapshotError::LayerTooLong {
                    layer: level,
                    len: layer.len(),
                    max,
                });
            }
            if level == 0 {
                continue;
            }
            let expected = self.layers[level - 1].len().div_ceil(2);
            let zero_padded = expected % 2 == 1 && layer.len() == expected + 1;
            if layer.len() != expected && !zero_padded {
                return Err(SnapshotError::LayerShapeMismatch {
                    layer: level,
                    len: layer.len(),
                    expected,
                });
            }
        }
        Ok(())
    }
}

impl<H: TrieHasher + 'static> SparseMerkleTrie<H> {
    /// Flatten the trie into its transmissible form.
    ///
    /// Every layer is written out up to its last position, with gaps filled by zero hashes. A
    /// trie holding few items at high indices therefore produces a large snapshot.
    pub fn to_transmissible(&self) -> LayeredSnapshot {
        LayeredSnapshot {
            depth: self.depth() as u64,
            layers: self.flatten(),
        }
    }

    /// Restore a trie from its transmissible form.
    ///
    /// The item count is taken to be the number of leaves in the snapshot.
    pub fn from_transmissible(snapshot: LayeredSnapshot) -> Result<Self, TrieError> {
        snapshot.validate()?;

        let depth = snapshot.depth as usize;
        let num_items = snapshot.layers[0].len() as u64;
        let layers = snapshot.layers.into_iter().map(Layer::from_dense).collect();
        let trie = Self::from_parts(depth, layers, num_items);
        tracing::debug!(
            depth,
            items = num_items,
            root = %hex::encode(trie.hash_tree_root()),
            "restored trie from snapshot"
        );
        Ok(trie)
    }
}

impl<H: TrieHasher + 'static> From<&SparseMerkleTrie<H>> for LayeredSnapshot {
    fn from(trie: &SparseMerkleTrie<H>) -> Self {
        trie.to_transmissible()
    }
}

impl<H: TrieHasher + 'static> TryFrom<LayeredSnapshot> for SparseMerkleTrie<H> {
    type Error = TrieError;

    fn try_from(snapshot: LayeredSnapshot) -> Result<Self, Self::Error> {
        Self::from_transmissible(snapshot)
    }
}
