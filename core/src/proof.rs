//! Inclusion proofs and their stateless verification.
//!
//! A proof for leaf `index` in a tree of depth `d` is a flat list of `d + 1` nodes. The first `d`
//! are the siblings met when walking from the leaf up to the root, in that order. The last one is
//! the length commitment of the tree the proof was taken from, which is folded in exactly like one
//! more sibling on the right, reproducing the committed root.
//!
//! Verification never fails with an error: a malformed proof simply does not verify.

use crate::{
    hasher::TrieHasher,
    trie::{self, Node, MAX_DEPTH},
};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use bitvec::prelude::*;

/// A proof of inclusion of a single item in the accumulator.
///
/// This is a plain value: it holds no reference to the trie it was generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MerkleProof(pub Vec<Node>);

impl MerkleProof {
    /// The depth of the tree this proof was generated for, or `None` for an empty proof.
    pub fn depth(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    /// The sibling nodes, from the leaf level upwards.
    pub fn siblings(&self) -> &[Node] {
        match self.depth() {
            Some(depth) => &self.0[..depth],
            None => &[],
        }
    }

    /// The final, synthetic element of the proof.
    pub fn length_commitment(&self) -> Option<&Node> {
        self.0.last()
    }

    /// The item count this proof commits to, if the final element is a well-formed commitment.
    pub fn item_count(&self) -> Option<u64> {
        self.length_commitment()
            .and_then(trie::decode_length_commitment)
    }

    /// The total number of nodes in the proof.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the proof holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Verify that `item` sits at `index` under the committed `root`.
    pub fn verify<H: TrieHasher>(&self, root: &Node, item: &[u8], index: u64) -> bool {
        verify_merkle_proof::<H>(root, item, index, &self.0)
    }
}

impl AsRef<[Node]> for MerkleProof {
    fn as_ref(&self) -> &[Node] {
        &self.0
    }
}

impl From<MerkleProof> for Vec<Node> {
    fn from(proof: MerkleProof) -> Self {
        proof.0
    }
}

/// Verify a proof, inferring the depth of the tree from the length of the proof.
///
/// An empty proof never verifies.
pub fn verify_merkle_proof<H: TrieHasher>(
    root: &Node,
    item: &[u8],
    index: u64,
    proof: &[Node],
) -> bool {
    match proof.len().checked_sub(1) {
        Some(depth) => verify_merkle_proof_with_depth::<H>(root, item, index, proof, depth),
        None => false,
    }
}

/// Verify a proof against a tree of a known depth.
///
/// Returns `false` when the proof does not hold exactly `depth + 1` nodes, when the depth is not
/// supported or when `index` does not address a leaf of such a tree.
pub fn verify_merkle_proof_with_depth<H: TrieHasher>(
    root: &Node,
    item: &[u8],
    index: u64,
    proof: &[Node],
    depth: usize,
) -> bool {
    if depth > MAX_DEPTH || proof.len() != depth + 1 {
        return false;
    }
    if index >= trie::capacity(depth) {
        return false;
    }

    let subtree_root = compute_subtree_root::<H>(H::hash_leaf(item), index, &proof[..depth]);
    H::hash_internal(&subtree_root, &proof[depth]) == *root
}

/// Hash a leaf up to the root of its tree, given the siblings along the way.
///
/// The bits of `index` decide, level by level, whether the running node is the right (bit set)
/// or the left (bit unset) child. This yields the root of the tree, before the item count is
/// mixed in.
pub fn compute_subtree_root<H: TrieHasher>(leaf: Node, index: u64, siblings: &[Node]) -> Node {
    let index_bytes = index.to_le_bytes();
    let path = index_bytes.view_bits::<Lsb0>();

    let mut node = leaf;
    for (bit, sibling) in path.iter().by_vals().zip(siblings) {
        node = if bit {
            H::hash_internal(sibling, &node)
        } else {
            H::hash_internal(&node, sibling)
        };
    }
    node
}
