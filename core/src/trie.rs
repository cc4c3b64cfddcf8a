//! This module defines the schema of a fixed-depth binary merkle accumulator, generalized over a
//! 256 bit hash function.
//!
//! A tree of depth `d` has `2^d` leaf slots. Leaves are filled left to right as items arrive,
//! and every slot which was never filled is treated as [`ZERO_LEAF`]. The hash of a sub-tree with
//! no filled leaves at height `h` is the "zero hash" of that height:
//!
//! ```text
//! zero_hash[0] = ZERO_LEAF
//! zero_hash[h] = hash_internal(zero_hash[h - 1], zero_hash[h - 1])
//! ```
//!
//! The committed root of the accumulator is not the root of the tree itself: the number of items
//! is mixed in once more on top, see [`mix_in_length`].

use crate::hasher::TrieHasher;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A node in the binary tree. In this schema, it is always 256 bits.
pub type Node = [u8; 32];

/// The value of a leaf slot which has never been filled.
pub const ZERO_LEAF: Node = [0u8; 32];

/// The maximum supported depth. The capacity of a tree, `2^depth`, must fit in a `u64`.
pub const MAX_DEPTH: usize = 63;

/// The depth of the deposit contract tree.
pub const DEPOSIT_CONTRACT_TREE_DEPTH: usize = 32;

/// The number of leaf slots of a tree with the given depth.
///
/// # Panics
///
/// Panics if `depth` is greater than [`MAX_DEPTH`].
pub fn capacity(depth: usize) -> u64 {
    assert!(depth <= MAX_DEPTH, "depth {} exceeds {}", depth, MAX_DEPTH);
    1u64 << depth
}

/// Compute the zero hashes of all heights from 0 up to and including `depth`.
pub fn zero_hashes<H: TrieHasher>(depth: usize) -> Vec<Node> {
    let mut hashes = Vec::with_capacity(depth + 1);
    extend_zero_hashes::<H>(&mut hashes, depth);
    hashes
}

/// Extend a (possibly empty) table of zero hashes so that it covers heights up to and including
/// `depth`. Entries already present are assumed to be correct and are never recomputed.
pub fn extend_zero_hashes<H: TrieHasher>(hashes: &mut Vec<Node>, depth: usize) {
    if hashes.is_empty() {
        hashes.push(ZERO_LEAF);
    }
    while hashes.len() <= depth {
        let below = hashes[hashes.len() - 1];
        hashes.push(H::hash_internal(&below, &below));
    }
}

/// Encode an item count as the final element of a proof.
///
/// The count is stored little-endian in the first 8 bytes; the remaining 24 bytes are zero.
pub fn length_commitment(count: u64) -> Node {
    let mut node = [0u8; 32];
    node[..8].copy_from_slice(&count.to_le_bytes());
    node
}

/// Decode an item count from a length commitment.
///
/// Returns `None` if any of the padding bytes are set.
pub fn decode_length_commitment(node: &Node) -> Option<u64> {
    if node[8..].iter().any(|b| *b != 0) {
        return None;
    }
    let mut count = [0u8; 8];
    count.copy_from_slice(&node[..8]);
    Some(u64::from_le_bytes(count))
}

/// Mix the item count into the root of the tree, producing the committed root.
pub fn mix_in_length<H: TrieHasher>(root: &Node, count: u64) -> Node {
    H::hash_internal(root, &length_commitment(count))
}
