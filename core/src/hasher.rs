//! Hashers (feature-gated) and utilities for implementing them.

use crate::trie::Node;

/// A node hash function for the accumulator.
///
/// Leaves are derived from arbitrary-length items, internal nodes from exactly two 32-byte
/// children. The same hasher must be used for building a trie and for verifying its proofs.
pub trait TrieHasher {
    /// Derive the leaf node of an item.
    fn hash_leaf(item: &[u8]) -> Node;

    /// Hash an internal node from its left and right children.
    fn hash_internal(left: &Node, right: &Node) -> Node;
}

/// A simple trait for representing binary hash functions.
pub trait BinaryHash {
    /// Given a bit-string, produce a 32-byte hash.
    fn hash(input: &[u8]) -> [u8; 32];

    /// An optional specialization of `hash` where there are two 32-byte inputs, left and right.
    fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut buf = [0u8; 64];
        buf[0..32].copy_from_slice(left);
        buf[32..64].copy_from_slice(right);
        Self::hash(&buf)
    }
}

/// A trie hasher constructed from a simple binary hasher.
///
/// Leaves are the hash of the item, internal nodes the hash of the 64-byte concatenation of
/// their children.
pub struct BinaryHasher<H>(core::marker::PhantomData<H>);

impl<H: BinaryHash> TrieHasher for BinaryHasher<H> {
    fn hash_leaf(item: &[u8]) -> Node {
        H::hash(item)
    }

    fn hash_internal(left: &Node, right: &Node) -> Node {
        H::hash2_32_concat(left, right)
    }
}

/// A trie hasher whose leaves are the items themselves, zero-padded or truncated to 32 bytes.
///
/// This is the convention of the deposit contract tree, where every item is already a 32-byte
/// deposit data root. Internal nodes are hashed exactly as in [`BinaryHasher`].
///
/// Items longer than 32 bytes share a leaf with their 32-byte prefix, so a proof for one also
/// verifies the other. Proofs only reject a different item when both are at most 32 bytes long.
pub struct PaddedLeafHasher<H>(core::marker::PhantomData<H>);

impl<H: BinaryHash> TrieHasher for PaddedLeafHasher<H> {
    fn hash_leaf(item: &[u8]) -> Node {
        let mut leaf = [0u8; 32];
        let len = core::cmp::min(item.len(), 32);
        leaf[..len].copy_from_slice(&item[..len]);
        leaf
    }

    fn hash_internal(left: &Node, right: &Node) -> Node {
        H::hash2_32_concat(left, right)
    }
}

#[cfg(any(feature = "blake3-hasher", test))]
pub use blake3::Blake3Hasher;

/// A trie hasher making use of blake3.
#[cfg(any(feature = "blake3-hasher", test))]
pub mod blake3 {
    use super::{BinaryHash, BinaryHasher};

    /// A [`BinaryHash`] implementation for Blake3.
    pub struct Blake3BinaryHasher;

    /// A wrapper around Blake3 for use in smtrie.
    pub type Blake3Hasher = BinaryHasher<Blake3BinaryHasher>;

    impl BinaryHash for Blake3BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            blake3::hash(value).into()
        }

        fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
            let mut hasher = blake3::Hasher::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().into()
        }
    }
}

#[cfg(feature = "sha2-hasher")]
pub use sha2::{Sha2DepositHasher, Sha2Hasher};

/// Trie hashers making use of sha2-256.
#[cfg(feature = "sha2-hasher")]
pub mod sha2 {
    use super::{BinaryHash, BinaryHasher, PaddedLeafHasher};
    use sha2::{Digest, Sha256};

    /// A [`BinaryHash`] implementation for Sha2.
    pub struct Sha2BinaryHasher;

    /// A wrapper around sha2-256 which hashes every item into its leaf.
    pub type Sha2Hasher = BinaryHasher<Sha2BinaryHasher>;

    /// The deposit contract hasher: sha2-256 internal nodes over raw 32-byte leaves.
    pub type Sha2DepositHasher = PaddedLeafHasher<Sha2BinaryHasher>;

    impl BinaryHash for Sha2BinaryHasher {
        fn hash(value: &[u8]) -> [u8; 32] {
            let mut hasher = Sha256::new();
            hasher.update(value);
            hasher.finalize().into()
        }

        fn hash2_32_concat(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
            let mut hasher = Sha256::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NaiveBlake3;

    impl BinaryHash for NaiveBlake3 {
        fn hash(input: &[u8]) -> [u8; 32] {
            ::blake3::hash(input).into()
        }
    }

    #[test]
    fn specialized_concat_matches_default() {
        let left = [1u8; 32];
        let right = [2u8; 32];
        assert_eq!(
            NaiveBlake3::hash2_32_concat(&left, &right),
            super::blake3::Blake3BinaryHasher::hash2_32_concat(&left, &right),
        );
    }

    #[test]
    fn padded_leaf_pads_and_truncates() {
        type H = PaddedLeafHasher<NaiveBlake3>;

        let mut expected = [0u8; 32];
        expected[..3].copy_from_slice(b"abc");
        assert_eq!(H::hash_leaf(b"abc"), expected);

        let long = [7u8; 40];
        assert_eq!(H::hash_leaf(&long), [7u8; 32]);
        // an item and its 32-byte prefix are indistinguishable.
        assert_eq!(H::hash_leaf(&long), H::hash_leaf(&long[..32]));
        assert_ne!(H::hash_leaf(&long[..31]), H::hash_leaf(&long[..32]));
    }

    #[cfg(feature = "sha2-hasher")]
    #[test]
    fn sha2_internal_of_zeroes() {
        assert_eq!(
            Sha2Hasher::hash_internal(&[0; 32], &[0; 32]),
            hex_literal::hex!("f5a5fd42d16a20302798ef6ed309979b43003d2320d9f0e8ea9831a92759fb4b"),
        );
    }
}
