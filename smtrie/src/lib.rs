//! A fixed-depth sparse merkle accumulator.
//!
//! [`SparseMerkleTrie`] keeps every layer of a binary merkle tree in memory, from the leaves up
//! to the root. Items are appended or overwritten one index at a time, and only the path from the
//! touched leaf to the root is rehashed. Sub-trees which were never filled are never stored: they
//! are resolved through a table of zero hashes shared by the whole process.
//!
//! The committed root, [`SparseMerkleTrie::hash_tree_root`], mixes the item count into the root
//! of the tree. With [`hasher::Sha2DepositHasher`] and a depth of
//! [`DEPOSIT_CONTRACT_TREE_DEPTH`] this is the root reported by the deposit contract.
//!
//! Proofs are generated by the trie and verified by the free functions re-exported from
//! `smtrie-core`, which need nothing but public values.

pub use smtrie_core::{
    hasher,
    proof::{compute_subtree_root, verify_merkle_proof, verify_merkle_proof_with_depth},
    trie::{
        capacity, length_commitment, mix_in_length, Node, DEPOSIT_CONTRACT_TREE_DEPTH, MAX_DEPTH,
        ZERO_LEAF,
    },
    MerkleProof, TrieHasher,
};

#[cfg(feature = "blake3-hasher")]
pub use smtrie_core::hasher::Blake3Hasher;
#[cfg(feature = "sha2-hasher")]
pub use smtrie_core::hasher::{Sha2DepositHasher, Sha2Hasher};

pub use error::{SnapshotError, TrieError};
pub use options::Options;
pub use snapshot::LayeredSnapshot;
pub use trie::SparseMerkleTrie;
pub use zero_hashes::zero_hashes;

mod error;
mod layer;
mod options;
mod snapshot;
mod trie;
mod zero_hashes;
