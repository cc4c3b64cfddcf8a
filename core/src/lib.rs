//! Core types and operations of the smtrie sparse merkle accumulator.
//!
//! This crate defines the node schema, the hashers, the zero-hash convention and the stateless
//! proof verification routines of a fixed-depth binary merkle accumulator. The owned, updatable
//! trie lives in the `smtrie` crate; everything here is what a verifier needs and nothing more.
//!
//! The types and verification routines of this crate do not require the standard library, but
//! do require Rust's alloc crate.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod hasher;
pub mod proof;
pub mod trie;

pub use hasher::TrieHasher;
pub use proof::{verify_merkle_proof, verify_merkle_proof_with_depth, MerkleProof};
pub use trie::Node;
