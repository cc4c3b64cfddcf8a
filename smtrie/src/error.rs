use thiserror::Error;

/// Errors returned by [`crate::SparseMerkleTrie`] operations.
///
/// All of these indicate misuse or malformed input. None of them are transient.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// A trie was requested from an empty list of items.
    #[error("no items provided to generate merkle trie")]
    EmptyInput,

    /// An index-taking operation was given a negative index.
    #[error("merkle index is negative: {0}")]
    NegativeIndex(i64),

    /// A proof was requested for a leaf which is not populated.
    #[error("merkle index out of range in trie, max range: {max}, received: {index}")]
    IndexOutOfRange { index: u64, max: u64 },

    /// More items than a tree of this depth can hold.
    #[error("trie of depth {depth} holds at most 2^{depth} items, {requested} requested")]
    CapacityExceeded { depth: usize, requested: u64 },

    /// A snapshot could not be restored.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Reasons for rejecting a [`crate::LayeredSnapshot`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot depth {0} exceeds the maximum depth {}", crate::MAX_DEPTH)]
    DepthTooLarge(u64),

    #[error("snapshot of depth {depth} must have {} layers, found {layers}", .depth + 1)]
    LayerCountMismatch { depth: u64, layers: usize },

    #[error("layer {layer} has {len} nodes, at most {max} allowed")]
    LayerTooLong { layer: usize, len: usize, max: u64 },

    #[error("layer {layer} has {len} nodes, expected {expected} from the layer below")]
    LayerShapeMismatch {
        layer: usize,
        len: usize,
        expected: usize,
    },
}
