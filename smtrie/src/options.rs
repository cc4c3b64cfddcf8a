use crate::{DEPOSIT_CONTRACT_TREE_DEPTH, MAX_DEPTH};

/// Options when creating a [`crate::SparseMerkleTrie`].
#[derive(Debug, Clone)]
pub struct Options {
    /// The depth of the tree. A tree of depth `d` holds up to `2^d` items.
    pub(crate) depth: usize,
    /// The number of leaves to reserve storage for up front.
    pub(crate) capacity_hint: usize,
}

impl Options {
    /// Create a new `Options` instance with the default values.
    pub fn new() -> Self {
        Self {
            depth: DEPOSIT_CONTRACT_TREE_DEPTH,
            capacity_hint: 0,
        }
    }

    /// Set the depth of the tree.
    ///
    /// May not exceed [`MAX_DEPTH`].
    ///
    /// Default: [`DEPOSIT_CONTRACT_TREE_DEPTH`].
    pub fn depth(&mut self, depth: usize) {
        assert!(depth <= MAX_DEPTH, "depth {} exceeds {}", depth, MAX_DEPTH);
        self.depth = depth;
    }

    /// Set the number of leaves to reserve storage for when the trie is created.
    ///
    /// This is only a hint and never limits the number of items.
    ///
    /// Default: 0.
    pub fn capacity_hint(&mut self, capacity_hint: usize) {
        self.capacity_hint = capacity_hint;
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn deposit_contract_depth_is_default() {
    // Update the docs above if this fails.
    assert_eq!(Options::new().depth, 32);
}

#[test]
#[should_panic]
fn depth_beyond_max_is_rejected() {
    Options::new().depth(MAX_DEPTH + 1);
}
