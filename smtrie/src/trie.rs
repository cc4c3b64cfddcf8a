//! The owned, updatable accumulator.

use std::{cmp, fmt, marker::PhantomData, sync::Arc};

use smtrie_core::{
    trie::{self, mix_in_length},
    MerkleProof, Node, TrieHasher,
};

use crate::{layer::Layer, zero_hashes::zero_hashes, Options, TrieError};

/// A fixed-depth binary merkle tree holding every one of its layers.
///
/// `layers[0]` holds the leaves in index order and `layers[depth]` the root. Only nodes which
/// were computed are stored: every other position is the zero hash of its height, so a single
/// insert far beyond the last item stores no more than one node per level.
///
/// Mutation goes through `&mut self` and reads through `&self`: a trie shared between threads
/// must be wrapped in a lock by the caller.
pub struct SparseMerkleTrie<H> {
    depth: usize,
    layers: Vec<Layer>,
    num_items: u64,
    zero_hashes: Arc<[Node]>,
    _hasher: PhantomData<H>,
}

impl<H: TrieHasher + 'static> SparseMerkleTrie<H> {
    /// Create an empty trie of the given depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth` exceeds [`crate::MAX_DEPTH`].
    pub fn new(depth: usize) -> Self {
        let mut o = Options::new();
        o.depth(depth);
        Self::with_options(&o)
    }

    /// Create an empty trie according to the given options.
    pub fn with_options(o: &Options) -> Self {
        let mut layers = vec![Layer::default(); o.depth + 1];
        layers[0] = Layer::with_capacity(o.capacity_hint);
        Self::from_parts(o.depth, layers, 0)
    }

    /// Build a trie of the given depth holding `items` at indices `0..items.len()`.
    pub fn from_items<T: AsRef<[u8]>>(items: &[T], depth: usize) -> Result<Self, TrieError> {
        let mut o = Options::new();
        o.depth(depth);
        Self::from_items_with_options(items, &o)
    }

    /// Build a trie holding `items` according to the given options.
    pub fn from_items_with_options<T: AsRef<[u8]>>(
        items: &[T],
        o: &Options,
    ) -> Result<Self, TrieError> {
        if items.is_empty() {
            return Err(TrieError::EmptyInput);
        }
        let requested = items.len() as u64;
        if requested > trie::capacity(o.depth) {
            return Err(TrieError::CapacityExceeded {
                depth: o.depth,
                requested,
            });
        }

        let zero_hashes = zero_hashes::<H>(o.depth);

        let mut nodes = Vec::with_capacity(cmp::max(items.len(), o.capacity_hint));
        nodes.extend(items.iter().map(|item| H::hash_leaf(item.as_ref())));

        let mut layers = Vec::with_capacity(o.depth + 1);
        for level in 0..o.depth {
            let parents: Vec<Node> = nodes
                .chunks(2)
                .map(|pair| {
                    let right = pair.get(1).unwrap_or(&zero_hashes[level]);
                    H::hash_internal(&pair[0], right)
                })
                .collect();
            layers.push(Layer::from_dense(nodes));
            nodes = parents;
        }
        layers.push(Layer::from_dense(nodes));

        let trie = Self {
            depth: o.depth,
            layers,
            num_items: requested,
            zero_hashes,
            _hasher: PhantomData,
        };
        tracing::debug!(
            depth = trie.depth,
            items = trie.num_items,
            root = %hex::encode(trie.hash_tree_root()),
            "generated trie from items"
        );
        Ok(trie)
    }

    /// Assemble a trie from layers which are already known to be consistent.
    pub(crate) fn from_parts(depth: usize, layers: Vec<Layer>, num_items: u64) -> Self {
        debug_assert_eq!(layers.len(), depth + 1);
        Self {
            depth,
            layers,
            num_items,
            zero_hashes: zero_hashes::<H>(depth),
            _hasher: PhantomData,
        }
    }

    /// The root of the tree, before the item count is mixed in.
    ///
    /// For an empty trie this is the zero hash at the trie's depth.
    pub fn subtree_root(&self) -> Node {
        self.node(self.depth, 0)
    }

    /// The committed root: the root of the tree with the item count mixed in.
    pub fn hash_tree_root(&self) -> Node {
        mix_in_length::<H>(&self.subtree_root(), self.num_items)
    }

    /// Generate an inclusion proof for the leaf at `index`.
    ///
    /// The proof holds `depth + 1` nodes: the siblings from the leaf up to the root, then the
    /// length commitment of the current item count.
    pub fn merkle_proof(&self, index: i64) -> Result<MerkleProof, TrieError> {
        let index = u64::try_from(index).map_err(|_| TrieError::NegativeIndex(index))?;
        if index >= self.num_items {
            return Err(TrieError::IndexOutOfRange {
                index,
                max: self.num_items,
            });
        }

        let mut proof = Vec::with_capacity(self.depth + 1);
        for level in 0..self.depth {
            proof.push(self.node(level, (index >> level) ^ 1));
        }
        proof.push(trie::length_commitment(self.num_items));
        Ok(MerkleProof(proof))
    }

    /// Place `item` at `index`, overwriting whatever was there, and rehash the path from that
    /// leaf to the root.
    ///
    /// Inserting beyond the current end of the trie fills the gap with empty leaves and raises the
    /// item count to `index + 1`. Indices beyond the capacity of the tree are rejected before
    /// anything is modified.
    pub fn insert(&mut self, item: &[u8], index: i64) -> Result<(), TrieError> {
        let index = u64::try_from(index).map_err(|_| TrieError::NegativeIndex(index))?;
        if index >= trie::capacity(self.depth) {
            return Err(TrieError::CapacityExceeded {
                depth: self.depth,
                requested: index + 1,
            });
        }
        let mut position = index;
        let mut node = H::hash_leaf(item);
        self.set_node(0, position, node);
        for level in 0..self.depth {
            let sibling = self.node(level, position ^ 1);
            node = if position % 2 == 0 {
                H::hash_internal(&node, &sibling)
            } else {
                H::hash_internal(&sibling, &node)
            };
            position /= 2;
            self.set_node(level + 1, position, node);
        }
        self.num_items = cmp::max(self.num_items, index + 1);

        tracing::trace!(index, items = self.num_items, "inserted item");
        Ok(())
    }

    /// The depth of the tree.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The number of items committed to by the root.
    pub fn num_items(&self) -> u64 {
        self.num_items
    }

    /// Whether no item was ever inserted.
    pub fn is_empty(&self) -> bool {
        self.num_items == 0
    }

    /// The leaves at indices `0..num_items()`, in index order. Gaps left by sparse inserts read
    /// as zero leaves.
    ///
    /// This allocates one node per index, populated or not.
    pub fn leaves(&self) -> Vec<Node> {
        (0..self.num_items).map(|i| self.node(0, i)).collect()
    }

    /// The leaf at `index`, if `index` is below the item count.
    pub fn leaf(&self, index: u64) -> Option<Node> {
        (index < self.num_items).then(|| self.node(0, index))
    }

    /// Every layer written out in full, up to the last stored or logically present position.
    ///
    /// Gaps are filled with zero hashes, so this allocates in proportion to the item count.
    pub(crate) fn flatten(&self) -> Vec<Vec<Node>> {
        let mut len = self.num_items;
        self.layers
            .iter()
            .enumerate()
            .map(|(level, layer)| {
                if level > 0 {
                    len = len.div_ceil(2);
                }
                len = cmp::max(len, layer.end());
                (0..len).map(|p| self.node(level, p)).collect()
            })
            .collect()
    }

    fn set_node(&mut self, level: usize, position: u64, node: Node) {
        self.layers[level].set(position, node);
    }
}

impl<H> SparseMerkleTrie<H> {
    /// The number of nodes held in memory across all layers.
    #[cfg(test)]
    pub(crate) fn stored_nodes(&self) -> usize {
        self.layers.iter().map(Layer::stored).sum()
    }

    // the node at `position` in `layers[level]`, falling back to the zero hash of that height.
    fn node(&self, level: usize, position: u64) -> Node {
        self.layers[level]
            .get(position)
            .copied()
            .unwrap_or(self.zero_hashes[level])
    }
}

impl<H> Clone for SparseMerkleTrie<H> {
    /// Produce a fully independent trie: every layer is copied, only the immutable zero hash
    /// table is shared.
    fn clone(&self) -> Self {
        Self {
            depth: self.depth,
            layers: self.layers.clone(),
            num_items: self.num_items,
            zero_hashes: self.zero_hashes.clone(),
            _hasher: PhantomData,
        }
    }
}

impl<H> PartialEq for SparseMerkleTrie<H> {
    /// Tries are equal when they hold the same node at every position, whether stored or not.
    fn eq(&self, other: &Self) -> bool {
        if self.depth != other.depth || self.num_items != other.num_items {
            return false;
        }
        let same_at = |level: usize, position: u64| {
            self.node(level, position) == other.node(level, position)
        };
        self.layers
            .iter()
            .zip(&other.layers)
            .enumerate()
            .all(|(level, (ours, theirs))| {
                ours.positions().all(|p| same_at(level, p))
                    && theirs.positions().all(|p| same_at(level, p))
            })
    }
}

impl<H> Eq for SparseMerkleTrie<H> {}

impl<H: TrieHasher + 'static> fmt::Debug for SparseMerkleTrie<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseMerkleTrie")
            .field("depth", &self.depth)
            .field("num_items", &self.num_items)
            .field("root", &hex::encode(self.hash_tree_root()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smtrie_core::{hasher::Sha2Hasher, verify_merkle_proof};

    type Trie = SparseMerkleTrie<Sha2Hasher>;

    fn items(n: u8) -> Vec<Vec<u8>> {
        (0..n).map(|i| vec![i; i as usize + 1]).collect()
    }

    // the root as computed by hashing every level in full, including padding.
    fn full_root(mut layer: Vec<Node>, depth: usize, count: u64) -> Node {
        layer.resize(1 << depth, trie::ZERO_LEAF);
        while layer.len() > 1 {
            layer = layer
                .chunks(2)
                .map(|pair| Sha2Hasher::hash_internal(&pair[0], &pair[1]))
                .collect();
        }
        mix_in_length::<Sha2Hasher>(&layer[0], count)
    }

    fn hash_all(items: &[Vec<u8>]) -> Vec<Node> {
        items.iter().map(|i| Sha2Hasher::hash_leaf(i)).collect()
    }

    #[test]
    fn layers_have_halving_lengths() {
        let t = Trie::from_items(&items(5), 4).unwrap();
        let lens: Vec<_> = t.flatten().iter().map(|l| l.len()).collect();
        assert_eq!(lens, vec![5, 3, 2, 1, 1]);
        assert_eq!(t.stored_nodes(), 12);
    }

    #[test]
    fn generated_root_matches_full_computation() {
        for n in 1..=8 {
            let items = items(n);
            let t = Trie::from_items(&items, 3).unwrap();
            assert_eq!(
                t.hash_tree_root(),
                full_root(hash_all(&items), 3, n as u64),
                "{} items",
                n
            );
        }
    }

    #[test]
    fn sequential_inserts_match_generation() {
        let items = items(7);
        let generated = Trie::from_items(&items, 5).unwrap();

        let mut inserted = Trie::new(5);
        for (i, item) in items.iter().enumerate() {
            inserted.insert(item, i as i64).unwrap();
        }
        assert_eq!(inserted, generated);
        assert_eq!(inserted.hash_tree_root(), generated.hash_tree_root());
    }

    #[test]
    fn sparse_insert_pads_with_zero_leaves() {
        let items = items(4);
        let mut t = Trie::from_items(&items, 4).unwrap();
        t.insert(b"far", 11).unwrap();

        // an empty slot is the zero leaf, not the hash of an empty item.
        let mut expected = hash_all(&items);
        expected.resize(11, trie::ZERO_LEAF);
        expected.push(Sha2Hasher::hash_leaf(b"far"));

        assert_eq!(t.num_items(), 12);
        assert_eq!(t.leaves(), expected);
        assert_eq!(t.hash_tree_root(), full_root(expected, 4, 12));
        assert_eq!(t.leaf(11), Some(Sha2Hasher::hash_leaf(b"far")));
        assert_eq!(t.leaf(7), Some(trie::ZERO_LEAF));
        assert_eq!(t.leaf(12), None);

        let lens: Vec<_> = t.flatten().iter().map(|l| l.len()).collect();
        assert_eq!(lens, vec![12, 6, 3, 2, 1]);

        // every proof of the sparse trie verifies against its root.
        let root = t.hash_tree_root();
        for (i, item) in items.iter().enumerate() {
            let proof = t.merkle_proof(i as i64).unwrap();
            assert!(verify_merkle_proof::<Sha2Hasher>(&root, item, i as u64, &proof.0));
        }
        let proof = t.merkle_proof(11).unwrap();
        assert!(proof.verify::<Sha2Hasher>(&root, b"far", 11));
    }

    #[test]
    fn far_insert_stores_one_node_per_level() {
        let mut t = Trie::new(12);
        t.insert(b"a", 0).unwrap();
        let before = t.stored_nodes();
        assert_eq!(before, 13);

        t.insert(b"far", 3000).unwrap();
        assert_eq!(t.num_items(), 3001);
        // the shared part of both paths is overwritten, not duplicated.
        assert!(t.stored_nodes() <= before + 13);

        let mut expected = vec![trie::ZERO_LEAF; 3001];
        expected[0] = Sha2Hasher::hash_leaf(b"a");
        expected[3000] = Sha2Hasher::hash_leaf(b"far");
        assert_eq!(t.hash_tree_root(), full_root(expected, 12, 3001));

        let root = t.hash_tree_root();
        assert!(t.merkle_proof(0).unwrap().verify::<Sha2Hasher>(&root, b"a", 0));
        assert!(t
            .merkle_proof(3000)
            .unwrap()
            .verify::<Sha2Hasher>(&root, b"far", 3000));
        assert!(t.merkle_proof(1500).is_ok());
    }

    #[test]
    fn far_insert_in_a_deposit_sized_tree() {
        let mut t = Trie::new(trie::DEPOSIT_CONTRACT_TREE_DEPTH);
        t.insert(b"a", 0).unwrap();
        t.insert(b"far", (1 << 32) - 1).unwrap();
        assert_eq!(t.num_items(), 1 << 32);
        assert!(t.stored_nodes() <= 2 * (trie::DEPOSIT_CONTRACT_TREE_DEPTH + 1));

        let root = t.hash_tree_root();
        let proof = t.merkle_proof((1 << 32) - 1).unwrap();
        assert!(proof.verify::<Sha2Hasher>(&root, b"far", (1 << 32) - 1));
        assert_eq!(proof.siblings()[0], trie::ZERO_LEAF);
        assert_eq!(t.leaf(1 << 20), Some(trie::ZERO_LEAF));
    }

    #[test]
    fn sparse_and_dense_tries_compare_equal() {
        let items = items(6);
        let generated = Trie::from_items(&items, 4).unwrap();

        let mut reversed = Trie::new(4);
        for (i, item) in items.iter().enumerate().rev() {
            reversed.insert(item, i as i64).unwrap();
        }
        assert_eq!(reversed, generated);

        // stored zero hashes compare equal to absent ones.
        let mut sparse = Trie::new(4);
        sparse.insert(b"x", 0).unwrap();
        sparse.insert(b"y", 5).unwrap();
        let dense = Trie::from_transmissible(sparse.to_transmissible()).unwrap();
        assert_eq!(sparse.stored_nodes(), 8);
        assert_eq!(dense.stored_nodes(), 13);
        assert_eq!(dense, sparse);

        sparse.insert(b"z", 2).unwrap();
        assert_ne!(dense, sparse);
    }

    #[test]
    fn insert_beyond_capacity_leaves_trie_untouched() {
        let mut t = Trie::from_items(&items(3), 2).unwrap();
        let before = t.clone();
        assert_eq!(
            t.insert(b"x", 4),
            Err(TrieError::CapacityExceeded {
                depth: 2,
                requested: 5
            })
        );
        assert_eq!(t, before);
        t.insert(b"x", 3).unwrap();
        assert_eq!(t.num_items(), 4);
    }

    #[test]
    fn too_many_items() {
        assert_eq!(
            Trie::from_items(&items(5), 2).unwrap_err(),
            TrieError::CapacityExceeded {
                depth: 2,
                requested: 5
            }
        );
    }

    #[test]
    fn depth_zero() {
        let mut t = Trie::new(0);
        assert_eq!(t.subtree_root(), trie::ZERO_LEAF);
        t.insert(b"only", 0).unwrap();
        assert_eq!(t.subtree_root(), Sha2Hasher::hash_leaf(b"only"));
        let proof = t.merkle_proof(0).unwrap();
        assert_eq!(proof.len(), 1);
        assert!(proof.verify::<Sha2Hasher>(&t.hash_tree_root(), b"only", 0));
        assert!(t.insert(b"more", 1).is_err());
    }

    #[test]
    fn debug_shows_root() {
        let t = Trie::from_items(&items(2), 3).unwrap();
        let debug = format!("{:?}", t);
        assert!(debug.contains(&hex::encode(t.hash_tree_root())));
        assert!(debug.contains("num_items: 2"));
    }
}
