#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use smtrie::{verify_merkle_proof, Blake3Hasher, SparseMerkleTrie};

const DEPTH: usize = 10;

type Trie = SparseMerkleTrie<Blake3Hasher>;

fuzz_target!(|run: Run| {
    let mut trie = Trie::new(DEPTH);
    // the items the trie should hold, by index.
    let mut expected: BTreeMap<u64, Vec<u8>> = BTreeMap::new();

    for call in run.calls {
        match call {
            TrieCall::Insert { index, item } => {
                let index = i64::from(index);
                let result = trie.insert(&item, index);
                if index < 0 || index >= 1 << DEPTH {
                    assert!(result.is_err());
                } else {
                    assert!(result.is_ok());
                    expected.insert(index as u64, item);
                }
            }
            TrieCall::Prove { index } => {
                let index = i64::from(index);
                let root = trie.hash_tree_root();
                match trie.merkle_proof(index) {
                    Ok(proof) => {
                        assert_eq!(proof.len(), DEPTH + 1);
                        if let Some(item) = expected.get(&(index as u64)) {
                            assert!(verify_merkle_proof::<Blake3Hasher>(
                                &root,
                                item,
                                index as u64,
                                &proof.0
                            ));
                        }
                    }
                    Err(_) => assert!(index < 0 || index as u64 >= trie.num_items()),
                }
            }
            TrieCall::Copy => {
                let copy = trie.clone();
                assert_eq!(copy.hash_tree_root(), trie.hash_tree_root());
                trie = copy;
            }
            TrieCall::Snapshot => {
                let restored = Trie::from_transmissible(trie.to_transmissible()).unwrap();
                assert_eq!(restored.hash_tree_root(), trie.hash_tree_root());
                trie = restored;
            }
        }
        let num_items = expected.keys().next_back().map_or(0, |index| index + 1);
        assert_eq!(trie.num_items(), num_items);
    }

    // without gaps, the same items generated in one go give the same root.
    let gapless = (0..trie.num_items()).all(|i| expected.contains_key(&i));
    if gapless && !expected.is_empty() {
        let items: Vec<Vec<u8>> = expected.into_values().collect();
        let generated = Trie::from_items(&items, DEPTH).unwrap();
        assert_eq!(generated.hash_tree_root(), trie.hash_tree_root());
    }
});

#[derive(Debug, Arbitrary)]
struct Run {
    calls: Vec<TrieCall>,
}

#[derive(Debug, Arbitrary)]
enum TrieCall {
    Insert { index: i16, item: Vec<u8> },
    Prove { index: i16 },
    Copy,
    Snapshot,
}
