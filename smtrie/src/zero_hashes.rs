//! The process-wide zero hash tables.
//!
//! There is one table per hasher. A table only ever grows: it is extended under an exclusive lock
//! the first time a deeper tree is requested, and is immutable from then on. Readers share the
//! table through an `Arc` and never lock after obtaining it.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use parking_lot::RwLock;
use smtrie_core::{trie, Node, TrieHasher};

type Tables = RwLock<HashMap<TypeId, Arc<[Node]>>>;

static ZERO_HASHES: OnceLock<Tables> = OnceLock::new();

/// Get the zero hashes of hasher `H` for all heights from 0 up to at least `depth`.
///
/// The returned table may be longer than `depth + 1`. Each height is computed at most once per
/// hasher for the lifetime of the process.
pub fn zero_hashes<H: TrieHasher + 'static>(depth: usize) -> Arc<[Node]> {
    let tables = ZERO_HASHES.get_or_init(Default::default);
    let key = TypeId::of::<H>();

    if let Some(table) = tables.read().get(&key) {
        if table.len() > depth {
            return table.clone();
        }
    }

    let mut tables = tables.write();
    let table = tables.entry(key).or_insert_with(|| Arc::from(Vec::new()));
    // another writer may have extended the table while we waited for the lock.
    if table.len() <= depth {
        let mut extended = table.to_vec();
        let from = extended.len();
        trie::extend_zero_hashes::<H>(&mut extended, depth);
        tracing::debug!(
            hasher = std::any::type_name::<H>(),
            from,
            to = extended.len(),
            "extended zero hash table"
        );
        *table = extended.into();
    }
    table.clone()
}
