//! Unreachability transposition table (§4.5): a capped, LRU-ordered cache
//! recording "this position hash could not complete the task with `remain`
//! plies left".
//!
//! Unlike the teacher's lockless, atomics-backed [`TranspositionTable`] (this
//! engine is single-threaded per §5, so no atomic torn-write protection is
//! needed), recency order must be exact for correct eviction, so entries
//! live in an [`indexmap::IndexMap`] and a hit or store shifts the entry to
//! the back (most-recently-used end); eviction pops the front.

use indexmap::IndexMap;

/// Rough per-entry overhead (hash + failed_remain + indexmap bookkeeping)
/// used to size capacity from a byte budget.
const ENTRY_SIZE_ESTIMATE: usize = 200;

/// Outcome of a [`TranspositionTable::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult {
    /// A usable failure record was found; the caller should prune.
    Hit,
    /// No usable record; the caller should continue searching.
    Miss,
}

/// LRU-capped map from position hash to the largest remaining-ply count at
/// which that position is known to have failed to reach the target.
#[derive(Debug)]
pub struct TranspositionTable {
    entries: IndexMap<u64, u32>,
    capacity: usize,
    lookups: u64,
    hits: u64,
    stores: u64,
    updates: u64,
    evictions: u64,
}

impl TranspositionTable {
    /// Creates a table sized from a memory budget in bytes.
    pub fn new(memory_bytes: usize) -> Self {
        let capacity = (memory_bytes / ENTRY_SIZE_ESTIMATE).max(1);
        Self {
            entries: IndexMap::new(),
            capacity,
            lookups: 0,
            hits: 0,
            stores: 0,
            updates: 0,
            evictions: 0,
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured capacity (entries).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total calls to [`Self::lookup`].
    pub fn lookups(&self) -> u64 {
        self.lookups
    }

    /// Total successful lookups (hits).
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Total fresh inserts.
    pub fn stores(&self) -> u64 {
        self.stores
    }

    /// Total in-place overwrites of an existing, larger `failed_remain`.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Total LRU evictions performed.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Looks up `hash` at `remain` plies, with lenience `margin`.
    ///
    /// `Hit` iff an entry exists with `failed_remain` such that
    /// `failed_remain == remain` or `failed_remain - remain > margin`.
    /// On a hit, the entry moves to the most-recently-used end.
    pub fn lookup(&mut self, hash: u64, remain: u32, margin: u32) -> LookupResult {
        self.lookups += 1;
        let Some(&failed_remain) = self.entries.get(&hash) else {
            return LookupResult::Miss;
        };
        let delta = failed_remain as i64 - remain as i64;
        if delta == 0 || delta > margin as i64 {
            self.touch(hash);
            self.hits += 1;
            LookupResult::Hit
        } else {
            LookupResult::Miss
        }
    }

    /// Records a failure for `hash` at `remain` plies.
    ///
    /// Inserts if absent; overwrites if present with a smaller
    /// `failed_remain`; otherwise a no-op. Any insert or update moves the
    /// entry to the most-recently-used end.
    pub fn store(&mut self, hash: u64, remain: u32) {
        match self.entries.get(&hash).copied() {
            None => {
                self.evict_if_full();
                self.entries.insert(hash, remain);
                self.stores += 1;
            }
            Some(existing) if existing < remain => {
                self.entries.insert(hash, remain);
                self.updates += 1;
                self.touch(hash);
            }
            Some(_) => {
                self.touch(hash);
            }
        }
    }

    fn touch(&mut self, hash: u64) {
        if let Some(index) = self.entries.get_index_of(&hash) {
            if index != self.entries.len() - 1 {
                let (k, v) = self.entries.shift_remove_index(index).expect("index just observed");
                self.entries.insert(k, v);
            }
        }
    }

    fn evict_if_full(&mut self) {
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
            self.evictions += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_empty_table() {
        let mut tt = TranspositionTable::new(10_000);
        assert_eq!(tt.lookup(42, 5, 0), LookupResult::Miss);
    }

    #[test]
    fn exact_rehit_is_a_hit_regardless_of_margin() {
        let mut tt = TranspositionTable::new(10_000);
        tt.store(42, 5);
        assert_eq!(tt.lookup(42, 5, 0), LookupResult::Hit);
    }

    #[test]
    fn smaller_remain_within_margin_is_a_miss() {
        let mut tt = TranspositionTable::new(10_000);
        tt.store(42, 5);
        // failed_remain - remain == 2, margin == 3 => not > margin => miss
        assert_eq!(tt.lookup(42, 3, 3), LookupResult::Miss);
    }

    #[test]
    fn smaller_remain_beyond_margin_is_a_hit() {
        let mut tt = TranspositionTable::new(10_000);
        tt.store(42, 5);
        // failed_remain - remain == 4 > margin 2 => hit
        assert_eq!(tt.lookup(42, 1, 2), LookupResult::Hit);
    }

    #[test]
    fn larger_remain_than_stored_is_a_miss() {
        let mut tt = TranspositionTable::new(10_000);
        tt.store(42, 2);
        assert_eq!(tt.lookup(42, 5, 0), LookupResult::Miss);
    }

    #[test]
    fn store_overwrites_with_larger_failed_remain() {
        let mut tt = TranspositionTable::new(10_000);
        tt.store(42, 2);
        tt.store(42, 7);
        assert_eq!(tt.lookup(42, 7, 0), LookupResult::Hit);
        assert_eq!(tt.updates(), 1);
    }

    #[test]
    fn store_does_not_overwrite_with_smaller_failed_remain() {
        let mut tt = TranspositionTable::new(10_000);
        tt.store(42, 7);
        tt.store(42, 2);
        assert_eq!(tt.lookup(42, 7, 0), LookupResult::Hit);
        assert_eq!(tt.updates(), 0);
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let mut tt = TranspositionTable::new(3 * ENTRY_SIZE_ESTIMATE);
        assert_eq!(tt.capacity(), 3);
        tt.store(1, 1);
        tt.store(2, 1);
        tt.store(3, 1);
        // touch 1 so it's most-recent; 2 becomes least-recent
        tt.lookup(1, 1, 0);
        tt.store(4, 1);
        assert_eq!(tt.evictions(), 1);
        assert_eq!(tt.lookup(2, 1, 0), LookupResult::Miss);
        assert_eq!(tt.lookup(1, 1, 0), LookupResult::Hit);
        assert_eq!(tt.lookup(3, 1, 0), LookupResult::Hit);
        assert_eq!(tt.lookup(4, 1, 0), LookupResult::Hit);
    }

    #[test]
    fn len_and_is_empty_track_entries() {
        let mut tt = TranspositionTable::new(10_000);
        assert!(tt.is_empty());
        tt.store(1, 1);
        assert_eq!(tt.len(), 1);
        assert!(!tt.is_empty());
    }
}
