//! Transposition table (spec §4.5). A single-threaded, fixed-capacity
//! bucketed cache — unlike the teacher's lock-free `hashtable.rs` (built
//! for its lazy-SMP threaded search, an explicit spec Non-goal here), this
//! stores each entry behind a plain `Box<[Option<Entry>]>` since the search
//! core is strictly single-threaded (spec §5).

use squadro_types::{Move, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub hash: u64,
    pub depth: u8,
    pub score: Score,
    pub bound: Bound,
    pub best_move: Move,
}

pub struct TranspositionTable {
    slots: Box<[Option<Entry>]>,
    mask: usize,
    probes: u64,
    hits: u64,
}

impl TranspositionTable {
    /// Builds a table sized to `size_mb` megabytes, rounded down to the
    /// nearest power of two bucket count so indexing is a mask instead of a
    /// division (same sizing trick as the teacher's `hashtable.rs`).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<Entry>>().max(1);
        let requested = (size_mb * 1024 * 1024 / entry_size).max(1);
        let capacity = requested.next_power_of_two().min(1 << 24);
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
            mask: capacity - 1,
            probes: 0,
            hits: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Always-replace-if-deeper: only overwrites an occupied slot when the
    /// new entry searched at least as deep (spec §4.5).
    pub fn store(&mut self, hash: u64, depth: u8, score: Score, bound: Bound, best_move: Move) {
        let index = self.index(hash);
        let slot = &mut self.slots[index];
        let should_replace = match slot {
            None => true,
            Some(existing) => depth >= existing.depth,
        };
        if should_replace {
            *slot = Some(Entry {
                hash,
                depth,
                score,
                bound,
                best_move,
            });
        }
    }

    /// Returns the slot only if its stored hash matches; a bucket
    /// collision (different position, same index) is indistinguishable
    /// from a miss to the caller (spec §4.5).
    pub fn probe(&mut self, hash: u64) -> Option<Entry> {
        self.probes += 1;
        let entry = self.slots[self.index(hash)];
        match entry {
            Some(e) if e.hash == hash => {
                self.hits += 1;
                Some(e)
            }
            _ => None,
        }
    }

    /// Looks up the best-move hint for `hash` for use in move ordering,
    /// without disturbing the probe/hit counters (move ordering consults
    /// the table far more often than the search decides a cutoff).
    #[must_use]
    pub fn pv_move(&self, hash: u64) -> Option<Move> {
        match self.slots[self.index(hash)] {
            Some(e) if e.hash == hash => Some(e.best_move),
            _ => None,
        }
    }

    #[must_use]
    pub fn probes(&self) -> u64 {
        self.probes
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.probes = 0;
        self.hits = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squadro_types::PieceId;

    fn mv(id: u8) -> Move {
        Move::new(PieceId::new(id))
    }

    #[test]
    fn probe_before_any_store_is_a_miss() {
        let mut tt = TranspositionTable::new(1);
        assert!(tt.probe(42).is_none());
        assert_eq!(tt.probes(), 1);
        assert_eq!(tt.hits(), 0);
    }

    #[test]
    fn store_then_probe_same_hash_hits() {
        let mut tt = TranspositionTable::new(1);
        tt.store(7, 3, Score::from(100), Bound::Exact, mv(0));
        let entry = tt.probe(7).expect("expected a hit");
        assert_eq!(entry.depth, 3);
        assert_eq!(entry.score, Score::from(100));
        assert_eq!(tt.hits(), 1);
    }

    #[test]
    fn shallower_store_does_not_overwrite_deeper_entry() {
        let mut tt = TranspositionTable::new(1);
        tt.store(7, 5, Score::from(10), Bound::Exact, mv(0));
        tt.store(7, 2, Score::from(99), Bound::Exact, mv(1));
        let entry = tt.probe(7).unwrap();
        assert_eq!(entry.depth, 5);
        assert_eq!(entry.score, Score::from(10));
    }

    #[test]
    fn deeper_store_overwrites_shallower_entry() {
        let mut tt = TranspositionTable::new(1);
        tt.store(7, 2, Score::from(10), Bound::Exact, mv(0));
        tt.store(7, 5, Score::from(99), Bound::Exact, mv(1));
        let entry = tt.probe(7).unwrap();
        assert_eq!(entry.depth, 5);
    }

    #[test]
    fn mismatched_hash_in_same_bucket_is_a_miss() {
        let mut tt = TranspositionTable::new(1);
        let capacity = tt.mask + 1;
        tt.store(1, 4, Score::from(10), Bound::Exact, mv(0));
        assert!(tt.probe(1 + capacity as u64).is_none());
    }
}
