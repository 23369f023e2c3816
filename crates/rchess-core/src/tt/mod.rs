//! Transposition table
//!
//! Fixed-size array indexed by `hash % capacity`. Every store overwrites
//! its slot unconditionally; there is no chaining and no replacement
//! policy. A probe only returns data when the stored hash equals the
//! query exactly.
//!
//! Each slot is two atomics. The key word holds `hash ^ data`, so a slot
//! torn by a concurrent writer fails the key check instead of returning
//! mixed data.

use crate::types::{Bound, CompactMove};
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of entries allocated by [`TranspositionTable::default`]
pub const DEFAULT_CAPACITY: usize = 4_194_304;

// data word layout
const SCORE_SHIFT: u64 = 0; // 16 bits, i16 bitcast
const DEPTH_SHIFT: u64 = 16; // 16 bits, i16 bitcast
const MOVE_SHIFT: u64 = 32; // 16 bits
const BOUND_SHIFT: u64 = 48; // 2 bits

/// Decoded table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub hash: u64,
    pub depth: i32,
    pub score: i32,
    pub bound: Bound,
    pub best_move: CompactMove,
}

impl TtEntry {
    fn pack(&self) -> u64 {
        let score = self.score.clamp(i16::MIN as i32, i16::MAX as i32) as i16 as u16 as u64;
        let depth = self.depth.clamp(i16::MIN as i32, i16::MAX as i32) as i16 as u16 as u64;
        (score << SCORE_SHIFT)
            | (depth << DEPTH_SHIFT)
            | ((self.best_move.raw() as u64) << MOVE_SHIFT)
            | ((self.bound as u64) << BOUND_SHIFT)
    }

    fn unpack(hash: u64, data: u64) -> TtEntry {
        TtEntry {
            hash,
            score: ((data >> SCORE_SHIFT) & 0xFFFF) as u16 as i16 as i32,
            depth: ((data >> DEPTH_SHIFT) & 0xFFFF) as u16 as i16 as i32,
            best_move: CompactMove::from_raw(((data >> MOVE_SHIFT) & 0xFFFF) as u16),
            bound: Bound::from_u8(((data >> BOUND_SHIFT) & 3) as u8).unwrap_or(Bound::None),
        }
    }

    /// Whether the stored score settles a node searched to `depth` with
    /// window (`alpha`, `beta`)
    #[inline]
    pub fn is_usable(&self, depth: i32, alpha: i32, beta: i32) -> bool {
        self.depth >= depth && self.bound.can_cutoff(self.score, alpha, beta)
    }
}

#[derive(Default)]
struct Slot {
    key: AtomicU64,
    data: AtomicU64,
}

/// Shared transposition table
pub struct TranspositionTable {
    slots: Box<[Slot]>,
}

impl TranspositionTable {
    /// Allocate `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let slots: Box<[Slot]> = (0..capacity).map(|_| Slot::default()).collect();
        log::info!(
            "Transposition table ready [{} entries, {} MB]",
            capacity,
            capacity * std::mem::size_of::<Slot>() / (1024 * 1024)
        );
        Self { slots }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn slot(&self, hash: u64) -> &Slot {
        // Non-negative modulo reduction over the unsigned hash
        &self.slots[(hash % self.slots.len() as u64) as usize]
    }

    /// Overwrite the slot for `hash`
    pub fn store(&self, hash: u64, depth: i32, score: i32, bound: Bound, best_move: CompactMove) {
        let data = TtEntry {
            hash,
            depth,
            score,
            bound,
            best_move,
        }
        .pack();
        let slot = self.slot(hash);
        slot.key.store(hash ^ data, Ordering::Relaxed);
        slot.data.store(data, Ordering::Relaxed);
    }

    /// Entry for exactly `hash`, if its slot still holds it
    pub fn probe(&self, hash: u64) -> Option<TtEntry> {
        let slot = self.slot(hash);
        let data = slot.data.load(Ordering::Relaxed);
        let key = slot.key.load(Ordering::Relaxed);
        let entry = TtEntry::unpack(hash, data);
        (key ^ data == hash && entry.bound != Bound::None).then_some(entry)
    }

    /// Membership test; false whenever another position owns the slot
    #[inline]
    pub fn exists(&self, hash: u64) -> bool {
        self.probe(hash).is_some()
    }

    /// Stored best move for `hash`, `CompactMove::NONE` when absent
    pub fn best_move(&self, hash: u64) -> CompactMove {
        self.probe(hash).map_or(CompactMove::NONE, |e| e.best_move)
    }

    /// Empty every slot
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.key.store(0, Ordering::Relaxed);
            slot.data.store(0, Ordering::Relaxed);
        }
    }

    /// Occupied slots per mille, sampled from the first thousand slots
    pub fn hashfull(&self) -> usize {
        let sample = self.slots.len().min(1000);
        let used = self.slots[..sample]
            .iter()
            .filter(|s| s.data.load(Ordering::Relaxed) != 0)
            .count();
        used * 1000 / sample
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
