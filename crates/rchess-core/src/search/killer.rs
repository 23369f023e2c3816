//! Killer moves table
//!
//! Quiet moves that caused a beta cutoff, two per ply, most recent first.

use crate::types::CompactMove;

/// Maximum number of plies to track killer moves
const MAX_KILLER_PLY: usize = 128;

/// Number of killer moves per ply
pub(crate) const KILLERS_PER_PLY: usize = 2;

pub(crate) struct KillerTable {
    killers: Vec<[CompactMove; KILLERS_PER_PLY]>,
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            killers: vec![[CompactMove::NONE; KILLERS_PER_PLY]; MAX_KILLER_PLY],
        }
    }

    /// Record a cutoff move at `ply`
    ///
    /// A move already stored at this ply is left where it is.
    pub fn update(&mut self, ply: usize, mv: CompactMove) {
        let Some(slots) = self.killers.get_mut(ply) else {
            return;
        };
        if slots.contains(&mv) {
            return;
        }
        slots[1] = slots[0];
        slots[0] = mv;
    }

    /// Killer moves for `ply` in order of recency
    pub fn get(&self, ply: usize) -> [CompactMove; KILLERS_PER_PLY] {
        self.killers.get(ply).copied().unwrap_or([CompactMove::NONE; KILLERS_PER_PLY])
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}
