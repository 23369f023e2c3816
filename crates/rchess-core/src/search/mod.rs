//! Iterative deepening principal variation search
//!
//! A [`Searcher`] owns a private copy of the root position and walks the
//! tree on whatever thread calls [`Searcher::run`]. Other threads steer it
//! through the shared [`SearchControl`]: stop requests, the ponder flag and
//! the time budget. The transposition table is shared through an `Arc`.

mod control;
mod killer;
mod ordering;
mod searcher;

pub use control::{BestSoFar, SearchControl, BRANCH_FACTOR};
pub use searcher::{Interrupted, Searcher};

use crate::types::CompactMove;
use smallvec::SmallVec;
use std::time::Duration;

/// Deepest iteration ever attempted
pub const MAX_DEPTH: u32 = 128;

/// Depth recorded for checkmate and stalemate entries
pub const TERMINAL_DEPTH: i32 = 100;

/// Principal variation as compact moves, root move first
pub type PrincipalVariation = SmallVec<[CompactMove; 32]>;

/// Search limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum iteration depth
    pub max_depth: u32,
    /// Approximate time to spend; `None` searches until stopped or done
    pub search_time: Option<Duration>,
    /// Ponder searches ignore the time budget
    pub ponder: bool,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            search_time: None,
            ponder: false,
        }
    }
}

impl SearchLimits {
    pub fn depth(max_depth: u32) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    pub fn time(search_time: Duration) -> Self {
        Self {
            search_time: Some(search_time),
            ..Self::default()
        }
    }

    pub fn ponder() -> Self {
        Self {
            ponder: true,
            ..Self::default()
        }
    }
}

/// Progress report emitted after every completed iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: u32,
    /// Deepest ply reached, quiescence included
    pub seldepth: u32,
    pub score: i32,
    pub elapsed: Duration,
    pub nodes: u64,
    pub evals: u64,
    /// Transposition table occupancy in per mille
    pub hashfull: usize,
    /// Space separated coordinate moves
    pub pv: String,
}

/// Info callback type
pub type InfoCallback = Box<dyn Fn(&SearchInfo) + Send>;

/// Outcome of [`Searcher::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move of the deepest completed iteration
    pub best_move: Option<CompactMove>,
    pub score: i32,
    /// Deepest completed iteration, 0 if none completed
    pub depth: u32,
    pub nodes: u64,
    pub pv: PrincipalVariation,
    /// False when the search was stopped from outside
    pub completed: bool,
}

/// Render a principal variation as "e2e4 e7e5 g1f3"
pub fn pv_to_string(pv: &[CompactMove]) -> String {
    pv.iter()
        .filter_map(|m| m.notation())
        .collect::<Vec<_>>()
        .join(" ")
}
