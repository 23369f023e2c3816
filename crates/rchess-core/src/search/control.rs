//! Shared search control
//!
//! The worker thread owns the [`Searcher`](super::Searcher); everyone else
//! talks to it through this block of atomics: stop requests, the ponder
//! flag, the time budget and the best move from the last completed
//! iteration.

use crate::types::CompactMove;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// How much longer the next iteration is assumed to take than the last
pub const BRANCH_FACTOR: u64 = 6;

/// Sentinel for "no time limit"
const NO_LIMIT: u64 = u64::MAX;

/// Result of the deepest completed iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestSoFar {
    pub best_move: CompactMove,
    pub score: i32,
    pub depth: u32,
}

pub struct SearchControl {
    stop: AtomicBool,
    ponder: AtomicBool,
    finished: AtomicBool,
    search_time_ms: AtomicU64,
    last_iteration_ms: AtomicU64,
    started: Instant,
    best: Mutex<BestSoFar>,
}

impl SearchControl {
    pub fn new(search_time: Option<Duration>, ponder: bool) -> Self {
        Self {
            stop: AtomicBool::new(false),
            ponder: AtomicBool::new(ponder),
            finished: AtomicBool::new(false),
            search_time_ms: AtomicU64::new(search_time.map_or(NO_LIMIT, duration_ms)),
            last_iteration_ms: AtomicU64::new(0),
            started: Instant::now(),
            best: Mutex::new(BestSoFar {
                best_move: CompactMove::NONE,
                score: 0,
                depth: 0,
            }),
        }
    }

    /// Ask the worker to stop at its next check
    #[inline]
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_ponder(&self) -> bool {
        self.ponder.load(Ordering::Acquire)
    }

    /// Turn a ponder search into a real one (or back)
    #[inline]
    pub fn set_ponder(&self, ponder: bool) {
        self.ponder.store(ponder, Ordering::Release);
    }

    /// Set once the iterative deepening loop has exited
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn search_time(&self) -> Option<Duration> {
        match self.search_time_ms.load(Ordering::Acquire) {
            NO_LIMIT => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn set_search_time(&self, search_time: Option<Duration>) {
        self.search_time_ms
            .store(search_time.map_or(NO_LIMIT, duration_ms), Ordering::Release);
    }

    /// Time since the search was created
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Note the time at which an iteration completed
    pub(crate) fn record_iteration(&self) {
        self.last_iteration_ms
            .store(duration_ms(self.elapsed()), Ordering::Release);
    }

    /// Time from the start of the search to the end of the last completed
    /// iteration
    pub fn last_iteration(&self) -> Duration {
        Duration::from_millis(self.last_iteration_ms.load(Ordering::Acquire))
    }

    /// Whether another iteration is likely to finish inside the budget
    ///
    /// Ponder searches always continue. Otherwise the time used up to the
    /// last completed iteration, scaled by [`BRANCH_FACTOR`], must stay
    /// within the search time.
    pub fn can_search_deeper(&self) -> bool {
        if self.is_ponder() {
            return true;
        }
        match self.search_time() {
            None => true,
            Some(budget) => {
                let spent = self.last_iteration_ms.load(Ordering::Acquire);
                spent.saturating_mul(BRANCH_FACTOR) <= duration_ms(budget)
            }
        }
    }

    pub fn best(&self) -> BestSoFar {
        *self.best.lock()
    }

    /// Record a completed iteration; shallower results never replace deeper ones
    pub(crate) fn commit(&self, best: BestSoFar) {
        let mut current = self.best.lock();
        if best.depth >= current.depth {
            *current = best;
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(NO_LIMIT - 1)
}

impl std::fmt::Debug for SearchControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchControl")
            .field("stop", &self.is_stopped())
            .field("ponder", &self.is_ponder())
            .field("finished", &self.is_finished())
            .field("search_time", &self.search_time())
            .field("best", &self.best())
            .finish()
    }
}
