//! Search and timer threads

use super::Inner;
use crate::eval::Evaluator;
use crate::search::Searcher;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::sync::Weak;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Stack for search threads; the recursion keeps a move list per ply
const SEARCH_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Run `searcher` on its own thread
///
/// A search that completes its deepening loop reports back so the engine
/// can commit. An interrupted one exits silently.
pub(super) fn spawn_search<E: Evaluator + 'static>(
    id: u64,
    mut searcher: Searcher<E>,
    engine: Weak<Inner>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("search-{id}"))
        .stack_size(SEARCH_STACK_SIZE)
        .spawn(move || {
            let result = searcher.run();
            log::debug!(
                "Search {} finished [depth {}, score {}, nodes {}, completed {}]",
                id,
                result.depth,
                result.score,
                result.nodes,
                result.completed
            );
            if !result.completed {
                return;
            }
            if let Some(inner) = engine.upgrade() {
                inner.on_search_complete(id);
            }
        })
}

/// One-shot deadline for a search; dropping it cancels the deadline
pub(super) struct Timer {
    _cancel: Sender<()>,
}

impl Timer {
    pub fn start(id: u64, delay: Duration, engine: Weak<Inner>) -> std::io::Result<Timer> {
        let (cancel, cancelled) = crossbeam_channel::bounded::<()>(0);
        thread::Builder::new()
            .name(format!("timer-{id}"))
            .spawn(move || wait_and_fire(id, delay, cancelled, engine))?;
        Ok(Timer { _cancel: cancel })
    }
}

fn wait_and_fire(id: u64, delay: Duration, cancelled: Receiver<()>, engine: Weak<Inner>) {
    match cancelled.recv_timeout(delay) {
        Err(RecvTimeoutError::Timeout) => {
            if let Some(inner) = engine.upgrade() {
                log::debug!("Search {} out of time", id);
                inner.on_timeout(id);
            }
        }
        // Cancelled or dropped
        Ok(()) | Err(RecvTimeoutError::Disconnected) => {}
    }
}
