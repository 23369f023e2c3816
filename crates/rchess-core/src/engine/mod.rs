//! Game-playing orchestrator
//!
//! [`Engine`] owns the game, the clock, the opening book and the shared
//! transposition table, and decides between book moves, fresh searches
//! and promoting a ponder search. Results go out as [`EngineEvent`]s on a
//! channel.
//!
//! At most one search is active at a time. Each search gets an id; a
//! timer or a finishing worker only acts if its id still names the active
//! search, so leftovers from a discarded search are ignored. Stopping is
//! cooperative: a discarded worker may run briefly past the commit.

mod config;
mod worker;

pub use config::EngineConfig;

use crate::book::OpeningBook;
use crate::game::{Game, GameError, GameResult};
use crate::position::Position;
use crate::search::{BestSoFar, SearchControl, SearchInfo, SearchLimits, Searcher};
use crate::time::{allocate_search_time, Clock, ClockFormat};
use crate::tt::TranspositionTable;
use crate::types::Move;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use worker::Timer;

/// Output of the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine played this move
    Move(String),
    /// The engine resigned
    Resign,
    Error(String),
    /// Progress of the running search
    Thinking(SearchInfo),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A completed search produced no move
    #[error("Nothing to play")]
    NothingToPlay,

    #[error("Illegal move in book: {0}")]
    IllegalBookMove(String),

    /// The game refused the move the search settled on
    #[error("Search move {0} rejected: {1}")]
    MoveRejected(String, GameError),
}

struct ActiveSearch {
    id: u64,
    root: Position,
    control: Arc<SearchControl>,
    /// Opponent move this ponder search assumes
    ponder_move: Option<String>,
    handle: Option<JoinHandle<()>>,
    timer: Option<Timer>,
}

struct State {
    game: Game,
    book: Option<OpeningBook>,
    config: EngineConfig,
    clock: Clock,
    engaged: bool,
    search: Option<ActiveSearch>,
}

pub(crate) struct Inner {
    state: Mutex<State>,
    tt: Arc<TranspositionTable>,
    events: Sender<EngineEvent>,
    next_id: AtomicU64,
}

/// Cloneable handle to a running engine
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Inner>,
}

impl Engine {
    /// Create an engine and the receiving end of its event channel
    pub fn new(config: EngineConfig) -> (Engine, Receiver<EngineEvent>) {
        let (events, receiver) = crossbeam_channel::unbounded();
        let tt = Arc::new(TranspositionTable::new(config.tt_capacity));
        let clock = Clock::new(config.clock_format.base_ms());
        let inner = Inner {
            state: Mutex::new(State {
                game: Game::new(),
                book: None,
                config,
                clock,
                engaged: true,
                search: None,
            }),
            tt,
            events,
            next_id: AtomicU64::new(0),
        };
        (
            Engine {
                inner: Arc::new(inner),
            },
            receiver,
        )
    }

    pub fn with_book(self, book: OpeningBook) -> Self {
        self.inner.state.lock().book = Some(book);
        self
    }

    pub fn set_book(&self, book: Option<OpeningBook>) {
        self.inner.state.lock().book = book;
    }

    /// Think about the current position and play a move
    pub fn go(&self) {
        let mut st = self.inner.state.lock();
        self.inner.go(&mut st);
    }

    /// Play the best move found so far by the active search
    pub fn move_now(&self) {
        let mut st = self.inner.state.lock();
        self.inner.move_now(&mut st);
    }

    /// Apply the opponent's move, then reply unless disengaged
    pub fn user_move(&self, notation: &str) -> Result<Move, GameError> {
        let mut st = self.inner.state.lock();
        let mv = st.game.do_move(notation)?;
        self.inner.go(&mut st);
        Ok(mv)
    }

    /// Stop replying to moves (force mode); any search is discarded
    pub fn disengage(&self) {
        let mut st = self.inner.state.lock();
        st.engaged = false;
        Inner::destroy_threads(&mut st);
    }

    pub fn engage(&self) {
        self.inner.state.lock().engaged = true;
    }

    pub fn is_engaged(&self) -> bool {
        self.inner.state.lock().engaged
    }

    /// Set the engine's remaining time
    pub fn set_clock(&self, amount_ms: i64) {
        self.inner.state.lock().clock.set(amount_ms);
    }

    /// Change the time control; the clock restarts at its base time
    pub fn set_clock_format(&self, format: ClockFormat) {
        let mut st = self.inner.state.lock();
        st.clock.set(format.base_ms());
        st.config.clock_format = format;
    }

    pub fn set_ponder(&self, ponder: bool) {
        let mut st = self.inner.state.lock();
        st.config.ponder = ponder;
        if !ponder && st.search.as_ref().is_some_and(|s| s.control.is_ponder()) {
            Inner::destroy_threads(&mut st);
        }
    }

    pub fn set_show_thinking(&self, show: bool) {
        self.inner.state.lock().config.show_thinking = show;
    }

    /// Take back one ply, stopping any search first
    pub fn undo(&self) -> Option<Move> {
        let mut st = self.inner.state.lock();
        Inner::destroy_threads(&mut st);
        st.game.undo()
    }

    /// Set up `position` as a new game
    pub fn set_position(&self, position: Position) {
        let mut st = self.inner.state.lock();
        Inner::destroy_threads(&mut st);
        st.game.set_position(position);
    }

    /// Start a new game from the initial position
    pub fn new_game(&self) {
        let mut st = self.inner.state.lock();
        Inner::destroy_threads(&mut st);
        st.game = Game::new();
        st.engaged = true;
        let base = st.config.clock_format.base_ms();
        st.clock.set(base);
    }

    /// Stop any search and wait for its thread
    pub fn shutdown(&self) {
        let handle = {
            let mut st = self.inner.state.lock();
            st.search.take().and_then(|mut active| {
                active.control.stop();
                active.handle.take()
            })
        };
        if let Some(handle) = handle {
            if handle.join().is_err() {
                log::error!("Search thread panicked");
            }
        }
    }

    /// Milliseconds left on the engine's clock
    pub fn time_left(&self) -> i64 {
        self.inner.state.lock().clock.left()
    }

    pub fn position(&self) -> Position {
        self.inner.state.lock().game.position().clone()
    }

    /// Snapshot of the game record
    pub fn game(&self) -> Game {
        self.inner.state.lock().game.clone()
    }

    pub fn result(&self) -> Option<GameResult> {
        self.inner.state.lock().game.result()
    }

    pub fn config(&self) -> EngineConfig {
        self.inner.state.lock().config.clone()
    }

    /// Whether a search (real or ponder) is active
    pub fn is_thinking(&self) -> bool {
        self.inner.state.lock().search.is_some()
    }

    pub fn is_pondering(&self) -> bool {
        self.inner
            .state
            .lock()
            .search
            .as_ref()
            .is_some_and(|s| s.control.is_ponder())
    }

    /// Deepest completed iteration of the active search
    pub fn best_so_far(&self) -> Option<BestSoFar> {
        self.inner.state.lock().search.as_ref().map(|s| s.control.best())
    }

    /// The opponent reply the current ponder search expects
    pub fn ponder_move(&self) -> Option<String> {
        let st = self.inner.state.lock();
        st.search
            .as_ref()
            .filter(|s| s.control.is_ponder())
            .and_then(|s| s.ponder_move.clone())
    }

    pub fn transposition_table(&self) -> Arc<TranspositionTable> {
        Arc::clone(&self.inner.tt)
    }
}

impl Inner {
    fn send(&self, event: EngineEvent) {
        // Nobody listening is not an error for the engine
        let _ = self.events.send(event);
    }

    fn go(self: &Arc<Self>, st: &mut State) {
        if !st.engaged || st.game.is_over() {
            return;
        }

        if let Some(notation) = st.book.as_ref().and_then(|b| b.probe(st.game.position())) {
            Self::destroy_threads(st);
            match st.game.do_move(&notation) {
                Ok(_) => {
                    Self::credit_increment(st);
                    self.send(EngineEvent::Move(notation));
                    return;
                }
                Err(_) => {
                    let err = EngineError::IllegalBookMove(notation);
                    log::error!("{}", err);
                    self.send(EngineEvent::Error(err.to_string()));
                }
            }
        }

        let search_time = allocate_search_time(&st.config.clock_format, st.clock.left(), st.game.move_number());
        let pos = st.game.position().clone();
        let hash = pos.hash();
        let weak = Arc::downgrade(self);

        // Hash first, then the full position so a collision cannot promote
        // a search of some other position
        if let Some(active) = st.search.as_mut().filter(|s| s.root.hash() == hash && s.root == pos) {
            log::debug!("Ponder hit, promoting search {} [{:?}]", active.id, search_time);
            active.control.set_ponder(false);
            if active.control.is_finished() {
                self.move_now(st);
                return;
            }
            active.control.set_search_time(Some(search_time));
            if !active.control.can_search_deeper() {
                self.move_now(st);
                return;
            }
            match Timer::start(active.id, search_time, weak) {
                Ok(timer) => active.timer = Some(timer),
                Err(e) => log::error!("Failed to start timer: {}", e),
            }
            return;
        }

        Self::destroy_threads(st);
        let limits = SearchLimits {
            max_depth: st.config.max_depth,
            search_time: Some(search_time),
            ponder: false,
        };
        log::debug!("Searching {} for {:?}", pos.to_fen(), search_time);
        if let Some(id) = self.start_search(st, pos, limits, None) {
            match Timer::start(id, search_time, weak) {
                Ok(timer) => {
                    if let Some(active) = st.search.as_mut() {
                        active.timer = Some(timer);
                    }
                }
                Err(e) => log::error!("Failed to start timer: {}", e),
            }
        }
    }

    fn start_search(
        self: &Arc<Self>,
        st: &mut State,
        pos: Position,
        limits: SearchLimits,
        ponder_move: Option<String>,
    ) -> Option<u64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut searcher = Searcher::new(&pos, Arc::clone(&self.tt), limits);
        if st.config.show_thinking {
            let events = self.events.clone();
            searcher = searcher.with_info_callback(Box::new(move |info| {
                let _ = events.send(EngineEvent::Thinking(info.clone()));
            }));
        }
        let control = searcher.control();

        match worker::spawn_search(id, searcher, Arc::downgrade(self)) {
            Ok(handle) => {
                st.search = Some(ActiveSearch {
                    id,
                    root: pos,
                    control,
                    ponder_move,
                    handle: Some(handle),
                    timer: None,
                });
                Some(id)
            }
            Err(e) => {
                log::error!("Failed to start search thread: {}", e);
                self.send(EngineEvent::Error(format!("Failed to start search: {e}")));
                None
            }
        }
    }

    /// Add the per-move bonus of an increment clock after our move
    fn credit_increment(st: &mut State) {
        let increment_ms = st.config.clock_format.increment_ms();
        if increment_ms > 0 {
            st.clock.increment(increment_ms);
        }
    }

    /// Stop and forget the active search and its timer
    fn destroy_threads(st: &mut State) {
        if let Some(active) = st.search.take() {
            active.control.stop();
            // Dropping the timer cancels it; the worker exits on its own
        }
    }

    fn move_now(self: &Arc<Self>, st: &mut State) {
        let Some(active) = st.search.as_ref() else {
            return;
        };
        // A ponder search only plays once promoted by go()
        if active.control.is_ponder() {
            return;
        }

        let best = active.control.best();
        if best.score < -st.config.resign_threshold {
            log::info!("Resigning [score {}]", best.score);
            Self::destroy_threads(st);
            st.game.resign();
            self.send(EngineEvent::Resign);
            return;
        }

        match best.best_move.notation() {
            Some(notation) => match st.game.do_move(&notation) {
                Ok(_) => {
                    Self::credit_increment(st);
                    self.send(EngineEvent::Move(notation));
                }
                Err(e) => {
                    let err = EngineError::MoveRejected(notation, e);
                    log::error!("{} [{}]", err, active.root.to_fen());
                    self.send(EngineEvent::Error(err.to_string()));
                }
            },
            None => {
                let err = EngineError::NothingToPlay;
                log::error!("{} [{}]", err, active.root.to_fen());
                self.send(EngineEvent::Error(err.to_string()));
            }
        }
        Self::destroy_threads(st);

        if st.config.ponder {
            self.ponder(st);
        }
    }

    /// Think on the opponent's time about the reply the table expects
    fn ponder(self: &Arc<Self>, st: &mut State) {
        if st.game.is_over() {
            return;
        }
        let mut pos = st.game.position().clone();
        let reply = self.tt.best_move(pos.hash());
        if reply.is_none() {
            return;
        }
        let Some(expected) = st.game.legal_moves().iter().find(|m| m.compact() == reply).copied() else {
            return;
        };
        pos.do_move(&expected);

        if st.book.as_ref().is_some_and(|b| !b.moves(&pos).is_empty()) {
            return;
        }
        if pos.generate_moves().is_empty() {
            return;
        }

        log::debug!("Pondering on {}", expected);
        let limits = SearchLimits {
            max_depth: st.config.max_depth,
            search_time: None,
            ponder: true,
        };
        self.start_search(st, pos, limits, Some(expected.to_string()));
    }

    fn on_search_complete(self: &Arc<Self>, id: u64) {
        let mut st = self.state.lock();
        if st.search.as_ref().is_some_and(|s| s.id == id) {
            self.move_now(&mut st);
        }
    }

    fn on_timeout(self: &Arc<Self>, id: u64) {
        let mut st = self.state.lock();
        if st.search.as_ref().is_some_and(|s| s.id == id) {
            self.move_now(&mut st);
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(active) = self.state.get_mut().search.take() {
            active.control.stop();
        }
    }
}
