//! # rchess-core
//!
//! Chess engine core library.
//!
//! ## Modules
//!
//! - `types`: basic types (Color, Square, Piece, Move, Bound, scores)
//! - `position`: board representation, FEN, do_move/undo_move, legal move generation, Zobrist hashing
//! - `eval`: static evaluation
//! - `tt`: transposition table
//! - `search`: iterative deepening PVS with quiescence
//! - `time`: clock and time allocation
//! - `book`: weighted opening book
//! - `game`: game record and results
//! - `engine`: orchestrator (book, search, pondering, deadlines)
//! - `perft`: move generation counters
//!

pub mod types;

pub mod position;

pub mod eval;

pub mod tt;

pub mod search;

pub mod time;

pub mod book;

pub mod game;

pub mod engine;

pub mod perft;

pub use engine::{Engine, EngineConfig, EngineError, EngineEvent};
pub use game::{Game, GameError, GameResult};
pub use position::{FenError, Position, STARTPOS_FEN};
pub use types::{Color, CompactMove, Move, Piece, PieceType, Square};
