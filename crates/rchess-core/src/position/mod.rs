//! Position representation
//!
//! - `pos`: board state, do_move/undo_move, attack detection
//! - `movegen`: legal move generation
//! - `fen`: FEN parsing and output
//! - `zobrist`: position hashing
//! - `tables`: precomputed move tables

mod fen;
mod movegen;
mod pos;
pub(crate) mod tables;
pub mod zobrist;

pub use fen::{FenError, STARTPOS_FEN};
pub use pos::Position;
