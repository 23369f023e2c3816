//! Basic types
//!
//! # Dependency order
//!
//! ```text
//! Color
//!   ↓
//! Square
//!   ↓
//! PieceType → Piece
//!   ↓
//! CastleRights, Castle
//!   ↓
//! Move, CompactMove, MoveList
//!
//! Bound and the score constants in `value` are standalone
//! ```

mod bound;
mod castle;
mod color;
mod moves;
mod piece;
mod square;
pub mod value;

pub use bound::Bound;
pub use castle::{Castle, CastleRights};
pub use color::Color;
pub use moves::{CompactMove, Move, MoveList};
pub use piece::{Piece, PieceType};
pub use square::Square;
