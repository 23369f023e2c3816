//! Score constants (centipawns)

use super::PieceType;

/// Search window bound; also the score of being checkmated (negated)
pub const INFINITY: i32 = 30000;

/// Scores above this in absolute value denote a forced mate.
///
/// Larger than any reachable material balance: a king, nine queens and
/// the two of each remaining piece.
pub const CHECKMATE_THRESHOLD: i32 = PieceType::King.value()
    + 9 * PieceType::Queen.value()
    + 2 * PieceType::Rook.value()
    + 2 * PieceType::Bishop.value()
    + 2 * PieceType::Knight.value();

/// Mate scores lose this much per ply of propagation
pub const MATE_PLY_PENALTY: i32 = 100;

/// Draw score
pub const DRAW: i32 = 0;

#[inline]
pub const fn is_mate_score(score: i32) -> bool {
    score > CHECKMATE_THRESHOLD || score < -CHECKMATE_THRESHOLD
}
