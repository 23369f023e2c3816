//! Static evaluation
//!
//! Centipawn score relative to the side to move: material, piece-square
//! tables (middlegame or endgame set, chosen per side), bishop pair and a
//! handful of pawn-structure terms.

mod pst;

use crate::position::Position;
use crate::types::{Color, PieceType, Square};
use smallvec::SmallVec;

pub const BISHOP_PAIR_BONUS: i32 = 50;
pub const DOUBLED_PAWN_PENALTY: i32 = 20;
pub const ISOLATED_PAWN_PENALTY: i32 = 20;
pub const PASSED_PAWN_BONUS: i32 = 60;
pub const CHAINED_PAWN_BONUS: i32 = 30;

/// Position scorer used by the search
pub trait Evaluator: Send + Sync {
    /// Score in centipawns, positive is good for the side to move
    fn evaluate(&self, pos: &Position) -> i32;
}

/// The default handcrafted evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticEvaluator;

impl Evaluator for StaticEvaluator {
    #[inline]
    fn evaluate(&self, pos: &Position) -> i32 {
        evaluate(pos)
    }
}

/// A pawn as (file, rank counted from its own side, 0 = back rank)
type PawnInfo = (i32, i32);

#[derive(Default)]
struct SideTally {
    material: i32,
    middlegame: i32,
    endgame: i32,
    counts: [i32; PieceType::NUM],
    pawns: SmallVec<[PawnInfo; 8]>,
}

/// Evaluate `pos` from the point of view of the side to move
pub fn evaluate(pos: &Position) -> i32 {
    let mut sides: [SideTally; 2] = Default::default();

    for sq in Square::all() {
        let Some(pc) = pos.piece_on(sq) else {
            continue;
        };
        let c = pc.color.index();
        let k = pc.kind.index();
        let side = &mut sides[c];
        side.material += pc.kind.value();
        side.middlegame += pst::MIDDLEGAME[c][k][sq.index()];
        side.endgame += pst::ENDGAME[c][k][sq.index()];
        side.counts[k] += 1;
        if pc.kind == PieceType::Pawn {
            let rank = match pc.color {
                Color::White => 7 - sq.row() as i32,
                Color::Black => sq.row() as i32,
            };
            side.pawns.push((sq.file() as i32, rank));
        }
    }

    let mut score = [0i32; 2];
    for color in Color::ALL {
        let us = &sides[color.index()];
        let them = &sides[(!color).index()];
        let s = &mut score[color.index()];

        *s += us.material;
        *s += if is_endgame_for(them) { us.endgame } else { us.middlegame };

        if us.counts[PieceType::Bishop.index()] >= 2 {
            *s += BISHOP_PAIR_BONUS;
        }

        *s += pawn_structure(&us.pawns, &them.pawns);
    }

    let us = pos.side_to_move().index();
    score[us] - score[1 - us]
}

/// Endgame tables apply once the opponent has no queen and either at most
/// one rook or at most two minor pieces
fn is_endgame_for(opponent: &SideTally) -> bool {
    let c = &opponent.counts;
    c[PieceType::Queen.index()] == 0
        && (c[PieceType::Rook.index()] <= 1
            || c[PieceType::Knight.index()] + c[PieceType::Bishop.index()] <= 2)
}

fn pawn_structure(ours: &[PawnInfo], theirs: &[PawnInfo]) -> i32 {
    let mut score = 0;
    for (i, &(file, rank)) in ours.iter().enumerate() {
        let mut doubled = false;
        let mut isolated = true;
        let mut chained = false;

        for (j, &(f2, r2)) in ours.iter().enumerate() {
            if i == j {
                continue;
            }
            if f2 == file {
                // A friendly pawn further up the same file
                if r2 > rank {
                    doubled = true;
                }
            } else if (f2 - file).abs() == 1 {
                if r2 <= rank {
                    isolated = false;
                }
                if rank - r2 == 1 {
                    chained = true;
                }
            }
        }

        // Enemy ranks flipped into our frame
        let passed = !doubled
            && !theirs
                .iter()
                .any(|&(f2, r2)| (f2 - file).abs() == 1 && 7 - r2 >= rank);

        if doubled {
            score -= DOUBLED_PAWN_PENALTY;
        }
        if isolated {
            score -= ISOLATED_PAWN_PENALTY;
        }
        if passed {
            score += PASSED_PAWN_BONUS;
        }
        if chained {
            score += CHAINED_PAWN_BONUS;
        }
    }
    score
}
