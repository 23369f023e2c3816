//! Legal move generation
//!
//! Pseudo-legal candidates are produced per piece from the precomputed
//! tables, then each one is trial-applied to see whether it leaves the
//! mover's king in check.

use super::pos::{Position, en_passant_victim};
use super::tables::{DIAGONAL, STRAIGHT, TABLES, Targets, promotion_row};
use crate::types::{Castle, CastleRights, Move, MoveList, Piece, PieceType, Square};

impl Position {
    /// All strictly legal moves for the side to move
    pub fn generate_moves(&mut self) -> MoveList {
        let mut moves = MoveList::new();
        let us = self.side_to_move;

        for from in Square::all() {
            let Some(piece) = self.piece_on(from) else {
                continue;
            };
            if piece.color != us {
                continue;
            }
            match piece.kind {
                PieceType::Pawn => self.pawn_moves(from, &mut moves),
                PieceType::Knight => self.step_moves(from, &TABLES.knight[from.index()], &mut moves),
                PieceType::Bishop => self.slide_moves(from, &DIAGONAL, &mut moves),
                PieceType::Rook => self.slide_moves(from, &STRAIGHT, &mut moves),
                PieceType::Queen => {
                    self.slide_moves(from, &STRAIGHT, &mut moves);
                    self.slide_moves(from, &DIAGONAL, &mut moves);
                }
                PieceType::King => {
                    self.step_moves(from, &TABLES.king[from.index()], &mut moves);
                    self.castle_moves(&mut moves);
                }
            }
        }
        moves
    }

    /// Legal captures only (en passant included)
    pub fn generate_captures(&mut self) -> MoveList {
        let mut moves = self.generate_moves();
        moves.retain(|m| m.is_capture());
        moves
    }

    /// Look up a legal move by coordinate notation ("e2e4", "e7e8q")
    pub fn find_move(&mut self, notation: &str) -> Option<Move> {
        self.generate_moves()
            .into_iter()
            .find(|m| m.to_string() == notation)
    }

    /// Whether the side to move has no legal move and is in check
    pub fn is_checkmate(&mut self) -> bool {
        self.generate_moves().is_empty() && self.is_in_check(self.side_to_move)
    }

    /// Whether the side to move has no legal move and is not in check
    pub fn is_stalemate(&mut self) -> bool {
        self.generate_moves().is_empty() && !self.is_in_check(self.side_to_move)
    }

    fn step_moves(&mut self, from: Square, targets: &Targets, moves: &mut MoveList) {
        let us = self.side_to_move;
        for to in targets.iter() {
            if self.piece_on(to).is_none_or(|p| p.color != us) {
                let mv = self.build_move(from, to, None);
                push_if_legal(mv, moves);
            }
        }
    }

    fn slide_moves(&mut self, from: Square, dirs: &[usize; 4], moves: &mut MoveList) {
        let us = self.side_to_move;
        for &dir in dirs {
            for to in TABLES.rays[from.index()][dir].iter() {
                match self.piece_on(to) {
                    None => {
                        let mv = self.build_move(from, to, None);
                        push_if_legal(mv, moves);
                    }
                    Some(p) => {
                        if p.color != us {
                            let mv = self.build_move(from, to, None);
                            push_if_legal(mv, moves);
                        }
                        break;
                    }
                }
            }
        }
    }

    fn pawn_moves(&mut self, from: Square, moves: &mut MoveList) {
        let us = self.side_to_move;
        let c = us.index();

        if let Some(to) = TABLES.pawn_push[c][from.index()].and_then(|s| Square::from_index(s as usize)) {
            if self.piece_on(to).is_none() {
                self.pawn_move_to(from, to, moves);
                let double = TABLES.pawn_double[c][from.index()]
                    .and_then(|s| Square::from_index(s as usize));
                if let Some(to2) = double {
                    if self.piece_on(to2).is_none() {
                        let mv = self.build_move(from, to2, None);
                        push_if_legal(mv, moves);
                    }
                }
            }
        }

        for to in TABLES.pawn_captures(us, from).iter() {
            let enemy = self.piece_on(to).is_some_and(|p| p.color != us);
            if enemy || self.en_passant == Some(to) {
                self.pawn_move_to(from, to, moves);
            }
        }
    }

    /// Single-step pawn move, expanded into the four promotions on the last rank
    fn pawn_move_to(&mut self, from: Square, to: Square, moves: &mut MoveList) {
        if to.row() == promotion_row(self.side_to_move) {
            for promo in PieceType::PROMOTIONS {
                let mv = self.build_move(from, to, Some(promo));
                push_if_legal(mv, moves);
            }
        } else {
            let mv = self.build_move(from, to, None);
            push_if_legal(mv, moves);
        }
    }

    fn castle_moves(&mut self, moves: &mut MoveList) {
        for castle in Castle::for_color(self.side_to_move) {
            if self.can_castle(castle) {
                let mv = self.build_castle(castle);
                push_if_legal(mv, moves);
            }
        }
    }

    fn can_castle(&self, castle: Castle) -> bool {
        let us = castle.color();
        if !self.castling.contains(castle.right()) {
            return false;
        }
        let (king_from, king_to, rook_from, rook_to) = castle.squares();
        if self.piece_on(king_from) != Some(Piece::new(us, PieceType::King))
            || self.piece_on(rook_from) != Some(Piece::new(us, PieceType::Rook))
        {
            return false;
        }
        // King square, transit square (rook destination) and king destination
        if self.piece_on(rook_to).is_some() || self.piece_on(king_to).is_some() {
            return false;
        }
        // Queenside: the knight-file square must be empty but may be attacked
        if rook_from.file() == 0 {
            let knight_sq = Square::from_file_row(1, king_from.row());
            if self.piece_on(knight_sq).is_some() {
                return false;
            }
        }
        !self.is_covered_by(!us, king_from)
            && !self.is_covered_by(!us, rook_to)
            && !self.is_covered_by(!us, king_to)
    }

    /// Describe a non-castling move and test its legality
    fn build_move(&mut self, from: Square, to: Square, promotion: Option<PieceType>) -> Move {
        let us = self.side_to_move;
        let moved = self.board[from.index()].unwrap_or(Piece::new(us, PieceType::Pawn));
        let is_pawn = moved.kind == PieceType::Pawn;

        let en_passant = is_pawn && self.en_passant == Some(to) && from.file() != to.file();
        let captured = if en_passant {
            self.piece_on(en_passant_victim(to, us))
        } else {
            self.piece_on(to)
        };

        let new_ep = if is_pawn && from.row().abs_diff(to.row()) == 2 {
            Square::from_index((from.index() + to.index()) / 2)
        } else {
            None
        };

        let mut mv = Move {
            source: from,
            dest: to,
            moved,
            captured,
            promotion,
            en_passant,
            castle: None,
            rights_toggle: rights_lost(self.castling, from, to),
            old_ep: self.en_passant,
            new_ep,
            legal: false,
        };
        mv.legal = self.leaves_king_safe(&mv);
        mv
    }

    fn build_castle(&mut self, castle: Castle) -> Move {
        let us = castle.color();
        let (king_from, king_to, _, _) = castle.squares();
        // Castling gives up both rights of the mover
        let toggle = CastleRights::of(us);
        let toggle = if self.castling.contains(toggle) {
            toggle
        } else {
            castle.right()
        };
        let mut mv = Move {
            source: king_from,
            dest: king_to,
            moved: Piece::new(us, PieceType::King),
            captured: None,
            promotion: None,
            en_passant: false,
            castle: Some(castle),
            rights_toggle: toggle,
            old_ep: self.en_passant,
            new_ep: None,
            legal: false,
        };
        mv.legal = self.leaves_king_safe(&mv);
        mv
    }

    fn leaves_king_safe(&mut self, mv: &Move) -> bool {
        let us = self.side_to_move;
        self.do_move(mv);
        let safe = !self.is_in_check(us);
        self.undo_move(mv);
        safe
    }
}

#[inline]
fn push_if_legal(mv: Move, moves: &mut MoveList) {
    if mv.is_legal() {
        moves.push(mv);
    }
}

/// Rights that a move from `from` to `to` removes
///
/// Leaving the king or rook home square, or landing on a rook home square
/// (capturing that rook), forfeits the matching right.
fn rights_lost(rights: CastleRights, from: Square, to: Square) -> CastleRights {
    const HOMES: [(CastleRights, Square, Square); 4] = [
        (CastleRights::WHITE_KINGSIDE, Square::E1, Square::H1),
        (CastleRights::WHITE_QUEENSIDE, Square::E1, Square::A1),
        (CastleRights::BLACK_KINGSIDE, Square::E8, Square::H8),
        (CastleRights::BLACK_QUEENSIDE, Square::E8, Square::A8),
    ];
    HOMES
        .iter()
        .filter(|(right, king, rook)| {
            rights.contains(*right) && (from == *king || from == *rook || to == *rook)
        })
        .fold(CastleRights::NONE, |acc, (right, _, _)| acc.union(*right))
}
