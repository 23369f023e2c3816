//! Board state and move application

use super::tables::{DIAGONAL, STRAIGHT, TABLES};
use super::zobrist;
use crate::types::{CastleRights, Color, Move, Piece, PieceType, Square};
use std::fmt;

/// A chess position
///
/// Mutated in place by paired [`do_move`](Position::do_move) /
/// [`undo_move`](Position::undo_move) calls. Searches clone it once and
/// own the clone exclusively.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    pub(super) board: [Option<Piece>; Square::NUM],
    pub(super) side_to_move: Color,
    pub(super) castling: CastleRights,
    pub(super) en_passant: Option<Square>,
    /// Cached king squares [Color]
    pub(super) kings: [Square; Color::NUM],
}

impl Position {
    /// Board without pieces; only used while parsing
    pub(super) fn empty() -> Position {
        Position {
            board: [None; Square::NUM],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            kings: [Square::E1, Square::E8],
        }
    }

    /// Standard starting position
    pub fn startpos() -> Position {
        const BACK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        let mut pos = Position::empty();
        for (file, &kind) in BACK.iter().enumerate() {
            pos.board[Square::from_file_row(file, 0).index()] = Some(Piece::new(Color::Black, kind));
            pos.board[Square::from_file_row(file, 1).index()] =
                Some(Piece::new(Color::Black, PieceType::Pawn));
            pos.board[Square::from_file_row(file, 6).index()] =
                Some(Piece::new(Color::White, PieceType::Pawn));
            pos.board[Square::from_file_row(file, 7).index()] = Some(Piece::new(Color::White, kind));
        }
        pos.castling = CastleRights::ALL;
        pos
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// Square a pawn skipped over on the last move, if any
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    /// Zobrist hash, recomputed from scratch
    #[inline]
    pub fn hash(&self) -> u64 {
        zobrist::hash(self)
    }

    /// Number of pieces of the given kind and color on the board
    pub fn count(&self, color: Color, kind: PieceType) -> usize {
        let pc = Piece::new(color, kind);
        self.board.iter().filter(|&&p| p == Some(pc)).count()
    }

    /// Apply a move generated from this exact position
    pub fn do_move(&mut self, mv: &Move) {
        let us = self.side_to_move;
        match mv.castle {
            None => {
                let kind = mv.promotion.unwrap_or(mv.moved.kind);
                self.board[mv.source.index()] = None;
                self.board[mv.dest.index()] = Some(Piece::new(us, kind));
                if mv.en_passant {
                    self.board[en_passant_victim(mv.dest, us).index()] = None;
                }
            }
            Some(castle) => {
                let (king_from, king_to, rook_from, rook_to) = castle.squares();
                self.board[king_to.index()] = self.board[king_from.index()].take();
                self.board[rook_to.index()] = self.board[rook_from.index()].take();
            }
        }
        self.castling = self.castling.toggle(mv.rights_toggle);
        self.en_passant = mv.new_ep;
        if mv.moved.kind == PieceType::King {
            self.kings[us.index()] = mv.dest;
        }
        self.side_to_move = !us;
    }

    /// Exact inverse of [`do_move`](Position::do_move) for the same move
    pub fn undo_move(&mut self, mv: &Move) {
        let us = !self.side_to_move;
        match mv.castle {
            None => {
                self.board[mv.source.index()] = Some(mv.moved);
                if mv.en_passant {
                    self.board[mv.dest.index()] = None;
                    self.board[en_passant_victim(mv.dest, us).index()] = mv.captured;
                } else {
                    self.board[mv.dest.index()] = mv.captured;
                }
            }
            Some(castle) => {
                let (king_from, king_to, rook_from, rook_to) = castle.squares();
                self.board[king_from.index()] = self.board[king_to.index()].take();
                self.board[rook_from.index()] = self.board[rook_to.index()].take();
            }
        }
        self.castling = self.castling.toggle(mv.rights_toggle);
        self.en_passant = mv.old_ep;
        if mv.moved.kind == PieceType::King {
            self.kings[us.index()] = mv.source;
        }
        self.side_to_move = us;
    }

    /// Whether `color`'s king is attacked
    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_covered_by(!color, self.king_square(color))
    }

    /// Whether the opponent of the side to move attacks `sq`
    #[inline]
    pub fn is_under_attack(&self, sq: Square) -> bool {
        self.is_covered_by(!self.side_to_move, sq)
    }

    /// Whether any piece of `color` attacks `sq`
    ///
    /// Scans outward from `sq`: king steps, knight jumps, diagonal and
    /// straight rays up to the first blocker, then pawn diagonals.
    pub fn is_covered_by(&self, color: Color, sq: Square) -> bool {
        let is = |s: Square, kind: PieceType| self.piece_on(s) == Some(Piece::new(color, kind));

        if TABLES.king[sq.index()].iter().any(|s| is(s, PieceType::King)) {
            return true;
        }
        if TABLES.knight[sq.index()].iter().any(|s| is(s, PieceType::Knight)) {
            return true;
        }
        if self.ray_hits(sq, &DIAGONAL, color, PieceType::Bishop) {
            return true;
        }
        if self.ray_hits(sq, &STRAIGHT, color, PieceType::Rook) {
            return true;
        }
        // A `color` pawn attacks `sq` from where an opposing pawn on `sq` would capture
        TABLES.pawn_captures(!color, sq).iter().any(|s| is(s, PieceType::Pawn))
    }

    /// First piece along any of `dirs` is a `slider` or queen of `color`
    fn ray_hits(&self, sq: Square, dirs: &[usize; 4], color: Color, slider: PieceType) -> bool {
        dirs.iter().any(|&dir| {
            TABLES.rays[sq.index()][dir]
                .iter()
                .find_map(|s| self.piece_on(s))
                .is_some_and(|p| {
                    p.color == color && (p.kind == slider || p.kind == PieceType::Queen)
                })
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

/// Square of the pawn removed by an en-passant capture landing on `dest`
#[inline]
pub(super) fn en_passant_victim(dest: Square, mover: Color) -> Square {
    let idx = match mover {
        Color::White => dest.index() + 8,
        Color::Black => dest.index() - 8,
    };
    Square::from_index(idx).unwrap_or(dest)
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            write!(f, "{} ", 8 - row)?;
            for file in 0..8 {
                let c = self
                    .piece_on(Square::from_file_row(file, row))
                    .map_or('.', |p| p.to_char());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{}", self.to_fen())
    }
}
