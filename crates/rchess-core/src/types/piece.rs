//! Piece types and colored pieces

use super::Color;
use std::fmt;

/// Piece kind, ordinal order matters for move encoding and tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    /// Number of piece types
    pub const NUM: usize = 6;

    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    /// Promotion choices in generation order
    pub const PROMOTIONS: [PieceType; 4] =
        [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

    /// Material value in centipawns
    ///
    /// The king value only needs to rank highest for MVV/LVA.
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 300,
            PieceType::Bishop => 300,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 1000,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(n: usize) -> Option<PieceType> {
        match n {
            0 => Some(PieceType::Pawn),
            1 => Some(PieceType::Knight),
            2 => Some(PieceType::Bishop),
            3 => Some(PieceType::Rook),
            4 => Some(PieceType::Queen),
            5 => Some(PieceType::King),
            _ => None,
        }
    }

    /// Lowercase letter ("p", "n", ...)
    #[inline]
    pub const fn to_char(self) -> char {
        PIECE_CHARS[self as usize]
    }

    pub fn from_char(c: char) -> Option<PieceType> {
        let lower = c.to_ascii_lowercase();
        PIECE_CHARS
            .iter()
            .position(|&p| p == lower)
            .and_then(PieceType::from_index)
    }
}

const PIECE_CHARS: [char; PieceType::NUM] = ['p', 'n', 'b', 'r', 'q', 'k'];

/// A piece of a given color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    /// Number of distinct colored pieces
    pub const NUM: usize = 12;

    #[inline]
    pub const fn new(color: Color, kind: PieceType) -> Piece {
        Piece { kind, color }
    }

    /// Dense index 0..12, white pieces first
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * PieceType::NUM + self.kind.index()
    }

    /// FEN letter, uppercase for white
    pub fn to_char(self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(color, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
