//! Board square
//!
//! Squares are numbered row by row from the top of the diagram:
//! a8 = 0, b8 = 1, ..., h8 = 7, a7 = 8, ..., h1 = 63.
//! White pawns therefore advance towards lower indices.

use std::fmt;

/// Square index (0-63)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// Number of squares
    pub const NUM: usize = 64;

    pub const A8: Square = Square(0);
    pub const B8: Square = Square(1);
    pub const C8: Square = Square(2);
    pub const D8: Square = Square(3);
    pub const E8: Square = Square(4);
    pub const F8: Square = Square(5);
    pub const G8: Square = Square(6);
    pub const H8: Square = Square(7);
    pub const A1: Square = Square(56);
    pub const B1: Square = Square(57);
    pub const C1: Square = Square(58);
    pub const D1: Square = Square(59);
    pub const E1: Square = Square(60);
    pub const F1: Square = Square(61);
    pub const G1: Square = Square(62);
    pub const H1: Square = Square(63);

    /// Build from a raw index; `None` when out of range
    #[inline]
    pub const fn from_index(n: usize) -> Option<Square> {
        if n < Self::NUM { Some(Square(n as u8)) } else { None }
    }

    /// Build from file (0 = a) and row (0 = rank 8)
    #[inline]
    pub const fn from_file_row(file: usize, row: usize) -> Square {
        debug_assert!(file < 8 && row < 8);
        Square((row * 8 + file) as u8)
    }

    /// Build from 6 bits of a packed move
    #[inline]
    pub(crate) const fn from_bits(bits: u16) -> Square {
        Square((bits & 63) as u8)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// File, 0 = a .. 7 = h
    #[inline]
    pub const fn file(self) -> usize {
        (self.0 & 7) as usize
    }

    /// Row from the top of the diagram, 0 = rank 8 .. 7 = rank 1
    #[inline]
    pub const fn row(self) -> usize {
        (self.0 >> 3) as usize
    }

    /// Rank number as printed, 1..=8
    #[inline]
    pub const fn rank(self) -> usize {
        8 - self.row()
    }

    /// Parse "e4" style coordinates
    pub fn parse(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        let file = file as usize - 'a' as usize;
        let rank = rank as usize - '0' as usize;
        Some(Square::from_file_row(file, 8 - rank))
    }

    /// Iterate over all squares in index order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file() as u8) as char;
        write!(f, "{}{}", file, self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(Square::parse("a8"), Some(Square::A8));
        assert_eq!(Square::parse("h1"), Some(Square::H1));
        assert_eq!(Square::parse("e1"), Some(Square::E1));
        assert_eq!(Square::E1.index(), 60);
        assert_eq!(Square::E8.index(), 4);
        assert_eq!(Square::E1.file(), 4);
        assert_eq!(Square::E1.rank(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Square::parse("i1"), None);
        assert_eq!(Square::parse("a9"), None);
        assert_eq!(Square::parse("a"), None);
        assert_eq!(Square::parse("a1b"), None);
    }

    #[test]
    fn test_display_roundtrip() {
        for sq in Square::all() {
            assert_eq!(Square::parse(&sq.to_string()), Some(sq));
        }
    }
}
