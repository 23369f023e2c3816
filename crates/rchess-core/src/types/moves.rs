//! Moves
//!
//! A [`Move`] carries everything needed to apply and exactly revert it on
//! the position it was generated from. It is not meaningful against any
//! other position.
//!
//! [`CompactMove`] is the 15-bit wire form used by the transposition table
//! and the killer slots:
//!
//! ```text
//! bit 14-9 : source square
//! bit  8-3 : destination square
//! bit  2-0 : promotion ordinal (0 = none, 1 = N, 2 = B, 3 = R, 4 = Q)
//! ```

use super::{Castle, CastleRights, Piece, PieceType, Square};
use smallvec::SmallVec;
use std::fmt;

/// Packed move identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct CompactMove(u16);

impl CompactMove {
    /// No move
    pub const NONE: CompactMove = CompactMove(0);

    #[inline]
    pub const fn new(source: Square, dest: Square, promotion: Option<PieceType>) -> CompactMove {
        let promo = match promotion {
            Some(p) => p as u16,
            None => 0,
        };
        CompactMove(((source.index() as u16) << 9) | ((dest.index() as u16) << 3) | promo)
    }

    #[inline]
    pub const fn from_raw(raw: u16) -> CompactMove {
        CompactMove(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn source(self) -> Square {
        Square::from_bits(self.0 >> 9)
    }

    #[inline]
    pub const fn dest(self) -> Square {
        Square::from_bits(self.0 >> 3)
    }

    /// Promotion piece; ordinals outside 1..=4 decode as none
    #[inline]
    pub const fn promotion(self) -> Option<PieceType> {
        match self.0 & 7 {
            1 => Some(PieceType::Knight),
            2 => Some(PieceType::Bishop),
            3 => Some(PieceType::Rook),
            4 => Some(PieceType::Queen),
            _ => None,
        }
    }

    /// Coordinate notation, `None` for the empty encoding
    pub fn notation(self) -> Option<String> {
        if self.is_none() {
            return None;
        }
        let mut s = format!("{}{}", self.source(), self.dest());
        if let Some(p) = self.promotion() {
            s.push(p.to_char());
        }
        Some(s)
    }
}

/// A fully described move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub source: Square,
    pub dest: Square,
    pub moved: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceType>,
    /// Captures the pawn that just double-pushed
    pub en_passant: bool,
    pub castle: Option<Castle>,
    /// Rights flipped by this move; applying the same mask again reverts it
    pub rights_toggle: CastleRights,
    pub old_ep: Option<Square>,
    pub new_ep: Option<Square>,
    pub(crate) legal: bool,
}

impl Move {
    /// Whether the mover's own king is safe after this move
    #[inline]
    pub fn is_legal(&self) -> bool {
        self.legal
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.castle.is_some()
    }

    #[inline]
    pub fn compact(&self) -> CompactMove {
        CompactMove::new(self.source, self.dest, self.promotion)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.dest)?;
        if let Some(p) = self.promotion {
            write!(f, "{}", p.to_char())?;
        }
        Ok(())
    }
}

/// Move buffer; a middlegame position rarely exceeds the inline capacity
pub type MoveList = SmallVec<[Move; 64]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_layout() {
        let e2 = Square::parse("e2").unwrap();
        let e4 = Square::parse("e4").unwrap();
        let m = CompactMove::new(e2, e4, None);
        assert_eq!(m.raw(), (52 << 9) | (36 << 3));
        assert_eq!(m.source(), e2);
        assert_eq!(m.dest(), e4);
        assert_eq!(m.promotion(), None);
        assert_eq!(m.notation().as_deref(), Some("e2e4"));
    }

    #[test]
    fn test_compact_promotion_ordinals() {
        let a7 = Square::parse("a7").unwrap();
        let a8 = Square::parse("a8").unwrap();
        assert_eq!(CompactMove::new(a7, a8, Some(PieceType::Queen)).raw() & 7, 4);
        assert_eq!(CompactMove::new(a7, a8, Some(PieceType::Knight)).raw() & 7, 1);
        assert_eq!(
            CompactMove::new(a7, a8, Some(PieceType::Rook)).notation().as_deref(),
            Some("a7a8r")
        );
    }

    #[test]
    fn test_none_has_no_notation() {
        assert!(CompactMove::NONE.is_none());
        assert_eq!(CompactMove::NONE.notation(), None);
    }
}
