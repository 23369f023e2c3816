//! Castling rights and castle variants

use super::{Color, Square};

/// Set of the four independent castling rights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const WHITE_KINGSIDE: CastleRights = CastleRights(1);
    pub const WHITE_QUEENSIDE: CastleRights = CastleRights(2);
    pub const BLACK_KINGSIDE: CastleRights = CastleRights(4);
    pub const BLACK_QUEENSIDE: CastleRights = CastleRights(8);
    pub const ALL: CastleRights = CastleRights(15);

    /// Individual rights in FEN order (K, Q, k, q)
    pub const EACH: [CastleRights; 4] = [
        CastleRights::WHITE_KINGSIDE,
        CastleRights::WHITE_QUEENSIDE,
        CastleRights::BLACK_KINGSIDE,
        CastleRights::BLACK_QUEENSIDE,
    ];

    #[inline]
    pub const fn contains(self, other: CastleRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    /// Flip every right present in `mask`
    #[inline]
    pub const fn toggle(self, mask: CastleRights) -> CastleRights {
        CastleRights(self.0 ^ mask.0)
    }

    /// Both rights of one color
    #[inline]
    pub const fn of(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights(3),
            Color::Black => CastleRights(12),
        }
    }

    /// FEN letter for a single right
    pub(crate) fn letter(self) -> char {
        match self.0 {
            1 => 'K',
            2 => 'Q',
            4 => 'k',
            8 => 'q',
            _ => '?',
        }
    }
}

/// One of the four castling moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Castle {
    WhiteKingside,
    WhiteQueenside,
    BlackKingside,
    BlackQueenside,
}

impl Castle {
    /// The right consumed by this castle
    #[inline]
    pub const fn right(self) -> CastleRights {
        match self {
            Castle::WhiteKingside => CastleRights::WHITE_KINGSIDE,
            Castle::WhiteQueenside => CastleRights::WHITE_QUEENSIDE,
            Castle::BlackKingside => CastleRights::BLACK_KINGSIDE,
            Castle::BlackQueenside => CastleRights::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        match self {
            Castle::WhiteKingside | Castle::WhiteQueenside => Color::White,
            Castle::BlackKingside | Castle::BlackQueenside => Color::Black,
        }
    }

    /// (king from, king to, rook from, rook to)
    #[inline]
    pub const fn squares(self) -> (Square, Square, Square, Square) {
        match self {
            Castle::WhiteKingside => (Square::E1, Square::G1, Square::H1, Square::F1),
            Castle::WhiteQueenside => (Square::E1, Square::C1, Square::A1, Square::D1),
            Castle::BlackKingside => (Square::E8, Square::G8, Square::H8, Square::F8),
            Castle::BlackQueenside => (Square::E8, Square::C8, Square::A8, Square::D8),
        }
    }

    /// Castles available to one side, kingside first
    #[inline]
    pub const fn for_color(color: Color) -> [Castle; 2] {
        match color {
            Color::White => [Castle::WhiteKingside, Castle::WhiteQueenside],
            Color::Black => [Castle::BlackKingside, Castle::BlackQueenside],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_is_involution() {
        let r = CastleRights::ALL;
        let mask = CastleRights::WHITE_KINGSIDE.union(CastleRights::WHITE_QUEENSIDE);
        let after = r.toggle(mask);
        assert!(!after.contains(CastleRights::WHITE_KINGSIDE));
        assert!(after.contains(CastleRights::BLACK_QUEENSIDE));
        assert_eq!(after.toggle(mask), r);
    }

    #[test]
    fn test_castle_squares() {
        let (kf, kt, rf, rt) = Castle::BlackQueenside.squares();
        assert_eq!((kf.index(), kt.index(), rf.index(), rt.index()), (4, 2, 0, 3));
        assert_eq!(CastleRights::of(Color::White), mask_white());
    }

    fn mask_white() -> CastleRights {
        CastleRights::WHITE_KINGSIDE.union(CastleRights::WHITE_QUEENSIDE)
    }
}
