//! FEN parsing and output

use super::pos::{en_passant_victim, Position};
use crate::types::{CastleRights, Color, Piece, PieceType, Square};

/// Standard starting position
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

/// FEN parse errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Fewer than four fields, or stray trailing fields
    #[error("FEN must have 4 or 6 fields, got {0}")]
    FieldCount(usize),

    /// Unknown character in the board field
    #[error("Invalid piece character '{0}'")]
    InvalidPiece(char),

    /// Board field does not describe exactly 64 squares
    #[error("Board describes {0} squares, expected 64")]
    SquareCount(usize),

    /// A rank does not describe exactly 8 squares
    #[error("Rank {rank} describes {squares} squares")]
    RankLength { rank: usize, squares: usize },

    #[error("Invalid side to move: {0}")]
    SideToMove(String),

    #[error("Invalid castling field: {0}")]
    Castling(String),

    #[error("Invalid en passant square: {0}")]
    EnPassant(String),

    #[error("Invalid move counter: {0}")]
    Counter(String),

    /// Each side needs exactly one king
    #[error("Expected one {color:?} king, found {found}")]
    KingCount { color: Color, found: usize },
}

impl Position {
    /// Parse a FEN string
    ///
    /// Board, side, castling and en-passant fields are required. The two
    /// move counters are optional and ignored.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 4 && parts.len() != 6 {
            return Err(FenError::FieldCount(parts.len()));
        }

        let mut pos = Position::empty();

        // 1. Board
        pos.parse_board(parts[0])?;

        // 2. Side to move
        pos.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        // 3. Castling
        pos.castling = parse_castling(parts[2])?;

        // 4. En passant
        pos.en_passant = match parts[3] {
            "-" => None,
            s => {
                let sq = Square::parse(s).ok_or_else(|| FenError::EnPassant(s.to_string()))?;
                if !pos.is_valid_en_passant(sq) {
                    return Err(FenError::EnPassant(s.to_string()));
                }
                Some(sq)
            }
        };

        // 5-6. Counters
        for counter in parts.iter().skip(4) {
            counter
                .parse::<u32>()
                .map_err(|_| FenError::Counter(counter.to_string()))?;
        }

        // Kings
        for color in Color::ALL {
            let king = Piece::new(color, PieceType::King);
            let squares: Vec<Square> = Square::all().filter(|&s| pos.piece_on(s) == Some(king)).collect();
            match squares.as_slice() {
                [sq] => pos.kings[color.index()] = *sq,
                _ => {
                    return Err(FenError::KingCount {
                        color,
                        found: squares.len(),
                    });
                }
            }
        }

        Ok(pos)
    }

    fn parse_board(&mut self, board: &str) -> Result<(), FenError> {
        let mut total = 0usize;
        for (row, rank) in board.split('/').enumerate() {
            let mut file = 0usize;
            for c in rank.chars() {
                if let Some(n) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    file += n as usize;
                } else {
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece(c))?;
                    if row < 8 && file < 8 {
                        self.board[Square::from_file_row(file, row).index()] = Some(piece);
                    }
                    file += 1;
                }
            }
            if row < 8 && file != 8 {
                return Err(FenError::RankLength {
                    rank: 8 - row,
                    squares: file,
                });
            }
            total += file;
        }
        if total != Square::NUM {
            return Err(FenError::SquareCount(total));
        }
        Ok(())
    }

    /// The square skipped by the opponent's double push: rank 6 with White
    /// to move, rank 3 with Black, empty, with the pushed pawn behind it
    fn is_valid_en_passant(&self, sq: Square) -> bool {
        let us = self.side_to_move;
        let expected_rank = match us {
            Color::White => 6,
            Color::Black => 3,
        };
        sq.rank() == expected_rank
            && self.piece_on(sq).is_none()
            && self.piece_on(en_passant_victim(sq, us)) == Some(Piece::new(!us, PieceType::Pawn))
    }

    /// Four-field FEN: board, side, castling, en passant
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for row in 0..8 {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_on(Square::from_file_row(file, row)) {
                    None => empty += 1,
                    Some(p) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(p.to_char());
                    }
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(self.side_to_move.to_char());

        fen.push(' ');
        if self.castling.is_empty() {
            fen.push('-');
        } else {
            for right in CastleRights::EACH {
                if self.castling.contains(right) {
                    fen.push(right.letter());
                }
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }

        fen
    }
}

fn parse_castling(field: &str) -> Result<CastleRights, FenError> {
    if field == "-" {
        return Ok(CastleRights::NONE);
    }
    let mut rights = CastleRights::NONE;
    for c in field.chars() {
        let right = CastleRights::EACH
            .into_iter()
            .find(|r| r.letter() == c)
            .ok_or_else(|| FenError::Castling(field.to_string()))?;
        if rights.contains(right) {
            return Err(FenError::Castling(field.to_string()));
        }
        rights = rights.union(right);
    }
    Ok(rights)
}

impl std::str::FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_fen() {
        let pos = Position::from_fen(STARTPOS_FEN).unwrap();
        assert_eq!(pos, Position::startpos());
        assert_eq!(pos.to_fen(), STARTPOS_FEN);
    }

    #[test]
    fn test_counters_accepted_and_dropped() {
        let pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(pos.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3");
    }

    #[test]
    fn test_roundtrip_partial_rights() {
        for fen in [
            "r3k2r/8/8/8/8/8/8/R3K2R w Kq -",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6",
            "8/8/8/8/8/8/8/K6k b - -",
        ] {
            assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
        }
    }

    #[test]
    fn test_rejects_wrong_square_count() {
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq -"),
            Err(FenError::SquareCount(56))
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(FenError::InvalidPiece('9'))
        ));
        assert!(matches!(
            Position::from_fen("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
            Err(FenError::RankLength { rank: 7, squares: 7 })
        ));
    }

    #[test]
    fn test_rejects_bad_fields() {
        assert!(matches!(Position::from_fen("8/8/8/8/8/8/8/8 w"), Err(FenError::FieldCount(2))));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 x - -"),
            Err(FenError::SideToMove(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w KX -"),
            Err(FenError::Castling(_))
        ));
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - e4"),
            Err(FenError::EnPassant(_))
        ));
    }

    #[test]
    fn test_en_passant_field_must_match_a_double_push() {
        // Wrong rank for the side to move
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/3PP3/4K3 w - e3"),
            Err(FenError::EnPassant(_))
        ));
        // Right rank but no enemy pawn in front of the square
        assert!(matches!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - d6"),
            Err(FenError::EnPassant(_))
        ));
        // Own pawn behind the square
        assert!(matches!(
            Position::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - d6"),
            Err(FenError::EnPassant(_))
        ));
        // Square occupied
        assert!(matches!(
            Position::from_fen("4k3/8/3n4/3p4/8/8/8/4K3 w - d6"),
            Err(FenError::EnPassant(_))
        ));
        assert!(Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6").is_ok());
        assert!(Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3").is_ok());
    }

    #[test]
    fn test_rejects_missing_king() {
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - -"),
            Err(FenError::KingCount { color: Color::Black, found: 0 })
        ));
    }
}
