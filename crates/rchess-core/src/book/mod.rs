//! Opening book
//!
//! The text format is a sequence of line pairs: a FEN line, then a line
//! of weighted moves such as `e2e4{12} d2d4{7} g1f3{0}`. A line reading
//! `#END#` in place of a FEN ends the book. Moves with zero weight are
//! never played and are dropped while loading.

use crate::position::{FenError, Position};
use rand::Rng;
use regex::Regex;
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

static WEIGHTED_MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-h][1-8])([a-h][1-8])([qrnbQRNB])?\{(\d+)\}").expect("invalid WEIGHTED_MOVE_RE pattern")
});

const END_MARKER: &str = "#END#";

#[derive(thiserror::Error, Debug)]
pub enum BookError {
    #[error("failed to read book: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad position on line {line}: {source}")]
    Fen {
        line: usize,
        #[source]
        source: FenError,
    },

    #[error("position on line {line} has no move line")]
    MissingMoves { line: usize },

    #[error("bad weight on line {line}: {weight}")]
    Weight { line: usize, weight: String },
}

/// A book move and its relative weight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMove {
    pub notation: String,
    pub weight: u32,
}

#[derive(Debug, Default, Clone)]
pub struct OpeningBook {
    entries: HashMap<u64, Vec<BookMove>>,
}

impl OpeningBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a book from any line source
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, BookError> {
        let mut book = Self::new();
        let mut lines = reader.lines().enumerate();

        while let Some((idx, fen)) = lines.next() {
            let fen = fen?;
            let fen = fen.trim();
            if fen == END_MARKER {
                break;
            }
            let line = idx + 1;
            let pos = Position::from_fen(fen).map_err(|source| BookError::Fen { line, source })?;

            let (_, moves) = lines.next().ok_or(BookError::MissingMoves { line })?;
            let moves = moves?;

            let mut weighted = Vec::new();
            for caps in WEIGHTED_MOVE_RE.captures_iter(&moves) {
                let weight = caps[4].parse::<u32>().map_err(|_| BookError::Weight {
                    line: line + 1,
                    weight: caps[4].to_string(),
                })?;
                if weight == 0 {
                    continue;
                }
                let mut notation = format!("{}{}", &caps[1], &caps[2]);
                if let Some(promo) = caps.get(3) {
                    notation.push_str(&promo.as_str().to_ascii_lowercase());
                }
                weighted.push(BookMove { notation, weight });
            }
            // A later entry for the same position replaces the earlier one
            book.entries.insert(pos.hash(), weighted);
        }

        log::info!("Book loaded [{} positions]", book.len());
        Ok(book)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::parse(std::io::BufReader::new(file))
    }

    /// Add a move for the position with `hash`; zero weights are ignored
    pub fn insert(&mut self, hash: u64, notation: impl Into<String>, weight: u32) {
        if weight == 0 {
            return;
        }
        self.entries.entry(hash).or_default().push(BookMove {
            notation: notation.into(),
            weight,
        });
    }

    /// Number of positions in the book
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn moves(&self, pos: &Position) -> &[BookMove] {
        self.entries.get(&pos.hash()).map_or(&[], Vec::as_slice)
    }

    /// Weighted random choice among the book moves for `pos`
    pub fn probe(&self, pos: &Position) -> Option<String> {
        self.probe_with(pos, &mut rand::rng())
    }

    pub fn probe_with<R: Rng + ?Sized>(&self, pos: &Position, rng: &mut R) -> Option<String> {
        let moves = self.moves(pos);
        let total: u64 = moves.iter().map(|m| u64::from(m.weight)).sum();
        if total == 0 {
            log::debug!("Book miss");
            return None;
        }

        let pick = rng.random_range(0..total);
        let mut cumulative = 0u64;
        for m in moves {
            cumulative += u64::from(m.weight);
            if pick < cumulative {
                log::debug!("Book hit: {}", m.notation);
                return Some(m.notation.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::STARTPOS_FEN;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    const BOOK: &str = "\
rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -
e2e4{30} d2d4{10} b1a3{0}
rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3
c7c5{5}
#END#
this line is never read
";

    #[test]
    fn test_parse_and_probe() {
        let book = OpeningBook::parse(BOOK.as_bytes()).unwrap();
        assert_eq!(book.len(), 2);

        let start = Position::startpos();
        let moves: Vec<_> = book.moves(&start).iter().map(|m| m.notation.as_str()).collect();
        assert_eq!(moves, ["e2e4", "d2d4"]);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..50 {
            let mv = book.probe_with(&start, &mut rng).unwrap();
            assert!(mv == "e2e4" || mv == "d2d4");
        }
    }

    #[test]
    fn test_weights_shape_the_distribution() {
        let mut book = OpeningBook::new();
        let hash = Position::startpos().hash();
        book.insert(hash, "e2e4", 90);
        book.insert(hash, "d2d4", 10);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let e4 = (0..1000)
            .filter(|_| book.probe_with(&Position::startpos(), &mut rng).as_deref() == Some("e2e4"))
            .count();
        assert!((800..980).contains(&e4), "e2e4 picked {} times", e4);
    }

    #[test]
    fn test_all_zero_weights_is_a_miss() {
        let text = format!("{}\ne2e4{{0}} d2d4{{0}}\n", STARTPOS_FEN);
        let book = OpeningBook::parse(text.as_bytes()).unwrap();
        assert_eq!(book.len(), 1);
        assert_eq!(book.probe(&Position::startpos()), None);
    }

    #[test]
    fn test_promotion_letter_is_lowercased() {
        let text = "4k3/P7/8/8/8/8/8/4K3 w - -\na7a8Q{3}\n";
        let book = OpeningBook::parse(text.as_bytes()).unwrap();
        let pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(book.probe(&pos).as_deref(), Some("a7a8q"));
    }

    #[test]
    fn test_unknown_position_misses() {
        let book = OpeningBook::parse(BOOK.as_bytes()).unwrap();
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(book.probe(&pos), None);
        assert!(OpeningBook::new().is_empty());
    }

    #[test]
    fn test_bad_fen_reports_line() {
        let text = format!("{}\ne2e4{{1}}\nnot a fen\ne7e5{{1}}\n", STARTPOS_FEN);
        match OpeningBook::parse(text.as_bytes()) {
            Err(BookError::Fen { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_move_line() {
        let text = format!("{}\n", STARTPOS_FEN);
        assert!(matches!(
            OpeningBook::parse(text.as_bytes()),
            Err(BookError::MissingMoves { line: 1 })
        ));
    }
}
