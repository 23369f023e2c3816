//! Zobrist hashing
//!
//! The hash is recomputed from scratch on every call. Positions that are
//! equal always hash equal; distinct positions may collide.

use super::tables::TABLES;
use super::Position;
use crate::types::{CastleRights, Color, Piece, PieceType, Square};

/// Random constants for hashing
pub struct Zobrist {
    /// [Piece::index()][Square::index()]
    pub psq: [[u64; Square::NUM]; Piece::NUM],
    /// XORed when black is to move
    pub side: u64,
    /// [right][present as usize], one pair per castling right
    pub castling: [[u64; 2]; 4],
    /// En-passant file, only when the capture is actually available
    pub ep_file: [u64; 8],
}

impl Zobrist {
    /// Build the table
    pub const fn init() -> Self {
        let mut zobrist = Zobrist {
            psq: [[0; Square::NUM]; Piece::NUM],
            side: 0,
            castling: [[0; 2]; 4],
            ep_file: [0; 8],
        };

        // XorShift64 pseudo random sequence
        let mut seed = 0x9E37_79B9_7F4A_7C15u64;

        seed = xorshift64(seed);
        zobrist.side = seed;

        let mut pc = 0;
        while pc < Piece::NUM {
            let mut sq = 0;
            while sq < Square::NUM {
                seed = xorshift64(seed);
                zobrist.psq[pc][sq] = seed;
                sq += 1;
            }
            pc += 1;
        }

        let mut right = 0;
        while right < 4 {
            seed = xorshift64(seed);
            zobrist.castling[right][0] = seed;
            seed = xorshift64(seed);
            zobrist.castling[right][1] = seed;
            right += 1;
        }

        let mut file = 0;
        while file < 8 {
            seed = xorshift64(seed);
            zobrist.ep_file[file] = seed;
            file += 1;
        }

        zobrist
    }
}

/// XorShift64 (const fn)
const fn xorshift64(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

/// Global table
pub static ZOBRIST: Zobrist = Zobrist::init();

/// Hash of a whole position
pub fn hash(pos: &Position) -> u64 {
    let mut key = 0u64;

    for sq in Square::all() {
        if let Some(pc) = pos.piece_on(sq) {
            key ^= ZOBRIST.psq[pc.index()][sq.index()];
        }
    }

    if pos.side_to_move() == Color::Black {
        key ^= ZOBRIST.side;
    }

    let rights = pos.castling();
    for (i, right) in CastleRights::EACH.iter().enumerate() {
        key ^= ZOBRIST.castling[i][rights.contains(*right) as usize];
    }

    if let Some(ep) = pos.en_passant().filter(|&ep| en_passant_capturable(pos, ep)) {
        key ^= ZOBRIST.ep_file[ep.file()];
    }

    key
}

/// Whether a pawn of the side to move stands where it could take on `ep`
fn en_passant_capturable(pos: &Position, ep: Square) -> bool {
    let us = pos.side_to_move();
    let our_pawn = Piece::new(us, PieceType::Pawn);
    // Our pawns attacking `ep` sit where an enemy pawn on `ep` would capture
    TABLES
        .pawn_captures(!us, ep)
        .iter()
        .any(|from| pos.piece_on(from) == Some(our_pawn))
}
