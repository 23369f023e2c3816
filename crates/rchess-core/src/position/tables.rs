//! Precomputed per-square move tables
//!
//! All tables are built at compile time. Squares use the a8 = 0 layout, so
//! "up" (towards rank 8) is a negative row step.

use crate::types::{Color, Square};

/// Up to eight target squares
#[derive(Clone, Copy)]
pub(crate) struct Targets {
    squares: [u8; 8],
    len: u8,
}

impl Targets {
    const EMPTY: Targets = Targets { squares: [0; 8], len: 0 };

    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares[..self.len as usize]
            .iter()
            .filter_map(|&s| Square::from_index(s as usize))
    }
}

/// A sliding ray, nearest square first
#[derive(Clone, Copy)]
pub(crate) struct Ray {
    squares: [u8; 7],
    len: u8,
}

impl Ray {
    const EMPTY: Ray = Ray { squares: [0; 7], len: 0 };

    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = Square> + '_ {
        self.squares[..self.len as usize]
            .iter()
            .filter_map(|&s| Square::from_index(s as usize))
    }
}

/// (file step, row step); straight directions first, then diagonals
const DIRECTIONS: [(i32, i32); 8] =
    [(0, -1), (0, 1), (1, 0), (-1, 0), (1, -1), (-1, -1), (1, 1), (-1, 1)];

const KING_STEPS: [(i32, i32); 8] = DIRECTIONS;

const KNIGHT_STEPS: [(i32, i32); 8] =
    [(1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1), (-2, -1), (-1, -2)];

pub(crate) struct Tables {
    pub(crate) king: [Targets; 64],
    pub(crate) knight: [Targets; 64],
    /// [square][direction], see `STRAIGHT` and `DIAGONAL`
    pub(crate) rays: [[Ray; 8]; 64],
    /// [color][square] single push target
    pub(crate) pawn_push: [[Option<u8>; 64]; 2],
    /// [color][square] double push target, only from the starting row
    pub(crate) pawn_double: [[Option<u8>; 64]; 2],
    /// [color][square] diagonal capture targets
    pub(crate) pawn_captures: [[Targets; 64]; 2],
}

/// Indices into `Tables::rays` for rook-like movement
pub(crate) const STRAIGHT: [usize; 4] = [0, 1, 2, 3];
/// Indices into `Tables::rays` for bishop-like movement
pub(crate) const DIAGONAL: [usize; 4] = [4, 5, 6, 7];

const fn offset(sq: usize, df: i32, dr: i32) -> Option<u8> {
    let file = (sq % 8) as i32 + df;
    let row = (sq / 8) as i32 + dr;
    if file < 0 || file > 7 || row < 0 || row > 7 {
        None
    } else {
        Some((row * 8 + file) as u8)
    }
}

const fn step_targets(sq: usize, steps: &[(i32, i32); 8]) -> Targets {
    let mut t = Targets::EMPTY;
    let mut i = 0;
    while i < 8 {
        if let Some(d) = offset(sq, steps[i].0, steps[i].1) {
            t.squares[t.len as usize] = d;
            t.len += 1;
        }
        i += 1;
    }
    t
}

const fn ray(sq: usize, df: i32, dr: i32) -> Ray {
    let mut r = Ray::EMPTY;
    let mut cur = sq;
    while let Some(d) = offset(cur, df, dr) {
        r.squares[r.len as usize] = d;
        r.len += 1;
        cur = d as usize;
    }
    r
}

/// Row step of a pawn advancing for `color`
const fn forward(color: usize) -> i32 {
    if color == 0 { -1 } else { 1 }
}

const fn pawn_captures(sq: usize, color: usize) -> Targets {
    let mut t = Targets::EMPTY;
    let dr = forward(color);
    if let Some(d) = offset(sq, -1, dr) {
        t.squares[t.len as usize] = d;
        t.len += 1;
    }
    if let Some(d) = offset(sq, 1, dr) {
        t.squares[t.len as usize] = d;
        t.len += 1;
    }
    t
}

impl Tables {
    const fn init() -> Tables {
        let mut t = Tables {
            king: [Targets::EMPTY; 64],
            knight: [Targets::EMPTY; 64],
            rays: [[Ray::EMPTY; 8]; 64],
            pawn_push: [[None; 64]; 2],
            pawn_double: [[None; 64]; 2],
            pawn_captures: [[Targets::EMPTY; 64]; 2],
        };

        let mut sq = 0;
        while sq < 64 {
            t.king[sq] = step_targets(sq, &KING_STEPS);
            t.knight[sq] = step_targets(sq, &KNIGHT_STEPS);

            let mut dir = 0;
            while dir < 8 {
                t.rays[sq][dir] = ray(sq, DIRECTIONS[dir].0, DIRECTIONS[dir].1);
                dir += 1;
            }

            let mut color = 0;
            while color < 2 {
                let dr = forward(color);
                let row = sq / 8;
                // Capture targets are also read backwards by attack detection,
                // so they exist for every row
                t.pawn_captures[color][sq] = pawn_captures(sq, color);
                // Pawns never stand on the back rank or the promotion rank
                if row != 0 && row != 7 {
                    t.pawn_push[color][sq] = offset(sq, 0, dr);
                    let start_row = if color == 0 { 6 } else { 1 };
                    if row == start_row {
                        t.pawn_double[color][sq] = offset(sq, 0, 2 * dr);
                    }
                }
                color += 1;
            }
            sq += 1;
        }
        t
    }

    #[inline]
    pub(crate) fn pawn_captures(&self, color: Color, sq: Square) -> &Targets {
        &self.pawn_captures[color.index()][sq.index()]
    }
}

pub(crate) static TABLES: Tables = Tables::init();

/// Promotion row for a color's pawns
#[inline]
pub(crate) const fn promotion_row(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}
