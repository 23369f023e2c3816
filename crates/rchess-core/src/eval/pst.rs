//! Piece-square tables
//!
//! Laid out in board index order (a8 first). White and black tables are
//! vertical mirrors where the piece is asymmetric.

#[rustfmt::skip]
const PAWN_W: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    80, 80, 80, 80, 80, 80, 80, 80,
    40, 40, 40, 50, 50, 40, 40, 40,
    10, 15, 20, 25, 25, 10, 15, 10,
     5,  0, 10, 20, 20, 10,  0,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PAWN_B: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
     5,  0, 10, 20, 20, 10,  0,  5,
    10, 15, 20, 25, 25, 10, 15, 10,
    40, 40, 40, 50, 50, 40, 40, 40,
    80, 80, 80, 80, 80, 80, 80, 80,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PAWN_W_ENDGAME: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    95, 95, 95, 95, 95, 95, 95, 95,
    65, 65, 65, 65, 65, 65, 65, 65,
    40, 40, 40, 40, 40, 40, 40, 40,
    10, 10, 20, 25, 25, 20, 10, 10,
    -5, -5, -5, -5, -5, -5, -5, -5,
   -10,-10,-10,-10,-10,-10,-10,-10,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PAWN_B_ENDGAME: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
   -10,-10,-10,-10,-10,-10,-10,-10,
    -5, -5, -5, -5, -5, -5, -5, -5,
    10, 10, 20, 25, 25, 20, 10, 10,
    40, 40, 40, 40, 40, 40, 40, 40,
    65, 65, 65, 65, 65, 65, 65, 65,
    95, 95, 95, 95, 95, 95, 95, 95,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT: [i32; 64] = [
   -50,-30,-30,-30,-30,-30,-30,-50,
   -20,-20,  0,  5,  5,  0,-20,-20,
   -30,  5, 25, 20, 20, 25,  5,-30,
   -30,  5, 20, 35, 35, 15,  5,-30,
   -30,  5, 20, 35, 35, 20,  5,-30,
   -30,  5, 25, 20, 20, 25,  5,-30,
   -20,-20,  0,  5,  5,  0,-20,-20,
   -50,-30,-30,-30,-30,-30,-30,-50,
];

#[rustfmt::skip]
const BISHOP: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  0, 10, 15, 15, 10,  0,-10,
   -10,  0, 10, 15, 15, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_W: [i32; 64] = [
    10, 10, 10, 10, 10, 10, 10, 10,
    10, 20, 20, 20, 20, 20, 20, 10,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  3,  4,  5,  5,  4,  3,  0,
];

#[rustfmt::skip]
const ROOK_B: [i32; 64] = [
     0,  3,  4,  5,  5,  4,  3,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    10, 20, 20, 20, 20, 20, 20, 10,
    10, 10, 10, 10, 10, 10, 10, 10,
];

#[rustfmt::skip]
const QUEEN: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
    -5,  0,  5,  5,  5,  5,  0, -5,
   -10,  0,  5,  5,  5,  5,  0,-10,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

// Middlegame king: stay home behind the pawns
#[rustfmt::skip]
const KING_W: [i32; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_B: [i32; 64] = [
    20, 30, 10,  0,  0, 10, 30, 20,
    20, 20,  0,  0,  0,  0, 20, 20,
   -10,-20,-20,-20,-20,-20,-20,-10,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
];

// Endgame king: centralize
#[rustfmt::skip]
const KING_W_ENDGAME: [i32; 64] = [
   -50,-40,-30,-20,-20,-30,-40,-50,
   -30,-20,-10,  0,  0,-10,-20,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-30,  0,  0,  0,-30,-30,-30,
   -50,-30,-30,-30,-30,-30,-30,-50,
];

#[rustfmt::skip]
const KING_B_ENDGAME: [i32; 64] = [
   -50,-30,-30,-30,-30,-30,-30,-50,
   -30,-30,  0,  0,  0,-30,-30,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-20,-10,  0,  0,-10,-20,-30,
   -50,-40,-30,-20,-20,-30,-40,-50,
];

/// Middlegame tables [Color][PieceType]
pub(super) static MIDDLEGAME: [[&[i32; 64]; 6]; 2] = [
    [&PAWN_W, &KNIGHT, &BISHOP, &ROOK_W, &QUEEN, &KING_W],
    [&PAWN_B, &KNIGHT, &BISHOP, &ROOK_B, &QUEEN, &KING_B],
];

/// Endgame tables [Color][PieceType]; rooks use the queen table
pub(super) static ENDGAME: [[&[i32; 64]; 6]; 2] = [
    [&PAWN_W_ENDGAME, &KNIGHT, &BISHOP, &QUEEN, &QUEEN, &KING_W_ENDGAME],
    [&PAWN_B_ENDGAME, &KNIGHT, &BISHOP, &QUEEN, &QUEEN, &KING_B_ENDGAME],
];
