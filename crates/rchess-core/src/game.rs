//! Game record
//!
//! The live position, its legal moves, the move history and the result
//! once the game has ended.

use crate::position::Position;
use crate::types::{Color, Move, MoveList, PieceType};
use std::fmt;

/// Reversible plies after which the game is drawn
pub const FIFTY_MOVE_PLIES: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    WhiteMates,
    BlackMates,
    Stalemate,
    FiftyMoveRule,
    WhiteResigns,
    BlackResigns,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameResult::WhiteMates => "1-0 {White mates}",
            GameResult::BlackMates => "0-1 {Black mates}",
            GameResult::Stalemate => "1/2-1/2 {Stalemate}",
            GameResult::FiftyMoveRule => "1/2-1/2 {50-move rule}",
            GameResult::WhiteResigns => "0-1 {White resigns}",
            GameResult::BlackResigns => "1-0 {Black resigns}",
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Game is over")]
    GameOver,
}

#[derive(Debug, Clone)]
struct Played {
    mv: Move,
    reversible_plies: u32,
}

#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    legal: MoveList,
    history: Vec<Played>,
    move_number: u32,
    reversible_plies: u32,
    result: Option<GameResult>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_position(Position::startpos())
    }

    pub fn with_position(mut position: Position) -> Self {
        let legal = position.generate_moves();
        Self {
            position,
            legal,
            history: Vec::new(),
            move_number: 1,
            reversible_plies: 0,
            result: None,
        }
    }

    /// Start over from `position`, forgetting the history
    pub fn set_position(&mut self, position: Position) {
        *self = Self::with_position(position);
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Legal moves in the current position; none once the game is over
    pub fn legal_moves(&self) -> &[Move] {
        if self.result.is_some() { &[] } else { &self.legal }
    }

    /// Number of the move about to be played, counting from 1
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn reversible_plies(&self) -> u32 {
        self.reversible_plies
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn history(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().map(|p| &p.mv)
    }

    /// Play a move given in coordinate notation
    ///
    /// Nothing changes unless the move is legal. Checkmate, stalemate and
    /// the fifty-move rule are declared as soon as they arise.
    pub fn do_move(&mut self, notation: &str) -> Result<Move, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let mv = self
            .legal
            .iter()
            .find(|m| m.to_string() == notation)
            .copied()
            .ok_or_else(|| GameError::IllegalMove(notation.to_string()))?;

        self.history.push(Played {
            mv,
            reversible_plies: self.reversible_plies,
        });
        self.position.do_move(&mv);
        self.legal = self.position.generate_moves();

        if self.position.side_to_move() == Color::White {
            self.move_number += 1;
        }

        if mv.is_capture() || mv.moved.kind == PieceType::Pawn {
            self.reversible_plies = 0;
        } else {
            self.reversible_plies += 1;
            if self.reversible_plies >= FIFTY_MOVE_PLIES {
                self.declare(GameResult::FiftyMoveRule);
            }
        }

        if self.legal.is_empty() {
            let side = self.position.side_to_move();
            let result = if !self.position.is_in_check(side) {
                GameResult::Stalemate
            } else if side == Color::White {
                GameResult::BlackMates
            } else {
                GameResult::WhiteMates
            };
            self.declare(result);
        }

        Ok(mv)
    }

    /// Take back the last move, if any; the game is live again afterwards
    pub fn undo(&mut self) -> Option<Move> {
        let played = self.history.pop();
        if let Some(p) = &played {
            self.position.undo_move(&p.mv);
            self.reversible_plies = p.reversible_plies;
            if self.position.side_to_move() == Color::Black {
                self.move_number = self.move_number.saturating_sub(1).max(1);
            }
        }
        self.legal = self.position.generate_moves();
        self.result = None;
        played.map(|p| p.mv)
    }

    /// The side to move gives up
    pub fn resign(&mut self) {
        let result = match self.position.side_to_move() {
            Color::White => GameResult::WhiteResigns,
            Color::Black => GameResult::BlackResigns,
        };
        self.declare(result);
    }

    fn declare(&mut self, result: GameResult) {
        log::info!("{}", result);
        self.result = Some(result);
    }

    /// Moves so far as "1. e2e4 e7e5 2. g1f3"
    pub fn history_string(&self) -> String {
        let mut out = String::new();
        for (i, mv) in self.history().enumerate() {
            if i % 2 == 0 {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(&format!("{}. ", i / 2 + 1));
            } else {
                out.push(' ');
            }
            out.push_str(&mv.to_string());
        }
        out
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
