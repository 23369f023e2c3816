//! Move generation counters
//!
//! Leaf counts by depth, for checking the generator against published
//! reference numbers.

use crate::position::Position;
use std::fmt;
use std::ops::AddAssign;

/// Leaf statistics; every counter refers to moves made at the last ply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl AddAssign for PerftStats {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }
}

impl fmt::Display for PerftStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes={}, captures={}, ep={}, castles={}, promotions={}, checks={}",
            self.nodes, self.captures, self.en_passant, self.castles, self.promotions, self.checks
        )
    }
}

/// Number of leaf positions `depth` plies below `pos`
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = pos.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for mv in moves.iter() {
        pos.do_move(mv);
        nodes += perft(pos, depth - 1);
        pos.undo_move(mv);
    }
    nodes
}

/// Leaf count broken down by move kind
pub fn perft_stats(pos: &mut Position, depth: u32) -> PerftStats {
    let mut stats = PerftStats::default();
    if depth == 0 {
        stats.nodes = 1;
        return stats;
    }
    let moves = pos.generate_moves();
    for mv in moves.iter() {
        pos.do_move(mv);
        if depth == 1 {
            stats.nodes += 1;
            stats.captures += u64::from(mv.is_capture());
            stats.en_passant += u64::from(mv.en_passant);
            stats.castles += u64::from(mv.is_castle());
            stats.promotions += u64::from(mv.is_promotion());
            stats.checks += u64::from(pos.is_in_check(pos.side_to_move()));
        } else {
            stats += perft_stats(pos, depth - 1);
        }
        pos.undo_move(mv);
    }
    stats
}

/// Leaf count below each root move, in generation order
pub fn divide(pos: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = pos.generate_moves();
    let mut out = Vec::with_capacity(moves.len());
    for mv in moves.iter() {
        pos.do_move(mv);
        let nodes = perft(pos, depth.saturating_sub(1));
        pos.undo_move(mv);
        out.push((mv.to_string(), nodes));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_shallow() {
        let mut pos = Position::startpos();
        assert_eq!(perft(&mut pos, 0), 1);
        assert_eq!(perft(&mut pos, 1), 20);
        assert_eq!(perft(&mut pos, 2), 400);
        assert_eq!(pos, Position::startpos());
    }

    #[test]
    fn test_stats_depth_three() {
        let stats = perft_stats(&mut Position::startpos(), 3);
        assert_eq!(
            stats,
            PerftStats {
                nodes: 8902,
                captures: 34,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 12,
            }
        );
        assert_eq!(
            stats.to_string(),
            "nodes=8902, captures=34, ep=0, castles=0, promotions=0, checks=12"
        );
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let mut pos = Position::startpos();
        let split = divide(&mut pos, 3);
        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 8902);
        assert!(split.contains(&("e2e4".to_string(), 600)));
    }
}
