//! Move ordering
//!
//! Moves are sorted into fixed buckets, best first. Sorting is stable so
//! generation order survives inside each bucket. Winning captures get an
//! extra MVV/LVA pass, as do the captures searched by quiescence.

use super::killer::KILLERS_PER_PLY;
use crate::types::{CompactMove, Move, PieceType};
use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Bucket {
    HashMove,
    WinningCapture,
    QueenPromotion,
    EqualCapture,
    Killer,
    Castle,
    LosingCapture,
    MinorPromotion,
    Quiet,
}

pub(crate) fn bucket(mv: &Move, hash_move: CompactMove, killers: &[CompactMove; KILLERS_PER_PLY]) -> Bucket {
    let compact = mv.compact();
    let trade = mv
        .captured
        .map(|victim| mv.moved.kind.value().cmp(&victim.kind.value()));

    if !hash_move.is_none() && compact == hash_move {
        Bucket::HashMove
    } else if trade == Some(std::cmp::Ordering::Less) {
        Bucket::WinningCapture
    } else if mv.promotion == Some(PieceType::Queen) {
        Bucket::QueenPromotion
    } else if trade == Some(std::cmp::Ordering::Equal) {
        Bucket::EqualCapture
    } else if killers.contains(&compact) {
        Bucket::Killer
    } else if mv.is_castle() {
        Bucket::Castle
    } else if mv.is_capture() {
        Bucket::LosingCapture
    } else if mv.is_promotion() {
        Bucket::MinorPromotion
    } else {
        Bucket::Quiet
    }
}

/// MVV/LVA key: biggest victim first, then smallest attacker
#[inline]
fn mvv_lva(mv: &Move) -> (Reverse<usize>, usize) {
    let victim = mv.captured.map_or(0, |p| p.kind.index());
    (Reverse(victim), mv.moved.kind.index())
}

/// Order a full move list for the main search
pub(crate) fn order_moves(moves: &mut [Move], hash_move: CompactMove, killers: &[CompactMove; KILLERS_PER_PLY]) {
    moves.sort_by_cached_key(|mv| {
        let b = bucket(mv, hash_move, killers);
        let tie = if b == Bucket::WinningCapture {
            mvv_lva(mv)
        } else {
            (Reverse(0), 0)
        };
        (b, tie)
    });
}

/// Order captures for quiescence search
pub(crate) fn order_captures(captures: &mut [Move]) {
    captures.sort_by_key(mvv_lva);
}
