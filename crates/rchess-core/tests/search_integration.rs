//! Search scenarios on real positions

use rchess_core::eval::evaluate;
use rchess_core::search::{SearchLimits, Searcher};
use rchess_core::tt::TranspositionTable;
use rchess_core::types::value::{is_mate_score, CHECKMATE_THRESHOLD};
use rchess_core::Position;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn run(fen: &str, limits: SearchLimits) -> rchess_core::search::SearchResult {
    let pos = Position::from_fen(fen).unwrap();
    let tt = Arc::new(TranspositionTable::new(1 << 18));
    Searcher::new(&pos, tt, limits).run()
}

#[test]
fn test_open_game_depth_four() {
    let mut pos = Position::startpos();
    for mv in ["e2e4", "e7e5"] {
        let m = pos.find_move(mv).unwrap();
        pos.do_move(&m);
    }
    let tt = Arc::new(TranspositionTable::new(1 << 18));
    let result = Searcher::new(&pos, tt, SearchLimits::depth(4)).run();

    assert!(result.completed);
    assert_eq!(result.depth, 4);
    assert!(!is_mate_score(result.score));
    // Symmetric evaluation without a tempo term: the quiet mirrored lines
    // of a 4-ply search come back level, never behind for White
    assert!((0..300).contains(&result.score), "score {}", result.score);

    let best = result.best_move.and_then(|m| m.notation()).unwrap();
    assert_eq!(result.pv.first().and_then(|m| m.notation()).as_deref(), Some(best.as_str()));
    let mut line = pos.clone();
    for mv in &result.pv {
        let notation = mv.notation().unwrap();
        let m = line.find_move(&notation).unwrap_or_else(|| panic!("{notation} is not legal"));
        line.do_move(&m);
    }
}

#[test]
fn test_wins_hanging_queen() {
    let result = run("4k3/8/8/3q4/4P3/8/8/4K3 w - -", SearchLimits::depth(3));
    assert_eq!(result.best_move.and_then(|m| m.notation()).as_deref(), Some("e4d5"));
    assert!(result.score > 0);
}

#[test]
fn test_rook_ladder_mate_in_two() {
    // 1. Ra7 Kg8 2. Rb8#
    let fen = "7k/8/8/8/8/8/1R6/R5K1 w - -";
    let result = run(fen, SearchLimits::depth(6));
    assert!(result.score > CHECKMATE_THRESHOLD, "score {}", result.score);
    // Found at depth 4 and reported without deepening further
    assert_eq!(result.depth, 4);

    let first = result.best_move.and_then(|m| m.notation()).unwrap();
    assert!(Position::from_fen(fen).unwrap().find_move(&first).is_some());
}

#[test]
fn test_losing_side_sees_negative_mate() {
    // Kg8 is forced, then Rb8#
    let result = run("7k/R7/8/8/8/8/1R6/6K1 b - -", SearchLimits::depth(5));
    assert!(result.score < -CHECKMATE_THRESHOLD, "score {}", result.score);
    assert_eq!(result.depth, 3);
    assert_eq!(result.best_move.and_then(|m| m.notation()).as_deref(), Some("h8g8"));
}

#[test]
fn test_quiet_position_qsearch_floor() {
    let fen = "4k3/8/8/8/8/8/4P3/4K3 w - -";
    let result = run(fen, SearchLimits::depth(1));
    let eval = evaluate(&Position::from_fen(fen).unwrap());
    // One ply then a capture-free quiescence: close to the static score
    assert!((result.score - eval).abs() < 100);
}

#[test]
fn test_time_limited_search_returns_promptly() {
    let start = Instant::now();
    let result = run(
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq -",
        SearchLimits::time(Duration::from_millis(100)),
    );
    assert!(result.completed);
    assert!(result.best_move.is_some());
    assert!(start.elapsed() < Duration::from_secs(10));
}
