//! Orchestrator behaviour: book, timed search, pondering, resignation
//! and force mode

use crossbeam_channel::Receiver;
use rchess_core::book::OpeningBook;
use rchess_core::time::ClockFormat;
use rchess_core::{Engine, EngineConfig, EngineEvent, GameResult, Position};
use std::time::{Duration, Instant};

const WAIT: Duration = Duration::from_secs(20);

fn config() -> EngineConfig {
    EngineConfig {
        tt_capacity: 1 << 18,
        show_thinking: false,
        ..EngineConfig::default()
    }
}

/// Next event other than search progress
fn next_event(rx: &Receiver<EngineEvent>, timeout: Duration) -> Option<EngineEvent> {
    let deadline = Instant::now() + timeout;
    loop {
        let left = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok(EngineEvent::Thinking(_)) => continue,
            Ok(event) => return Some(event),
            Err(_) => return None,
        }
    }
}

fn expect_move(rx: &Receiver<EngineEvent>) -> String {
    match next_event(rx, WAIT) {
        Some(EngineEvent::Move(mv)) => mv,
        other => panic!("expected a move, got {other:?}"),
    }
}

#[test]
fn test_timed_search_plays_a_legal_move() {
    let (engine, rx) = Engine::new(config());
    engine.set_clock(4_000);
    engine.go();
    let mv = expect_move(&rx);

    let game = engine.game();
    assert_eq!(game.history().count(), 1);
    assert_eq!(game.history().next().unwrap().to_string(), mv);
    assert!(!engine.is_thinking());
    engine.shutdown();
}

#[test]
fn test_timer_commits_before_search_finishes() {
    let (engine, rx) = Engine::new(config());
    // 2 * 200ms / 41 leaves a few milliseconds
    engine.set_clock(200);
    let start = Instant::now();
    engine.go();
    expect_move(&rx);
    assert!(start.elapsed() < Duration::from_secs(5));
    engine.shutdown();
}

#[test]
fn test_move_now_interrupts_long_search() {
    let (engine, rx) = Engine::new(config());
    engine.set_clock(3_600_000);
    engine.go();
    std::thread::sleep(Duration::from_millis(300));
    assert!(engine.is_thinking());
    engine.move_now();
    let mv = expect_move(&rx);
    assert!(Position::startpos().find_move(&mv).is_some());
    engine.shutdown();
}

#[test]
fn test_book_move_is_played_without_search() {
    let mut book = OpeningBook::new();
    book.insert(Position::startpos().hash(), "e2e4", 5);
    let (engine, rx) = Engine::new(config());
    let engine = engine.with_book(book);
    engine.go();
    assert_eq!(next_event(&rx, Duration::from_secs(1)), Some(EngineEvent::Move("e2e4".into())));
    assert!(!engine.is_thinking());
    assert_eq!(engine.game().history_string(), "1. e2e4");
}

#[test]
fn test_illegal_book_move_is_reported_then_searched() {
    let mut book = OpeningBook::new();
    book.insert(Position::startpos().hash(), "e2e5", 1);
    let (engine, rx) = Engine::new(config());
    let engine = engine.with_book(book);
    engine.set_clock(2_000);
    engine.go();

    match next_event(&rx, WAIT) {
        Some(EngineEvent::Error(msg)) => assert!(msg.starts_with("Illegal move in book")),
        other => panic!("expected an error, got {other:?}"),
    }
    let mv = expect_move(&rx);
    assert_ne!(mv, "e2e5");
    engine.shutdown();
}

#[test]
fn test_disengaged_engine_does_not_move() {
    let (engine, rx) = Engine::new(config());
    engine.disengage();
    engine.user_move("e2e4").unwrap();
    engine.go();
    assert_eq!(next_event(&rx, Duration::from_millis(300)), None);
    assert!(!engine.is_thinking());

    engine.engage();
    engine.set_clock(2_000);
    engine.go();
    let reply = expect_move(&rx);
    assert_eq!(engine.game().history().count(), 2);
    assert_ne!(reply, "e2e4");
    engine.shutdown();
}

#[test]
fn test_user_move_triggers_reply() {
    let (engine, rx) = Engine::new(config());
    engine.set_clock(2_000);
    assert!(engine.user_move("e2e5").is_err());
    engine.user_move("d2d4").unwrap();
    expect_move(&rx);
    assert_eq!(engine.game().move_number(), 2);
    engine.shutdown();
}

#[test]
fn test_hopeless_position_resigns() {
    let (engine, rx) = Engine::new(EngineConfig {
        resign_threshold: 500,
        ..config()
    });
    engine.set_position(Position::from_fen("3qk3/8/8/8/8/8/8/4K3 w - -").unwrap());
    engine.set_clock(2_000);
    engine.go();
    assert_eq!(next_event(&rx, WAIT), Some(EngineEvent::Resign));
    assert_eq!(engine.result(), Some(GameResult::WhiteResigns));

    // Nothing more to do once the game is over
    engine.go();
    assert!(!engine.is_thinking());
}

#[test]
fn test_ponder_hit_is_promoted() {
    // Depth-limited searches are deterministic, so the table always holds
    // a reply to our move and pondering always starts
    let (engine, rx) = Engine::new(EngineConfig {
        ponder: true,
        max_depth: 2,
        tt_capacity: 1 << 20,
        ..config()
    });
    engine.set_clock(60_000);
    engine.go();
    let ours = expect_move(&rx);

    let expected = engine.ponder_move().expect("no ponder search after our move");
    assert!(engine.is_pondering());
    assert!(engine.game().legal_moves().iter().any(|m| m.to_string() == expected));

    // Let the ponder search reach its depth limit
    let deadline = Instant::now() + WAIT;
    let pondered = loop {
        let best = engine.best_so_far().expect("ponder search vanished");
        if best.depth >= 2 {
            break best.best_move.notation().expect("ponder search has no move");
        }
        assert!(Instant::now() < deadline, "ponder search stuck at depth {}", best.depth);
        std::thread::sleep(Duration::from_millis(10));
    };

    engine.user_move(&expected).unwrap();
    assert_eq!(expect_move(&rx), pondered);

    let history: Vec<String> = engine.game().history().map(|m| m.to_string()).collect();
    assert_eq!(history, [ours, expected, pondered]);
    engine.shutdown();
}

#[test]
fn test_ponder_miss_starts_fresh_search() {
    let (engine, rx) = Engine::new(EngineConfig { ponder: true, ..config() });
    engine.set_clock(3_000);
    engine.go();
    expect_move(&rx);

    let game = engine.game();
    let expected = engine.ponder_move();
    let other = game
        .legal_moves()
        .iter()
        .map(|m| m.to_string())
        .find(|m| Some(m) != expected.as_ref())
        .unwrap();
    engine.user_move(&other).unwrap();
    expect_move(&rx);
    assert_eq!(engine.game().history().count(), 3);
    engine.shutdown();
}

#[test]
fn test_undo_stops_search() {
    let (engine, _rx) = Engine::new(config());
    engine.disengage();
    engine.user_move("e2e4").unwrap();
    engine.engage();
    engine.set_clock(3_600_000);
    engine.go();
    assert!(engine.is_thinking());
    assert_eq!(engine.undo().map(|m| m.to_string()).as_deref(), Some("e2e4"));
    assert!(!engine.is_thinking());
    assert_eq!(engine.position(), Position::startpos());
}

#[test]
fn test_increment_clock_format() {
    let (engine, rx) = Engine::new(config());
    engine.set_clock_format(ClockFormat::Increment {
        base_ms: 2_000,
        increment_ms: 100,
    });
    // At most 2000 / 20 + 100 ms to think, then 100 ms back
    engine.go();
    expect_move(&rx);
    let left = engine.time_left();
    assert!(left > 1_500 && left <= 2_100, "{left} ms left");

    engine.new_game();
    assert_eq!(engine.position(), Position::startpos());
    assert!(engine.time_left() > 1_900);
    engine.shutdown();
}

#[test]
fn test_thinking_events_when_enabled() {
    let (engine, rx) = Engine::new(EngineConfig {
        show_thinking: true,
        ..config()
    });
    engine.set_clock(2_000);
    engine.go();

    let deadline = Instant::now() + WAIT;
    let mut thinking = 0;
    loop {
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(EngineEvent::Thinking(info)) => {
                thinking += 1;
                assert!(info.depth >= 1);
                assert!(!info.pv.is_empty());
            }
            Ok(EngineEvent::Move(_)) => break,
            other => panic!("unexpected {other:?}"),
        }
    }
    assert!(thinking >= 1);
    engine.shutdown();
}
