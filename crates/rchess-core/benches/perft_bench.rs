//! Move generation and search benchmarks
//!
//! - perft to a fixed depth on a few standard positions
//! - fixed-depth search from the initial position

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rchess_core::perft::perft;
use rchess_core::search::{SearchLimits, Searcher};
use rchess_core::tt::TranspositionTable;
use rchess_core::Position;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

const POSITIONS: [(&str, &str); 3] = [
    ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -"),
    ("kiwipete", "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -"),
    ("endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -"),
];

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.measurement_time(Duration::from_secs(10));

    for (name, fen) in POSITIONS {
        let pos = Position::from_fen(fen).expect("benchmark FEN");
        group.bench_with_input(BenchmarkId::new(name, 3), &pos, |b, pos| {
            b.iter(|| {
                let mut pos = pos.clone();
                black_box(perft(&mut pos, 3))
            });
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in [3u32, 4] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                // Fresh table so every sample does the same work
                let tt = Arc::new(TranspositionTable::new(1 << 16));
                let mut searcher = Searcher::new(&Position::startpos(), tt, SearchLimits::depth(depth));
                black_box(searcher.run())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_search);
criterion_main!(benches);
