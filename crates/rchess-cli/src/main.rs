// Command line front end: perft, fixed-limit analysis and engine self-play

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crossbeam_channel::Receiver;
use rchess_core::book::OpeningBook;
use rchess_core::perft::{divide, perft, perft_stats};
use rchess_core::search::{SearchInfo, SearchLimits, Searcher};
use rchess_core::time::ClockFormat;
use rchess_core::tt::TranspositionTable;
use rchess_core::{Engine, EngineConfig, EngineEvent, Position, STARTPOS_FEN};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "rchess", author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Engine configuration (TOML)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count leaf nodes of the legal move tree
    Perft(PerftArgs),
    /// Search a single position
    Search(SearchArgs),
    /// Let the engine play a game against itself
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct PerftArgs {
    /// Depth in plies
    #[arg(value_name = "DEPTH")]
    depth: u32,
    #[arg(long, value_name = "FEN", default_value = STARTPOS_FEN)]
    fen: String,
    /// Print the node count under each root move
    #[arg(long, conflicts_with = "stats")]
    divide: bool,
    /// Count captures, castles, promotions and checks as well
    #[arg(long)]
    stats: bool,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[arg(long, value_name = "FEN", default_value = STARTPOS_FEN)]
    fen: String,
    /// Maximum iteration depth
    #[arg(long, value_name = "N")]
    depth: Option<u32>,
    /// Time budget in milliseconds
    #[arg(long = "time-ms", value_name = "MS")]
    time_ms: Option<u64>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[arg(long, value_name = "FEN")]
    fen: Option<String>,
    /// Opening book shared by both sides
    #[arg(long, value_name = "FILE")]
    book: Option<PathBuf>,
    /// Increment clock: base time in milliseconds
    #[arg(long = "base-ms", value_name = "MS")]
    base_ms: Option<i64>,
    /// Increment clock: bonus per move in milliseconds
    #[arg(long = "increment-ms", value_name = "MS", default_value_t = 0, requires = "base_ms")]
    increment_ms: i64,
    /// Stop after this many plies
    #[arg(long = "max-plies", value_name = "N", default_value_t = 300)]
    max_plies: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Perft(args) => run_perft(args),
        Commands::Search(args) => run_search(args, &config),
        Commands::Play(args) => run_play(args, config),
    }
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config: EngineConfig = toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?;
    log::debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

fn parse_fen(fen: &str) -> Result<Position> {
    Position::from_fen(fen).with_context(|| format!("invalid FEN: {fen}"))
}

fn run_perft(args: PerftArgs) -> Result<()> {
    let mut pos = parse_fen(&args.fen)?;
    let start = Instant::now();

    let nodes = if args.divide {
        let moves = divide(&mut pos, args.depth);
        for (notation, count) in &moves {
            println!("{notation}: {count}");
        }
        moves.iter().map(|(_, count)| count).sum()
    } else if args.stats {
        let stats = perft_stats(&mut pos, args.depth);
        println!("{stats}");
        stats.nodes
    } else {
        perft(&mut pos, args.depth)
    };

    let elapsed = start.elapsed();
    let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
    println!("perft({}) = {} [{:.3}s, {:.0} nps]", args.depth, nodes, elapsed.as_secs_f64(), nps);
    Ok(())
}

fn print_info(info: &SearchInfo) {
    println!(
        "depth {} seldepth {} score {} time {} nodes {} hashfull {} pv {}",
        info.depth,
        info.seldepth,
        info.score,
        info.elapsed.as_millis(),
        info.nodes,
        info.hashfull,
        info.pv
    );
}

fn run_search(args: SearchArgs, config: &EngineConfig) -> Result<()> {
    let pos = parse_fen(&args.fen)?;
    if args.depth.is_none() && args.time_ms.is_none() {
        bail!("give --depth, --time-ms or both");
    }

    let limits = SearchLimits {
        max_depth: args.depth.unwrap_or(config.max_depth),
        search_time: args.time_ms.map(Duration::from_millis),
        ponder: false,
    };
    let tt = Arc::new(TranspositionTable::new(config.tt_capacity));
    let mut searcher = Searcher::new(&pos, tt, limits).with_info_callback(Box::new(print_info));
    let result = searcher.run();

    match result.best_move.and_then(|m| m.notation()) {
        Some(best) => println!("bestmove {best} score {} depth {}", result.score, result.depth),
        None => println!("bestmove (none)"),
    }
    Ok(())
}

fn run_play(args: PlayArgs, mut config: EngineConfig) -> Result<()> {
    if let Some(base_ms) = args.base_ms {
        config.clock_format = ClockFormat::Increment {
            base_ms,
            increment_ms: args.increment_ms,
        };
    }
    let book = args
        .book
        .as_deref()
        .map(OpeningBook::load)
        .transpose()
        .context("failed to load opening book")?;

    let start = match &args.fen {
        Some(fen) => parse_fen(fen)?,
        None => Position::startpos(),
    };

    // One engine per side; each sees the other's moves as user moves
    let sides: Vec<(Engine, Receiver<EngineEvent>)> = (0..2)
        .map(|_| {
            let (engine, events) = Engine::new(config.clone());
            engine.set_book(book.clone());
            engine.set_position(start.clone());
            (engine, events)
        })
        .collect();

    let mut to_move = 0usize;
    let mut plies = 0u32;
    sides[to_move].0.go();

    let outcome = loop {
        let (engine, events) = &sides[to_move];
        let event = events.recv().context("engine event channel closed")?;
        match event {
            EngineEvent::Thinking(info) => {
                log::debug!("[side {to_move}] {}", info.pv);
                continue;
            }
            EngineEvent::Error(msg) => {
                log::warn!("[side {to_move}] {msg}");
                continue;
            }
            EngineEvent::Resign => break format!("side {to_move} resigns"),
            EngineEvent::Move(notation) => {
                plies += 1;
                println!("{plies:>3}. {notation}");
                if let Some(result) = engine.result() {
                    break result.to_string();
                }
                if plies >= args.max_plies {
                    break format!("stopped after {plies} plies");
                }
                to_move ^= 1;
                sides[to_move]
                    .0
                    .user_move(&notation)
                    .with_context(|| format!("opponent rejected {notation}"))?;
            }
        }
    };

    println!("{}", sides[to_move].0.game().history_string());
    println!("{outcome}");
    for (engine, _) in &sides {
        engine.shutdown();
    }
    Ok(())
}
