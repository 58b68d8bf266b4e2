//! Demo/diagnostic CLI around the search core (SPEC_FULL.md §6.1), grounded
//! on the teacher's `clap`-derive `main.rs`. Not the network bridge to an
//! external referee/GUI (spec.md §1/§6) — that boundary is out of scope for
//! this crate; this binary exists only for local experimentation.

use clap::{Parser, Subcommand};
use squadro::consts::DEFAULT_TT_SIZE_MB;
use squadro::game::GameState;
use squadro::search::Engine;

#[derive(Debug, Parser)]
#[command(name = "squadro", about = "Squadro search engine core")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Transposition table size in megabytes.
    #[arg(long, default_value_t = DEFAULT_TT_SIZE_MB)]
    tt_mb: usize,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Runs a single search from the starting position and prints the
    /// chosen move, score, principal variation, and node/TT statistics.
    Search {
        /// Search time budget in milliseconds.
        #[arg(long, default_value_t = 1000)]
        time_ms: u64,
    },

    /// Plays the engine against itself turn by turn, printing the board and
    /// chosen move after each ply. Text rendering only (non-goal: a GUI).
    Selfplay {
        #[arg(long, default_value_t = 1000)]
        time_ms: u64,

        /// Stop after this many plies even if the game has not ended.
        #[arg(long, default_value_t = 200)]
        max_turns: u32,
    },

    /// Counts reachable legal-move sequences from the opening position to a
    /// fixed depth: the Squadro analogue of a chess perft, used as a
    /// regression check on move generation/apply/undo rather than a raw
    /// node-per-second benchmark.
    Perft {
        #[arg(long, default_value_t = 4)]
        depth: u32,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Search { time_ms } => run_search(args.tt_mb, time_ms),
        Command::Selfplay { time_ms, max_turns } => run_selfplay(args.tt_mb, time_ms, max_turns),
        Command::Perft { depth } => run_perft(depth),
    }
}

fn run_search(tt_mb: usize, time_ms: u64) {
    let mut state = GameState::new();
    let mut engine = Engine::new(tt_mb);

    let mv = engine.search(&mut state, time_ms).expect("opening position always has a legal move");
    let stats = engine.last_stats();
    let pv = engine.principal_variation(&state, stats.depth as usize + 1);

    log::info!(
        "bestmove={mv} score={} depth={} nodes={} leaves={} fail_highs={} fail_high_first={} tt_probes={} tt_hits={}",
        stats.score.inner(),
        stats.depth,
        stats.nodes,
        stats.leaves,
        stats.fail_highs,
        stats.fail_high_first,
        engine.tt_probes(),
        engine.tt_hits(),
    );
    println!("bestmove {mv}");
    println!("score {}", stats.score.inner());
    println!("pv {}", pv.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "));
}

fn run_selfplay(tt_mb: usize, time_ms: u64, max_turns: u32) {
    let mut state = GameState::new();
    let mut engine = Engine::new(tt_mb);

    for ply in 0..max_turns {
        if state.is_terminal() {
            break;
        }

        println!("{}", state.board());
        let mv = engine.search(&mut state, time_ms).expect("non-terminal state always has a legal move");
        println!("ply {ply}: {} plays {mv}", state.side_to_move());
        state.apply_move(mv).expect("search only ever returns a legal move");
    }

    println!("{}", state.board());
    match state.winner() {
        Some(winner) => println!("winner: {winner}"),
        None => println!("no winner after {max_turns} plies"),
    }
}

fn run_perft(depth: u32) {
    let mut state = GameState::new();
    let nodes = perft(&mut state, depth);
    println!("perft({depth}) = {nodes}");
}

fn perft(state: &mut GameState, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = state.generate_legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        let record = state.apply_move(mv).expect("move from generate_legal_moves is always legal");
        nodes += perft(state, depth - 1);
        state.undo_move(&record);
    }
    nodes
}
