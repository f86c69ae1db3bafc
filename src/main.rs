use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use grid_2048::config::Config;
use grid_2048::engine::{GameStatus, Move, Score, Target, Tile};
use grid_2048::game::GameState;
use grid_2048::serialization::{self as ser, Snapshot};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "grid2048", about = "Deterministic 2048 engine driver")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Winning tile (power of two from 4 to 2^30); overrides the config file
    #[arg(long, global = true)]
    target: Option<Tile>,

    /// Base RNG seed; overrides the config file
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Suppress board printing and the progress bar
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Play a scripted sequence of moves from a new (or loaded) game
    Play {
        /// Moves as letters: u, d, l, r (e.g. "lldrru")
        #[arg(long, default_value = "")]
        moves: String,
        /// Resume from a snapshot instead of starting fresh
        #[arg(long)]
        load: Option<PathBuf>,
        /// Write the final session to this path
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Autoplay seeded games with a uniformly random legal-move policy
    Simulate {
        /// Number of games; overrides the config file
        #[arg(long)]
        games: Option<u32>,
        /// Per-game cap on accepted moves; overrides the config file
        #[arg(long)]
        max_moves: Option<u64>,
    },
    /// Decode and print a snapshot file
    Inspect {
        path: PathBuf,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy)]
struct GameSummary {
    score: Score,
    highest_tile: Tile,
    moves: u64,
    status: GameStatus,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_toml(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(t) = args.target {
        config.target = Target::new(t)?;
    }
    let seed = args.seed.or(config.seed).unwrap_or_else(|| rand::thread_rng().gen());
    info!("target {}, seed {}", config.target, seed);

    match &args.cmd {
        Cmd::Play { moves, load, save } => play(&args, &config, seed, moves, load.as_deref(), save.as_deref()),
        Cmd::Simulate { games, max_moves } => {
            let games = games.unwrap_or(config.simulate.games);
            let max_moves = max_moves.or(config.simulate.max_moves);
            simulate(&config, seed, games, max_moves, args.quiet)
        }
        Cmd::Inspect { path, json } => inspect(path, *json),
    }
}

fn play(
    args: &Args,
    config: &Config,
    seed: u64,
    moves: &str,
    load: Option<&Path>,
    save: Option<&Path>,
) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (mut state, target) = match load {
        Some(path) => {
            let snapshot = ser::read_snapshot_from_path(path)
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            let (state, stored_target) = snapshot.restore()?;
            // An explicit --target wins over the stored one
            (state, if args.target.is_some() { config.target } else { stored_target })
        }
        None => (GameState::new(config.target, &mut rng), config.target),
    };
    if !args.quiet {
        println!("{}", state.board);
    }

    for c in moves.chars().filter(|c| !c.is_whitespace()) {
        let dir = Move::from_char(c).with_context(|| format!("unknown move '{c}' (expected u, d, l or r)"))?;
        let step = state.step(dir, target, &mut rng);
        state = step.state;
        if !step.accepted {
            warn!("move {} not accepted", dir);
            continue;
        }
        if !args.quiet {
            println!("{} (+{})\n{}", dir, step.score_delta, state.board);
        }
    }
    println!("Score: {} | Highest tile: {} | Status: {}", state.score, state.board.highest_tile(), state.status);

    if let Some(path) = save {
        ser::write_snapshot_to_path(path, &Snapshot::capture(&state, target))
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        info!("saved session to {}", path.display());
    }
    Ok(())
}

fn play_random_game(seed: u64, target: Target, max_moves: Option<u64>) -> GameSummary {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::new(target, &mut rng);
    let mut moves = 0u64;
    while !state.status.is_terminal() {
        if max_moves.is_some_and(|cap| moves >= cap) {
            break;
        }
        let legal = state.board.legal_moves();
        if legal.is_empty() {
            break;
        }
        let dir = legal[rng.gen_range(0..legal.len())];
        state = state.step(dir, target, &mut rng).state;
        moves += 1;
    }
    GameSummary { score: state.score, highest_tile: state.board.highest_tile(), moves, status: state.status }
}

fn simulate(config: &Config, seed: u64, games: u32, max_moves: Option<u64>, quiet: bool) -> anyhow::Result<()> {
    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(u64::from(games));
        pb.set_style(ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} games")?);
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    };

    // One RNG per game keeps results independent of the thread count
    let target = config.target;
    let summaries: Vec<GameSummary> = (0..u64::from(games))
        .into_par_iter()
        .map(|i| {
            let summary = play_random_game(seed.wrapping_add(i), target, max_moves);
            pb.inc(1);
            summary
        })
        .collect();
    pb.finish_and_clear();

    if summaries.is_empty() {
        println!("No games played");
        return Ok(());
    }
    let wins = summaries.iter().filter(|s| s.status == GameStatus::Won).count();
    let losses = summaries.iter().filter(|s| s.status == GameStatus::Lost).count();
    let total_score: Score = summaries.iter().map(|s| s.score).sum();
    let max_score = summaries.iter().map(|s| s.score).max().unwrap_or(0);
    let highest_tile = summaries.iter().map(|s| s.highest_tile).max().unwrap_or(0);
    let total_moves: u64 = summaries.iter().map(|s| s.moves).sum();
    println!(
        "Games: {} | Won: {} | Lost: {} | Mean score: {:.1} | Max score: {} | Highest tile: {} | Moves: {}",
        summaries.len(),
        wins,
        losses,
        total_score as f64 / summaries.len() as f64,
        max_score,
        highest_tile,
        total_moves
    );
    Ok(())
}

fn inspect(path: &Path, json: bool) -> anyhow::Result<()> {
    let snapshot = ser::read_snapshot_from_path(path).with_context(|| format!("reading snapshot {}", path.display()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    let (state, target) = snapshot.restore()?;
    println!("{}", state.board);
    println!("Score: {} | Target: {} | Status: {}", state.score, target, state.status);
    Ok(())
}
