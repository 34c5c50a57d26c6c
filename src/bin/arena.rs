use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use connect_four_engine::ai::{Agent, RandomAgent};
use connect_four_engine::config::AppConfig;
use connect_four_engine::game::{GameOutcome, Player};
use connect_four_engine::session::{Controller, Session};

/// Play headless games with the engine and report the results.
#[derive(Parser)]
#[command(name = "arena", about = "Pit the Connect Four engine against itself or a random player")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Opponent for the second player: engine or random
    #[arg(long, default_value = "engine")]
    opponent: String,

    /// Override who moves first: first or second
    #[arg(long)]
    first: Option<String>,

    /// Override the engine RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the final board of every game
    #[arg(long)]
    show_board: bool,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[derive(Default)]
struct Tally {
    first: usize,
    second: usize,
    draws: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let random_opponent = match cli.opponent.as_str() {
        "engine" => false,
        "random" => true,
        other => bail!("unknown opponent '{}' (expected 'engine' or 'random')", other),
    };

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(first) = cli.first.as_deref() {
        config.session.first_player = match first {
            "first" => Player::First,
            "second" => Player::Second,
            other => bail!("unknown first player '{}' (expected 'first' or 'second')", other),
        };
    }
    if cli.seed.is_some() {
        config.session.seed = cli.seed;
    }
    config.session.first_controller = Controller::Computer;
    config.session.second_controller = if random_opponent {
        Controller::Human
    } else {
        Controller::Computer
    };

    let mut session = Session::new(&config).context("validating config")?;
    let mut random = match config.session.seed {
        Some(seed) => RandomAgent::with_seed(seed.wrapping_add(1)),
        None => RandomAgent::new(),
    };

    info!(
        games = cli.games,
        opponent = %cli.opponent,
        cols = config.board.cols,
        rows = config.board.rows,
        "starting arena"
    );

    let mut tally = Tally::default();
    for game in 1..=cli.games {
        session.start_game();
        while session.state().is_in_progress() {
            if session.play_computer_move()?.is_none() {
                let mv = random.select_move(session.board(), session.state())?;
                session.play_column(mv.column)?;
            }
        }

        let outcome = session
            .state()
            .outcome()
            .context("finished game has no outcome")?;
        match outcome {
            GameOutcome::Winner(Player::First) => tally.first += 1,
            GameOutcome::Winner(Player::Second) => tally.second += 1,
            GameOutcome::Draw => tally.draws += 1,
        }

        if cli.show_board {
            println!("Game {game}: {outcome:?}");
            println!("{}", session.board());
            println!();
        }
    }

    println!(
        "{} games | first (engine): {} | second ({}): {} | draws: {}",
        cli.games,
        tally.first,
        if random_opponent { random.name() } else { "engine" },
        tally.second,
        tally.draws
    );

    Ok(())
}
