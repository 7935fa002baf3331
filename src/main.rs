//! Othello Arena command line.
//!
//! - `othello-arena strategy <NAME>` hosts a built-in strategy on
//!   stdin/stdout. This is what automated participants run as.
//! - `othello-arena play --black <ID> --white <ID>` runs one game locally.
//!   Human moves are read from stdin, one per line.
//! - `othello-arena list` prints every participant name.
//!
//! # Environment Variables
//!
//! - `OTHELLO_ARENA_CONFIG`: configuration file (same as `--config`)
//! - `RUST_LOG`: log filter, unless `--debug` is given

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use othello_arena::{config, strategy};
use othello_arena::{
    ArenaConfig, Cell, EmissionBridge, Envelope, GameEvent, GameRunner, Move, Termination,
};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Othello Arena - sandboxed Othello games
#[derive(Parser, Debug)]
#[command(name = "othello-arena")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file (also: OTHELLO_ARENA_CONFIG)
    #[arg(long, env = "OTHELLO_ARENA_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Host a built-in strategy over stdin/stdout
    Strategy {
        /// One of: random, greedy, positional
        name: String,
    },

    /// Play one game
    Play {
        #[arg(long, default_value = "human")]
        black: String,

        #[arg(long, default_value = "greedy")]
        white: String,

        /// Seconds per move (default from config)
        #[arg(long, value_name = "SECONDS")]
        time_limit: Option<f64>,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        #[arg(long, default_value = "local")]
        session: String,
    },

    /// List participant names
    List,
}

fn init_tracing(args: &Args) {
    // Strategy processes log to the stderr their supervisor reports as errors
    let default = match args.command {
        Commands::Strategy { .. } => "error",
        _ => "warn",
    };
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    match &args.command {
        Commands::Strategy { name } => run_strategy(name),
        Commands::List => {
            let config = load_config(&args)?;
            let registry = config.registry(&std::env::current_exe()?);
            for name in registry.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Play {
            black,
            white,
            time_limit,
            json,
            session,
        } => {
            let config = load_config(&args)?;
            let time_limit = match time_limit {
                Some(seconds) => match config::time_limit(*seconds) {
                    Ok(limit) => limit,
                    Err(e) => bail!("time limit {}", e),
                },
                None => config.default_time_limit()?,
            };
            let termination = play(&config, black, white, time_limit, *json, session)?;
            match termination {
                Termination::Aborted(reason) => bail!("game aborted: {}", reason),
                _ => Ok(()),
            }
        }
    }
}

fn load_config(args: &Args) -> Result<ArenaConfig> {
    match &args.config {
        Some(path) => {
            let config = ArenaConfig::load(path)?;
            info!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
        None => Ok(ArenaConfig::default()),
    }
}

fn run_strategy(name: &str) -> Result<()> {
    let Some(strategy) = strategy::by_name(name) else {
        bail!("Unknown strategy: {}", name);
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    othello_arena::protocol::serve(strategy, stdin.lock(), stdout.lock(), io::stderr())
}

fn play(
    config: &ArenaConfig,
    black: &str,
    white: &str,
    time_limit: Duration,
    json: bool,
    session: &str,
) -> Result<Termination> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build runtime")?;

    let quit = CancellationToken::new();
    let ctrl_c = quit.clone();
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, cancelling game");
            ctrl_c.cancel();
        }
    });

    let (bridge, drain) = EmissionBridge::attach(runtime.handle(), move |envelope| {
        print_event(&envelope, json)
    });

    let registry = Arc::new(config.registry(&std::env::current_exe()?));
    let runner = GameRunner::new(
        black,
        white,
        time_limit,
        bridge.emitter(session),
        registry,
        quit,
    )
    .with_options(config.runner_options());

    let moves = spawn_move_reader()?;
    let handle = runner.spawn(moves).context("failed to start game thread")?;
    let termination = handle
        .join()
        .map_err(|_| anyhow::anyhow!("game thread panicked"))?;

    drop(bridge);
    if let Err(e) = runtime.block_on(drain) {
        warn!(error = %e, "event printer failed");
    }
    Ok(termination)
}

/// Human moves from stdin. Lines that do not parse become `Move::NONE`,
/// which the game treats as an illegal move.
fn spawn_move_reader() -> Result<mpsc::Receiver<Move>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("move-reader".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let mv = line.parse().unwrap_or_else(|e| {
                    debug!(input = %line, error = %e, "unparsable move");
                    Move::NONE
                });
                if tx.send(mv).is_err() {
                    break;
                }
            }
        })
        .context("failed to start move reader")?;
    Ok(rx)
}

fn print_event(envelope: &Envelope, json: bool) {
    if json {
        match serde_json::to_string(envelope) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!(error = %e, "failed to encode event"),
        }
        return;
    }

    match &envelope.event {
        GameEvent::BoardUpdate {
            board,
            tomove,
            black,
            white,
        } => {
            println!("{} {} vs {} {}", Cell::Black, black, white, Cell::White);
            println!("{}", board);
            if *tomove != Cell::Empty {
                println!("{} to move", tomove);
            }
        }
        GameEvent::MoveRequest => println!("Your move (e.g. d3):"),
        GameEvent::GameError { error } => eprintln!("{} {}", "error:".red(), error),
        GameEvent::GameEnd { winner, forfeit, .. } => {
            let result = match winner {
                Cell::Empty => "tie".to_string(),
                Cell::Outer => "game aborted".to_string(),
                winner => format!("{} wins", winner),
            };
            if *forfeit {
                println!("Game over: {} by forfeit", result);
            } else {
                println!("Game over: {}", result);
            }
        }
    }
}
