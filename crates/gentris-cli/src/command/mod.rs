use clap::{Parser, Subcommand, ValueEnum};
use gentris_engine::SearchMode;
use tracing_subscriber::{filter::LevelFilter, prelude::*};

use self::{play::PlayArg, train::TrainArg};

mod play;
mod train;

/// Default location of the champion file.
const DEFAULT_CHAMPION_PATH: &str = "best_brain.json";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v = DEBUG, -vv = TRACE)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve evaluator weights with a genetic algorithm
    Train(#[clap(flatten)] TrainArg),
    /// Let the agent play games with the champion weights
    Play(#[clap(flatten)] PlayArg),
}

/// Placement search selectable from the command line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SearchArg {
    /// Shifts, soft drops and kicked rotations
    #[default]
    Full,
    /// Straight drops from the spawn row only
    StraightDrop,
}

impl From<SearchArg> for SearchMode {
    fn from(arg: SearchArg) -> Self {
        match arg {
            SearchArg::Full => SearchMode::Full,
            SearchArg::StraightDrop => SearchMode::StraightDrop,
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::WARN,
        (false, 0) => LevelFilter::INFO,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(level)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose, args.quiet);
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}
