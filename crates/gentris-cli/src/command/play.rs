use std::path::PathBuf;

use gentris_engine::{GameState, PieceSeed};
use gentris_evaluator::{
    agent::{Agent, GameOutcome},
    board_evaluator::BoardEvaluator,
    placement_evaluator::WeightedPlacementEvaluator,
};
use gentris_training::champion;

use super::{DEFAULT_CHAMPION_PATH, SearchArg};
use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Champion file to read weights from; default weights are used if missing
    #[arg(long, default_value = DEFAULT_CHAMPION_PATH)]
    champion: PathBuf,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Seed of the first game; game `i` uses `seed + i`
    #[arg(long)]
    seed: Option<u64>,
    /// Stop each game after this many placements
    #[arg(long)]
    move_limit: Option<usize>,
    #[arg(long, value_enum, default_value_t)]
    search: SearchArg,
    /// Score boards without the height penalty
    #[arg(long)]
    no_height_penalty: bool,
    /// Print the final board of every game
    #[arg(long)]
    show_board: bool,
    /// Write the game outcomes as JSON ("-" for stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let weights = champion::load_weights_or_default(&arg.champion);
    let board_evaluator = if arg.no_height_penalty {
        BoardEvaluator::new(None)
    } else {
        BoardEvaluator::default()
    };
    let agent = Agent::with_evaluator(Box::new(WeightedPlacementEvaluator::new(
        weights,
        board_evaluator,
    )))
    .with_search_mode(arg.search.into());
    let move_limit = arg.move_limit.unwrap_or(usize::MAX);

    let mut outcomes = Vec::with_capacity(arg.games);
    for game_index in 0..arg.games {
        let mut game = match arg.seed {
            Some(seed) => GameState::with_seed(PieceSeed::from_u64(seed.wrapping_add(game_index as u64))),
            None => GameState::new(),
        };
        let outcome = agent.play_game(&mut game, move_limit);
        tracing::info!(
            game = game_index + 1,
            score = outcome.score,
            moves = outcome.moves,
            lines = outcome.stats.total_cleared_lines(),
            hit_move_limit = outcome.hit_move_limit,
            "game finished"
        );
        if arg.show_board {
            eprint!("{}", game.board());
        }
        outcomes.push(outcome);
    }
    log_summary(&outcomes);

    if let Some(path) = &arg.output {
        util::write_json(&outcomes, path)?;
    }
    Ok(())
}

fn log_summary(outcomes: &[GameOutcome]) {
    if outcomes.len() < 2 {
        return;
    }
    let scores = outcomes.iter().map(|outcome| outcome.score);
    let best = scores.clone().max().unwrap_or(0);
    let worst = scores.clone().min().unwrap_or(0);
    #[expect(clippy::cast_precision_loss)]
    let mean = scores.sum::<usize>() as f64 / outcomes.len() as f64;
    tracing::info!(games = outcomes.len(), best, worst, mean, "all games finished");
}
