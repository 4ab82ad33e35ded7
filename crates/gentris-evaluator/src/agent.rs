//! Move selection and the game driver.
//!
//! The [`Agent`] is greedy: it scores every placement available this turn
//! (for both the current piece and the hold candidate) and picks the best
//! one, without looking further ahead.
//!
//! # Usage
//!
//! ```
//! use gentris_engine::{GameState, PieceSeed};
//! use gentris_evaluator::{agent::Agent, weights::Weights};
//!
//! let agent = Agent::new(Weights::manual_default());
//! let mut game = GameState::with_seed(PieceSeed::from_u64(0));
//! let outcome = agent.play_game(&mut game, 50);
//!
//! assert_eq!(outcome.moves, game.stats().completed_pieces());
//! assert!(outcome.moves <= 50);
//! ```

use gentris_engine::{GameState, GameStats, Placement, SearchMode, candidate_placements};
use serde::Serialize;

use crate::{
    board_evaluator::BoardEvaluator,
    placement_evaluator::{PlacementEvaluator, WeightedPlacementEvaluator},
    weights::Weights,
};

/// Result of one game played by an [`Agent`].
#[derive(Debug, Clone, Serialize)]
pub struct GameOutcome {
    pub score: usize,
    /// Placements made before the game ended or hit the move limit.
    pub moves: usize,
    /// `moves` reached the cap, even if the last move also ended the game.
    pub hit_move_limit: bool,
    pub stats: GameStats,
}

#[derive(Debug)]
pub struct Agent<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
    search_mode: SearchMode,
}

impl Agent<'static> {
    /// An agent scoring boards with `weights` and the default evaluator.
    #[must_use]
    pub fn new(weights: Weights) -> Self {
        Self::with_evaluator(Box::new(WeightedPlacementEvaluator::new(
            weights,
            BoardEvaluator::default(),
        )))
    }
}

impl<'a> Agent<'a> {
    #[must_use]
    pub fn with_evaluator(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            placement_evaluator,
            search_mode: SearchMode::default(),
        }
    }

    #[must_use]
    pub fn with_search_mode(mut self, search_mode: SearchMode) -> Self {
        self.search_mode = search_mode;
        self
    }

    #[must_use]
    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    /// Picks the highest-scoring placement for this turn.
    ///
    /// Ties go to the placement seen first: current-piece placements come
    /// before hold placements, each in search order. Returns `None` when no
    /// placement exists.
    #[must_use]
    pub fn choose_move(&self, state: &GameState) -> Option<Placement> {
        let mut best_score = f32::NEG_INFINITY;
        let mut best = None;
        for placement in candidate_placements(state, self.search_mode) {
            let score = self.placement_evaluator.evaluate_placement(&placement);
            if best.is_none() || score > best_score {
                best_score = score;
                best = Some(placement);
            }
        }
        best
    }

    /// Plays until the game is over, no move exists, or `move_limit`
    /// placements have been made.
    pub fn play_game(&self, state: &mut GameState, move_limit: usize) -> GameOutcome {
        let mut moves = 0;
        while moves < move_limit && !state.is_game_over() {
            let Some(placement) = self.choose_move(state) else {
                break;
            };
            if state.apply(&placement).is_err() {
                break;
            }
            moves += 1;
        }
        tracing::trace!(moves, score = state.score(), game_over = state.is_game_over(), "game finished");
        GameOutcome {
            score: state.score(),
            moves,
            hit_move_limit: moves >= move_limit,
            stats: state.stats().clone(),
        }
    }
}

/// Picks the best placement for `state` under `weights` with the default
/// evaluator and full search.
#[must_use]
pub fn choose_move(state: &GameState, weights: &Weights) -> Option<Placement> {
    Agent::new(weights.clone()).choose_move(state)
}
