//! Scoring of individual placements.

use std::fmt;

use gentris_engine::Placement;

use crate::{board_evaluator::BoardEvaluator, weights::Weights};

/// Assigns a score to a candidate placement (higher is better).
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_placement(&self, placement: &Placement) -> f32;
}

/// Scores the placement's locked board with a fixed set of weights.
#[derive(Debug, Clone)]
pub struct WeightedPlacementEvaluator {
    weights: Weights,
    board_evaluator: BoardEvaluator,
}

impl WeightedPlacementEvaluator {
    #[must_use]
    pub fn new(weights: Weights, board_evaluator: BoardEvaluator) -> Self {
        Self {
            weights,
            board_evaluator,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }
}

impl PlacementEvaluator for WeightedPlacementEvaluator {
    #[inline]
    fn evaluate_placement(&self, placement: &Placement) -> f32 {
        self.board_evaluator
            .score(placement.board(), &self.weights)
    }
}
