//! Board scoring: a weighted sum of heuristics minus a height penalty.
//!
//! ```text
//! score = Σ(wᵢ × heuristicᵢ) − Σ_{h > threshold} (h − threshold)^exponent
//! ```
//!
//! The penalty is applied regardless of the weights, which keeps evolved
//! genomes from rewarding tall stacks.

use gentris_engine::BitBoard;
use serde::{Deserialize, Serialize};

use crate::{board_analysis::BoardAnalysis, heuristic::Heuristic, weights::Weights};

/// Penalty for columns taller than `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightPenalty {
    pub threshold: u8,
    pub exponent: f32,
}

impl Default for HeightPenalty {
    fn default() -> Self {
        Self {
            threshold: 5,
            exponent: 2.5,
        }
    }
}

/// Scores boards against a set of [`Weights`].
///
/// Scoring is pure: the same board and weights always produce the same
/// score, and every board has one.
///
/// # Example
///
/// ```
/// use gentris_engine::BitBoard;
/// use gentris_evaluator::{board_evaluator::BoardEvaluator, heuristic::Heuristic, weights::Weights};
///
/// let board = BitBoard::from_ascii(&"##########\n".repeat(2));
/// let weights = Weights::from_iter([
///     (Heuristic::Height, -1.0),
///     (Heuristic::Holes, -1.0),
///     (Heuristic::Bumpiness, -1.0),
///     (Heuristic::Lines, 0.0),
/// ]);
/// assert_eq!(BoardEvaluator::default().score(&board, &weights), -20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardEvaluator {
    height_penalty: Option<HeightPenalty>,
}

impl Default for BoardEvaluator {
    fn default() -> Self {
        Self::new(Some(HeightPenalty::default()))
    }
}

impl BoardEvaluator {
    /// `None` disables the height penalty.
    #[must_use]
    pub const fn new(height_penalty: Option<HeightPenalty>) -> Self {
        Self { height_penalty }
    }

    #[must_use]
    pub fn height_penalty(&self) -> Option<HeightPenalty> {
        self.height_penalty
    }

    #[must_use]
    pub fn score(&self, board: &BitBoard, weights: &Weights) -> f32 {
        self.score_analysis(&BoardAnalysis::from_board(board), weights)
    }

    #[must_use]
    pub fn score_analysis(&self, analysis: &BoardAnalysis, weights: &Weights) -> f32 {
        let weighted: f32 = Heuristic::ALL
            .into_iter()
            .map(|heuristic| heuristic_value(analysis, heuristic) * weights.get(heuristic))
            .sum();
        let penalty = self
            .height_penalty
            .map_or(0.0, |p| analysis.height_penalty(p.threshold, p.exponent));
        weighted - penalty
    }
}

/// Raw value of one heuristic.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn heuristic_value(analysis: &BoardAnalysis, heuristic: Heuristic) -> f32 {
    match heuristic {
        Heuristic::Height => analysis.aggregate_height() as f32,
        Heuristic::Holes => analysis.holes() as f32,
        Heuristic::Bumpiness => analysis.bumpiness() as f32,
        Heuristic::Wells => analysis.wells() as f32,
        Heuristic::Lines => analysis.completed_lines() as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_missing_weights_contribute_nothing() {
        let board = BitBoard::from_ascii(
            r"
            #.........
            ##.#......
            ",
        );
        let evaluator = BoardEvaluator::default();
        assert!(approx_eq(evaluator.score(&board, &Weights::new()), 0.0));

        let holes_only = Weights::from_iter([(Heuristic::Holes, -3.0)]);
        assert!(approx_eq(evaluator.score(&board, &holes_only), 0.0));
        let height_only = Weights::from_iter([(Heuristic::Height, 1.0)]);
        assert!(approx_eq(evaluator.score(&board, &height_only), 4.0));
    }

    #[test]
    fn test_height_penalty_is_subtracted_regardless_of_weights() {
        let board = BitBoard::from_ascii(&"#.........\n".repeat(8));
        let expected = 3f32.powf(2.5);
        assert!(approx_eq(BoardEvaluator::default().score(&board, &Weights::new()), -expected));
        assert!(approx_eq(BoardEvaluator::new(None).score(&board, &Weights::new()), 0.0));
    }

    #[test]
    fn test_flat_board_scores_negative_aggregate_height() {
        let board = BitBoard::from_ascii(&"##########\n".repeat(2));
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.column_heights(), &[2; 10]);
        let weights = Weights::from_iter([
            (Heuristic::Height, -1.0),
            (Heuristic::Holes, -1.0),
            (Heuristic::Bumpiness, -1.0),
            (Heuristic::Lines, 0.0),
        ]);
        assert_eq!(BoardEvaluator::default().score(&board, &weights), -20.0);
    }

    #[test]
    fn test_lines_are_counted_before_clearing() {
        let board = BitBoard::from_ascii(
            r"
            ##########
            #####.####
            ",
        );
        let weights = Weights::from_iter([(Heuristic::Lines, 10.0)]);
        assert!(approx_eq(BoardEvaluator::default().score(&board, &weights), 10.0));
    }

    #[test]
    fn test_score_combines_every_heuristic() {
        let board = BitBoard::from_ascii(
            r"
            .#######..
            .#######..
            .#######.#
            .###.###.#
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        let weights = Weights::from_iter([
            (Heuristic::Height, 1.0),
            (Heuristic::Holes, 10.0),
            (Heuristic::Bumpiness, 100.0),
            (Heuristic::Wells, 1000.0),
            (Heuristic::Lines, 10000.0),
        ]);
        let expected = analysis.aggregate_height() as f32
            + 10.0 * analysis.holes() as f32
            + 100.0 * analysis.bumpiness() as f32
            + 1000.0 * analysis.wells() as f32;
        assert_eq!(analysis.holes(), 1);
        assert_eq!(analysis.wells(), 1);
        assert!(approx_eq(BoardEvaluator::default().score(&board, &weights), expected));
    }
}
