//! Board evaluation and move selection.
//!
//! ```text
//! Agent (pick the best placement, play games)
//!     ↓ uses
//! PlacementEvaluator (score one placement)
//!     ↓ uses
//! BoardEvaluator (weighted heuristics − height penalty)
//!     ↓ uses
//! BoardAnalysis (column heights, holes, wells, ...)
//! ```
//!
//! - [`heuristic`] - The measured board properties
//! - [`weights`] - One weight per heuristic, as evolved by training
//! - [`board_analysis`] - Raw metrics derived from column heights
//! - [`board_evaluator`] - Reduces the metrics to a scalar score
//! - [`placement_evaluator`] - Scores candidate placements
//! - [`agent`] - Greedy move selection and the game driver

pub mod agent;
pub mod board_analysis;
pub mod board_evaluator;
pub mod heuristic;
pub mod placement_evaluator;
pub mod weights;
