//! Game rules built on top of the core data structures.
//!
//! - [`GameState`] - One game: board, falling piece, piece queue, score
//! - [`PieceBuffer`] - 7-bag piece queue with the hold slot
//! - [`GameStats`] - Score and line-clear counters
//! - [`enumerate_terminal_placements`] - Every resting spot reachable by shifts, drops and kicks
//! - [`candidate_placements`] - This turn's placements for both the current and the hold piece
//!
//! # Example
//!
//! ```
//! use gentris_engine::{GameState, PieceSeed, SearchMode, candidate_placements};
//!
//! let mut game = GameState::with_seed(PieceSeed::from_u64(3));
//! while !game.is_game_over() && game.stats().completed_pieces() < 10 {
//!     let Some(placement) = candidate_placements(&game, SearchMode::Full).into_iter().next() else {
//!         break;
//!     };
//!     game.apply(&placement).unwrap();
//! }
//! ```

pub use self::{game_state::*, game_stats::*, piece_buffer::*, placement_search::*};

mod game_state;
mod game_stats;
mod piece_buffer;
mod placement_search;
