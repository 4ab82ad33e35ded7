//! Core data structures: the board, pieces, and rotation kicks.
//!
//! - [`BitBoard`] - Bit-packed occupancy grid used for collision tests and line clears
//! - [`Piece`] - Immutable piece value (kind, rotation, position)
//! - [`kicks`] - Ordered wall kick offsets for each rotation transition

pub use self::{bit_board::*, kick_table::*, piece::*};

pub(crate) mod bit_board;
pub(crate) mod kick_table;
pub(crate) mod piece;
