//! Tetris rules and the placement search.
//!
//! The [`core`] module holds the board, piece shapes and the SRS kick
//! tables. The [`engine`] module plays games on top of them and enumerates
//! every placement a piece can reach.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece collides with the board")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StepError {
    #[display("placement is not reachable on the current board")]
    InvalidPlacement,
    #[display("game is already over")]
    GameOver,
}
