use crate::{
    StepError,
    core::{
        bit_board::BitBoard,
        piece::{Piece, PieceKind, PiecePosition, PieceRotation, SPAWN_ROW},
    },
};

use super::{
    game_stats::GameStats,
    piece_buffer::{PieceBuffer, PieceSeed},
    placement_search::Placement,
};

/// Number of upcoming pieces exposed through [`GameState::preview`].
pub const PREVIEW_LEN: usize = 5;

/// A single game: board, falling piece, piece queue and score.
///
/// A game ends when a freshly spawned piece collides or when an invalid
/// placement is submitted. Once over, the state no longer changes.
///
/// # Example
///
/// ```
/// use gentris_engine::{GameState, PieceRotation, PieceSeed};
///
/// let mut game = GameState::with_seed(PieceSeed::from_u64(1));
/// let column = game.current_piece().position().x();
/// let score = game.step(column, PieceRotation::default(), false);
///
/// assert_eq!(score, 0);
/// assert_eq!(game.stats().completed_pieces(), 1);
/// assert!(!game.is_game_over());
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    board: BitBoard,
    current: Piece,
    pieces: PieceBuffer,
    stats: GameStats,
    is_game_over: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Starts a game on a standard board with a random piece sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(BitBoard::standard(), PieceBuffer::new())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_board(BitBoard::standard(), PieceBuffer::with_seed(seed))
    }

    /// Starts a game from an arbitrary board and piece queue.
    ///
    /// The game is over immediately if the first piece cannot spawn.
    #[must_use]
    pub fn with_board(board: BitBoard, mut pieces: PieceBuffer) -> Self {
        let current = Piece::spawn(pieces.pop_next(), board.width());
        let is_game_over = board.is_colliding(current);
        Self {
            board,
            current,
            pieces,
            stats: GameStats::new(),
            is_game_over,
        }
    }

    #[must_use]
    pub fn board(&self) -> &BitBoard {
        &self.board
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// The falling piece, at its spawn position.
    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.current
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.pieces.held_piece()
    }

    /// The next [`PREVIEW_LEN`] pieces of the queue.
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pieces.preview(PREVIEW_LEN)
    }

    /// The piece that would be played if hold were used this turn.
    #[must_use]
    pub fn hold_candidate(&self) -> PieceKind {
        self.pieces.peek_hold_result()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// Drops a piece straight down from the spawn row and locks it.
    ///
    /// `column` is the anchor column of the piece's bounding matrix and may
    /// be negative for rotations with empty left columns. With `use_hold`
    /// the hold candidate is played and the current piece goes to hold.
    ///
    /// An invalid combination ends the game.
    pub fn try_step(
        &mut self,
        column: i32,
        rotation: PieceRotation,
        use_hold: bool,
    ) -> Result<usize, StepError> {
        if self.is_game_over {
            return Err(StepError::GameOver);
        }
        let kind = self.playable_kind(use_hold);
        let piece = Piece::with_position(kind, rotation, PiecePosition::new(column, SPAWN_ROW));
        if self.board.is_colliding(piece) {
            return Err(self.reject());
        }
        let landed = piece.simulate_drop_position(&self.board);
        if !self.board.contains_piece(landed) {
            return Err(self.reject());
        }
        self.lock(landed, use_hold);
        Ok(self.score())
    }

    /// Like [`Self::try_step`], but reports failures only through
    /// [`Self::is_game_over`] and always returns the current score.
    pub fn step(&mut self, column: i32, rotation: PieceRotation, use_hold: bool) -> usize {
        self.try_step(column, rotation, use_hold)
            .unwrap_or_else(|_| self.score())
    }

    /// Locks a placement produced by the placement search.
    ///
    /// The placement must belong to this turn: its piece kind has to match
    /// the current piece (or the hold candidate when `use_hold` is set) and
    /// its position must be a resting spot on the current board.
    pub fn apply(&mut self, placement: &Placement) -> Result<usize, StepError> {
        if self.is_game_over {
            return Err(StepError::GameOver);
        }
        let piece = placement.piece();
        let valid = piece.kind() == self.playable_kind(placement.use_hold())
            && self.board.contains_piece(piece)
            && !self.board.is_colliding(piece)
            && piece.is_resting(&self.board);
        if !valid {
            return Err(self.reject());
        }
        self.lock(piece, placement.use_hold());
        Ok(self.score())
    }

    fn playable_kind(&self, use_hold: bool) -> PieceKind {
        if use_hold {
            self.hold_candidate()
        } else {
            self.current.kind()
        }
    }

    fn reject(&mut self) -> StepError {
        self.is_game_over = true;
        StepError::InvalidPlacement
    }

    fn lock(&mut self, piece: Piece, use_hold: bool) {
        if use_hold {
            let played = self.pieces.hold(self.current.kind());
            debug_assert_eq!(played, piece.kind());
        }
        self.board.fill_piece(piece);
        let cleared_lines = self.board.clear_lines();
        self.stats.complete_piece_drop(cleared_lines);

        self.current = Piece::spawn(self.pieces.pop_next(), self.board.width());
        if self.board.is_colliding(self.current) {
            self.is_game_over = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_on(art: &str, seed: u64) -> GameState {
        GameState::with_board(BitBoard::from_ascii(art), PieceBuffer::with_seed(PieceSeed::from_u64(seed)))
    }

    #[test]
    fn test_step_drops_to_floor() {
        let mut game = GameState::with_seed(PieceSeed::from_u64(5));
        let next = game.preview().next().unwrap();
        game.step(0, PieceRotation::default(), false);

        assert!(!game.is_game_over());
        assert_eq!(game.board().rows().map(|row| row.occupied_count()).sum::<u32>(), 4);
        assert!(game.board().rows().take(16).all(|row| row.is_empty()));
        assert_eq!(game.current_piece().kind(), next);
        assert_eq!(game.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_invalid_column_ends_game_without_scoring() {
        let mut game = GameState::with_seed(PieceSeed::from_u64(6));
        let score = game.step(12, PieceRotation::default(), false);
        assert_eq!(score, 0);
        assert!(game.is_game_over());
        assert_eq!(game.stats().completed_pieces(), 0);
        assert!(matches!(
            game.try_step(0, PieceRotation::default(), false),
            Err(StepError::GameOver)
        ));
    }

    #[test]
    fn test_first_hold_draws_from_queue() {
        let mut game = GameState::with_seed(PieceSeed::from_u64(7));
        let current = game.current_piece().kind();
        let candidate = game.hold_candidate();
        assert_eq!(Some(candidate), game.preview().next());

        game.step(0, PieceRotation::new(1), true);
        assert_eq!(game.held_piece(), Some(current));
        assert_eq!(game.hold_candidate(), current);
    }

    #[test]
    fn test_line_clear_updates_score() {
        // Only the bottom row is occupied, with a gap a flat I fills.
        let mut game = game_on(
            r"
            ####....##
            ",
            0,
        );
        for _ in 0..PieceKind::LEN {
            if game.current_piece().kind() == PieceKind::I {
                break;
            }
            if game.hold_candidate() == PieceKind::I {
                assert_eq!(game.step(4, PieceRotation::default(), true), 40);
                return;
            }
            // Stand other pieces up on the far left, away from the gap.
            game.step(0, PieceRotation::new(1), false);
            assert!(!game.is_game_over());
        }
        assert_eq!(game.current_piece().kind(), PieceKind::I);
        let score = game.step(4, PieceRotation::default(), false);
        assert_eq!(score, 40);
        assert_eq!(game.stats().total_cleared_lines(), 1);
    }

    #[test]
    fn test_blocked_spawn_is_game_over() {
        let game = game_on(
            r"
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ###.######
            ",
            1,
        );
        assert!(game.is_game_over());
    }
}
