use std::collections::{HashSet, VecDeque};

use crate::{
    PieceCollisionError,
    core::{
        bit_board::BitBoard,
        piece::{Piece, PieceKind, PiecePosition, PieceRotation},
    },
};

use super::game_state::GameState;

/// How the placement search explores the move graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SearchMode {
    /// Breadth-first search over shifts, soft drops and kicked rotations.
    #[default]
    Full,
    /// One straight drop per (rotation, column) from the spawn row.
    StraightDrop,
}

/// A final resting position for this turn's piece.
///
/// Carries the board as it looks right after the piece locks, before any
/// completed rows are cleared, so evaluators can still see them.
#[derive(Debug, Clone)]
pub struct Placement {
    piece: Piece,
    use_hold: bool,
    board: BitBoard,
}

impl Placement {
    /// Locks `piece` into a copy of `board`.
    pub fn new(board: &BitBoard, piece: Piece, use_hold: bool) -> Result<Self, PieceCollisionError> {
        if board.is_colliding(piece) || !board.contains_piece(piece) {
            return Err(PieceCollisionError);
        }
        Ok(Self::locked(board, piece, use_hold))
    }

    fn locked(board: &BitBoard, piece: Piece, use_hold: bool) -> Self {
        let mut board = board.clone();
        board.fill_piece(piece);
        Self {
            piece,
            use_hold,
            board,
        }
    }

    #[must_use]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// Anchor column of the locked piece.
    #[must_use]
    pub fn column(&self) -> i32 {
        self.piece.position().x()
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.piece.rotation()
    }

    #[must_use]
    pub fn use_hold(&self) -> bool {
        self.use_hold
    }

    /// The board with the piece locked and no rows cleared yet.
    #[must_use]
    pub fn board(&self) -> &BitBoard {
        &self.board
    }
}

/// Every valid (rotation, column) state at the spawn row of `piece`.
fn spawn_row_states(board: &BitBoard, piece: Piece) -> impl Iterator<Item = Piece> + '_ {
    let width = i32::try_from(board.width()).unwrap_or(i32::MAX);
    let row = piece.position().y();
    PieceRotation::ALL.into_iter().flat_map(move |rotation| {
        let template = Piece::with_position(piece.kind(), rotation, PiecePosition::new(0, row));
        (-template.left_overhang()..width)
            .map(move |x| template.shifted(x, 0))
            .filter(|candidate| !board.is_colliding(*candidate))
    })
}

/// Enumerates every terminal position reachable from `piece`.
///
/// Breadth-first search over the exact (column, row, rotation) states,
/// moving by one-cell shifts left, right and down and by kicked rotations
/// in both directions. A state is terminal when it cannot move down; it is
/// reported once, but the search keeps expanding from it so that tucks and
/// spins under overhangs are found.
///
/// The search is seeded with the spawn state and every other valid
/// (rotation, column) pair on the spawn row, the same starting points
/// [`GameState::step`] accepts, so the result always contains every
/// placement of [`straight_drop_placements`].
///
/// Returns nothing when `piece` itself collides.
///
/// ```
/// use gentris_engine::{BitBoard, Piece, PieceKind, enumerate_terminal_placements};
///
/// let board = BitBoard::standard();
/// let placements = enumerate_terminal_placements(&board, Piece::spawn(PieceKind::O, board.width()));
/// assert_eq!(placements.len(), 4 * 9);
/// ```
#[must_use]
pub fn enumerate_terminal_placements(board: &BitBoard, piece: Piece) -> Vec<Piece> {
    if board.is_colliding(piece) {
        return vec![];
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    for start in std::iter::once(piece).chain(spawn_row_states(board, piece)) {
        if visited.insert(start) {
            queue.push_back(start);
        }
    }

    let mut terminals = vec![];
    while let Some(state) = queue.pop_front() {
        let down = state.down();
        if board.is_colliding(down) {
            if board.contains_piece(state) {
                terminals.push(state);
            }
        } else if visited.insert(down) {
            queue.push_back(down);
        }

        let shifts = [state.left(), state.right()]
            .into_iter()
            .filter(|next| !board.is_colliding(*next));
        let rotations = [
            state.super_rotated_left(board),
            state.super_rotated_right(board),
        ]
        .into_iter()
        .flatten();
        for next in shifts.chain(rotations) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    terminals
}

/// Drops `kind` straight down from every valid (rotation, column) start on
/// the spawn row.
#[must_use]
pub fn straight_drop_placements(board: &BitBoard, kind: PieceKind) -> Vec<Piece> {
    spawn_row_states(board, Piece::spawn(kind, board.width()))
        .map(|start| start.simulate_drop_position(board))
        .filter(|landed| board.contains_piece(*landed))
        .collect()
}

/// Terminal positions for `kind` spawned on `board`, using `mode`.
#[must_use]
pub fn search_placements(board: &BitBoard, kind: PieceKind, mode: SearchMode) -> Vec<Piece> {
    match mode {
        SearchMode::Full => enumerate_terminal_placements(board, Piece::spawn(kind, board.width())),
        SearchMode::StraightDrop => straight_drop_placements(board, kind),
    }
}

/// Every placement available this turn: the current piece first, then the
/// hold candidate (tagged with `use_hold`).
#[must_use]
pub fn candidate_placements(state: &GameState, mode: SearchMode) -> Vec<Placement> {
    if state.is_game_over() {
        return vec![];
    }
    let board = state.board();
    [(state.current_piece().kind(), false), (state.hold_candidate(), true)]
        .into_iter()
        .flat_map(|(kind, use_hold)| {
            search_placements(board, kind, mode)
                .into_iter()
                .map(move |piece| Placement::locked(board, piece, use_hold))
        })
        .collect()
}
