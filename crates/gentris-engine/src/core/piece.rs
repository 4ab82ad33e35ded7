use std::fmt;

use serde::{Deserialize, Serialize};

use super::{bit_board::BitBoard, kick_table};

/// Row of the bounding matrix's top edge when a piece enters the board.
pub const SPAWN_ROW: i32 = 0;

/// A Tetris piece (tetromino) with position, rotation, and type.
///
/// Pieces are immutable values: movement and rotation return new `Piece`
/// instances and never touch shared shape data.
///
/// # Coordinate System
///
/// - The position is the top-left corner of the piece's bounding matrix
///   (4×4 for I, 2×2 for O, 3×3 for the rest)
/// - X grows rightward (columns), Y grows downward (rows)
/// - Coordinates are signed: a moving piece may sit partly left of the
///   board or above it as long as its occupied cells stay inside the walls
///
/// # Example
///
/// ```
/// use gentris_engine::{BitBoard, Piece, PieceKind};
///
/// let board = BitBoard::standard();
/// let piece = Piece::spawn(PieceKind::T, board.width());
/// let rotated = piece.left().super_rotated_right(&board).unwrap();
/// let landed = rotated.simulate_drop_position(&board);
/// assert!(landed.is_resting(&board));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl fmt::Display for Piece {
    // Format: "kind#rotation@x,y" (e.g., "S#R@4,18")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation,
            self.position.x,
            self.position.y
        )
    }
}

impl Piece {
    /// Creates a piece in spawn orientation at the top of a `board_width`-wide
    /// board, horizontally centered.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let x = board_width.saturating_sub(kind.matrix_size()) / 2;
        Self {
            position: PiecePosition::new(i32::try_from(x).unwrap_or(0), SPAWN_ROW),
            rotation: PieceRotation::default(),
            kind,
        }
    }

    #[must_use]
    pub const fn with_position(
        kind: PieceKind,
        rotation: PieceRotation,
        position: PiecePosition,
    ) -> Self {
        Self {
            position,
            rotation,
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn mask(&self) -> PieceMask {
        self.kind.mask(self.rotation)
    }

    /// Board coordinates of the four occupied cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .occupied_positions(self.rotation)
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    /// Number of empty columns on the left side of the bounding matrix.
    ///
    /// A piece may legally sit at any column down to `-left_overhang()`.
    #[must_use]
    pub fn left_overhang(&self) -> i32 {
        self.mask()
            .into_iter()
            .filter(|row| *row != 0)
            .map(u16::trailing_zeros)
            .min()
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0)
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: PiecePosition::new(self.position.x + dx, self.position.y + dy),
            ..*self
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.shifted(0, 1)
    }

    #[must_use]
    pub fn with_rotation(&self, rotation: PieceRotation) -> Self {
        Self { rotation, ..*self }
    }

    #[must_use]
    pub fn super_rotated_left(self, board: &BitBoard) -> Option<Self> {
        self.super_rotated(board, self.rotation.rotated_left())
    }

    #[must_use]
    pub fn super_rotated_right(self, board: &BitBoard) -> Option<Self> {
        self.super_rotated(board, self.rotation.rotated_right())
    }

    /// Attempts to rotate into `target`, falling back to the kick table.
    ///
    /// The bare rotation at the current position is tried first. If it
    /// collides, each offset from [`kick_table::kicks`] is tried in order and
    /// the first one that fits is returned. `None` means every candidate
    /// collided and the piece stays where it was.
    #[must_use]
    pub fn super_rotated(self, board: &BitBoard, target: PieceRotation) -> Option<Self> {
        let rotated = self.with_rotation(target);
        if !board.is_colliding(rotated) {
            return Some(rotated);
        }
        kick_table::kicks(self.kind, self.rotation, target)
            .iter()
            .map(|&(dx, dy)| rotated.shifted(dx.into(), dy.into()))
            .find(|kicked| !board.is_colliding(*kicked))
    }

    /// Checks if moving one row down would collide.
    #[must_use]
    pub fn is_resting(&self, board: &BitBoard) -> bool {
        board.is_colliding(self.down())
    }

    /// Drops the piece straight down until it rests.
    #[must_use]
    pub fn simulate_drop_position(&self, board: &BitBoard) -> Self {
        let mut dropped = *self;
        while !dropped.is_resting(board) {
            dropped = dropped.down();
        }
        dropped
    }
}

/// Position of a piece's bounding matrix on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }
}

/// Rotation state of a piece.
///
/// Represents one of four rotation states, counted in clockwise quarter
/// turns from spawn:
///
/// - `0`: spawn orientation
/// - `R`: 90° clockwise
/// - `2`: 180°
/// - `L`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceRotation(u8);

impl fmt::Display for PieceRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self.0 {
            0 => "0",
            1 => "R",
            2 => "2",
            _ => "L",
        };
        f.write_str(s)
    }
}

impl PieceRotation {
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    /// Creates a rotation from a number of clockwise quarter turns (mod 4).
    #[must_use]
    pub const fn new(quarter_turns: u8) -> Self {
        Self(quarter_turns % 4)
    }

    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub fn rotated_left(self) -> Self {
        PieceRotation((self.0 + 3) % 4)
    }

    pub(crate) const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Side length of the piece's bounding matrix.
    #[must_use]
    pub const fn matrix_size(self) -> usize {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            _ => 3,
        }
    }

    pub(crate) fn mask(self, rotation: PieceRotation) -> PieceMask {
        PIECE_MASKS[self as usize][rotation.as_usize()]
    }

    /// Returns an iterator of occupied cells within the bounding matrix.
    pub fn occupied_positions(self, rotation: PieceRotation) -> impl Iterator<Item = (i32, i32)> {
        let mask = self.mask(rotation);
        (0..).zip(mask).flat_map(|(dy, row)| {
            (0..4)
                .filter(move |&dx| (row >> dx) & 1 != 0)
                .map(move |dx| (dx, dy))
        })
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use gentris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }
}

/// Bitmask representation of a piece within a 4×4 bounding box.
///
/// Element `y` is row `y` of the matrix; bit `x` of that row is column `x`.
pub type PieceMask = [u16; 4];

/// Rotates the first `size`×`size` cells of a mask 90° clockwise.
const fn rotate_mask_right(size: usize, mask: PieceMask) -> PieceMask {
    let mut rotated = [0; 4];
    let mut y = 0;
    while y < size {
        let mut x = 0;
        while x < size {
            if (mask[size - 1 - x] >> y) & 1 != 0 {
                rotated[y] |= 1 << x;
            }
            x += 1;
        }
        y += 1;
    }
    rotated
}

/// Generates all 4 rotation states of a piece mask by rotating 90° clockwise.
const fn mask_rotations(size: usize, mask: PieceMask) -> [PieceMask; 4] {
    let mut rotates = [mask; 4];
    let mut i = 1;
    while i < 4 {
        rotates[i] = rotate_mask_right(size, rotates[i - 1]);
        i += 1;
    }
    rotates
}

const BASE_MASKS: [PieceMask; PieceKind::LEN] = {
    const fn m(bits: [bool; 4]) -> u16 {
        let mut mask = 0;
        let mut i = 0;
        while i < 4 {
            if bits[i] {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }

    const C: bool = true;
    const E: bool = false;
    const EEEE: u16 = m([E; 4]);

    [
        // I-piece
        [EEEE, m([C, C, C, C]), EEEE, EEEE],
        // O-piece
        [m([C, C, E, E]), m([C, C, E, E]), EEEE, EEEE],
        // S-piece
        [m([E, C, C, E]), m([C, C, E, E]), EEEE, EEEE],
        // Z-piece
        [m([C, C, E, E]), m([E, C, C, E]), EEEE, EEEE],
        // J-piece
        [m([C, E, E, E]), m([C, C, C, E]), EEEE, EEEE],
        // L-piece
        [m([E, E, C, E]), m([C, C, C, E]), EEEE, EEEE],
        // T-piece
        [m([E, C, E, E]), m([C, C, C, E]), EEEE, EEEE],
    ]
};

const PIECE_MASKS: [[PieceMask; 4]; PieceKind::LEN] = {
    let mut masks = [[[0; 4]; 4]; PieceKind::LEN];
    let mut i = 0;
    while i < PieceKind::LEN {
        masks[i] = mask_rotations(PieceKind::ALL[i].matrix_size(), BASE_MASKS[i]);
        i += 1;
    }
    masks
};

/// Rotates the spawn shape of `kind` clockwise by `rotation` quarter turns.
///
/// The result is recomputed from the base shape on every call.
///
/// ```
/// use gentris_engine::{PieceKind, PieceRotation, rotate};
///
/// let spawn = rotate(PieceKind::S, PieceRotation::new(0));
/// assert_eq!(rotate(PieceKind::S, PieceRotation::new(4)), spawn);
/// ```
#[must_use]
pub fn rotate(kind: PieceKind, rotation: PieceRotation) -> PieceMask {
    let size = kind.matrix_size();
    let mut mask = BASE_MASKS[kind as usize];
    for _ in 0..rotation.quarter_turns() {
        mask = rotate_mask_right(size, mask);
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(kind: PieceKind, rotation: u8) -> Vec<(i32, i32)> {
        kind.occupied_positions(PieceRotation::new(rotation)).collect()
    }

    #[test]
    fn test_every_rotation_has_four_cells() {
        for kind in PieceKind::ALL {
            for rotation in PieceRotation::ALL {
                assert_eq!(kind.occupied_positions(rotation).count(), 4, "{kind:?} {rotation}");
            }
        }
    }

    #[test]
    fn test_four_quarter_turns_is_identity() {
        for kind in PieceKind::ALL {
            let base = BASE_MASKS[kind as usize];
            let mut mask = base;
            for _ in 0..4 {
                mask = rotate_mask_right(kind.matrix_size(), mask);
            }
            assert_eq!(mask, base, "{kind:?}");
            assert_eq!(rotate(kind, PieceRotation::new(4)), base);
        }
    }

    #[test]
    fn test_rotate_matches_precomputed_table() {
        for kind in PieceKind::ALL {
            for rotation in PieceRotation::ALL {
                assert_eq!(rotate(kind, rotation), kind.mask(rotation));
            }
        }
    }

    #[test]
    fn test_t_piece_rotations() {
        assert_eq!(cells(PieceKind::T, 0), vec![(1, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(cells(PieceKind::T, 1), vec![(1, 0), (1, 1), (2, 1), (1, 2)]);
        assert_eq!(cells(PieceKind::T, 2), vec![(0, 1), (1, 1), (2, 1), (1, 2)]);
        assert_eq!(cells(PieceKind::T, 3), vec![(1, 0), (0, 1), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_i_piece_rotations() {
        assert_eq!(cells(PieceKind::I, 0), vec![(0, 1), (1, 1), (2, 1), (3, 1)]);
        assert_eq!(cells(PieceKind::I, 1), vec![(2, 0), (2, 1), (2, 2), (2, 3)]);
        assert_eq!(cells(PieceKind::I, 2), vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(cells(PieceKind::I, 3), vec![(1, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_o_piece_does_not_change_on_rotation() {
        for rotation in PieceRotation::ALL {
            assert_eq!(PieceKind::O.mask(rotation), BASE_MASKS[PieceKind::O as usize]);
        }
    }

    #[test]
    fn test_rotation_wraps_around() {
        assert_eq!(PieceRotation::new(5), PieceRotation::new(1));
        assert_eq!(PieceRotation::default().rotated_left(), PieceRotation::new(3));
        assert_eq!(PieceRotation::new(3).rotated_right(), PieceRotation::default());
        let labels: Vec<String> = PieceRotation::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["0", "R", "2", "L"]);
    }

    #[test]
    fn test_spawn_is_centered() {
        assert_eq!(Piece::spawn(PieceKind::T, 10).position(), PiecePosition::new(3, 0));
        assert_eq!(Piece::spawn(PieceKind::I, 10).position(), PiecePosition::new(3, 0));
        assert_eq!(Piece::spawn(PieceKind::O, 10).position(), PiecePosition::new(4, 0));
    }

    #[test]
    fn test_left_overhang() {
        let vertical_i = Piece::with_position(PieceKind::I, PieceRotation::new(1), PiecePosition::new(0, 0));
        assert_eq!(vertical_i.left_overhang(), 2);
        let t_right = Piece::with_position(PieceKind::T, PieceRotation::new(1), PiecePosition::new(0, 0));
        assert_eq!(t_right.left_overhang(), 1);
        let o = Piece::with_position(PieceKind::O, PieceRotation::new(0), PiecePosition::new(0, 0));
        assert_eq!(o.left_overhang(), 0);
    }

    #[test]
    fn test_simulate_drop_position() {
        let board = BitBoard::from_ascii(
            r"
            ..#.......
            ..........
            ",
        );
        let piece = Piece::spawn(PieceKind::O, board.width()).shifted(-2, 0);
        let dropped = piece.simulate_drop_position(&board);
        assert_eq!(dropped.position(), PiecePosition::new(2, 16));
        assert!(dropped.is_resting(&board));
    }

    #[test]
    fn test_display() {
        let piece = Piece::with_position(PieceKind::S, PieceRotation::new(1), PiecePosition::new(-1, 18));
        assert_eq!(piece.to_string(), "S#R@-1,18");
    }
}
