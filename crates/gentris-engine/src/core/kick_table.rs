//! Wall kick offsets for the Super Rotation System.
//!
//! Offsets are `(dx, dy)` in board coordinates, so positive `dy` moves the
//! piece *down*. The unkicked `(0, 0)` attempt is not listed here; callers
//! try the bare rotation before consulting these tables.

use super::piece::{PieceKind, PieceRotation};

type Kicks = &'static [(i8, i8)];

// Indexed by `from` rotation. Each entry is the kick list for a clockwise
// (`CW`) or counterclockwise (`CCW`) quarter turn out of that state.
const JLSTZ_CW: [Kicks; 4] = [
    &[(-1, 0), (-1, -1), (0, 2), (-1, 2)], // 0 -> R
    &[(1, 0), (1, 1), (0, -2), (1, -2)],   // R -> 2
    &[(1, 0), (1, -1), (0, 2), (1, 2)],    // 2 -> L
    &[(-1, 0), (-1, 1), (0, -2), (-1, -2)], // L -> 0
];

const JLSTZ_CCW: [Kicks; 4] = [
    &[(1, 0), (1, -1), (0, 2), (1, 2)],     // 0 -> L
    &[(1, 0), (1, 1), (0, -2), (1, -2)],    // R -> 0
    &[(-1, 0), (-1, -1), (0, 2), (-1, 2)],  // 2 -> R
    &[(-1, 0), (-1, 1), (0, -2), (-1, -2)], // L -> 2
];

const I_CW: [Kicks; 4] = [
    &[(-2, 0), (1, 0), (-2, 1), (1, -2)], // 0 -> R
    &[(-1, 0), (2, 0), (-1, -2), (2, 1)], // R -> 2
    &[(2, 0), (-1, 0), (2, -1), (-1, 2)], // 2 -> L
    &[(1, 0), (-2, 0), (1, 2), (-2, -1)], // L -> 0
];

const I_CCW: [Kicks; 4] = [
    &[(-1, 0), (2, 0), (-1, -2), (2, 1)], // 0 -> L
    &[(2, 0), (-1, 0), (2, -1), (-1, 2)], // R -> 0
    &[(1, 0), (-2, 0), (1, 2), (-2, -1)], // 2 -> R
    &[(-2, 0), (1, 0), (-2, 1), (1, -2)], // L -> 2
];

const HALF_TURN: [Kicks; 4] = [
    &[(0, -1), (1, -1), (-1, -1), (1, 0), (-1, 0)], // 0 -> 2
    &[(1, 0), (1, -2), (1, -1), (0, -2), (0, -1)],  // R -> L
    &[(0, 1), (-1, 1), (1, 1), (-1, 0), (1, 0)],    // 2 -> 0
    &[(-1, 0), (-1, -2), (-1, -1), (0, -2), (0, -1)], // L -> R
];

/// Returns the ordered kick offsets to try when rotating `kind` from `from`
/// to `to`.
///
/// Identity rotations have no kicks. O pieces never need to move, so their
/// only "kick" is staying put.
///
/// ```
/// use gentris_engine::{PieceKind, PieceRotation, kicks};
///
/// let zero = PieceRotation::new(0);
/// assert_eq!(kicks(PieceKind::T, zero, zero.rotated_right())[0], (-1, 0));
/// assert!(kicks(PieceKind::T, zero, zero).is_empty());
/// ```
#[must_use]
pub fn kicks(kind: PieceKind, from: PieceRotation, to: PieceRotation) -> &'static [(i8, i8)] {
    let turns = (to.quarter_turns() + 4 - from.quarter_turns()) % 4;
    if turns == 0 {
        return &[];
    }
    if kind == PieceKind::O {
        return &[(0, 0)];
    }
    let from = from.as_usize();
    match (kind, turns) {
        (_, 2) => HALF_TURN[from],
        (PieceKind::I, 1) => I_CW[from],
        (PieceKind::I, _) => I_CCW[from],
        (_, 1) => JLSTZ_CW[from],
        (_, _) => JLSTZ_CCW[from],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        bit_board::BitBoard,
        piece::{Piece, PiecePosition},
    };

    #[test]
    fn test_kick_lists_are_inverse_pairs() {
        for kind in [PieceKind::T, PieceKind::I] {
            for from in PieceRotation::ALL {
                let to = from.rotated_right();
                let forward = kicks(kind, from, to);
                let backward = kicks(kind, to, from);
                assert_eq!(forward.len(), backward.len());
                for (f, b) in forward.iter().zip(backward) {
                    assert_eq!((f.0, f.1), (-b.0, -b.1), "{kind:?} {from} -> {to}");
                }
            }
        }
    }

    #[test]
    fn test_o_piece_kicks() {
        let zero = PieceRotation::default();
        assert_eq!(kicks(PieceKind::O, zero, zero.rotated_right()), &[(0, 0)]);
        assert!(kicks(PieceKind::O, zero, zero).is_empty());
    }

    #[test]
    fn test_half_turn_kicks_are_listed() {
        let zero = PieceRotation::default();
        let two = PieceRotation::new(2);
        assert_eq!(kicks(PieceKind::S, zero, two).len(), 5);
        assert_eq!(kicks(PieceKind::I, two, zero)[0], (0, 1));
    }

    #[test]
    fn test_kicks_are_tried_in_order() {
        // Unkicked T 0->R at anchor (4, 10) occupies (5,10), (5,11), (6,11), (5,12).
        // The first kick (-1, 0) hits (4,12); the second (-1, -1) lands clear.
        let board = BitBoard::from_ascii(
            r"
            ....##....
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ..........
            ",
        );
        assert!(board.is_occupied(4, 12));
        assert!(board.is_occupied(5, 12));
        let piece = Piece::with_position(PieceKind::T, PieceRotation::default(), PiecePosition::new(4, 10));
        assert!(!board.is_colliding(piece));

        let rotated = piece.super_rotated_right(&board).unwrap();
        assert_eq!(rotated.rotation(), PieceRotation::new(1));
        assert_eq!(rotated.position(), PiecePosition::new(3, 9));
    }

    #[test]
    fn test_rotation_fails_when_every_kick_collides() {
        let board = BitBoard::from_ascii(
            r"
            #########.
            #########.
            #########.
            #########.
            ",
        );
        let piece = Piece::with_position(PieceKind::I, PieceRotation::new(1), PiecePosition::new(7, 16));
        assert!(!board.is_colliding(piece));
        assert_eq!(piece.super_rotated_right(&board), None);
        assert_eq!(piece.super_rotated_left(&board), None);
    }
}
