//! Column-height based board metrics.
//!
//! All metrics are derived from one pass over the board that records each
//! column's height and occupied-cell count.

use std::iter;

use arrayvec::ArrayVec;
use gentris_engine::{BitBoard, MAX_BOARD_WIDTH};

use crate::heuristic::WELL_DEPTH;

type ColumnValues = ArrayVec<u8, MAX_BOARD_WIDTH>;

#[derive(Debug, Clone)]
pub struct BoardAnalysis {
    column_heights: ColumnValues,
    column_occupied_cells: ColumnValues,
    completed_lines: usize,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &BitBoard) -> Self {
        let mut column_heights = ColumnValues::new();
        let mut column_occupied_cells = ColumnValues::new();
        for x in 0..board.width() {
            let top = board.rows().position(|row| row.is_cell_occupied(x));
            let height = top.map_or(0, |y| board.height() - y);
            let occupied = board.rows().filter(|row| row.is_cell_occupied(x)).count();
            column_heights.push(u8::try_from(height).unwrap_or(u8::MAX));
            column_occupied_cells.push(u8::try_from(occupied).unwrap_or(u8::MAX));
        }
        Self {
            column_heights,
            column_occupied_cells,
            completed_lines: board.completed_lines(),
        }
    }

    /// Distance from the floor to the topmost occupied cell of each column.
    #[must_use]
    pub fn column_heights(&self) -> &[u8] {
        &self.column_heights
    }

    #[must_use]
    pub fn aggregate_height(&self) -> u32 {
        self.column_heights.iter().copied().map(u32::from).sum()
    }

    #[must_use]
    pub fn holes(&self) -> u32 {
        iter::zip(&self.column_heights, &self.column_occupied_cells)
            .map(|(h, occupied)| u32::from(h - occupied))
            .sum()
    }

    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        self.column_heights
            .windows(2)
            .map(|w| i32::from(w[0]).abs_diff(i32::from(w[1])))
            .sum()
    }

    /// Columns whose neighbours are both at least [`WELL_DEPTH`] taller.
    ///
    /// A wall counts as a neighbour that is always tall enough.
    #[must_use]
    pub fn wells(&self) -> u32 {
        let heights = &self.column_heights;
        let deep_below = |neighbour: Option<&u8>, h: u8| {
            neighbour.is_none_or(|n| n.saturating_sub(h) >= WELL_DEPTH)
        };
        let count = (0..heights.len())
            .filter(|&x| {
                let h = heights[x];
                let left = x.checked_sub(1).and_then(|l| heights.get(l));
                deep_below(left, h) && deep_below(heights.get(x + 1), h)
            })
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Fully occupied rows, counted before clearing.
    #[must_use]
    pub fn completed_lines(&self) -> usize {
        self.completed_lines
    }

    /// `Σ (h - threshold)^exponent` over columns taller than `threshold`.
    #[must_use]
    pub fn height_penalty(&self, threshold: u8, exponent: f32) -> f32 {
        self.column_heights
            .iter()
            .filter(|h| **h > threshold)
            .map(|h| f32::from(h - threshold).powf(exponent))
            .sum()
    }
}
