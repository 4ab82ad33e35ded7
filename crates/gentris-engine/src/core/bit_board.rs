use std::fmt::{self, Write as _};

use crate::core::piece::Piece;

/// Narrowest board that can hold every piece in every rotation.
pub const MIN_BOARD_WIDTH: usize = 4;
/// Widest board representable by a [`BitRow`].
pub const MAX_BOARD_WIDTH: usize = 32;
/// Smallest board height accepted by [`BitBoard::new`].
pub const MIN_BOARD_HEIGHT: usize = 4;

/// Single row in the bit board representation.
///
/// Bit `x` is set when column `x` is occupied. Bits at and above the board
/// width are always clear.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRow {
    bits: u32,
}

impl BitRow {
    pub const EMPTY: Self = Self { bits: 0 };

    #[inline]
    const fn full_mask(width: usize) -> u32 {
        if width >= MAX_BOARD_WIDTH {
            u32::MAX
        } else {
            (1 << width) - 1
        }
    }

    /// Checks if every cell of a `width`-wide row is occupied.
    #[inline]
    #[must_use]
    pub fn is_filled(self, width: usize) -> bool {
        let full = Self::full_mask(width);
        (self.bits & full) == full
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Checks if a cell at the given x-coordinate is occupied.
    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, x: usize) -> bool {
        x < MAX_BOARD_WIDTH && (self.bits & (1 << x)) != 0
    }

    #[inline]
    fn is_any_cell_occupied(self, bits: u32) -> bool {
        (self.bits & bits) != 0
    }

    #[inline]
    fn occupy_cells(&mut self, bits: u32) {
        self.bits |= bits;
    }

    /// Number of occupied cells in the row.
    #[inline]
    #[must_use]
    pub fn occupied_count(self) -> u32 {
        self.bits.count_ones()
    }

    /// Iterates over the first `width` cells of the row, left to right.
    #[inline]
    pub fn iter_cells(self, width: usize) -> impl Iterator<Item = bool> {
        (0..width).map(move |x| self.is_cell_occupied(x))
    }
}

/// Places one row of a piece mask at column `x0`.
///
/// Returns `None` if any occupied cell of the row would fall outside
/// `0..width`.
fn place_mask_row(mask: u16, x0: i32, width: usize) -> Option<u32> {
    if mask == 0 {
        return Some(0);
    }
    let mask = u32::from(mask);
    let lowest = i32::try_from(mask.trailing_zeros()).ok()?;
    let highest = 31 - i32::try_from(mask.leading_zeros()).ok()?;
    let width = i32::try_from(width).ok()?;
    if x0 + lowest < 0 || x0 + highest >= width {
        return None;
    }
    let bits = if x0 >= 0 {
        mask << x0.unsigned_abs()
    } else {
        mask >> x0.unsigned_abs()
    };
    Some(bits)
}

/// Fixed-size occupancy grid used for collision detection and line clearing.
///
/// Each row is stored as a `u32` bitmask ([`BitRow`]). Row `0` is the top of
/// the board and row `height - 1` rests on the floor.
///
/// Walls and floor are not stored as cells. Instead, [`Self::is_colliding`]
/// treats any piece cell left of column `0`, right of column `width - 1` or
/// below the last row as a collision. Cells above row `0` are allowed, which
/// lets a piece spawn or kick partially above the visible area while it is
/// still moving.
///
/// # Example
///
/// ```
/// use gentris_engine::BitBoard;
///
/// let mut board = BitBoard::from_ascii("#########.\n##########");
/// assert_eq!(board.completed_lines(), 1);
/// assert_eq!(board.clear_lines(), 1);
/// assert!(board.is_occupied(0, 19));
/// assert!(!board.is_occupied(9, 19));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitBoard {
    width: usize,
    height: usize,
    rows: Vec<BitRow>,
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::standard()
    }
}

impl BitBoard {
    pub const STANDARD_WIDTH: usize = 10;
    pub const STANDARD_HEIGHT: usize = 20;

    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if `width` is outside `MIN_BOARD_WIDTH..=MAX_BOARD_WIDTH` or
    /// `height` is smaller than `MIN_BOARD_HEIGHT`.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            (MIN_BOARD_WIDTH..=MAX_BOARD_WIDTH).contains(&width),
            "board width must be in {MIN_BOARD_WIDTH}..={MAX_BOARD_WIDTH}, got {width}"
        );
        assert!(
            height >= MIN_BOARD_HEIGHT,
            "board height must be at least {MIN_BOARD_HEIGHT}, got {height}"
        );
        Self {
            width,
            height,
            rows: vec![BitRow::EMPTY; height],
        }
    }

    /// Creates an empty 10×20 board.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Self::STANDARD_WIDTH, Self::STANDARD_HEIGHT)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn row(&self, y: usize) -> BitRow {
        self.rows[y]
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = BitRow> + '_ {
        self.rows.iter().copied()
    }

    /// Checks if the cell at column `x`, row `y` is occupied.
    ///
    /// Cells outside the board read as empty.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width && self.rows.get(y).is_some_and(|row| row.is_cell_occupied(x))
    }

    /// Checks if the piece hits a wall, the floor or an occupied cell.
    #[must_use]
    pub fn is_colliding(&self, piece: Piece) -> bool {
        let x0 = piece.position().x();
        let y0 = piece.position().y();
        for (dy, mask) in (0..).zip(piece.mask()) {
            if mask == 0 {
                continue;
            }
            let Some(bits) = place_mask_row(mask, x0, self.width) else {
                return true;
            };
            let Ok(y) = usize::try_from(y0 + dy) else {
                // above the visible area: only the walls matter
                continue;
            };
            match self.rows.get(y) {
                Some(row) if !row.is_any_cell_occupied(bits) => {}
                _ => return true,
            }
        }
        false
    }

    /// Checks if every cell of the piece lies inside the visible area.
    #[must_use]
    pub fn contains_piece(&self, piece: Piece) -> bool {
        piece.occupied_positions().all(|(x, y)| {
            usize::try_from(x).is_ok_and(|x| x < self.width)
                && usize::try_from(y).is_ok_and(|y| y < self.height)
        })
    }

    /// Locks a piece onto the board by setting its occupied cells.
    ///
    /// Cells outside the visible area are dropped. Callers are expected to
    /// check [`Self::is_colliding`] and [`Self::contains_piece`] first.
    pub fn fill_piece(&mut self, piece: Piece) {
        debug_assert!(!self.is_colliding(piece));
        let x0 = piece.position().x();
        let y0 = piece.position().y();
        for (dy, mask) in (0..).zip(piece.mask()) {
            let Some(bits) = place_mask_row(mask, x0, self.width) else {
                continue;
            };
            let Ok(y) = usize::try_from(y0 + dy) else {
                continue;
            };
            if let Some(row) = self.rows.get_mut(y) {
                row.occupy_cells(bits);
            }
        }
    }

    /// Number of rows whose cells are all occupied.
    #[must_use]
    pub fn completed_lines(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.is_filled(self.width))
            .count()
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Rows above a cleared line move down; empty rows are inserted at the top.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;

        for y in (0..self.height).rev() {
            if self.rows[y].is_filled(self.width) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }

        self.rows[..count].fill(BitRow::EMPTY);
        count
    }

    /// Creates a board from ASCII art for testing and fixtures.
    ///
    /// `#` is an occupied cell, `.` an empty one. The width is taken from the
    /// first non-blank line and the height is [`Self::STANDARD_HEIGHT`]. The
    /// given rows are aligned to the *bottom* of the board, so a fixture only
    /// needs to spell out the rows it cares about.
    ///
    /// # Panics
    ///
    /// Panics if rows have different widths or there are more rows than fit.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<Vec<bool>> = art
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| *c == '#' || *c == '.')
                    .map(|c| c == '#')
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();
        let width = lines.first().map_or(Self::STANDARD_WIDTH, Vec::len);
        let mut board = Self::new(width, Self::STANDARD_HEIGHT);
        assert!(
            lines.len() <= board.height,
            "at most {} rows fit, got {}",
            board.height,
            lines.len()
        );

        let top = board.height - lines.len();
        for (y, cells) in (top..).zip(&lines) {
            assert_eq!(
                cells.len(),
                width,
                "each row must have exactly {width} cells, got {} at row {y}",
                cells.len()
            );
            for (x, _) in cells.iter().enumerate().filter(|(_, occupied)| **occupied) {
                board.rows[y].occupy_cells(1 << x);
            }
        }
        board
    }
}

/// Renders the board in the [`BitBoard::from_ascii`] format, one line per row.
impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for occupied in row.iter_cells(self.width) {
                f.write_char(if occupied { '#' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
