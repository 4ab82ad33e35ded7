use serde::Serialize;

/// Points awarded for clearing 0, 1, 2, 3 or 4 rows with a single piece.
pub const SCORE_TABLE: [usize; 5] = [0, 40, 100, 300, 1200];

/// Running totals for one game.
///
/// # Example
///
/// ```
/// use gentris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
/// stats.complete_piece_drop(1);
///
/// assert_eq!(stats.score(), 1240);
/// assert_eq!(stats.total_cleared_lines(), 5);
/// assert_eq!(stats.line_cleared_counter(), &[0, 1, 0, 0, 1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Number of pieces locked so far.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of locks by rows cleared; index `n` counts `n`-row clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records one lock that cleared `cleared_lines` rows.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        let index = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[index] += 1;
        self.score += SCORE_TABLE[index];
    }
}
