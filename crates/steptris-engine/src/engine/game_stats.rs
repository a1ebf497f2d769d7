use super::config::ScoringMode;

/// Points added per cell of soft drop in guideline scoring.
pub const SOFT_DROP_POINTS: usize = 1;
/// Points added per cell of hard drop in guideline scoring.
pub const HARD_DROP_POINTS: usize = 2;

const COMBO_BONUS: usize = 50;
const TETRIS_POINTS: usize = 800;
const BACK_TO_BACK_TETRIS_BONUS: usize = 1200;

/// Game statistics tracking score, combo and line clears.
///
/// # Guideline scoring
///
/// For a lock clearing `n > 0` lines:
///
/// - the combo bonus `50 × combo` is added using the combo *before* this lock,
///   then the combo grows by one;
/// - 1 to 3 lines add `200 × n − 100` and break a back-to-back tetris chain;
/// - 4 lines add 800, plus 1200 when the previous clear was also a tetris.
///
/// A lock clearing nothing resets the combo.
///
/// # Lines-only scoring
///
/// Each lock adds the number of cleared lines. Combo, max combo and the
/// back-to-back flag are not tracked in this mode and stay at zero/false.
///
/// Line totals and the per-size histogram are kept in both modes.
///
/// # Example
///
/// ```
/// use steptris_engine::{GameStats, ScoringMode};
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4, ScoringMode::Guideline);
/// assert_eq!(stats.score(), 800);
///
/// stats.complete_piece_drop(4, ScoringMode::Guideline);
/// assert_eq!(stats.score(), 800 + 50 + 1200 + 800);
/// assert!(stats.back_to_back_tetris());
/// assert_eq!(stats.line_cleared_counter(), &[0, 0, 0, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    combo: usize,
    max_combo: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 4],
    back_to_back_tetris: bool,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            combo: 0,
            max_combo: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 4],
            back_to_back_tetris: false,
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the number of consecutive locks that cleared at least one line.
    #[must_use]
    pub const fn combo(&self) -> usize {
        self.combo
    }

    #[must_use]
    pub const fn max_combo(&self) -> usize {
        self.max_combo
    }

    /// Returns the total number of lines cleared across all line clears.
    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of line clears by size.
    ///
    /// Index `k` counts the locks that cleared exactly `k + 1` lines.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 4] {
        &self.line_cleared_counter
    }

    /// Whether the most recent line clear was a tetris.
    #[must_use]
    pub const fn back_to_back_tetris(&self) -> bool {
        self.back_to_back_tetris
    }

    /// Adds soft/hard drop points.
    pub const fn add_drop_points(&mut self, points: usize) {
        self.score += points;
    }

    /// Updates statistics after a piece lock that cleared `cleared_lines`.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize, mode: ScoringMode) {
        match mode {
            ScoringMode::Guideline => self.score_guideline(cleared_lines),
            ScoringMode::LinesOnly => self.score += cleared_lines,
        }
        if cleared_lines > 0 {
            self.total_cleared_lines += cleared_lines;
            if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines - 1) {
                *count += 1;
            }
        }
    }

    fn score_guideline(&mut self, cleared_lines: usize) {
        if cleared_lines == 0 {
            self.combo = 0;
            return;
        }

        self.score += COMBO_BONUS * self.combo;
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);

        if cleared_lines < 4 {
            self.back_to_back_tetris = false;
            self.score += 200 * cleared_lines - 100;
        } else {
            if self.back_to_back_tetris {
                self.score += BACK_TO_BACK_TETRIS_BONUS;
            } else {
                self.back_to_back_tetris = true;
            }
            self.score += TETRIS_POINTS;
        }
    }
}
