use super::{board_size::BoardSize, hash::fold, piece::Position};

/// Occupancy of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Empty = 0,
    Filled = 1,
}

/// Fixed-size occupancy grid with collision queries and line clearing.
///
/// Cells are stored row-major in a flat buffer. Row 0 is the top of the
/// board, so gravity moves content toward higher row indices.
///
/// # Example
///
/// ```
/// use steptris_engine::{Board, BoardSize, Position};
///
/// let mut board = Board::new(BoardSize::new(4, 4).unwrap());
/// let row = [0, 1, 2, 3].map(|col| Position::new(3, col));
/// board.fill(&row);
/// assert_eq!(board.clear_full_lines(), 1);
/// assert!(board.is_legal(&row));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Cell>,
}

impl std::hash::Hash for Board {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_i64(self.state_hash());
    }
}

impl Board {
    /// Creates an empty board of the given size.
    #[must_use]
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size.rows() * size.cols()],
        }
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.size.rows()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.size.cols()
    }

    /// Sets every cell to [`Cell::Empty`].
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Returns the cell at `position`, or `None` when it lies outside the board.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<Cell> {
        self.index(position).map(|i| self.cells[i])
    }

    /// Iterates over the rows from top to bottom.
    pub fn row_slices(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks_exact(self.cols())
    }

    /// Checks whether any of the given cells is filled.
    ///
    /// Cells are expected to be in bounds; out-of-bounds cells count as empty.
    #[must_use]
    pub fn is_occupied(&self, cells: &[Position]) -> bool {
        cells
            .iter()
            .any(|&p| self.cell(p).is_some_and(|c| c.is_filled()))
    }

    /// Checks whether every cell is in bounds and empty.
    #[must_use]
    pub fn is_legal(&self, cells: &[Position]) -> bool {
        cells.iter().all(|&p| self.index(p).is_some()) && !self.is_occupied(cells)
    }

    /// Marks the given cells as filled.
    ///
    /// No legality check is made; out-of-bounds cells are skipped.
    pub fn fill(&mut self, cells: &[Position]) {
        for &p in cells {
            if let Some(i) = self.index(p) {
                self.cells[i] = Cell::Filled;
            }
        }
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Rows are scanned once from top to bottom. When row `r` is full, rows
    /// `0..r` shift down by one and row 0 becomes empty, then the scan
    /// continues at `r + 1`. Rows already passed are never re-examined.
    pub fn clear_full_lines(&mut self) -> usize {
        let cols = self.cols();
        let mut cleared = 0;
        for r in 0..self.rows() {
            let row = &self.cells[r * cols..(r + 1) * cols];
            if !row.iter().all(|c| c.is_filled()) {
                continue;
            }
            cleared += 1;
            for i in (1..=r).rev() {
                self.cells.copy_within((i - 1) * cols..i * cols, i * cols);
            }
            self.cells[..cols].fill(Cell::Empty);
        }
        cleared
    }

    /// Polynomial hash over the dimensions followed by every cell.
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub fn state_hash(&self) -> i64 {
        let h = fold(fold(0, self.rows() as i64), self.cols() as i64);
        self.cells.iter().fold(h, |h, &c| fold(h, i64::from(c as u8)))
    }

    /// Creates a board from ASCII art for testing.
    ///
    /// `#` is a filled cell and `.` an empty one. Every non-blank line is a row
    /// from top to bottom; rows beyond those given stay empty.
    ///
    /// # Panics
    ///
    /// Panics if a row has a width other than the board's or there are too
    /// many rows.
    #[must_use]
    pub fn from_ascii(size: BoardSize, art: &str) -> Self {
        let mut board = Self::new(size);
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= size.rows(),
            "Board has {} rows, got {}",
            size.rows(),
            lines.len()
        );

        for (y, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                size.cols(),
                "Each row must have exactly {} cells, got {} at row {}",
                size.cols(),
                chars.len(),
                y
            );
            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.cells[y * size.cols() + x] = Cell::Filled;
                }
            }
        }
        board
    }

    pub(crate) fn index(&self, position: Position) -> Option<usize> {
        let row = usize::try_from(position.row).ok()?;
        let col = usize::try_from(position.col).ok()?;
        (row < self.rows() && col < self.cols()).then(|| row * self.cols() + col)
    }
}
