use std::fmt;

use super::{
    board::{Board, Cell},
    board_size::BoardSize,
    piece::Piece,
};

/// A single cell of the exported game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum StateCell {
    #[default]
    Empty,
    /// Occupied by a locked block.
    Locked,
    /// Occupied by the falling piece.
    Active,
}

impl StateCell {
    /// Encodes the cell as `0` (empty), `1` (locked) or `-1` (active).
    #[must_use]
    pub const fn to_i8(self) -> i8 {
        match self {
            StateCell::Empty => 0,
            StateCell::Locked => 1,
            StateCell::Active => -1,
        }
    }
}

impl From<Cell> for StateCell {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => StateCell::Empty,
            Cell::Filled => StateCell::Locked,
        }
    }
}

/// Board occupancy overlaid with the falling piece.
///
/// This is the one canonical export of the game state. Its `Display` output
/// is a debugging aid only: every cell is printed right-aligned in a field of
/// width 2 and followed by a space, one board row per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateGrid {
    size: BoardSize,
    cells: Vec<StateCell>,
}

impl StateGrid {
    /// Snapshots `board`, marking the cells of `piece` as active when given.
    #[must_use]
    pub fn new(board: &Board, piece: Option<&Piece>) -> Self {
        let mut cells: Vec<StateCell> = board
            .row_slices()
            .flatten()
            .copied()
            .map(StateCell::from)
            .collect();
        for &p in piece.map(Piece::cells).into_iter().flatten() {
            if let Some(i) = board.index(p) {
                cells[i] = StateCell::Active;
            }
        }
        Self {
            size: board.size(),
            cells,
        }
    }

    #[must_use]
    pub fn size(&self) -> BoardSize {
        self.size
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<StateCell> {
        (row < self.size.rows() && col < self.size.cols())
            .then(|| self.cells[row * self.size.cols() + col])
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[StateCell]> + '_ {
        self.cells.chunks_exact(self.size.cols())
    }

    /// Converts to the `rows × cols` array of `{0, 1, -1}` consumed by hosts.
    #[must_use]
    pub fn to_i8_rows(&self) -> Vec<Vec<i8>> {
        self.rows()
            .map(|row| row.iter().map(|c| c.to_i8()).collect())
            .collect()
    }
}

impl fmt::Display for StateGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{:2} ", cell.to_i8())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
