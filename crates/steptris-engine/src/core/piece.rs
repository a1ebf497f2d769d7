use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::hash::fold;

/// Number of cells in every tetromino.
pub const PIECE_CELLS: usize = 4;

/// A cell coordinate on the board.
///
/// Rows grow downward from the top of the board, columns grow rightward.
/// Coordinates are signed so that pieces can be anchored above the visible
/// area (the spawn anchor sits on row `-1`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }
}

/// Rotation state of a piece.
///
/// Represents one of four rotation states:
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index % 4)
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % 4),
            // +3 instead of -1 keeps the arithmetic unsigned
            RotationDirection::CounterClockwise => Self((self.0 + 3) % 4),
        }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Direction of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
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

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::S,
            3 => PieceKind::Z,
            4 => PieceKind::J,
            5 => PieceKind::L,
            _ => PieceKind::T,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in declaration order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the cell offsets of this piece in the given rotation.
    ///
    /// Offsets are `(row, col)` pairs relative to the piece anchor, which is
    /// the top-left corner of the piece's 4×4 bounding box.
    #[must_use]
    pub fn offsets(self, rotation: PieceRotation) -> &'static [Offset; PIECE_CELLS] {
        &GEOMETRY[self as usize][rotation.as_usize()]
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use steptris_engine::PieceKind;
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

/// A falling tetromino: kind, rotation and anchor, plus its absolute cells.
///
/// Unlike a value-type piece that returns a new instance for every move,
/// `Piece` is mutated in place while it falls. The absolute cells are
/// recomputed on every change to the anchor or rotation and therefore never
/// go stale. Legality is the caller's concern: [`Piece::move_by`] and
/// [`Piece::rotate`] never look at a board.
///
/// Equality and hashing consider anchor, kind and rotation only; the cells
/// are derived from those three.
///
/// # Example
///
/// ```
/// use steptris_engine::{Piece, PieceKind, Position, RotationDirection};
///
/// let mut piece = Piece::new(PieceKind::T, Position::new(0, 3));
/// piece.move_by(1, 0);
/// piece.rotate(RotationDirection::Clockwise);
/// assert_eq!(piece.position(), Position::new(1, 3));
/// assert_eq!(piece.rotation().index(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Piece {
    position: Position,
    rotation: PieceRotation,
    kind: PieceKind,
    cells: [Position; PIECE_CELLS],
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.kind == other.kind
            && self.rotation == other.rotation
    }
}

impl Eq for Piece {}

impl std::hash::Hash for Piece {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_i64(self.state_hash());
    }
}

impl Piece {
    /// Creates a piece of the given kind at `position` in spawn orientation.
    #[must_use]
    pub fn new(kind: PieceKind, position: Position) -> Self {
        let mut piece = Self {
            position,
            rotation: PieceRotation::default(),
            kind,
            cells: [position; PIECE_CELLS],
        };
        piece.update_cells();
        piece
    }

    #[must_use]
    pub fn position(&self) -> Position {
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

    /// Returns the absolute board cells covered by this piece.
    #[must_use]
    pub fn cells(&self) -> &[Position; PIECE_CELLS] {
        &self.cells
    }

    /// Shifts the anchor by the given delta.
    pub fn move_by(&mut self, d_row: i32, d_col: i32) {
        self.position = self.position.offset(d_row, d_col);
        self.update_cells();
    }

    /// Rotates the piece one step in `direction`.
    pub fn rotate(&mut self, direction: RotationDirection) {
        self.rotation = self.rotation.rotated(direction);
        self.update_cells();
    }

    /// Restores an anchor saved before a rejected move.
    pub fn set_position(&mut self, position: Position) {
        self.position = position;
        self.update_cells();
    }

    /// Restores a rotation saved before a rejected rotation.
    pub fn set_rotation(&mut self, rotation: PieceRotation) {
        self.rotation = rotation;
        self.update_cells();
    }

    /// Polynomial hash over anchor row, anchor column, kind and rotation.
    #[must_use]
    pub fn state_hash(&self) -> i64 {
        [
            i64::from(self.position.row),
            i64::from(self.position.col),
            i64::from(self.kind as u8),
            i64::from(self.rotation.index()),
        ]
        .into_iter()
        .fold(0, fold)
    }

    fn update_cells(&mut self) {
        let offsets = self.kind.offsets(self.rotation);
        for (cell, &(d_row, d_col)) in self.cells.iter_mut().zip(offsets) {
            *cell = self.position.offset(i32::from(d_row), i32::from(d_col));
        }
    }
}

/// A `(row, col)` offset inside a piece's 4×4 bounding box.
pub type Offset = (i8, i8);

/// Piece outline in its 4×4 bounding box, spawn orientation.
type PieceOutline = [[bool; 4]; 4];

const BOX_SIZE: usize = 4;

/// Rotates an outline 90° clockwise inside the 4×4 box.
const fn rotated_clockwise(outline: &PieceOutline) -> PieceOutline {
    let mut rotated = [[false; 4]; 4];
    let mut row = 0;
    while row < BOX_SIZE {
        let mut col = 0;
        while col < BOX_SIZE {
            rotated[row][col] = outline[BOX_SIZE - 1 - col][row];
            col += 1;
        }
        row += 1;
    }
    rotated
}

/// Collects the occupied cells of an outline in row-major order.
#[expect(clippy::cast_possible_truncation)]
const fn outline_offsets(outline: &PieceOutline) -> [Offset; PIECE_CELLS] {
    let mut offsets = [(0, 0); PIECE_CELLS];
    let mut n = 0;
    let mut row = 0;
    while row < BOX_SIZE {
        let mut col = 0;
        while col < BOX_SIZE {
            if outline[row][col] {
                assert!(n < PIECE_CELLS, "outline has more than four cells");
                offsets[n] = (row as i8, col as i8);
                n += 1;
            }
            col += 1;
        }
        row += 1;
    }
    assert!(n == PIECE_CELLS, "outline has fewer than four cells");
    offsets
}

/// Generates the offsets of all 4 rotation states of an outline.
const fn rotations(outline: PieceOutline) -> [[Offset; PIECE_CELLS]; 4] {
    let r1 = rotated_clockwise(&outline);
    let r2 = rotated_clockwise(&r1);
    let r3 = rotated_clockwise(&r2);
    [
        outline_offsets(&outline),
        outline_offsets(&r1),
        outline_offsets(&r2),
        outline_offsets(&r3),
    ]
}

/// Per-kind, per-rotation cell offsets.
///
/// Every spawn-orientation outline occupies only rows 1 and 2 of its box, so
/// a piece anchored on row `-1` lands on board rows 0 and 1.
static GEOMETRY: [[[Offset; PIECE_CELLS]; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        rotations([EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        rotations([EEEE, [E, C, C, E], [E, C, C, E], EEEE]),
        // S-piece
        rotations([EEEE, [E, C, C, E], [C, C, E, E], EEEE]),
        // Z-piece
        rotations([EEEE, [C, C, E, E], [E, C, C, E], EEEE]),
        // J-piece
        rotations([EEEE, [C, E, E, E], [C, C, C, E], EEEE]),
        // L-piece
        rotations([EEEE, [E, E, C, E], [C, C, C, E], EEEE]),
        // T-piece
        rotations([EEEE, [E, C, E, E], [C, C, C, E], EEEE]),
    ]
};
