/// A player action, as encoded by the integer codes `0..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
#[repr(u8)]
pub enum Action {
    RotateClockwise = 0,
    RotateCounterClockwise = 1,
    MoveLeft = 2,
    /// One step down; locks the piece when it cannot move.
    SoftDrop = 3,
    MoveRight = 4,
    /// Falls until blocked, then locks.
    HardDrop = 5,
}

impl Action {
    pub const ALL: [Self; 6] = [
        Action::RotateClockwise,
        Action::RotateCounterClockwise,
        Action::MoveLeft,
        Action::SoftDrop,
        Action::MoveRight,
        Action::HardDrop,
    ];

    /// Decodes an action code. Codes outside `0..=5` have no action.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// A unit step of the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveDirection {
    Down,
    Left,
    Right,
}

impl MoveDirection {
    /// Returns the `(row, col)` delta of the step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            MoveDirection::Down => (1, 0),
            MoveDirection::Left => (0, -1),
            MoveDirection::Right => (0, 1),
        }
    }
}
