pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Rejected engine configuration.
///
/// Every variant is a precondition violation detected at construction time;
/// gameplay itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board size needs 2 dimensions, got {given}")]
    MissingDimensions { given: usize },
    #[display("board of {rows}x{cols} is too small, at least 4x4 is required")]
    BoardTooSmall { rows: usize, cols: usize },
    #[display("board of {rows}x{cols} is too large to address")]
    BoardTooLarge { rows: usize, cols: usize },
    #[display("actions per drop must be at least 1")]
    ZeroActionsPerDrop,
    #[display("unknown scoring mode code {_0}")]
    UnknownScoringMode(#[error(not(source))] i32),
    #[display("unknown randomizer mode code {_0}")]
    UnknownRandomizerMode(#[error(not(source))] i32),
}
