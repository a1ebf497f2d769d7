use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Validated board dimensions.
///
/// Both dimensions are at least [`BoardSize::MIN_ROWS`] × [`BoardSize::MIN_COLS`],
/// which is the smallest board on which every piece can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct BoardSize {
    rows: usize,
    cols: usize,
}

impl Default for BoardSize {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BoardSize {
    pub const MIN_ROWS: usize = 4;
    pub const MIN_COLS: usize = 4;

    /// The standard 20 × 10 playfield.
    pub const STANDARD: Self = Self { rows: 20, cols: 10 };

    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        if rows < Self::MIN_ROWS || cols < Self::MIN_COLS {
            return Err(ConfigError::BoardTooSmall { rows, cols });
        }
        // cell coordinates are `i32` and the cells live in one flat buffer
        let addressable = i32::try_from(rows).is_ok() && i32::try_from(cols).is_ok();
        if !addressable || rows.checked_mul(cols).is_none() {
            return Err(ConfigError::BoardTooLarge { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Builds a size from a `[rows, cols]` list as handed over by a host binding.
    ///
    /// Extra trailing dimensions are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use steptris_engine::{BoardSize, ConfigError};
    ///
    /// assert_eq!(BoardSize::from_dims(&[22, 10]).unwrap().rows(), 22);
    /// assert!(matches!(
    ///     BoardSize::from_dims(&[20]),
    ///     Err(ConfigError::MissingDimensions { given: 1 })
    /// ));
    /// ```
    pub fn from_dims(dims: &[usize]) -> Result<Self, ConfigError> {
        match *dims {
            [rows, cols, ..] => Self::new(rows, cols),
            _ => Err(ConfigError::MissingDimensions { given: dims.len() }),
        }
    }

    #[must_use]
    pub const fn rows(self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(self) -> usize {
        self.cols
    }
}

impl TryFrom<(usize, usize)> for BoardSize {
    type Error = ConfigError;

    fn try_from((rows, cols): (usize, usize)) -> Result<Self, Self::Error> {
        Self::new(rows, cols)
    }
}

impl From<BoardSize> for (usize, usize) {
    fn from(size: BoardSize) -> Self {
        (size.rows, size.cols)
    }
}
