pub use self::{board::*, board_size::*, hash::HASH_BASE, piece::*, state_grid::*};

pub(crate) mod board;
pub(crate) mod board_size;
pub(crate) mod hash;
pub(crate) mod piece;
pub(crate) mod state_grid;
