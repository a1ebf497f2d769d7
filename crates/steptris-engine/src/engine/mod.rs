//! Game rules and state management.
//!
//! This module builds the step-driven game on top of the core data
//! structures:
//!
//! - [`GameState`] - The controller: board, falling piece, sequence and counters
//! - [`GameStats`] - Score, combo and line-clear statistics
//! - [`PieceSequence`] - 7-bag or uniform piece generation
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`EngineConfig`] - Board size, drop cadence, scoring and randomizer modes
//! - [`Action`] - The six player actions and their integer codes
//!
//! # Game Flow
//!
//! 1. Build a [`GameState`] from an [`EngineConfig`]
//! 2. Call [`GameState::play`] once per step with an action code
//! 3. Every `actions_per_drop` steps gravity pulls the piece down one row
//! 4. A piece that cannot fall locks, full lines clear and the next piece spawns
//! 5. Repeat until a spawned piece overlaps the stack (top-out)
//!
//! # Example
//!
//! ```
//! use steptris_engine::{Action, EngineConfig, GameState, RandomizerMode};
//!
//! let config = EngineConfig::default()
//!     .with_randomizer(RandomizerMode::Uniform)
//!     .with_seed(7_u64);
//! let mut game = GameState::new(config).unwrap();
//!
//! game.play_action(Action::MoveLeft);
//! game.play_action(Action::RotateClockwise);
//! game.play_action(Action::HardDrop);
//!
//! // branch the search from the current state
//! let mut branch = game.clone();
//! branch.play_action(Action::HardDrop);
//! assert_ne!(branch, game);
//!
//! branch.copy_from(&game);
//! assert_eq!(branch, game);
//! ```

pub use self::{action::*, config::*, game_state::*, game_stats::*, piece_sequence::*};

mod action;
mod config;
mod game_state;
mod game_stats;
mod piece_sequence;
