use std::io::{self, Write};

use rand::Rng as _;

use crate::{
    ConfigError,
    core::{
        board::Board,
        hash::fold,
        piece::{Piece, PieceKind, Position, RotationDirection},
        state_grid::StateGrid,
    },
};

use super::{
    action::{Action, MoveDirection},
    config::EngineConfig,
    game_stats::{GameStats, HARD_DROP_POINTS, SOFT_DROP_POINTS},
    piece_sequence::PieceSequence,
};

/// Result of a single [`GameState::play`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// The step ran and a piece is still falling.
    Continued,
    /// The step ran and a spawn collided; the game is now over.
    ToppedOut,
    /// The game was already over; nothing changed.
    Ignored,
}

/// Step-driven game controller.
///
/// Owns the board, the falling piece, the piece sequence and the scoring
/// counters. The only state transition after construction is [`play`],
/// plus [`reset`] to start over with the same configuration.
///
/// Equality covers the gameplay state (action counter, active piece, board,
/// piece sequence, back-to-back flag, combo, max combo, line clears, per-size
/// counts and score). Configuration and generator state are not compared, so
/// only games built from the same configuration should be compared.
///
/// Once [`is_terminal`] returns `true`, further calls to [`play`] leave the
/// state untouched and return [`StepOutcome::Ignored`].
///
/// [`play`]: GameState::play
/// [`reset`]: GameState::reset
/// [`is_terminal`]: GameState::is_terminal
///
/// # Example
///
/// ```
/// use steptris_engine::{Action, EngineConfig, GameState};
///
/// let mut game = GameState::new(EngineConfig::default().with_seed(1_u64)).unwrap();
/// while !game.is_terminal() {
///     game.play_action(Action::HardDrop);
/// }
/// assert!(game.score() > 0);
///
/// let grid = game.state().to_i8_rows();
/// assert_eq!((grid.len(), grid[0].len()), (20, 10));
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    active_piece: Piece,
    sequence: PieceSequence,
    action_counter: usize,
    stats: GameStats,
    terminal: bool,
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.action_counter == other.action_counter
            && self.active_piece == other.active_piece
            && self.board == other.board
            && self.sequence == other.sequence
            && self.stats == other.stats
    }
}

impl Eq for GameState {}

impl std::hash::Hash for GameState {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_i64(self.state_hash());
    }
}

impl GameState {
    /// Validates `config` and starts a new game.
    ///
    /// A random seed is drawn when the configuration carries none.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let board = Board::new(config.board_size);
        let sequence = PieceSequence::new(config.randomizer, seed);
        // replaced by the first spawn in `reset`
        let active_piece = Piece::new(PieceKind::I, spawn_position(&board));
        let mut game = Self {
            config,
            board,
            active_piece,
            sequence,
            action_counter: 0,
            stats: GameStats::new(),
            terminal: false,
        };
        game.reset();
        Ok(game)
    }

    /// Starts over: clears the board and counters, reshuffles the sequence
    /// and spawns the first piece. The configuration is kept.
    pub fn reset(&mut self) {
        self.board.reset();
        self.sequence.reshuffle();
        self.action_counter = 0;
        self.stats = GameStats::new();
        self.terminal = false;
        // an empty board always has room for the spawn
        let spawned = self.spawn_block();
        tracing::debug!(
            rows = self.board.rows(),
            cols = self.board.cols(),
            first_piece = ?self.active_piece.kind(),
            spawned,
            "game reset"
        );
    }

    /// Advances the game by one step for the given action code.
    ///
    /// Codes `0..=5` map to [`Action`]; any other code skips the player
    /// action but still counts towards the forced gravity tick.
    pub fn play(&mut self, code: i32) -> StepOutcome {
        if self.terminal {
            return StepOutcome::Ignored;
        }

        if let Some(action) = Action::from_code(code) {
            self.apply_action(action);
        }

        self.action_counter = (self.action_counter + 1) % self.config.actions_per_drop;
        if self.action_counter == 0 && !self.terminal && !self.move_piece(MoveDirection::Down) {
            self.detach_block();
        }

        if self.terminal {
            StepOutcome::ToppedOut
        } else {
            StepOutcome::Continued
        }
    }

    /// Typed form of [`GameState::play`].
    pub fn play_action(&mut self, action: Action) -> StepOutcome {
        self.play(action.code())
    }

    fn apply_action(&mut self, action: Action) {
        let scores_drops = self.config.scoring.is_guideline();
        match action {
            Action::RotateClockwise => {
                self.rotate(RotationDirection::Clockwise);
            }
            Action::RotateCounterClockwise => {
                self.rotate(RotationDirection::CounterClockwise);
            }
            Action::MoveLeft => {
                self.move_piece(MoveDirection::Left);
            }
            Action::MoveRight => {
                self.move_piece(MoveDirection::Right);
            }
            Action::SoftDrop => {
                if !self.move_piece(MoveDirection::Down) {
                    self.detach_block();
                } else if scores_drops {
                    self.stats.add_drop_points(SOFT_DROP_POINTS);
                }
            }
            Action::HardDrop => {
                while self.move_piece(MoveDirection::Down) {
                    if scores_drops {
                        self.stats.add_drop_points(HARD_DROP_POINTS);
                    }
                }
                self.detach_block();
            }
        }
    }

    /// Moves the active piece one cell, reverting when the target is illegal.
    pub fn move_piece(&mut self, direction: MoveDirection) -> bool {
        let saved = self.active_piece.position();
        let (d_row, d_col) = direction.delta();
        self.active_piece.move_by(d_row, d_col);
        if self.board.is_legal(self.active_piece.cells()) {
            return true;
        }
        self.active_piece.set_position(saved);
        false
    }

    /// Rotates the active piece in place, reverting when the result is
    /// illegal. There are no wall kicks.
    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        let saved = self.active_piece.rotation();
        self.active_piece.rotate(direction);
        if self.board.is_legal(self.active_piece.cells()) {
            return true;
        }
        self.active_piece.set_rotation(saved);
        false
    }

    /// Spawns the next piece at the spawn anchor.
    ///
    /// Returns `false` and ends the game when the new piece overlaps locked
    /// cells.
    pub fn spawn_block(&mut self) -> bool {
        let kind = self.sequence.pop_next();
        self.active_piece = Piece::new(kind, spawn_position(&self.board));
        if self.board.is_occupied(self.active_piece.cells()) {
            self.terminal = true;
            tracing::debug!(
                piece = ?kind,
                score = self.stats.score(),
                line_clears = self.stats.total_cleared_lines(),
                "topped out"
            );
            return false;
        }
        true
    }

    /// Locks the active piece, clears full lines, scores and spawns the next
    /// piece.
    pub fn detach_block(&mut self) {
        self.board.fill(self.active_piece.cells());
        let cleared = self.board.clear_full_lines();
        self.stats.complete_piece_drop(cleared, self.config.scoring);
        tracing::trace!(
            piece = ?self.active_piece.kind(),
            cleared,
            score = self.stats.score(),
            "piece locked"
        );
        self.spawn_block();
    }

    /// Snapshots the board overlaid with the falling piece.
    ///
    /// The piece is left out once the game is over.
    #[must_use]
    pub fn state(&self) -> StateGrid {
        let piece = (!self.terminal).then_some(&self.active_piece);
        StateGrid::new(&self.board, piece)
    }

    /// Writes the text form of [`GameState::state`] to `out` and flushes it.
    pub fn write_state<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self.state())?;
        out.flush()
    }

    /// Prints [`GameState::state`] to standard output.
    ///
    /// Debugging aid only; write failures are ignored.
    pub fn print_state(&self) {
        let _ = self.write_state(&mut io::stdout().lock());
    }

    /// Overwrites this game with a deep copy of `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// Polynomial hash over the action counter, piece, board, sequence
    /// index, combo, line clears and score.
    ///
    /// Every input is also part of equality, so equal games hash equal.
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub fn state_hash(&self) -> i64 {
        [
            self.action_counter as i64,
            self.active_piece.state_hash(),
            self.board.state_hash(),
            self.sequence.index() as i64,
            self.stats.combo() as i64,
            self.stats.total_cleared_lines() as i64,
            self.stats.score() as i64,
        ]
        .into_iter()
        .fold(0, fold)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> &Piece {
        &self.active_piece
    }

    #[must_use]
    pub fn piece_sequence(&self) -> &PieceSequence {
        &self.sequence
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Player actions taken since the last forced gravity tick.
    #[must_use]
    pub fn action_counter(&self) -> usize {
        self.action_counter
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    #[must_use]
    pub fn line_clears(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn combo(&self) -> usize {
        self.stats.combo()
    }

    #[must_use]
    pub fn max_combo(&self) -> usize {
        self.stats.max_combo()
    }

    #[must_use]
    pub fn per_size_line_clears(&self) -> &[usize; 4] {
        self.stats.line_cleared_counter()
    }

    #[must_use]
    pub fn back_to_back_tetris(&self) -> bool {
        self.stats.back_to_back_tetris()
    }

    /// Replaces the board, keeping everything else.
    ///
    /// The active piece is not checked against the new board.
    #[cfg(test)]
    pub(crate) fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    #[cfg(test)]
    pub(crate) fn set_active_piece(&mut self, piece: Piece) {
        self.active_piece = piece;
    }
}

/// Anchor of a freshly spawned piece: one row above the board, centered.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn spawn_position(board: &Board) -> Position {
    Position::new(-1, (board.cols() / 2) as i32 - 2)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{BoardSize, PieceSeed, RandomizerMode, ScoringMode, StateCell};

    use super::*;

    fn new_game(config: EngineConfig) -> GameState {
        GameState::new(config.with_seed(42_u64)).unwrap()
    }

    fn small_board(art: &str) -> Board {
        Board::from_ascii(BoardSize::new(6, 4).unwrap(), art)
    }

    fn small_config() -> EngineConfig {
        EngineConfig::default().with_board_size(BoardSize::new(6, 4).unwrap())
    }

    #[test]
    fn test_new_game_spawns_at_anchor() {
        let game = new_game(EngineConfig::default());
        assert!(!game.is_terminal());
        assert_eq!(game.active_piece().position(), Position::new(-1, 3));
        assert_eq!(game.active_piece().rotation().index(), 0);
        assert_eq!(game.score(), 0);
        assert_eq!(game.line_clears(), 0);
        assert_eq!(game.action_counter(), 0);
        assert_eq!(game.piece_sequence().index(), 1);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig::default().with_actions_per_drop(0);
        assert_eq!(
            GameState::new(config).unwrap_err(),
            ConfigError::ZeroActionsPerDrop
        );
    }

    #[test]
    fn test_move_against_wall_is_reverted() {
        let mut game = new_game(small_config());
        game.set_active_piece(Piece::new(PieceKind::O, Position::new(2, -1)));
        let before = *game.active_piece();
        assert!(!game.move_piece(MoveDirection::Left));
        assert_eq!(*game.active_piece(), before);
        assert_eq!(game.active_piece().cells(), before.cells());
        assert!(game.move_piece(MoveDirection::Right));
        assert_eq!(game.active_piece().position(), Position::new(2, 0));
    }

    #[test]
    fn test_move_into_filled_cell_is_reverted() {
        let mut game = new_game(small_config());
        game.set_board(small_board(
            r"
            ....
            ....
            ....
            ....
            .#..
            ....
            ",
        ));
        // O piece covering rows 2..=3, cols 1..=2
        game.set_active_piece(Piece::new(PieceKind::O, Position::new(1, 0)));
        let before = *game.active_piece();
        assert!(!game.move_piece(MoveDirection::Down));
        assert_eq!(*game.active_piece(), before);
    }

    #[test]
    fn test_rotation_out_of_bounds_is_reverted() {
        let mut game = new_game(small_config());
        // horizontal I on the bottom row; vertical would leave the board
        game.set_active_piece(Piece::new(PieceKind::I, Position::new(4, 0)));
        let before = *game.active_piece();
        assert!(!game.rotate(RotationDirection::Clockwise));
        assert!(!game.rotate(RotationDirection::CounterClockwise));
        assert_eq!(game.active_piece().rotation(), before.rotation());
        assert_eq!(game.active_piece().cells(), before.cells());
    }

    #[test]
    fn test_rotation_succeeds_in_open_space() {
        let mut game = new_game(small_config());
        game.set_active_piece(Piece::new(PieceKind::T, Position::new(1, 0)));
        assert!(game.rotate(RotationDirection::CounterClockwise));
        assert_eq!(game.active_piece().rotation().index(), 3);
    }

    #[test]
    fn test_hard_drop_scores_two_per_row_and_locks() {
        let mut game = new_game(small_config().with_actions_per_drop(100));
        game.set_active_piece(Piece::new(PieceKind::O, Position::new(-1, 0)));
        assert!(game.play_action(Action::HardDrop).is_continued());
        // rows 0..=1 to rows 4..=5 is four steps
        assert_eq!(game.score(), 8);
        assert!(game.board().is_occupied(&[Position::new(5, 1), Position::new(4, 2)]));
        assert_eq!(game.active_piece().position().row, -1);
    }

    #[test]
    fn test_soft_drop_scores_and_locks_on_floor() {
        let mut game = new_game(small_config().with_actions_per_drop(100));
        game.set_active_piece(Piece::new(PieceKind::O, Position::new(2, 0)));
        game.play_action(Action::SoftDrop);
        assert_eq!(game.score(), 1);
        assert_eq!(game.active_piece().position(), Position::new(3, 0));

        game.play_action(Action::SoftDrop);
        assert_eq!(game.score(), 1);
        assert!(game.board().is_occupied(&[Position::new(5, 1)]));
    }

    #[test]
    fn test_lines_only_drops_score_nothing() {
        let config = small_config()
            .with_actions_per_drop(100)
            .with_scoring(ScoringMode::LinesOnly);
        let mut game = new_game(config);
        game.set_active_piece(Piece::new(PieceKind::O, Position::new(-1, 0)));
        game.play_action(Action::HardDrop);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_clearing_lines_updates_counters() {
        let mut game = new_game(small_config().with_actions_per_drop(100));
        game.set_board(small_board(
            r"
            ....
            ....
            ....
            ....
            #..#
            #..#
            ",
        ));
        game.set_active_piece(Piece::new(PieceKind::O, Position::new(-1, 0)));
        game.play_action(Action::HardDrop);
        assert_eq!(game.line_clears(), 2);
        assert_eq!(game.per_size_line_clears(), &[0, 1, 0, 0]);
        assert_eq!(game.stats().total_cleared_lines(), 2);
        assert_eq!(game.combo(), 1);
        assert_eq!(game.score(), 300 + 4 * HARD_DROP_POINTS);
        assert!(game.board().row_slices().flatten().all(|c| c.is_empty()));
    }

    #[test]
    fn test_gravity_tick_cadence() {
        let mut game = new_game(EngineConfig::default().with_actions_per_drop(3));
        let start = game.active_piece().position();
        game.play(-1);
        game.play(99);
        assert_eq!(game.action_counter(), 2);
        assert_eq!(game.active_piece().position(), start);
        game.play(-1);
        assert_eq!(game.action_counter(), 0);
        assert_eq!(game.active_piece().position(), start.offset(1, 0));
    }

    #[test]
    fn test_out_of_range_action_only_ticks() {
        let mut game = new_game(EngineConfig::default());
        let start = game.active_piece().position();
        assert!(game.play(6).is_continued());
        assert_eq!(game.active_piece().position(), start.offset(1, 0));
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_top_out_and_ignored_steps() {
        let mut game = new_game(small_config());
        game.set_board(small_board(
            r"
            .#..
            .##.
            ....
            ....
            ....
            ....
            ",
        ));
        // every spawn shape covers (0, 1), (1, 1) or (1, 2)
        game.set_active_piece(Piece::new(PieceKind::O, Position::new(3, 0)));
        let outcome = game.play_action(Action::HardDrop);
        assert!(outcome.is_topped_out());
        assert!(game.is_terminal());
        let score = game.score();
        let lines = game.line_clears();

        let frozen = game.clone();
        assert!(game.play_action(Action::HardDrop).is_ignored());
        assert!(game.play(0).is_ignored());
        assert_eq!(game, frozen);
        assert_eq!(game.score(), score);
        assert_eq!(game.line_clears(), lines);
        assert_eq!(game.action_counter(), frozen.action_counter());

        assert!(game.state().rows().flatten().all(|c| !c.is_active()));
    }

    #[test]
    fn test_reset_restores_fresh_game() {
        let mut game = new_game(small_config());
        for _ in 0..200 {
            game.play_action(Action::HardDrop);
        }
        assert!(game.is_terminal());
        game.reset();
        assert!(!game.is_terminal());
        assert_eq!(game.score(), 0);
        assert_eq!(game.line_clears(), 0);
        assert_eq!(game.max_combo(), 0);
        assert_eq!(game.action_counter(), 0);
        assert!(!game.back_to_back_tetris());
        assert_eq!(game.board(), &Board::new(game.config().board_size));
        assert_eq!(game.config(), &small_config().with_seed(42_u64));
    }

    #[test]
    fn test_spawn_on_blocked_board_tops_out() {
        let mut game = new_game(small_config());
        game.play_action(Action::HardDrop);
        let score = game.score();
        let lines = game.line_clears();
        assert!(score > 0);

        game.set_board(small_board(
            r"
            ####
            ###.
            ....
            ....
            ....
            ....
            ",
        ));
        assert!(!game.spawn_block());
        assert!(game.is_terminal());
        assert_eq!(game.score(), score);
        assert_eq!(game.line_clears(), lines);
    }

    #[test]
    fn test_first_spawn_is_first_sequence_kind() {
        let config = EngineConfig::default().with_seed(42_u64);
        let game = GameState::new(config.clone()).unwrap();
        let mut sequence = PieceSequence::new(config.randomizer, PieceSeed::from(42_u64));
        sequence.reshuffle();
        assert_eq!(game.active_piece().kind(), sequence.pop_next());
        assert_eq!(game.piece_sequence(), &sequence);
    }

    #[test]
    fn test_write_state_matches_grid_text() {
        let game = new_game(EngineConfig::default());
        let mut out = Vec::new();
        game.write_state(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), game.state().to_string());
    }

    #[test]
    fn test_state_overlays_active_piece() {
        let game = new_game(EngineConfig::default());
        let grid = game.state();
        let active: HashSet<_> = game
            .active_piece()
            .cells()
            .iter()
            .map(|p| (p.row, p.col))
            .collect();
        for (row, cells) in grid.rows().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                let key = (i32::try_from(row).unwrap(), i32::try_from(col).unwrap());
                let expected = if active.contains(&key) {
                    StateCell::Active
                } else {
                    StateCell::Empty
                };
                assert_eq!(cell, expected);
            }
        }
    }

    #[test]
    fn test_copy_from_is_deep() {
        let mut a = new_game(EngineConfig::default());
        let mut b = new_game(EngineConfig::default().with_randomizer(RandomizerMode::Bag));
        for _ in 0..5 {
            b.play_action(Action::HardDrop);
        }
        a.copy_from(&b);
        assert_eq!(a, b);
        assert_eq!(a.state_hash(), b.state_hash());

        let snapshot = b.clone();
        a.play_action(Action::HardDrop);
        assert_ne!(a, b);
        assert_eq!(b, snapshot);
    }

    #[test]
    fn test_equal_seeds_play_identically() {
        let mut a = new_game(EngineConfig::default());
        let mut b = new_game(EngineConfig::default());
        for code in [0, 2, 2, 5, 1, 4, 3, 5, 5] {
            a.play(code);
            b.play(code);
            assert_eq!(a, b);
            assert_eq!(a.state_hash(), b.state_hash());
        }
    }
}
