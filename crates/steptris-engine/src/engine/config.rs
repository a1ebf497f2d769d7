use serde::{Deserialize, Serialize};

use crate::{BoardSize, ConfigError};

use super::piece_sequence::PieceSeed;

/// Selects how line clears and drops are scored.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Guideline-style scoring with combo, back-to-back tetris and drop bonuses.
    #[default]
    Guideline,
    /// One point per cleared line, nothing else.
    LinesOnly,
}

impl TryFrom<i32> for ScoringMode {
    type Error = ConfigError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ScoringMode::Guideline),
            1 => Ok(ScoringMode::LinesOnly),
            _ => Err(ConfigError::UnknownScoringMode(code)),
        }
    }
}

/// Selects the piece-sequence generator.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum RandomizerMode {
    /// 7-bag: every kind once per shuffled permutation.
    #[default]
    Bag,
    /// Independent uniform draw on every spawn.
    Uniform,
}

impl TryFrom<i32> for RandomizerMode {
    type Error = ConfigError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RandomizerMode::Bag),
            1 => Ok(RandomizerMode::Uniform),
            _ => Err(ConfigError::UnknownRandomizerMode(code)),
        }
    }
}

/// Construction-time configuration of a [`GameState`](super::GameState).
///
/// All of it is fixed for the lifetime of the game; [`GameState::reset`]
/// keeps it untouched.
///
/// [`GameState::reset`]: super::GameState::reset
///
/// # Example
///
/// ```
/// use steptris_engine::{EngineConfig, ScoringMode};
///
/// let config: EngineConfig = serde_json::from_str(
///     r#"{ "board_size": [22, 10], "actions_per_drop": 3, "scoring": "lines_only" }"#,
/// )
/// .unwrap();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.scoring, ScoringMode::LinesOnly);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_size: BoardSize,
    /// Player actions between forced gravity ticks; 1 drops on every step.
    pub actions_per_drop: usize,
    pub scoring: ScoringMode,
    pub randomizer: RandomizerMode,
    /// Seed of the piece sequence. A random one is drawn when absent.
    pub seed: Option<PieceSeed>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: BoardSize::STANDARD,
            actions_per_drop: 1,
            scoring: ScoringMode::default(),
            randomizer: RandomizerMode::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Builds a configuration from the integer arguments a host binding
    /// passes through: dimension list, drop cadence, scoring and randomizer
    /// codes.
    pub fn from_codes(
        board_dims: &[usize],
        actions_per_drop: usize,
        scoring: i32,
        randomizer: i32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            board_size: BoardSize::from_dims(board_dims)?,
            actions_per_drop,
            scoring: scoring.try_into()?,
            randomizer: randomizer.try_into()?,
            seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_board_size(self, board_size: BoardSize) -> Self {
        Self { board_size, ..self }
    }

    #[must_use]
    pub fn with_actions_per_drop(self, actions_per_drop: usize) -> Self {
        Self {
            actions_per_drop,
            ..self
        }
    }

    #[must_use]
    pub fn with_scoring(self, scoring: ScoringMode) -> Self {
        Self { scoring, ..self }
    }

    #[must_use]
    pub fn with_randomizer(self, randomizer: RandomizerMode) -> Self {
        Self { randomizer, ..self }
    }

    #[must_use]
    pub fn with_seed(self, seed: impl Into<PieceSeed>) -> Self {
        Self {
            seed: Some(seed.into()),
            ..self
        }
    }

    /// Checks the invariants that cannot be encoded in the field types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actions_per_drop == 0 {
            return Err(ConfigError::ZeroActionsPerDrop);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_standard_game() {
        let config = EngineConfig::default();
        assert_eq!(config.board_size, BoardSize::STANDARD);
        assert_eq!(config.actions_per_drop, 1);
        assert!(config.scoring.is_guideline());
        assert!(config.randomizer.is_bag());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_codes() {
        let config = EngineConfig::from_codes(&[22, 10], 3, 1, 1).unwrap();
        assert_eq!(config.board_size, BoardSize::new(22, 10).unwrap());
        assert_eq!(config.actions_per_drop, 3);
        assert!(config.scoring.is_lines_only());
        assert!(config.randomizer.is_uniform());
    }

    #[test]
    fn test_from_codes_rejects_bad_input() {
        assert_eq!(
            EngineConfig::from_codes(&[20, 10], 0, 0, 0),
            Err(ConfigError::ZeroActionsPerDrop)
        );
        assert_eq!(
            EngineConfig::from_codes(&[20, 10], 1, 2, 0),
            Err(ConfigError::UnknownScoringMode(2))
        );
        assert_eq!(
            EngineConfig::from_codes(&[20, 10], 1, 0, -1),
            Err(ConfigError::UnknownRandomizerMode(-1))
        );
        assert_eq!(
            EngineConfig::from_codes(&[20], 1, 0, 0),
            Err(ConfigError::MissingDimensions { given: 1 })
        );
    }

    #[test]
    fn test_serde_roundtrip_keeps_seed() {
        let config = EngineConfig::default()
            .with_scoring(ScoringMode::LinesOnly)
            .with_seed(42_u64);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"lines_only\""));
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_serde_missing_fields_use_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
