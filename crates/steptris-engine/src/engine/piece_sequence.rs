use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

use super::config::RandomizerMode;

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the per-instance random
/// number generator. Using the same seed produces the same sequence of pieces,
/// so independent games never share a random stream and runs are
/// reproducible.
///
/// # Example
///
/// ```
/// use steptris_engine::{EngineConfig, GameState, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let game1 = GameState::new(EngineConfig::default().with_seed(seed)).unwrap();
/// let game2 = GameState::new(EngineConfig::default().with_seed(seed)).unwrap();
///
/// assert_eq!(game1, game2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Widens a 64-bit seed; handy for tests and command-line style seeding.
impl From<u64> for PieceSeed {
    fn from(seed: u64) -> Self {
        Self(u128::from(seed).to_be_bytes())
    }
}

/// Where the sequence currently stands.
///
/// The two randomizers keep separate bookkeeping: the bag walks a cursor
/// over a permutation, the uniform mode only remembers the kind it has
/// already drawn for the next spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SequenceState {
    Bag {
        bag: [PieceKind; PieceKind::LEN],
        index: usize,
    },
    Uniform {
        next: PieceKind,
    },
}

/// Supplies the kinds of spawned pieces.
///
/// # Bag mode
///
/// Serves a shuffled permutation of all 7 kinds in order. When the cursor
/// reaches the end of the permutation it is reshuffled in place and the
/// cursor returns to 0, so every run between two reshuffles contains each
/// kind exactly once.
///
/// # Uniform mode
///
/// Every spawn draws one kind uniformly at random, independent of history.
///
/// Equality compares the sequence position only, never the generator state.
#[derive(Debug, Clone)]
pub struct PieceSequence {
    rng: Pcg32,
    state: SequenceState,
}

impl PartialEq for PieceSequence {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Eq for PieceSequence {}

impl PieceSequence {
    /// Creates a sequence in `mode` with a generator seeded from `seed`.
    ///
    /// The sequence is immediately shuffled (bag) or drawn (uniform).
    #[must_use]
    pub fn new(mode: RandomizerMode, seed: PieceSeed) -> Self {
        let rng = Pcg32::from_seed(seed.0);
        let state = match mode {
            RandomizerMode::Bag => SequenceState::Bag {
                bag: PieceKind::ALL,
                index: 0,
            },
            RandomizerMode::Uniform => SequenceState::Uniform { next: PieceKind::I },
        };
        let mut this = Self { rng, state };
        this.reshuffle();
        this
    }

    /// Starts a fresh sequence, keeping the generator stream.
    ///
    /// Bag mode shuffles the permutation and rewinds the cursor; uniform
    /// mode redraws the upcoming kind.
    pub fn reshuffle(&mut self) {
        match &mut self.state {
            SequenceState::Bag { bag, index } => {
                bag.shuffle(&mut self.rng);
                *index = 0;
            }
            SequenceState::Uniform { next } => {
                *next = self.rng.random();
            }
        }
    }

    /// Returns the kind the next spawn will receive.
    #[must_use]
    pub fn peek(&self) -> PieceKind {
        match &self.state {
            SequenceState::Bag { bag, index } => bag[*index],
            SequenceState::Uniform { next } => *next,
        }
    }

    /// Takes the next kind and advances the sequence.
    pub fn pop_next(&mut self) -> PieceKind {
        let kind = self.peek();
        let exhausted = match &mut self.state {
            SequenceState::Bag { index, .. } => {
                *index += 1;
                *index == PieceKind::LEN
            }
            SequenceState::Uniform { .. } => true,
        };
        if exhausted {
            self.reshuffle();
        }
        kind
    }

    /// Returns the sequence buffer: the bag permutation, or the single
    /// pending kind in uniform mode.
    #[must_use]
    pub fn kinds(&self) -> &[PieceKind] {
        match &self.state {
            SequenceState::Bag { bag, .. } => bag,
            SequenceState::Uniform { next } => std::slice::from_ref(next),
        }
    }

    /// Returns the bag cursor. Always 0 in uniform mode.
    #[must_use]
    pub fn index(&self) -> usize {
        match &self.state {
            SequenceState::Bag { index, .. } => *index,
            SequenceState::Uniform { .. } => 0,
        }
    }

    #[must_use]
    pub fn mode(&self) -> RandomizerMode {
        match self.state {
            SequenceState::Bag { .. } => RandomizerMode::Bag,
            SequenceState::Uniform { .. } => RandomizerMode::Uniform,
        }
    }
}
