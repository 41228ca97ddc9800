use rand::{
    Rng,
    SeedableRng,
    rngs::StdRng,
};
use std::fmt;

pub const FACES: u8 = 6;

/// A single die face, always in `1..=6`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Die(u8);

impl Die {
    pub const ONE: Die = Die(1);

    pub fn new(face: u8) -> Option<Self> {
        (1..=FACES).contains(&face).then_some(Die(face))
    }

    pub fn face(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DicePair {
    pub first: Die,
    pub second: Die,
}

impl DicePair {
    pub fn new(first: Die, second: Die) -> Self {
        Self { first, second }
    }

    /// Builds a pair from raw faces, `None` if either is off the die.
    pub fn from_faces(first: u8, second: u8) -> Option<Self> {
        Some(Self::new(Die::new(first)?, Die::new(second)?))
    }

    pub fn total(&self) -> u8 {
        self.first.face() + self.second.face()
    }
}

impl Default for DicePair {
    fn default() -> Self {
        Self::new(Die::ONE, Die::ONE)
    }
}

/// Where die faces come from. One call per die.
pub trait DiceSource {
    fn roll_die(&mut self) -> Die;

    fn roll_pair(&mut self) -> DicePair {
        let first = self.roll_die();
        let second = self.roll_die();
        DicePair::new(first, second)
    }
}

/// Uniform faces from a non-cryptographic PRNG.
#[derive(Debug)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceSource for RandomDice {
    fn roll_die(&mut self) -> Die {
        Die(self.rng.random_range(1..=FACES))
    }
}
