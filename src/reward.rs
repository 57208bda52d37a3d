//! Reward abstraction for simulation results
//!
//! Rewards are scalar values that can be converted to and from `f64`,
//! added together for accumulation, and compared when ranking children.
//! Any type meeting these bounds is a [`Reward`], including `f64` itself.

use std::fmt::Debug;
use std::ops::{Add, Neg};

/// Trait for scalar rewards produced by simulations
///
/// This trait is implemented automatically for every type that satisfies its
/// bounds, so domains only need to provide the conversions and arithmetic.
pub trait Reward:
    Copy + Debug + Default + PartialOrd + Add<Output = Self> + From<f64> + Into<f64> + Send + Sync
{
    /// Returns the reward as a floating point number
    fn to_f64(self) -> f64 {
        self.into()
    }

    /// Returns this reward multiplied by `factor`
    fn scaled(self, factor: f64) -> Self {
        Self::from(self.into() * factor)
    }
}

impl<T> Reward for T where
    T: Copy
        + Debug
        + Default
        + PartialOrd
        + Add<Output = T>
        + From<f64>
        + Into<f64>
        + Send
        + Sync
{
}

/// A plain score reward
///
/// Useful for domains that want a dedicated reward type instead of
/// a bare `f64`, for example zero-sum games where the opponent's
/// reward is the negation of ours.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Score(pub f64);

impl Score {
    /// Score of a won game
    pub const WIN: Score = Score(1.0);
    /// Score of a drawn game
    pub const DRAW: Score = Score(0.0);
    /// Score of a lost game
    pub const LOSS: Score = Score(-1.0);
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Score {
        Score(-self.0)
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> f64 {
        score.0
    }
}
