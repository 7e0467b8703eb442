//! Payoff matrix for the Prisoner's Dilemma

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strategy::Move;

/// Points earned in one round.
pub type Score = u32;

/// Immutable 2x2 scoring table.
///
/// Built from the four classic values so it is symmetric under player
/// exchange: `payoff(x, y) == swap(payoff(y, x))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PayoffValues")]
pub struct PayoffMatrix {
    /// Both cooperate
    reward: Score,
    /// Cooperate against a defector
    sucker: Score,
    /// Defect against a cooperator
    temptation: Score,
    /// Both defect
    punishment: Score,
}

impl PayoffMatrix {
    /// Build a matrix, rejecting values that do not form a dilemma.
    pub fn new(
        reward: Score,
        sucker: Score,
        temptation: Score,
        punishment: Score,
    ) -> Result<Self, ConfigError> {
        if !(temptation > reward && reward > punishment && punishment > sucker) {
            return Err(ConfigError::InvalidPayoff { reward, sucker, temptation, punishment });
        }
        Ok(Self { reward, sucker, temptation, punishment })
    }

    /// CC (3,3), CD (0,5), DC (5,0), DD (1,1)
    pub const fn canonical() -> Self {
        Self { reward: 3, sucker: 0, temptation: 5, punishment: 1 }
    }

    /// Returns (score_a, score_b)
    pub fn payoff(&self, a: Move, b: Move) -> (Score, Score) {
        (self.score(a, b), self.score(b, a))
    }

    /// Payoff to the player who chose `own` while the other chose `other`.
    pub fn score(&self, own: Move, other: Move) -> Score {
        match (own, other) {
            (Move::Cooperate, Move::Cooperate) => self.reward,
            (Move::Cooperate, Move::Defect) => self.sucker,
            (Move::Defect, Move::Cooperate) => self.temptation,
            (Move::Defect, Move::Defect) => self.punishment,
        }
    }

    /// Largest single-round payoff.
    pub fn max_score(&self) -> Score {
        self.temptation
    }
}

/// Unchecked wire form; deserialization goes through [`PayoffMatrix::new`].
#[derive(Deserialize)]
struct PayoffValues {
    reward: Score,
    sucker: Score,
    temptation: Score,
    punishment: Score,
}

impl TryFrom<PayoffValues> for PayoffMatrix {
    type Error = ConfigError;

    fn try_from(v: PayoffValues) -> Result<Self, Self::Error> {
        Self::new(v.reward, v.sucker, v.temptation, v.punishment)
    }
}

impl Default for PayoffMatrix {
    fn default() -> Self {
        Self::canonical()
    }
}
