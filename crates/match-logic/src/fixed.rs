//! Evaluate a strategy against a scripted opponent

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EngineError, FixedScriptError, Seat, StrategyError};
use crate::game::{MatchConfig, RoundResult};
use crate::payoff::PayoffMatrix;
use crate::random::SeededRng;
use crate::strategy::{parse_moves, Move, Strategy};

/// A non-empty move script. Past its end the last move repeats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Move>", into = "Vec<Move>")]
pub struct FixedOpponent {
    moves: Vec<Move>,
}

impl FixedOpponent {
    pub fn new(moves: Vec<Move>) -> Result<Self, ConfigError> {
        if moves.is_empty() {
            return Err(ConfigError::EmptySequence);
        }
        Ok(Self { moves })
    }

    /// Build from a `C`/`D` string such as `"CCDD"`.
    pub fn parse(script: &str) -> Result<Self, FixedScriptError> {
        let moves = parse_moves(script)?;
        Ok(Self::new(moves)?)
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Move scripted for the zero-based `round`.
    pub fn move_at(&self, round: usize) -> Move {
        // non-empty by construction
        self.moves[round.min(self.moves.len() - 1)]
    }
}

impl TryFrom<Vec<Move>> for FixedOpponent {
    type Error = ConfigError;

    fn try_from(moves: Vec<Move>) -> Result<Self, Self::Error> {
        Self::new(moves)
    }
}

impl From<FixedOpponent> for Vec<Move> {
    fn from(opponent: FixedOpponent) -> Self {
        opponent.moves
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedResult {
    pub total_self: u64,
    pub total_fixed: u64,
    pub moves_self: Vec<Move>,
    pub moves_fixed: Vec<Move>,
    pub rounds: Vec<RoundResult>,
}

/// Play `strategy` against the script for `config.rounds()` rounds. The
/// trace is always kept.
///
/// A strategy that cannot decide on round 1 for lack of history is given
/// Cooperate for that round. Any later failure ends the evaluation.
pub fn play_against_fixed(
    strategy: &mut dyn Strategy,
    opponent: &FixedOpponent,
    config: &MatchConfig,
    payoff: &PayoffMatrix,
    rng: &mut SeededRng,
) -> Result<FixedResult, EngineError> {
    let rounds = config.rounds();
    strategy.set_total_rounds(rounds);
    let mut result = FixedResult::default();

    for round in 0..rounds {
        let own = match strategy.next_move(rng) {
            Ok(mv) => mv,
            Err(StrategyError::MissingHistory) if round == 0 => {
                warn!("strategy needs history on the first round; playing Cooperate");
                Move::Cooperate
            }
            Err(err) => return Err(EngineError::from_strategy(Seat::A, err)),
        };
        let scripted = opponent.move_at(round as usize);

        let (score_self, score_fixed) = payoff.payoff(own, scripted);
        strategy.record_result(own, scripted);

        result.total_self += score_self as u64;
        result.total_fixed += score_fixed as u64;
        result.moves_self.push(own);
        result.moves_fixed.push(scripted);
        result.rounds.push(RoundResult {
            round,
            move_a: own,
            move_b: scripted,
            score_a: score_self,
            score_b: score_fixed,
            cumulative_a: result.total_self,
            cumulative_b: result.total_fixed,
        });
    }

    Ok(result)
}
