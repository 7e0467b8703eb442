//! Strategy contract, moves and per-instance history

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StrategyError;
use crate::payoff::{PayoffMatrix, Score};
use crate::random::SeededRng;

/// A move in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    /// Single-letter form used in traces and fixed sequences.
    pub fn symbol(self) -> char {
        match self {
            Move::Cooperate => 'C',
            Move::Defect => 'D',
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self, StrategyError> {
        match symbol {
            'C' | 'c' => Ok(Move::Cooperate),
            'D' | 'd' => Ok(Move::Defect),
            other => Err(StrategyError::InvalidMove { value: other.to_string() }),
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Move::Cooperate => Move::Defect,
            Move::Defect => Move::Cooperate,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Parse a compact move string such as `"CDDC"` (whitespace ignored).
pub fn parse_moves(text: &str) -> Result<Vec<Move>, StrategyError> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(Move::from_symbol)
        .collect()
}

/// Render moves back into their compact string form.
pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().map(|m| m.symbol()).collect()
}

/// A decision procedure for one side of a match.
///
/// Each instance owns its own [`History`] and state; the engine never lets
/// one instance see another's.
pub trait Strategy {
    /// Choose this round's move. Well-formed strategies succeed on an
    /// empty history (round 1).
    fn next_move(&mut self, rng: &mut SeededRng) -> Result<Move, StrategyError>;

    /// Absorb the outcome of the round just played. Called exactly once per
    /// round, own move first. History-blind strategies may discard it.
    fn record_result(&mut self, own: Move, opponent: Move);

    /// Total-rounds hint, set before the first round. Strategies that do not
    /// care about the match length ignore it.
    fn set_total_rounds(&mut self, _total: u32) {}
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn next_move(&mut self, rng: &mut SeededRng) -> Result<Move, StrategyError> {
        (**self).next_move(rng)
    }

    fn record_result(&mut self, own: Move, opponent: Move) {
        (**self).record_result(own, opponent)
    }

    fn set_total_rounds(&mut self, total: u32) {
        (**self).set_total_rounds(total)
    }
}

/// Append-only record of one instance's view of the match.
///
/// `own()[i]` and `opponent()[i]` always describe the same round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    own: Vec<Move>,
    opponent: Vec<Move>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, own: Move, opponent: Move) {
        self.own.push(own);
        self.opponent.push(opponent);
    }

    pub fn own(&self) -> &[Move] {
        &self.own
    }

    pub fn opponent(&self) -> &[Move] {
        &self.opponent
    }

    pub fn len(&self) -> usize {
        self.own.len()
    }

    pub fn is_empty(&self) -> bool {
        self.own.is_empty()
    }

    pub fn last_own(&self) -> Option<Move> {
        self.own.last().copied()
    }

    pub fn last_opponent(&self) -> Option<Move> {
        self.opponent.last().copied()
    }

    pub fn opponent_defections(&self) -> usize {
        self.opponent.iter().filter(|m| **m == Move::Defect).count()
    }

    pub fn opponent_has_defected(&self) -> bool {
        self.opponent.contains(&Move::Defect)
    }

    /// Length of the opponent's current run of consecutive defections.
    pub fn opponent_defection_run(&self) -> usize {
        self.opponent
            .iter()
            .rev()
            .take_while(|m| **m == Move::Defect)
            .count()
    }

    /// Fraction of rounds in which the opponent cooperated (0 when empty).
    pub fn opponent_cooperation_rate(&self) -> f64 {
        if self.opponent.is_empty() {
            return 0.0;
        }
        (self.opponent.len() - self.opponent_defections()) as f64 / self.opponent.len() as f64
    }

    /// Recompute (own, opponent) totals from the recorded rounds.
    pub fn scores(&self, payoff: &PayoffMatrix) -> (Score, Score) {
        self.own
            .iter()
            .zip(&self.opponent)
            .fold((0, 0), |(mine, theirs), (m, o)| {
                let (a, b) = payoff.payoff(*m, *o);
                (mine + a, theirs + b)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Move::{Cooperate as C, Defect as D};

    fn history(own: &str, opponent: &str) -> History {
        let mut h = History::new();
        for (m, o) in parse_moves(own).unwrap().into_iter().zip(parse_moves(opponent).unwrap()) {
            h.push(m, o);
        }
        h
    }

    #[test]
    fn test_symbols() {
        assert_eq!(C.symbol(), 'C');
        assert_eq!(D.to_string(), "D");
        assert_eq!(Move::from_symbol('d'), Ok(D));
        assert_eq!(
            Move::from_symbol('X'),
            Err(StrategyError::InvalidMove { value: "X".to_string() })
        );
        assert_eq!(C.flip(), D);
    }

    #[test]
    fn test_parse_and_format() {
        let moves = parse_moves("C D d").unwrap();
        assert_eq!(moves, vec![C, D, D]);
        assert_eq!(format_moves(&moves), "CDD");
        assert!(parse_moves("CXD").is_err());
        assert_eq!(parse_moves("").unwrap(), Vec::<Move>::new());
    }

    #[test]
    fn test_history_alignment() {
        let h = history("CCD", "DCD");
        assert_eq!(h.len(), 3);
        assert_eq!(h.own(), &[C, C, D]);
        assert_eq!(h.opponent(), &[D, C, D]);
        assert_eq!(h.last_own(), Some(D));
        assert_eq!(h.last_opponent(), Some(D));
    }

    #[test]
    fn test_defection_run() {
        assert_eq!(history("", "").opponent_defection_run(), 0);
        assert_eq!(history("CCCC", "DCDD").opponent_defection_run(), 2);
        assert_eq!(history("CCC", "DDC").opponent_defection_run(), 0);
        assert_eq!(history("CCC", "DDD").opponent_defections(), 3);
    }

    #[test]
    fn test_cooperation_rate() {
        assert_eq!(history("", "").opponent_cooperation_rate(), 0.0);
        assert_eq!(history("CCCC", "CCCD").opponent_cooperation_rate(), 0.75);
    }

    #[test]
    fn test_scores_from_history() {
        let h = history("CDD", "DCD");
        // (0,5) + (5,0) + (1,1)
        assert_eq!(h.scores(&PayoffMatrix::canonical()), (6, 6));
    }
}
