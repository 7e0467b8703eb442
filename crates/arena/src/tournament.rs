//! Round-robin tournament lifecycle

use ipd_match_logic::{
    calculate_match_count, expand_seed, get_pairing_for_match, play_game, MatchConfig, Move,
    PayoffMatrix, RoundResult, SeededRng,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::TournamentConfig;
use crate::error::ArenaError;
use crate::report::Standings;
use crate::roster::Roster;

/// Outcome of one scheduled pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_index: u32,
    pub name_a: String,
    pub name_b: String,
    pub score_a: u64,
    pub score_b: u64,
    pub moves_a: Vec<Move>,
    pub moves_b: Vec<Move>,
    /// Empty unless traces were requested
    pub trace: Vec<RoundResult>,
}

/// A match that aborted; its partial scores are discarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFailure {
    pub match_index: u32,
    pub name_a: String,
    pub name_b: String,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TournamentResult {
    pub matches: Vec<MatchRecord>,
    pub failures: Vec<MatchFailure>,
    pub standings: Standings,
}

pub struct Tournament {
    roster: Roster,
    payoff: PayoffMatrix,
    match_config: MatchConfig,
    seed: [u8; 32],
}

impl Tournament {
    pub fn new(roster: Roster, config: &TournamentConfig) -> Result<Self, ArenaError> {
        if roster.is_empty() {
            return Err(ArenaError::EmptyRoster);
        }
        Ok(Self {
            roster,
            payoff: config.payoff,
            match_config: config.match_config()?,
            seed: expand_seed(config.seed),
        })
    }

    /// Roster built from the configured strategy entries.
    pub fn from_config(config: &TournamentConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        let roster = Roster::from_specs(&config.strategies, &config.payoff)?;
        Self::new(roster, config)
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn match_count(&self) -> u32 {
        calculate_match_count(self.roster.len() as u32)
    }

    /// Play one scheduled match with fresh strategy instances.
    ///
    /// Returns `None` past the end of the schedule.
    pub fn play_match(&self, match_index: u32) -> Option<Result<MatchRecord, MatchFailure>> {
        let (idx_a, idx_b) = get_pairing_for_match(self.roster.len() as u32, match_index)?;
        let entrant_a = self.roster.get(idx_a)?;
        let entrant_b = self.roster.get(idx_b)?;

        let mut strategy_a = entrant_a.instantiate();
        let mut strategy_b = entrant_b.instantiate();
        let rng = SeededRng::new(&self.seed, match_index);

        let outcome = play_game(
            &mut strategy_a,
            &mut strategy_b,
            &self.match_config,
            &self.payoff,
            &rng,
        );

        Some(match outcome {
            Ok(result) => Ok(MatchRecord {
                match_index,
                name_a: entrant_a.name().to_string(),
                name_b: entrant_b.name().to_string(),
                score_a: result.total_score_a,
                score_b: result.total_score_b,
                moves_a: result.moves_a,
                moves_b: result.moves_b,
                trace: result.rounds,
            }),
            Err(err) => Err(MatchFailure {
                match_index,
                name_a: entrant_a.name().to_string(),
                name_b: entrant_b.name().to_string(),
                error: err.to_string(),
            }),
        })
    }

    /// Play every pair once and fold the results in match-index order.
    pub fn run(&self) -> TournamentResult {
        let total = self.match_count();
        info!(
            "Tournament: {} strategies, {} matches of {} rounds",
            self.roster.len(),
            total,
            self.match_config.rounds()
        );

        let outcomes = self.play_all(total);

        let mut standings = Standings::new(self.roster.names());
        let mut matches = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(record) => {
                    info!(
                        "{} vs {}: {}-{}",
                        record.name_a, record.name_b, record.score_a, record.score_b
                    );
                    standings.add(&record.name_a, record.score_a);
                    standings.add(&record.name_b, record.score_b);
                    matches.push(record);
                }
                Err(failure) => {
                    warn!(
                        "Match {} ({} vs {}) aborted: {}",
                        failure.match_index, failure.name_a, failure.name_b, failure.error
                    );
                    failures.push(failure);
                }
            }
        }

        info!(
            "Tournament: {}/{} matches completed, {} failed",
            matches.len(),
            total,
            failures.len()
        );
        TournamentResult { matches, failures, standings }
    }

    #[cfg(not(feature = "parallel"))]
    fn play_all(&self, total: u32) -> Vec<Result<MatchRecord, MatchFailure>> {
        (0..total).filter_map(|i| self.play_match(i)).collect()
    }

    #[cfg(feature = "parallel")]
    fn play_all(&self, total: u32) -> Vec<Result<MatchRecord, MatchFailure>> {
        use rayon::prelude::*;
        (0..total)
            .into_par_iter()
            .filter_map(|i| self.play_match(i))
            .collect()
    }
}
