//! Tournament configuration

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use ipd_match_logic::{standard_roster, MatchConfig, PayoffMatrix, StrategySpec, DEFAULT_TOTAL_ROUNDS};
use serde::{Deserialize, Serialize};

use crate::error::ArenaError;

/// One roster slot: a strategy and an optional display name.
///
/// Without a name the strategy's own name is used, so the same strategy can
/// appear twice only if at least one copy is renamed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub spec: StrategySpec,
}

impl StrategyEntry {
    pub fn new(spec: StrategySpec) -> Self {
        Self { name: None, spec }
    }

    pub fn named(name: impl Into<String>, spec: StrategySpec) -> Self {
        Self { name: Some(name.into()), spec }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.spec.name())
    }
}

/// Global tournament settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Rounds per match
    pub rounds: u32,
    /// Tournament randomness seed; every match derives its own stream
    pub seed: u64,
    pub payoff: PayoffMatrix,
    pub strategies: Vec<StrategyEntry>,
    /// Keep the per-round trace of every match
    pub record_traces: bool,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_TOTAL_ROUNDS,
            seed: 0,
            payoff: PayoffMatrix::canonical(),
            strategies: standard_roster().into_iter().map(StrategyEntry::new).collect(),
            record_traces: false,
        }
    }
}

impl TournamentConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArenaError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| ArenaError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ArenaError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn match_config(&self) -> Result<MatchConfig, ArenaError> {
        Ok(MatchConfig::new(self.rounds)?.with_trace(self.record_traces))
    }

    pub fn validate(&self) -> Result<(), ArenaError> {
        self.match_config()?;
        if self.strategies.is_empty() {
            return Err(ArenaError::EmptyRoster);
        }
        let mut seen = HashSet::new();
        for entry in &self.strategies {
            let name = entry.display_name();
            if !seen.insert(name) {
                return Err(ArenaError::DuplicateName(name.to_string()));
            }
            entry.spec.validate(&self.payoff)?;
        }
        Ok(())
    }
}
