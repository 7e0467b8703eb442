//! Explicit strategy registry

use ipd_match_logic::{PayoffMatrix, Strategy, StrategyFactory};

use crate::config::StrategyEntry;
use crate::error::ArenaError;

/// A named participant. Every match gets a fresh instance from `factory`.
pub struct Entrant {
    name: String,
    factory: StrategyFactory,
}

impl Entrant {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instantiate(&self) -> Box<dyn Strategy + Send> {
        (self.factory)()
    }
}

impl std::fmt::Debug for Entrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entrant").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Ordered list of entrants; the index is the participant id used by pairing.
#[derive(Debug, Default)]
pub struct Roster {
    entrants: Vec<Entrant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), ArenaError>
    where
        F: Fn() -> Box<dyn Strategy + Send> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.entrants.iter().any(|e| e.name == name) {
            return Err(ArenaError::DuplicateName(name));
        }
        self.entrants.push(Entrant { name, factory: Box::new(factory) });
        Ok(())
    }

    /// Build from configuration entries, validating every parameter set.
    pub fn from_specs(entries: &[StrategyEntry], payoff: &PayoffMatrix) -> Result<Self, ArenaError> {
        let mut roster = Self::new();
        for entry in entries {
            let factory = entry.spec.factory(payoff)?;
            roster.register(entry.display_name(), factory)?;
        }
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&Entrant> {
        self.entrants.get(index as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entrant> {
        self.entrants.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entrants.iter().map(|e| e.name()).collect()
    }
}
