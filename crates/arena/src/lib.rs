//! Round-robin tournament for the Iterated Prisoner's Dilemma
//!
//! Loads a [`TournamentConfig`], builds a [`Roster`] of named strategy
//! factories and plays every unordered pair once with
//! [`ipd_match_logic::play_game`]. Enable the `parallel` feature to spread
//! matches across rayon workers; results are identical either way.
//!
//! The crate only emits `log` records. Install a logger in the binary that
//! embeds it to see per-match lines.

mod config;
mod error;
mod report;
mod roster;
mod tournament;

pub use config::{StrategyEntry, TournamentConfig};
pub use error::ArenaError;
pub use report::Standings;
pub use roster::{Entrant, Roster};
pub use tournament::{MatchFailure, MatchRecord, Tournament, TournamentResult};
