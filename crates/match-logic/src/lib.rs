//! Match Logic for the Iterated Prisoner's Dilemma
//!
//! Core game logic: moves and payoffs, the strategy contract, every built-in
//! strategy, the round engine and match orchestrator, the fixed-opponent
//! evaluator and round-robin pair enumeration. Pure and deterministic given
//! a seed; the tournament lifecycle lives in `ipd-arena`.

mod adaptive;
mod catalog;
mod error;
mod fixed;
mod game;
mod lookahead;
mod pairing;
mod payoff;
mod random;
mod reactive;
mod strategy;

pub use adaptive::{
    BeliefParams, BeliefPhase, FreshStartParams, Harrington, TidemanChieruzzi, WindowParams,
    WindowedProbability,
};
pub use catalog::{standard_roster, StrategyFactory, StrategyKind, StrategySpec};
pub use error::{ConfigError, EngineError, FixedScriptError, Seat, StrategyError};
pub use fixed::{play_against_fixed, FixedOpponent, FixedResult};
pub use game::{play_game, play_round, MatchConfig, MatchResult, RoundOutcome, RoundResult};
pub use lookahead::{Evaluation, Lookahead, LookaheadParams, MaxMax, MiniMax, Pruning, TieBreak};
pub use pairing::{calculate_match_count, generate_all_pairings, get_pairing_for_match};
pub use payoff::{PayoffMatrix, Score};
pub use random::{expand_seed, SeededRng};
pub use reactive::{
    AlwaysCooperate, AlwaysDefect, Davis, Feld, Graaskamp, Grofman, Grudger, Joss, Malthrin,
    Pavlov, RandomChoice, SuspiciousTitForTat, TitForTat, TitForTwoTats,
};
pub use strategy::{format_moves, parse_moves, History, Move, Strategy};

/// Match length assumed by endgame-aware strategies until told otherwise.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 100;
