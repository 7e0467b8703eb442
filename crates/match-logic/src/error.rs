//! Error types for strategies, the round engine and configuration

use std::fmt;

use thiserror::Error;

/// Which side of a match a player occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Seat {
    A,
    B,
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::A => write!(f, "player A"),
            Seat::B => write!(f, "player B"),
        }
    }
}

/// A strategy could not produce a move.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("`{value}` is not a move (expected C or D)")]
    InvalidMove { value: String },

    #[error("strategy cannot decide without history")]
    MissingHistory,
}

/// Fatal failure of a single match.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{seat} returned invalid move `{value}`")]
    InvalidMove { seat: Seat, value: String },

    #[error("{seat} failed to move: {source}")]
    Strategy {
        seat: Seat,
        #[source]
        source: StrategyError,
    },
}

impl EngineError {
    /// Attribute a strategy failure to the seat that produced it.
    pub fn from_strategy(seat: Seat, err: StrategyError) -> Self {
        match err {
            StrategyError::InvalidMove { value } => EngineError::InvalidMove { seat, value },
            source => EngineError::Strategy { seat, source },
        }
    }

    pub fn seat(&self) -> Seat {
        match self {
            EngineError::InvalidMove { seat, .. } | EngineError::Strategy { seat, .. } => *seat,
        }
    }
}

/// Invalid parameters, raised before any round is played.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("payoffs must satisfy temptation > reward > punishment > sucker (got T={temptation}, R={reward}, P={punishment}, S={sucker})")]
    InvalidPayoff {
        reward: u32,
        sucker: u32,
        temptation: u32,
        punishment: u32,
    },

    #[error("round count must be positive")]
    ZeroRounds,

    #[error("search depth must be at least 1")]
    ZeroDepth,

    #[error("{field} = {value} is outside its allowed range")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("fixed opponent sequence is empty")]
    EmptySequence,

    #[error("evaluation window must be at least one round")]
    ZeroWindow,
}

/// A fixed-opponent script could not be built from text.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FixedScriptError {
    #[error(transparent)]
    Parse(#[from] StrategyError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Check that a probability-like parameter lies in `[0, 1]`.
pub(crate) fn unit_interval(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
