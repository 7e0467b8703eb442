//! Tournament error codes

use std::io;
use std::path::PathBuf;

use ipd_match_logic::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed tournament config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("strategy name `{0}` is registered twice")]
    DuplicateName(String),

    #[error("tournament has no strategies")]
    EmptyRoster,
}
