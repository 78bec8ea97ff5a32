//! Error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    /// An enemy looked for the player and the roster has none
    #[error("no player in roster")]
    PlayerMissing,

    /// The roster holds at most one player
    #[error("roster already holds a player")]
    DuplicatePlayer,

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidConfig(String),

    /// Terminal setup, event reading or drawing failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
