//! Error types for chess-scribe-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("PGN parsing error: {0}")]
    Pgn(String),

    #[error("no valid games found in PGN")]
    NoGamesFound,

    /// The candidate search handed back a move the current position rejects.
    /// This indicates an internal inconsistency, not a bad observation.
    #[error("selected move {mv} is not legal in position {fen}")]
    IllegalSelectedMove { mv: String, fen: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
