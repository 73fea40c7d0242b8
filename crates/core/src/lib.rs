//! Chess Scribe Core Library
//!
//! Reconstructs a chess game's move list and PGN record from color-only
//! occupancy snapshots of the board. The camera only ever reports
//! empty/light/dark per square, so move semantics are recovered the inverse
//! way: every legal move is simulated and scored against the observation,
//! with legality as the primary disambiguator and square-match count as the
//! tie-breaker.

use shakmaty::Chess;

pub mod error;
pub mod grid;
pub mod inference;
pub mod policy;
pub mod record;
pub mod replay;
pub mod session;

pub use error::{Error, Result};
pub use grid::{Occupancy, OccupancyGrid};
pub use inference::{best_candidate, infer_turn, CandidateMove};
pub use policy::MatchPolicy;
pub use record::{GameRecord, RecordHeaders};
pub use session::{GameSession, ObservationReport};

/// Creates the standard starting position.
pub fn starting_position() -> Chess {
    Chess::default()
}

/// Snapshot of the standard starting position.
pub fn starting_grid() -> OccupancyGrid {
    OccupancyGrid::from_position(&starting_position())
}
