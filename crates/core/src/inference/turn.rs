//! Inferring which side moved between two snapshots
//!
//! With sparsely sampled observations the engine cannot assume the mover
//! alternates with its own tracking, so the mover is inferred from the grids
//! themselves before any candidate search runs.

use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, FromSetup, Position};
use tracing::debug;

use super::search::best_candidate;
use crate::error::{Error, Result};
use crate::grid::OccupancyGrid;
use crate::policy::MatchPolicy;

/// Returns a copy of `position` with the given side to move.
///
/// The rewrite goes through `Setup` directly instead of round-tripping a FEN
/// string. Any en-passant square is dropped: it cannot survive a turn change.
/// The forced position may be unreachable (for example the side now not to
/// move stands in check); that surfaces as an error.
pub fn with_side_to_move(position: &Chess, side: Color) -> Result<Chess> {
    if position.turn() == side {
        return Ok(position.clone());
    }

    let mut setup = position.to_setup(EnPassantMode::Legal);
    setup.turn = side;
    setup.ep_square = None;

    Chess::from_setup(setup, CastlingMode::Standard)
        .map_err(|e| Error::InvalidPosition(e.to_string()))
}

/// Infers the side that moved between `prev` and `next`.
///
/// Piece-count deltas decide first: moving never changes the mover's own
/// piece count, so when one color's count changes it is the *other* color
/// that moved and captured. Without a capture, the candidate search runs
/// under both forced-turn hypotheses at the tighter `turn_threshold` and the
/// side with the strictly higher best score wins; a side with the only
/// candidates wins outright. Ties fall back to the position's own recorded
/// side to move, which is a permissive default rather than an inference.
///
/// Returns `None` only when the grids are identical. The authoritative
/// position is never touched; hypotheses are scratch copies.
pub fn infer_turn(
    prev: &OccupancyGrid,
    next: &OccupancyGrid,
    position: &Chess,
    policy: &MatchPolicy,
) -> Option<Color> {
    if prev == next {
        return None;
    }

    if prev.light_count() != next.light_count() {
        return Some(Color::Black);
    }
    if prev.dark_count() != next.dark_count() {
        return Some(Color::White);
    }

    let best_for = |side: Color| -> Option<u32> {
        let hypothesis = with_side_to_move(position, side).ok()?;
        best_candidate(&hypothesis, next, policy.turn_threshold).map(|c| c.score)
    };

    let white = best_for(Color::White);
    let black = best_for(Color::Black);
    debug!(?white, ?black, "turn hypothesis scores");

    match (white, black) {
        (Some(w), Some(b)) if w > b => Some(Color::White),
        (Some(w), Some(b)) if b > w => Some(Color::Black),
        (Some(_), None) => Some(Color::White),
        (None, Some(_)) => Some(Color::Black),
        // Tied or both empty: trust internal tracking.
        _ => Some(position.turn()),
    }
}
