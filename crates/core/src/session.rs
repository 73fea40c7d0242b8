//! Game session: authoritative position, last snapshot and running record
//!
//! One session is one game. Calls are strictly sequential; every observation
//! is folded into the position left by the previous one. Failures of any kind
//! leave the session exactly as it was so the caller can retry with the next
//! frame.

use serde::Serialize;
use shakmaty::{fen::Fen, san::SanPlus, CastlingMode, Chess, Color, EnPassantMode, Position};
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::grid::OccupancyGrid;
use crate::inference::{best_candidate, infer_turn, with_side_to_move};
use crate::policy::MatchPolicy;
use crate::record::{GameRecord, RecordHeaders};

/// The outcome of a single observation, bundled with the session state a
/// caller typically wants to log or ship per frame.
#[derive(Debug, Clone, Serialize)]
pub struct ObservationReport {
    /// Formatted notation fragment ("1. e4" or "e5"), if a move was found.
    pub fragment: Option<String>,
    /// Bare SAN of the detected move.
    pub detected_san: Option<String>,
    /// FEN of the authoritative position after this observation.
    pub fen: String,
    /// The full PGN so far.
    pub pgn: String,
}

pub struct GameSession {
    position: Chess,
    previous_grid: OccupancyGrid,
    record: GameRecord,
    policy: MatchPolicy,
}

impl GameSession {
    /// Starts a session from the standard starting position.
    pub fn new() -> Self {
        let position = Chess::default();
        let previous_grid = OccupancyGrid::from_position(&position);
        Self {
            position,
            previous_grid,
            record: GameRecord::new(),
            policy: MatchPolicy::default(),
        }
    }

    /// Starts a session from an arbitrary position.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let parsed: Fen = fen.parse().map_err(|e| Error::InvalidFen(format!("{}", e)))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| Error::InvalidPosition(e.to_string()))?;
        let previous_grid = OccupancyGrid::from_position(&position);

        Ok(Self {
            position,
            previous_grid,
            record: GameRecord::from_setup_fen(fen),
            policy: MatchPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_headers(mut self, headers: RecordHeaders) -> Self {
        self.record.set_headers(headers);
        self
    }

    /// Processes a snapshot without being told who moved.
    ///
    /// Infers the moving side from the grids first, then defers to
    /// [`update`](Self::update). Returns the notation fragment, or `None`
    /// when nothing changed or no move explains the observation.
    pub fn process(&mut self, grid: &OccupancyGrid) -> Option<String> {
        if self.previous_grid == *grid {
            debug!("no board change detected");
            return None;
        }

        let side = infer_turn(&self.previous_grid, grid, &self.position, &self.policy)?;
        debug!(?side, "inferred moving side");
        self.update(grid, Some(side))
    }

    /// Detects the move explaining `grid` and folds it into the game.
    ///
    /// A `forced_side` overrides the position's own side-to-move tracking:
    /// the caller knows who moved, trust that over internal state. The whole
    /// operation is atomic: until a move is accepted and applied, neither the
    /// position nor the record nor the last snapshot is mutated.
    pub fn update(&mut self, grid: &OccupancyGrid, forced_side: Option<Color>) -> Option<String> {
        let working = match forced_side {
            Some(side) if side != self.position.turn() => {
                debug!(?side, "adjusting side to move");
                match with_side_to_move(&self.position, side) {
                    Ok(position) => position,
                    Err(e) => {
                        warn!(error = %e, "cannot force side to move");
                        return None;
                    }
                }
            }
            _ => self.position.clone(),
        };

        if self.previous_grid.diff_count(grid) < self.policy.min_changed_squares {
            debug!("too few squares changed, no move detected");
            return None;
        }

        let candidate = match best_candidate(&working, grid, self.policy.accept_threshold) {
            Some(candidate) => candidate,
            None => {
                let fen = Fen::from_position(&working, EnPassantMode::Legal);
                debug!(%fen, "no candidate move matches the observed grid");
                return None;
            }
        };
        debug!(score = candidate.score, "best candidate selected");

        // The candidate came out of this very position's legal-move
        // enumeration; failing here means the search and the position
        // disagree about legality.
        if !working.legal_moves().contains(&candidate.mv) {
            let defect = Error::IllegalSelectedMove {
                mv: format!("{:?}", candidate.mv),
                fen: Fen::from_position(&working, EnPassantMode::Legal).to_string(),
            };
            error!(error = %defect, "refusing move the position rejects");
            return None;
        }

        // SAN must be rendered against the pre-move position.
        let san = SanPlus::from_move(working.clone(), candidate.mv.clone()).to_string();

        let mover = working.turn();
        let number = working.fullmoves().get();

        let next_position = match working.play(candidate.mv) {
            Ok(position) => position,
            Err(e) => {
                error!(error = %e, "failed to apply selected move");
                return None;
            }
        };

        self.position = next_position;
        self.record.push(number, mover, san.clone());
        self.previous_grid = grid.clone();

        let fragment = GameRecord::fragment(number, mover, &san);
        debug!(%fragment, "board updated");
        Some(fragment)
    }

    /// Processes a snapshot and bundles the outcome with the session state.
    pub fn observe(&mut self, grid: &OccupancyGrid) -> ObservationReport {
        let fragment = self.process(grid);
        let detected_san = match &fragment {
            Some(_) => self.record.plies().last().map(|ply| ply.san.clone()),
            None => None,
        };

        ObservationReport {
            fragment,
            detected_san,
            fen: self.fen(),
            pgn: self.pgn(),
        }
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.position, EnPassantMode::Legal).to_string()
    }

    /// The most recent snapshot folded into the game.
    pub fn last_grid(&self) -> &OccupancyGrid {
        &self.previous_grid
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn pgn(&self) -> String {
        self.record.pgn()
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
