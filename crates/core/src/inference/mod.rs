//! Move and turn inference from occupancy snapshots

mod search;
mod turn;

pub use search::{best_candidate, CandidateMove};
pub use turn::{infer_turn, with_side_to_move};
