//! Matching thresholds
//!
//! The numbers are carried-over field constants, not derived values; loosening
//! or tightening them changes which observations are accepted as moves.

use serde::{Deserialize, Serialize};

/// Tunable acceptance thresholds for move detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// A chess move always touches at least two squares, so fewer changed
    /// squares than this means no move happened.
    pub min_changed_squares: u32,
    /// Minimum match score (out of 64) for a candidate move to be accepted.
    /// The default tolerates four squares of observation noise.
    pub accept_threshold: u32,
    /// Tighter minimum used when ranking the two turn hypotheses against
    /// each other.
    pub turn_threshold: u32,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_changed_squares: 2,
            accept_threshold: 60,
            turn_threshold: 62,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let policy = MatchPolicy::default();
        assert_eq!(policy.min_changed_squares, 2);
        assert_eq!(policy.accept_threshold, 60);
        assert_eq!(policy.turn_threshold, 62);
    }
}
