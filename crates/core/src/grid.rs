//! Color-only occupancy snapshots
//!
//! The vision pipeline reports each square as empty, light piece or dark
//! piece; piece identity never survives the camera. Row 0 is rank 8 (the far
//! rank from the light side), column 0 is file a.

use serde::{Deserialize, Serialize};
use shakmaty::{Board, Color, Position, Square};
use std::fmt;

/// What a single square looks like to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupancy {
    Empty,
    Light,
    Dark,
}

impl Occupancy {
    pub fn from_color(color: Color) -> Self {
        match color {
            Color::White => Occupancy::Light,
            Color::Black => Occupancy::Dark,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Occupancy::Empty => '.',
            Occupancy::Light => 'w',
            Occupancy::Dark => 'b',
        }
    }
}

/// An 8x8 tri-state snapshot of the board.
///
/// Grids compare cell by cell. A snapshot may be noisy or even impossible as
/// a chess position; nothing here enforces reachability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyGrid {
    cells: [[Occupancy; 8]; 8],
}

impl OccupancyGrid {
    /// Total number of squares, and therefore the maximum match score.
    pub const SQUARES: u32 = 64;

    pub fn empty() -> Self {
        Self {
            cells: [[Occupancy::Empty; 8]; 8],
        }
    }

    pub fn from_cells(cells: [[Occupancy; 8]; 8]) -> Self {
        Self { cells }
    }

    /// Collapses a full position to color-only occupancy.
    pub fn from_position<P: Position>(position: &P) -> Self {
        Self::from_board(position.board())
    }

    pub fn from_board(board: &Board) -> Self {
        let mut cells = [[Occupancy::Empty; 8]; 8];

        for square in Square::ALL {
            if let Some(piece) = board.piece_at(square) {
                let row = 7 - square.rank() as usize;
                let col = square.file() as usize;
                cells[row][col] = Occupancy::from_color(piece.color);
            }
        }

        Self { cells }
    }

    pub fn at(&self, square: Square) -> Occupancy {
        self.cells[7 - square.rank() as usize][square.file() as usize]
    }

    pub fn set(&mut self, square: Square, value: Occupancy) {
        self.cells[7 - square.rank() as usize][square.file() as usize] = value;
    }

    pub fn rows(&self) -> &[[Occupancy; 8]; 8] {
        &self.cells
    }

    /// Number of squares where the two snapshots disagree.
    pub fn diff_count(&self, other: &OccupancyGrid) -> u32 {
        Self::SQUARES - self.matching_squares(other)
    }

    /// Number of squares where the two snapshots agree (0-64).
    pub fn matching_squares(&self, other: &OccupancyGrid) -> u32 {
        self.cells
            .iter()
            .flatten()
            .zip(other.cells.iter().flatten())
            .filter(|(a, b)| a == b)
            .count() as u32
    }

    pub fn count(&self, value: Occupancy) -> u32 {
        self.cells.iter().flatten().filter(|c| **c == value).count() as u32
    }

    pub fn light_count(&self) -> u32 {
        self.count(Occupancy::Light)
    }

    pub fn dark_count(&self) -> u32 {
        self.count(Occupancy::Dark)
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for cell in cells {
                write!(f, "{} ", cell.as_char())?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{san::San, Chess};

    fn after_e4() -> Chess {
        let pos = Chess::default();
        let mv = "e4".parse::<San>().unwrap().to_move(&pos).unwrap();
        pos.play(mv).unwrap()
    }

    #[test]
    fn test_starting_grid_counts() {
        let grid = OccupancyGrid::from_position(&Chess::default());
        assert_eq!(grid.light_count(), 16);
        assert_eq!(grid.dark_count(), 16);
        assert_eq!(grid.count(Occupancy::Empty), 32);
    }

    #[test]
    fn test_orientation() {
        let grid = OccupancyGrid::from_position(&Chess::default());
        // Row 0 is rank 8: dark back rank. Row 7 is rank 1: light back rank.
        assert_eq!(grid.rows()[0][0], Occupancy::Dark);
        assert_eq!(grid.rows()[7][4], Occupancy::Light);
        assert_eq!(grid.at(Square::E1), Occupancy::Light);
        assert_eq!(grid.at(Square::E8), Occupancy::Dark);
        assert_eq!(grid.at(Square::E4), Occupancy::Empty);
    }

    #[test]
    fn test_diff_after_one_move() {
        let before = OccupancyGrid::from_position(&Chess::default());
        let after = OccupancyGrid::from_position(&after_e4());
        assert_eq!(before.diff_count(&after), 2);
        assert_eq!(before.matching_squares(&after), 62);
    }

    #[test]
    fn test_identical_grids_match_fully() {
        let grid = OccupancyGrid::from_position(&Chess::default());
        assert_eq!(grid.matching_squares(&grid.clone()), OccupancyGrid::SQUARES);
        assert_eq!(grid.diff_count(&grid.clone()), 0);
    }

    #[test]
    fn test_set_overrides_cell() {
        let mut grid = OccupancyGrid::empty();
        grid.set(Square::C3, Occupancy::Light);
        assert_eq!(grid.at(Square::C3), Occupancy::Light);
        assert_eq!(grid.light_count(), 1);
    }
}
