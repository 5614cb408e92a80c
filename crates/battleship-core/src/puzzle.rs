use crate::{CellState, Clues, Difficulty, Grid, GridSize, Position, Ship};
use serde::{Deserialize, Serialize};

/// A generated puzzle: the solution, its clues, and the player's working grid.
///
/// `solution`, `ships`, and `clues` are fixed once generated; only `player`
/// changes during play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub grid_size: GridSize,
    pub difficulty: Difficulty,
    /// Ship lengths of the fleet, longest first
    pub fleet: Vec<usize>,
    pub solution: Grid,
    /// Ships as placed; ids are stable for the puzzle's lifetime
    pub ships: Vec<Ship>,
    pub clues: Clues,
    /// The live board the player marks up
    pub player: Grid,
}

impl Puzzle {
    pub fn new(
        grid_size: GridSize,
        difficulty: Difficulty,
        solution: Grid,
        ships: Vec<Ship>,
        clues: Clues,
        player: Grid,
    ) -> Self {
        Self {
            grid_size,
            difficulty,
            fleet: grid_size.fleet().to_vec(),
            solution,
            ships,
            clues,
            player,
        }
    }

    /// Non-Empty cells in the player grid
    pub fn revealed_count(&self) -> usize {
        self.player.count(CellState::Water) + self.player.count(CellState::Ship)
    }
}

/// Clue-bordered text rendering of the player grid, for logs and exports
impl std::fmt::Display for Puzzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for &clue in &self.clues.cols {
            write!(f, "{:>2}", clue)?;
        }
        writeln!(f)?;
        for row in 0..self.player.size() {
            write!(f, "{:>2} ", self.clues.rows[row])?;
            for col in 0..self.player.size() {
                write!(f, " {}", self.player.get(Position::new(row, col)).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_puzzle() -> Puzzle {
        let mut solution = Grid::new(8);
        for pos in Position::all(8).collect::<Vec<_>>() {
            solution.set(pos, CellState::Water);
        }
        solution.set(Position::new(0, 0), CellState::Ship);
        let ships = vec![Ship::new(
            0,
            Position::new(0, 0),
            crate::Orientation::Horizontal,
            1,
        )];
        let clues = Clues::derive(&solution);
        let player = Grid::new(8);
        Puzzle::new(
            GridSize::Eight,
            Difficulty::Medium,
            solution,
            ships,
            clues,
            player,
        )
    }

    #[test]
    fn test_fleet_copied_from_catalog() {
        let puzzle = tiny_puzzle();
        assert_eq!(puzzle.fleet, GridSize::Eight.fleet().to_vec());
    }

    #[test]
    fn test_revealed_count() {
        let mut puzzle = tiny_puzzle();
        assert_eq!(puzzle.revealed_count(), 0);
        puzzle.player.set(Position::new(0, 0), CellState::Ship);
        puzzle.player.set(Position::new(5, 5), CellState::Water);
        assert_eq!(puzzle.revealed_count(), 2);
    }

    #[test]
    fn test_display_shows_clue_border() {
        let mut puzzle = tiny_puzzle();
        puzzle.player.set(Position::new(0, 0), CellState::Ship);
        let text = format!("{}", puzzle);
        let mut lines = text.lines();
        // Header carries the column clues, first row starts with its clue
        assert!(lines.next().unwrap().contains('1'));
        assert!(lines.next().unwrap().starts_with(" 1  #"));
    }

    #[test]
    fn test_serde_round_trip() {
        let puzzle = tiny_puzzle();
        let json = serde_json::to_string(&puzzle).unwrap();
        let back: Puzzle = serde_json::from_str(&json).unwrap();
        assert_eq!(puzzle, back);
    }
}
