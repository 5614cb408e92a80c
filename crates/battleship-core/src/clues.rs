use crate::{CellState, Grid};
use serde::{Deserialize, Serialize};

/// Ship-cell counts per row and column, shown around the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clues {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
}

impl Clues {
    /// Count ship cells per row and column of a solved grid.
    ///
    /// Deterministic and idempotent; deriving twice from the same grid gives
    /// the same clues.
    pub fn derive(grid: &Grid) -> Self {
        let size = grid.size();
        Self {
            rows: (0..size)
                .map(|row| grid.count_in_row(row, CellState::Ship))
                .collect(),
            cols: (0..size)
                .map(|col| grid.count_in_col(col, CellState::Ship))
                .collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Sum over rows; equals the sum over columns for any real board
    pub fn total(&self) -> usize {
        self.rows.iter().sum()
    }

    /// Row already holds exactly as many ship cells as its clue
    pub fn row_satisfied(&self, grid: &Grid, row: usize) -> bool {
        grid.count_in_row(row, CellState::Ship) == self.rows[row]
    }

    pub fn col_satisfied(&self, grid: &Grid, col: usize) -> bool {
        grid.count_in_col(col, CellState::Ship) == self.cols[col]
    }

    /// Row holds more ship cells than its clue allows
    pub fn row_overfilled(&self, grid: &Grid, row: usize) -> bool {
        grid.count_in_row(row, CellState::Ship) > self.rows[row]
    }

    pub fn col_overfilled(&self, grid: &Grid, col: usize) -> bool {
        grid.count_in_col(col, CellState::Ship) > self.cols[col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn grid_with_ships(size: usize, ships: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(size);
        for &(row, col) in ships {
            grid.set(Position::new(row, col), CellState::Ship);
        }
        grid
    }

    #[test]
    fn test_derive_counts() {
        let grid = grid_with_ships(8, &[(0, 0), (0, 1), (0, 2), (4, 5), (7, 5)]);
        let clues = Clues::derive(&grid);

        assert_eq!(clues.rows[0], 3);
        assert_eq!(clues.rows[4], 1);
        assert_eq!(clues.rows[1], 0);
        assert_eq!(clues.cols[5], 2);
        assert_eq!(clues.cols[0], 1);
        assert_eq!(clues.total(), 5);
        assert_eq!(clues.cols.iter().sum::<usize>(), 5);
    }

    #[test]
    fn test_derive_is_deterministic() {
        let grid = grid_with_ships(8, &[(1, 1), (3, 3), (3, 4)]);
        assert_eq!(Clues::derive(&grid), Clues::derive(&grid));
    }

    #[test]
    fn test_satisfied_and_overfilled() {
        let solution = grid_with_ships(8, &[(0, 0), (0, 1)]);
        let clues = Clues::derive(&solution);

        let mut player = Grid::new(8);
        assert!(!clues.row_satisfied(&player, 0));
        assert!(clues.row_satisfied(&player, 1));

        player.set(Position::new(0, 0), CellState::Ship);
        player.set(Position::new(0, 1), CellState::Ship);
        assert!(clues.row_satisfied(&player, 0));
        assert!(!clues.row_overfilled(&player, 0));

        player.set(Position::new(0, 5), CellState::Ship);
        assert!(clues.row_overfilled(&player, 0));
    }
}
