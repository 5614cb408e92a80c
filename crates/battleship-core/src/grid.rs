use serde::{Deserialize, Serialize};

/// State of a single cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Unknown / undetermined
    Empty,
    /// Known to contain no ship
    Water,
    /// Known to contain a ship segment
    Ship,
}

impl CellState {
    /// Next state in the play cycle: Empty -> Ship -> Water -> Empty
    pub fn cycled(self) -> Self {
        match self {
            CellState::Empty => CellState::Ship,
            CellState::Ship => CellState::Water,
            CellState::Water => CellState::Empty,
        }
    }

    /// Character used in plain-text board rendering
    pub fn glyph(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Water => '~',
            CellState::Ship => '#',
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        CellState::Empty
    }
}

/// A cell coordinate (row, col), zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

const ORTHOGONAL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL_OFFSETS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// All positions of a size x size board in row-major order
    pub fn all(size: usize) -> impl Iterator<Item = Position> {
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// In-bounds orthogonal neighbors (up, down, left, right)
    pub fn orthogonal_neighbors(self, size: usize) -> impl Iterator<Item = Position> {
        self.offset_neighbors(size, &ORTHOGONAL_OFFSETS)
    }

    /// In-bounds diagonal neighbors
    pub fn diagonal_neighbors(self, size: usize) -> impl Iterator<Item = Position> {
        self.offset_neighbors(size, &DIAGONAL_OFFSETS)
    }

    fn offset_neighbors(
        self,
        size: usize,
        offsets: &'static [(isize, isize)],
    ) -> impl Iterator<Item = Position> {
        let row = self.row as isize;
        let col = self.col as isize;
        let n = size as isize;
        offsets.iter().filter_map(move |&(dr, dc)| {
            let (r, c) = (row + dr, col + dc);
            if r >= 0 && r < n && c >= 0 && c < n {
                Some(Position::new(r as usize, c as usize))
            } else {
                None
            }
        })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Square board of cell states, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create an all-Empty board of the given side length
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![CellState::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    pub fn get(&self, pos: Position) -> CellState {
        self.cells[pos.row * self.size + pos.col]
    }

    pub fn set(&mut self, pos: Position, state: CellState) {
        self.cells[pos.row * self.size + pos.col] = state;
    }

    /// Iterate all cells with their positions, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        Position::all(self.size).map(move |pos| (pos, self.get(pos)))
    }

    /// Positions of one row, left to right
    pub fn row_positions(&self, row: usize) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).map(move |col| Position::new(row, col))
    }

    /// Positions of one column, top to bottom
    pub fn col_positions(&self, col: usize) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).map(move |row| Position::new(row, col))
    }

    pub fn count_in_row(&self, row: usize, state: CellState) -> usize {
        self.row_positions(row)
            .filter(|&pos| self.get(pos) == state)
            .count()
    }

    pub fn count_in_col(&self, col: usize, state: CellState) -> usize {
        self.col_positions(col)
            .filter(|&pos| self.get(pos) == state)
            .count()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// True when no cell is Empty
    pub fn is_fully_determined(&self) -> bool {
        !self.cells.contains(&CellState::Empty)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.get(Position::new(row, col)).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_order() {
        assert_eq!(CellState::Empty.cycled(), CellState::Ship);
        assert_eq!(CellState::Ship.cycled(), CellState::Water);
        assert_eq!(CellState::Water.cycled(), CellState::Empty);
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(8);
        assert_eq!(grid.size(), 8);
        assert_eq!(grid.count(CellState::Empty), 64);
        assert!(!grid.is_fully_determined());
    }

    #[test]
    fn test_set_and_count() {
        let mut grid = Grid::new(8);
        grid.set(Position::new(2, 3), CellState::Ship);
        grid.set(Position::new(2, 4), CellState::Ship);
        grid.set(Position::new(5, 0), CellState::Water);

        assert_eq!(grid.get(Position::new(2, 3)), CellState::Ship);
        assert_eq!(grid.count_in_row(2, CellState::Ship), 2);
        assert_eq!(grid.count_in_col(4, CellState::Ship), 1);
        assert_eq!(grid.count(CellState::Water), 1);
    }

    #[test]
    fn test_corner_neighbors_stay_in_bounds() {
        let corner = Position::new(0, 0);
        let diag: Vec<Position> = corner.diagonal_neighbors(8).collect();
        assert_eq!(diag, vec![Position::new(1, 1)]);

        let orth: Vec<Position> = corner.orthogonal_neighbors(8).collect();
        assert_eq!(orth, vec![Position::new(1, 0), Position::new(0, 1)]);

        let far = Position::new(7, 7);
        let diag: Vec<Position> = far.diagonal_neighbors(8).collect();
        assert_eq!(diag, vec![Position::new(6, 6)]);
    }

    #[test]
    fn test_interior_neighbor_counts() {
        let mid = Position::new(4, 4);
        assert_eq!(mid.orthogonal_neighbors(10).count(), 4);
        assert_eq!(mid.diagonal_neighbors(10).count(), 4);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut grid = Grid::new(8);
        grid.set(Position::new(1, 1), CellState::Ship);
        grid.set(Position::new(3, 7), CellState::Water);

        let json = serde_json::to_string(&grid).unwrap();
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(grid, back);
    }
}
