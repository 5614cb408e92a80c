use serde::{Deserialize, Serialize};

/// Supported board side lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridSize {
    Eight,
    Ten,
    Twelve,
}

const FLEET_8: [usize; 6] = [3, 2, 2, 1, 1, 1];
const FLEET_10: [usize; 10] = [4, 3, 3, 2, 2, 2, 1, 1, 1, 1];
const FLEET_12: [usize; 11] = [5, 4, 3, 3, 2, 2, 2, 1, 1, 1, 1];

impl GridSize {
    /// Side length in cells
    pub fn side(self) -> usize {
        match self {
            GridSize::Eight => 8,
            GridSize::Ten => 10,
            GridSize::Twelve => 12,
        }
    }

    /// Total cell count of the board
    pub fn cell_count(self) -> usize {
        self.side() * self.side()
    }

    pub fn from_side(side: usize) -> Option<GridSize> {
        match side {
            8 => Some(GridSize::Eight),
            10 => Some(GridSize::Ten),
            12 => Some(GridSize::Twelve),
            _ => None,
        }
    }

    pub fn all() -> &'static [GridSize] {
        &[GridSize::Eight, GridSize::Ten, GridSize::Twelve]
    }

    /// Ship lengths to place on this board, longest first
    pub fn fleet(self) -> &'static [usize] {
        match self {
            GridSize::Eight => &FLEET_8,
            GridSize::Ten => &FLEET_10,
            GridSize::Twelve => &FLEET_12,
        }
    }

    /// Total number of ship cells in a solved board
    pub fn total_ship_cells(self) -> usize {
        self.fleet().iter().sum()
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}

/// Difficulty level of a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn all_levels() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
    }

    /// Lowercase name used in persistence keys
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    /// Number of revealed cells at which clue reduction stops.
    ///
    /// The reducer removes cells only while solvability is preserved, so the
    /// actual revealed count may end up above this target.
    pub fn reveal_target(self, size: GridSize) -> usize {
        match (size, self) {
            (GridSize::Eight, Difficulty::Easy) => 22,
            (GridSize::Eight, Difficulty::Medium) => 13,
            (GridSize::Eight, Difficulty::Hard) => 6,
            (GridSize::Eight, Difficulty::Expert) => 0,
            (GridSize::Ten, Difficulty::Easy) => 34,
            (GridSize::Ten, Difficulty::Medium) => 20,
            (GridSize::Ten, Difficulty::Hard) => 10,
            (GridSize::Ten, Difficulty::Expert) => 0,
            (GridSize::Twelve, Difficulty::Easy) => 48,
            (GridSize::Twelve, Difficulty::Medium) => 28,
            (GridSize::Twelve, Difficulty::Hard) => 14,
            (GridSize::Twelve, Difficulty::Expert) => 0,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
            Difficulty::Expert => write!(f, "Expert"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_totals() {
        assert_eq!(GridSize::Eight.total_ship_cells(), 10);
        assert_eq!(GridSize::Ten.total_ship_cells(), 20);
        assert_eq!(GridSize::Twelve.total_ship_cells(), 25);
    }

    #[test]
    fn test_fleets_are_longest_first() {
        for &size in GridSize::all() {
            let fleet = size.fleet();
            for pair in fleet.windows(2) {
                assert!(pair[0] >= pair[1], "fleet for {} not sorted", size);
            }
        }
    }

    #[test]
    fn test_from_side() {
        assert_eq!(GridSize::from_side(8), Some(GridSize::Eight));
        assert_eq!(GridSize::from_side(10), Some(GridSize::Ten));
        assert_eq!(GridSize::from_side(12), Some(GridSize::Twelve));
        assert_eq!(GridSize::from_side(9), None);
    }

    #[test]
    fn test_reveal_targets_shrink_with_difficulty() {
        for &size in GridSize::all() {
            let targets: Vec<usize> = Difficulty::all_levels()
                .iter()
                .map(|&d| d.reveal_target(size))
                .collect();
            for pair in targets.windows(2) {
                assert!(pair[0] > pair[1] || pair[1] == 0);
            }
            assert_eq!(Difficulty::Expert.reveal_target(size), 0);
            assert!(Difficulty::Easy.reveal_target(size) < size.cell_count());
        }
    }

    #[test]
    fn test_difficulty_keys() {
        assert_eq!(Difficulty::Easy.key(), "easy");
        assert_eq!(Difficulty::Expert.key(), "expert");
    }
}
