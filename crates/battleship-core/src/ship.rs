use crate::Position;
use serde::{Deserialize, Serialize};

/// Axis a ship lies along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A placed ship: stable id, length, and the cells it occupies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub id: usize,
    pub length: usize,
    pub orientation: Orientation,
    /// Segment cells from bow to stern
    pub segments: Vec<Position>,
}

impl Ship {
    /// Build a ship from its bow (top-left segment), extending right or down
    pub fn new(id: usize, bow: Position, orientation: Orientation, length: usize) -> Self {
        let segments = (0..length)
            .map(|i| match orientation {
                Orientation::Horizontal => Position::new(bow.row, bow.col + i),
                Orientation::Vertical => Position::new(bow.row + i, bow.col),
            })
            .collect();
        Self {
            id,
            length,
            orientation,
            segments,
        }
    }

    /// Sorted segment list; the identity used to match player-found ships
    pub fn signature(&self) -> Vec<Position> {
        let mut cells = self.segments.clone();
        cells.sort();
        cells
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_segments() {
        let ship = Ship::new(0, Position::new(2, 3), Orientation::Horizontal, 3);
        assert_eq!(
            ship.segments,
            vec![
                Position::new(2, 3),
                Position::new(2, 4),
                Position::new(2, 5)
            ]
        );
    }

    #[test]
    fn test_vertical_segments() {
        let ship = Ship::new(1, Position::new(5, 1), Orientation::Vertical, 2);
        assert_eq!(
            ship.segments,
            vec![Position::new(5, 1), Position::new(6, 1)]
        );
        assert!(ship.contains(Position::new(6, 1)));
        assert!(!ship.contains(Position::new(7, 1)));
    }

    #[test]
    fn test_signature_is_sorted() {
        let ship = Ship::new(2, Position::new(0, 0), Orientation::Vertical, 3);
        let sig = ship.signature();
        for pair in sig.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }
}
