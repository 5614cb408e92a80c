use crate::{CellState, Grid, GridSize, Orientation, Position, Ship};
use log::{debug, trace};
use rand::Rng;
use thiserror::Error;

/// Terminal failure of puzzle generation
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The fleet could not be placed within the whole-board retry budget
    #[error("could not place the fleet after {board_attempts} board attempts")]
    PlacementExhausted { board_attempts: usize },
}

/// Place every fleet ship on a fresh board.
///
/// Each ship gets up to `ship_attempts` random placements; if one ship cannot
/// be placed the whole board is abandoned and restarted, up to
/// `board_attempts` times. Failure past that budget is rare for the supported
/// fleets but must be handled by the caller.
pub fn place_fleet<R: Rng>(
    size: GridSize,
    ship_attempts: usize,
    board_attempts: usize,
    rng: &mut R,
) -> Result<(Grid, Vec<Ship>), GenerationError> {
    for attempt in 0..board_attempts {
        if let Some((grid, ships)) = try_place_board(size, ship_attempts, rng) {
            debug!(
                "placed {} fleet of {} ships on board attempt {}",
                size,
                ships.len(),
                attempt + 1
            );
            return Ok((grid, ships));
        }
        trace!("board attempt {} failed for {}", attempt + 1, size);
    }
    Err(GenerationError::PlacementExhausted { board_attempts })
}

/// One whole-board attempt; None if any ship exhausts its placement budget
fn try_place_board<R: Rng>(
    size: GridSize,
    ship_attempts: usize,
    rng: &mut R,
) -> Option<(Grid, Vec<Ship>)> {
    let mut grid = Grid::new(size.side());
    let mut ships = Vec::with_capacity(size.fleet().len());

    for (id, &length) in size.fleet().iter().enumerate() {
        let ship = place_ship(&grid, id, length, ship_attempts, rng)?;
        for &seg in &ship.segments {
            grid.set(seg, CellState::Ship);
        }
        ships.push(ship);
    }

    // The solution grid is fully determined: every non-ship cell is water.
    for pos in Position::all(size.side()) {
        if grid.get(pos) == CellState::Empty {
            grid.set(pos, CellState::Water);
        }
    }
    Some((grid, ships))
}

fn place_ship<R: Rng>(
    grid: &Grid,
    id: usize,
    length: usize,
    attempts: usize,
    rng: &mut R,
) -> Option<Ship> {
    let side = grid.size();
    for _ in 0..attempts {
        let orientation = if rng.gen_bool(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let (row_bound, col_bound) = match orientation {
            Orientation::Horizontal => (side, side - length + 1),
            Orientation::Vertical => (side - length + 1, side),
        };
        let bow = Position::new(rng.gen_range(0..row_bound), rng.gen_range(0..col_bound));
        let ship = Ship::new(id, bow, orientation, length);
        if fits(grid, &ship) {
            return Some(ship);
        }
    }
    None
}

/// Footprint-plus-border scan: every segment cell and all 8 of its neighbors
/// must be free of ships. Out-of-bounds neighbors are skipped.
fn fits(grid: &Grid, ship: &Ship) -> bool {
    let side = grid.size() as isize;
    ship.segments.iter().all(|seg| {
        let (row, col) = (seg.row as isize, seg.col as isize);
        (-1..=1).all(|dr| {
            (-1..=1).all(|dc| {
                let (r, c) = (row + dr, col + dc);
                if r < 0 || r >= side || c < 0 || c >= side {
                    return true;
                }
                grid.get(Position::new(r as usize, c as usize)) != CellState::Ship
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn chebyshev(a: Position, b: Position) -> usize {
        let dr = a.row.abs_diff(b.row);
        let dc = a.col.abs_diff(b.col);
        dr.max(dc)
    }

    #[test]
    fn test_place_fleet_all_sizes() {
        let mut rng = StdRng::seed_from_u64(42);
        for &size in GridSize::all() {
            let (grid, ships) = place_fleet(size, 200, 50, &mut rng).unwrap();
            assert_eq!(ships.len(), size.fleet().len());
            assert_eq!(grid.count(CellState::Ship), size.total_ship_cells());
            for (ship, &expected) in ships.iter().zip(size.fleet()) {
                assert_eq!(ship.length, expected);
                assert_eq!(ship.segments.len(), expected);
            }
        }
    }

    #[test]
    fn test_ships_never_touch() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (_, ships) = place_fleet(GridSize::Ten, 200, 50, &mut rng).unwrap();
            for a in &ships {
                for b in &ships {
                    if a.id == b.id {
                        continue;
                    }
                    for &sa in &a.segments {
                        for &sb in &b.segments {
                            assert!(
                                chebyshev(sa, sb) >= 2,
                                "seed {}: ships {} and {} touch at {} / {}",
                                seed,
                                a.id,
                                b.id,
                                sa,
                                sb
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_placed_board_has_no_empty_cells() {
        let mut rng = StdRng::seed_from_u64(3);
        for &size in GridSize::all() {
            let (grid, _) = place_fleet(size, 200, 50, &mut rng).unwrap();
            assert!(grid.is_fully_determined());
            assert_eq!(
                grid.count(CellState::Water),
                size.side() * size.side() - size.total_ship_cells()
            );
        }
    }

    #[test]
    fn test_ships_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let (grid, ships) = place_fleet(GridSize::Eight, 200, 50, &mut rng).unwrap();
        for ship in &ships {
            for seg in &ship.segments {
                assert!(grid.in_bounds(*seg));
            }
        }
    }

    #[test]
    fn test_diagonal_contact_rejected() {
        let mut grid = Grid::new(8);
        grid.set(Position::new(0, 0), CellState::Ship);

        let touching = Ship::new(1, Position::new(1, 1), Orientation::Horizontal, 1);
        assert!(!fits(&grid, &touching));

        let clear = Ship::new(1, Position::new(2, 2), Orientation::Horizontal, 1);
        assert!(fits(&grid, &clear));
    }

    #[test]
    fn test_orthogonal_contact_rejected() {
        let mut grid = Grid::new(8);
        grid.set(Position::new(3, 3), CellState::Ship);

        assert!(!fits(
            &grid,
            &Ship::new(1, Position::new(3, 4), Orientation::Horizontal, 1)
        ));
        assert!(!fits(
            &grid,
            &Ship::new(1, Position::new(4, 3), Orientation::Vertical, 1)
        ));
    }

    #[test]
    fn test_exhausted_budget_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = place_fleet(GridSize::Eight, 0, 3, &mut rng);
        assert!(matches!(
            result,
            Err(GenerationError::PlacementExhausted { board_attempts: 3 })
        ));
    }
}
