//! Deductive solver: fixed-point propagation over the line and adjacency
//! rules. Derives only what is logically forced; never guesses, never
//! backtracks, never fails.

use crate::{CellState, Clues, Grid, Position};
use serde::{Deserialize, Serialize};

/// Rule that determined a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeductionRule {
    /// A line's clue is already met, so its remaining cells are water
    LineCompletion,
    /// A line's empty cells are exactly the ship cells still missing
    LineSaturation,
    /// Diagonal neighbors of a ship cell are always water
    DiagonalExclusion,
}

impl std::fmt::Display for DeductionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeductionRule::LineCompletion => write!(f, "Line Completion"),
            DeductionRule::LineSaturation => write!(f, "Line Saturation"),
            DeductionRule::DiagonalExclusion => write!(f, "Diagonal Exclusion"),
        }
    }
}

/// A single solver-determined cell, with the reasoning behind it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deduction {
    pub rule: DeductionRule,
    pub pos: Position,
    pub state: CellState,
    /// Human-readable reasoning shown with hints
    pub explanation: String,
}

/// Deductive battleship solver
pub struct Solver;

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Self
    }

    /// Propagate the rules to a fixed point and return the most-determined
    /// grid reachable by pure deduction. Cells the rules cannot reach stay
    /// Empty; that is the caller's signal of "not solvable by logic alone".
    pub fn solve(&self, grid: &Grid, clues: &Clues) -> Grid {
        let mut working = grid.clone();
        let mut changed = true;
        while changed {
            changed = false;
            changed |= self.apply_line_completion(&mut working, clues);
            changed |= self.apply_line_saturation(&mut working, clues);
            changed |= self.apply_diagonal_exclusion(&mut working);
        }
        working
    }

    /// True when deduction from `grid` reproduces `solution` exactly
    pub fn reconstructs(&self, grid: &Grid, clues: &Clues, solution: &Grid) -> bool {
        self.solve(grid, clues) == *solution
    }

    /// First cell a solving pass would newly determine, in rule order.
    /// Deterministic, so a hint never disagrees with a full solve.
    pub fn find_deduction(&self, grid: &Grid, clues: &Clues) -> Option<Deduction> {
        self.find_line_completion(grid, clues)
            .or_else(|| self.find_line_saturation(grid, clues))
            .or_else(|| self.find_diagonal_exclusion(grid))
    }

    // ==================== Line completion ====================

    /// Clue already met: every remaining Empty cell in the line is Water
    fn apply_line_completion(&self, grid: &mut Grid, clues: &Clues) -> bool {
        let mut changed = false;
        for line in 0..grid.size() {
            if grid.count_in_row(line, CellState::Ship) == clues.rows[line] {
                changed |= water_empties(grid, grid.row_positions(line).collect());
            }
            if grid.count_in_col(line, CellState::Ship) == clues.cols[line] {
                changed |= water_empties(grid, grid.col_positions(line).collect());
            }
        }
        changed
    }

    fn find_line_completion(&self, grid: &Grid, clues: &Clues) -> Option<Deduction> {
        for line in 0..grid.size() {
            if grid.count_in_row(line, CellState::Ship) == clues.rows[line] {
                if let Some(pos) = first_empty(grid, grid.row_positions(line)) {
                    return Some(Deduction {
                        rule: DeductionRule::LineCompletion,
                        pos,
                        state: CellState::Water,
                        explanation: format!(
                            "Row {} already has all {} of its ship cells, so the rest of the row is water",
                            line + 1,
                            clues.rows[line]
                        ),
                    });
                }
            }
            if grid.count_in_col(line, CellState::Ship) == clues.cols[line] {
                if let Some(pos) = first_empty(grid, grid.col_positions(line)) {
                    return Some(Deduction {
                        rule: DeductionRule::LineCompletion,
                        pos,
                        state: CellState::Water,
                        explanation: format!(
                            "Column {} already has all {} of its ship cells, so the rest of the column is water",
                            line + 1,
                            clues.cols[line]
                        ),
                    });
                }
            }
        }
        None
    }

    // ==================== Line saturation ====================

    /// Ship count plus empty count equals the clue: every Empty cell in the
    /// line must be a ship
    fn apply_line_saturation(&self, grid: &mut Grid, clues: &Clues) -> bool {
        let mut changed = false;
        for line in 0..grid.size() {
            let row_ships = grid.count_in_row(line, CellState::Ship);
            let row_empties = grid.count_in_row(line, CellState::Empty);
            if row_empties > 0 && row_ships + row_empties == clues.rows[line] {
                changed |= ship_empties(grid, grid.row_positions(line).collect());
            }

            let col_ships = grid.count_in_col(line, CellState::Ship);
            let col_empties = grid.count_in_col(line, CellState::Empty);
            if col_empties > 0 && col_ships + col_empties == clues.cols[line] {
                changed |= ship_empties(grid, grid.col_positions(line).collect());
            }
        }
        changed
    }

    fn find_line_saturation(&self, grid: &Grid, clues: &Clues) -> Option<Deduction> {
        for line in 0..grid.size() {
            let row_ships = grid.count_in_row(line, CellState::Ship);
            let row_empties = grid.count_in_row(line, CellState::Empty);
            if row_empties > 0 && row_ships + row_empties == clues.rows[line] {
                if let Some(pos) = first_empty(grid, grid.row_positions(line)) {
                    return Some(Deduction {
                        rule: DeductionRule::LineSaturation,
                        pos,
                        state: CellState::Ship,
                        explanation: format!(
                            "Row {} needs {} more ship cells and has exactly {} empty cells, so every empty cell is a ship",
                            line + 1,
                            clues.rows[line] - row_ships,
                            row_empties
                        ),
                    });
                }
            }

            let col_ships = grid.count_in_col(line, CellState::Ship);
            let col_empties = grid.count_in_col(line, CellState::Empty);
            if col_empties > 0 && col_ships + col_empties == clues.cols[line] {
                if let Some(pos) = first_empty(grid, grid.col_positions(line)) {
                    return Some(Deduction {
                        rule: DeductionRule::LineSaturation,
                        pos,
                        state: CellState::Ship,
                        explanation: format!(
                            "Column {} needs {} more ship cells and has exactly {} empty cells, so every empty cell is a ship",
                            line + 1,
                            clues.cols[line] - col_ships,
                            col_empties
                        ),
                    });
                }
            }
        }
        None
    }

    // ==================== Diagonal exclusion ====================

    /// Ships never touch diagonally: diagonal neighbors of ship cells are water
    fn apply_diagonal_exclusion(&self, grid: &mut Grid) -> bool {
        let size = grid.size();
        let mut to_water = Vec::new();
        for (pos, state) in grid.cells() {
            if state != CellState::Ship {
                continue;
            }
            for neighbor in pos.diagonal_neighbors(size) {
                if grid.get(neighbor) == CellState::Empty {
                    to_water.push(neighbor);
                }
            }
        }
        let changed = !to_water.is_empty();
        for pos in to_water {
            grid.set(pos, CellState::Water);
        }
        changed
    }

    fn find_diagonal_exclusion(&self, grid: &Grid) -> Option<Deduction> {
        let size = grid.size();
        for (pos, state) in grid.cells() {
            if state != CellState::Ship {
                continue;
            }
            for neighbor in pos.diagonal_neighbors(size) {
                if grid.get(neighbor) == CellState::Empty {
                    return Some(Deduction {
                        rule: DeductionRule::DiagonalExclusion,
                        pos: neighbor,
                        state: CellState::Water,
                        explanation: format!(
                            "Ships never touch diagonally, so the cell diagonal to the ship at {} is water",
                            Position::new(pos.row + 1, pos.col + 1)
                        ),
                    });
                }
            }
        }
        None
    }
}

fn first_empty(grid: &Grid, mut line: impl Iterator<Item = Position>) -> Option<Position> {
    line.find(|&pos| grid.get(pos) == CellState::Empty)
}

fn water_empties(grid: &mut Grid, line: Vec<Position>) -> bool {
    let mut changed = false;
    for pos in line {
        if grid.get(pos) == CellState::Empty {
            grid.set(pos, CellState::Water);
            changed = true;
        }
    }
    changed
}

fn ship_empties(grid: &mut Grid, line: Vec<Position>) -> bool {
    let mut changed = false;
    for pos in line {
        if grid.get(pos) == CellState::Empty {
            grid.set(pos, CellState::Ship);
            changed = true;
        }
    }
    changed
}
