use crate::{CellState, Clues, Deduction, Grid, Position, Puzzle, Solver};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Result of applying a player move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was applied
    Applied,
    /// The move was applied and the puzzle is now solved
    Completed,
    /// Mistake mode rejected marking a ship on a known-water cell
    Conflict,
    /// The position is outside the board
    OutOfBounds,
}

/// Result of a hint request
#[derive(Debug, Clone)]
pub enum HintOutcome {
    /// One solver-deduced cell was revealed on the player grid
    Revealed(Deduction),
    /// No cell is logically forced right now; normal status, not an error
    NoLogicalMoves,
}

/// Outcome of comparing the player grid against the solution
#[derive(Debug, Clone)]
pub struct SolutionCheck {
    pub is_correct: bool,
    /// Cells whose ship/not-ship reading disagrees with the solution
    pub mismatches: Vec<Position>,
}

/// A live play session over a generated puzzle.
///
/// Owns all mutable play state; every operation goes through the session
/// rather than ambient globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleSession {
    puzzle: Puzzle,
    mistake_mode: bool,
}

impl PuzzleSession {
    pub fn new(puzzle: Puzzle) -> Self {
        Self {
            puzzle,
            mistake_mode: false,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn player(&self) -> &Grid {
        &self.puzzle.player
    }

    pub fn clues(&self) -> &Clues {
        &self.puzzle.clues
    }

    pub fn mistake_mode(&self) -> bool {
        self.mistake_mode
    }

    pub fn set_mistake_mode(&mut self, enabled: bool) {
        self.mistake_mode = enabled;
    }

    /// Advance a cell through Empty -> Ship -> Water -> Empty.
    ///
    /// Under mistake mode a transition into Ship that contradicts the
    /// solution is rejected and the cell is left unchanged.
    pub fn cycle(&mut self, pos: Position) -> MoveOutcome {
        if !self.puzzle.player.in_bounds(pos) {
            return MoveOutcome::OutOfBounds;
        }
        let next = self.puzzle.player.get(pos).cycled();
        self.apply(pos, next)
    }

    /// Set a cell to an explicit state, with the same mistake-mode guard as
    /// `cycle`. Used by direct marking keys and undo/redo.
    pub fn set_cell(&mut self, pos: Position, state: CellState) -> MoveOutcome {
        if !self.puzzle.player.in_bounds(pos) {
            return MoveOutcome::OutOfBounds;
        }
        self.apply(pos, state)
    }

    pub fn clear_cell(&mut self, pos: Position) -> MoveOutcome {
        self.set_cell(pos, CellState::Empty)
    }

    fn apply(&mut self, pos: Position, state: CellState) -> MoveOutcome {
        if state == CellState::Ship
            && self.mistake_mode
            && self.puzzle.solution.get(pos) != CellState::Ship
        {
            return MoveOutcome::Conflict;
        }
        self.puzzle.player.set(pos, state);
        if self.is_solved() {
            MoveOutcome::Completed
        } else {
            MoveOutcome::Applied
        }
    }

    /// Water the remaining Empty cells of every line whose clue is already
    /// met. One pass of the solver's line-completion rule, applied live.
    /// Returns the cells filled so the UI can show them.
    pub fn auto_water_fill(&mut self) -> Vec<Position> {
        let size = self.puzzle.player.size();
        let mut filled = Vec::new();
        for line in 0..size {
            if self.clues().row_satisfied(&self.puzzle.player, line) {
                for pos in self.puzzle.player.row_positions(line).collect::<Vec<_>>() {
                    if self.puzzle.player.get(pos) == CellState::Empty {
                        self.puzzle.player.set(pos, CellState::Water);
                        filled.push(pos);
                    }
                }
            }
            if self.clues().col_satisfied(&self.puzzle.player, line) {
                for pos in self.puzzle.player.col_positions(line).collect::<Vec<_>>() {
                    if self.puzzle.player.get(pos) == CellState::Empty {
                        self.puzzle.player.set(pos, CellState::Water);
                        filled.push(pos);
                    }
                }
            }
        }
        filled
    }

    /// Reveal one solver-deduced cell on the player grid
    pub fn hint(&mut self) -> HintOutcome {
        let solver = Solver::new();
        match solver.find_deduction(&self.puzzle.player, &self.puzzle.clues) {
            Some(deduction) => {
                self.puzzle.player.set(deduction.pos, deduction.state);
                HintOutcome::Revealed(deduction)
            }
            None => HintOutcome::NoLogicalMoves,
        }
    }

    /// Compare the player grid against the solution. Any non-Ship player
    /// state counts as not-ship, so unmarked water never shows as a mismatch.
    pub fn check_solution(&self) -> SolutionCheck {
        let mut mismatches = Vec::new();
        for (pos, state) in self.puzzle.player.cells() {
            let player_ship = state == CellState::Ship;
            let solution_ship = self.puzzle.solution.get(pos) == CellState::Ship;
            if player_ship != solution_ship {
                mismatches.push(pos);
            }
        }
        SolutionCheck {
            is_correct: mismatches.is_empty(),
            mismatches,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.check_solution().is_correct
    }

    /// Ids of fleet ships the player has fully and correctly placed
    pub fn found_ships(&self) -> Vec<usize> {
        let mut found = Vec::new();
        for component in ship_components(&self.puzzle.player) {
            if let Some(ship) = self
                .puzzle
                .ships
                .iter()
                .find(|ship| ship.signature() == component)
            {
                found.push(ship.id);
            }
        }
        found.sort_unstable();
        found
    }

    /// Give-up path: overwrite the player grid with the solution
    pub fn reveal_solution(&mut self) {
        self.puzzle.player = self.puzzle.solution.clone();
    }
}

/// Maximal 4-connected runs of Ship cells, each sorted into signature order
fn ship_components(grid: &Grid) -> Vec<Vec<Position>> {
    let size = grid.size();
    let mut visited = vec![false; size * size];
    let mut components = Vec::new();

    for (start, state) in grid.cells() {
        let start_idx = start.row * size + start.col;
        if state != CellState::Ship || visited[start_idx] {
            continue;
        }

        visited[start_idx] = true;
        let mut queue = VecDeque::from([start]);
        let mut cells = Vec::new();
        while let Some(pos) = queue.pop_front() {
            cells.push(pos);
            for neighbor in pos.orthogonal_neighbors(size) {
                let idx = neighbor.row * size + neighbor.col;
                if !visited[idx] && grid.get(neighbor) == CellState::Ship {
                    visited[idx] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        cells.sort();
        components.push(cells);
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, GridSize, Orientation, Ship};

    /// Hand-built 8x8 puzzle with the given ships and an all-Empty player grid
    fn puzzle_with(specs: &[(usize, usize, Orientation, usize)]) -> Puzzle {
        let mut solution = Grid::new(8);
        let mut ships = Vec::new();
        for (id, &(row, col, orientation, length)) in specs.iter().enumerate() {
            let ship = Ship::new(id, Position::new(row, col), orientation, length);
            for &seg in &ship.segments {
                solution.set(seg, CellState::Ship);
            }
            ships.push(ship);
        }
        for pos in Position::all(8).collect::<Vec<_>>() {
            if solution.get(pos) == CellState::Empty {
                solution.set(pos, CellState::Water);
            }
        }
        let clues = Clues::derive(&solution);
        Puzzle::new(
            GridSize::Eight,
            Difficulty::Medium,
            solution,
            ships,
            clues,
            Grid::new(8),
        )
    }

    #[test]
    fn test_cycle_walks_all_states() {
        let mut session = PuzzleSession::new(puzzle_with(&[
            (0, 0, Orientation::Horizontal, 2),
            (4, 4, Orientation::Vertical, 1),
        ]));
        let pos = Position::new(7, 7);

        assert_eq!(session.cycle(pos), MoveOutcome::Applied);
        assert_eq!(session.player().get(pos), CellState::Ship);
        assert_eq!(session.cycle(pos), MoveOutcome::Applied);
        assert_eq!(session.player().get(pos), CellState::Water);
        assert_eq!(session.cycle(pos), MoveOutcome::Applied);
        assert_eq!(session.player().get(pos), CellState::Empty);
    }

    #[test]
    fn test_out_of_bounds_move() {
        let mut session = PuzzleSession::new(puzzle_with(&[(0, 0, Orientation::Horizontal, 1)]));
        assert_eq!(session.cycle(Position::new(8, 0)), MoveOutcome::OutOfBounds);
        assert_eq!(session.cycle(Position::new(0, 99)), MoveOutcome::OutOfBounds);
    }

    #[test]
    fn test_mistake_mode_rejects_wrong_ship() {
        let mut session = PuzzleSession::new(puzzle_with(&[(0, 0, Orientation::Horizontal, 1)]));
        session.set_mistake_mode(true);
        let water_cell = Position::new(5, 5);

        assert_eq!(session.cycle(water_cell), MoveOutcome::Conflict);
        assert_eq!(session.player().get(water_cell), CellState::Empty);

        // Direct water marking is still allowed
        assert_eq!(
            session.set_cell(water_cell, CellState::Water),
            MoveOutcome::Applied
        );

        // The real ship cell is accepted
        assert_eq!(session.cycle(Position::new(0, 0)), MoveOutcome::Completed);
    }

    #[test]
    fn test_completion_detected_on_last_ship_cell() {
        let mut session = PuzzleSession::new(puzzle_with(&[(2, 2, Orientation::Horizontal, 2)]));
        assert_eq!(session.cycle(Position::new(2, 2)), MoveOutcome::Applied);
        assert_eq!(session.cycle(Position::new(2, 3)), MoveOutcome::Completed);
        assert!(session.is_solved());
    }

    #[test]
    fn test_auto_water_fill_waters_zero_clue_lines() {
        let mut session = PuzzleSession::new(puzzle_with(&[(0, 0, Orientation::Horizontal, 2)]));
        let filled = session.auto_water_fill();
        assert!(!filled.is_empty());

        // Row 3 has a zero clue, so the whole row must now be water
        assert_eq!(session.clues().rows[3], 0);
        for col in 0..8 {
            assert_eq!(
                session.player().get(Position::new(3, col)),
                CellState::Water
            );
        }
        // Row 0 still has unmet clue cells, so it is untouched
        assert_eq!(session.player().get(Position::new(0, 0)), CellState::Empty);
    }

    #[test]
    fn test_auto_water_fill_after_clue_met() {
        let mut session = PuzzleSession::new(puzzle_with(&[(0, 0, Orientation::Horizontal, 2)]));
        session.set_cell(Position::new(0, 0), CellState::Ship);
        session.set_cell(Position::new(0, 1), CellState::Ship);

        session.auto_water_fill();
        for col in 2..8 {
            assert_eq!(
                session.player().get(Position::new(0, col)),
                CellState::Water
            );
        }
    }

    #[test]
    fn test_hints_walk_to_solution() {
        let mut session = PuzzleSession::new(puzzle_with(&[(1, 1, Orientation::Horizontal, 2)]));
        let mut revealed = 0;
        loop {
            match session.hint() {
                HintOutcome::Revealed(deduction) => {
                    assert!(!deduction.explanation.is_empty());
                    revealed += 1;
                    assert!(revealed <= 64, "hints failed to converge");
                }
                HintOutcome::NoLogicalMoves => break,
            }
        }
        // This puzzle is fully deducible, so hints alone solve it
        assert!(session.is_solved());
        assert_eq!(session.player(), &session.puzzle().solution);
    }

    #[test]
    fn test_check_solution_treats_empty_as_water() {
        let mut session = PuzzleSession::new(puzzle_with(&[(3, 3, Orientation::Vertical, 2)]));
        session.set_cell(Position::new(3, 3), CellState::Ship);
        session.set_cell(Position::new(4, 3), CellState::Ship);

        // No water marked anywhere, but all ships placed: that is a win
        let check = session.check_solution();
        assert!(check.is_correct);
        assert!(check.mismatches.is_empty());
    }

    #[test]
    fn test_check_solution_reports_mismatches() {
        let mut session = PuzzleSession::new(puzzle_with(&[(0, 0, Orientation::Horizontal, 1)]));
        session.set_cell(Position::new(7, 7), CellState::Ship);

        let check = session.check_solution();
        assert!(!check.is_correct);
        // The missing real ship and the bogus one
        assert_eq!(
            check.mismatches,
            vec![Position::new(0, 0), Position::new(7, 7)]
        );
    }

    #[test]
    fn test_found_ships_requires_exact_match() {
        let mut session = PuzzleSession::new(puzzle_with(&[
            (0, 0, Orientation::Horizontal, 3),
            (5, 5, Orientation::Vertical, 1),
        ]));
        assert!(session.found_ships().is_empty());

        // Partial ship: not found
        session.set_cell(Position::new(0, 0), CellState::Ship);
        session.set_cell(Position::new(0, 1), CellState::Ship);
        assert!(session.found_ships().is_empty());

        // Complete it
        session.set_cell(Position::new(0, 2), CellState::Ship);
        assert_eq!(session.found_ships(), vec![0]);

        // Overshoot past the real length: no longer a match
        session.set_cell(Position::new(0, 3), CellState::Ship);
        assert!(session.found_ships().is_empty());

        session.clear_cell(Position::new(0, 3));
        session.set_cell(Position::new(5, 5), CellState::Ship);
        assert_eq!(session.found_ships(), vec![0, 1]);
    }

    #[test]
    fn test_reveal_solution() {
        let mut session = PuzzleSession::new(puzzle_with(&[(2, 2, Orientation::Horizontal, 2)]));
        session.reveal_solution();
        assert!(session.is_solved());
        assert_eq!(session.player(), &session.puzzle().solution);
    }

    #[test]
    fn test_session_serde_round_trip() {
        let mut session = PuzzleSession::new(puzzle_with(&[(1, 1, Orientation::Horizontal, 2)]));
        session.set_mistake_mode(true);
        session.set_cell(Position::new(1, 1), CellState::Ship);

        let json = serde_json::to_string(&session).unwrap();
        let back: PuzzleSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back.player(), session.player());
        assert!(back.mistake_mode());
    }
}
