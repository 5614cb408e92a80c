use crate::placement::place_fleet;
use crate::{CellState, Clues, Difficulty, GenerationError, Grid, GridSize, Position, Puzzle, Solver};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};

/// Configuration for puzzle generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub grid_size: GridSize,
    /// Target difficulty; sets how many revealed cells reduction aims for
    pub difficulty: Difficulty,
    /// Random placements tried per ship before a board is abandoned
    pub ship_attempts: usize,
    /// Fresh boards tried before generation fails
    pub board_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::Ten,
            difficulty: Difficulty::Medium,
            ship_attempts: 200,
            board_attempts: 50,
        }
    }
}

impl GeneratorConfig {
    pub fn new(grid_size: GridSize, difficulty: Difficulty) -> Self {
        Self {
            grid_size,
            difficulty,
            ..Default::default()
        }
    }
}

/// Battleship puzzle generator
pub struct Generator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a new generator with default configuration
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a puzzle for the given size and difficulty
    pub fn generate(
        &mut self,
        grid_size: GridSize,
        difficulty: Difficulty,
    ) -> Result<Puzzle, GenerationError> {
        self.config.grid_size = grid_size;
        self.config.difficulty = difficulty;
        self.generate_with_config()
    }

    /// Generate a puzzle with the current configuration
    pub fn generate_with_config(&mut self) -> Result<Puzzle, GenerationError> {
        let (solution, ships) = place_fleet(
            self.config.grid_size,
            self.config.ship_attempts,
            self.config.board_attempts,
            &mut self.rng,
        )?;
        let clues = Clues::derive(&solution);
        let player = self.reduce_clues(&solution, &clues);

        debug!(
            "generated {} {} puzzle with {} revealed cells",
            self.config.grid_size,
            self.config.difficulty,
            player.count(CellState::Ship) + player.count(CellState::Water)
        );

        Ok(Puzzle::new(
            self.config.grid_size,
            self.config.difficulty,
            solution,
            ships,
            clues,
            player,
        ))
    }

    /// Generate `count` puzzles, checking `cancel` between puzzles.
    ///
    /// Cancellation is cooperative and never interrupts a generation in
    /// progress; the puzzles finished so far are returned.
    pub fn generate_batch(
        &mut self,
        count: usize,
        cancel: &AtomicBool,
    ) -> Result<Vec<Puzzle>, GenerationError> {
        let mut puzzles = Vec::with_capacity(count);
        for done in 0..count {
            if cancel.load(Ordering::Relaxed) {
                info!("batch cancelled after {} of {} puzzles", done, count);
                break;
            }
            puzzles.push(self.generate_with_config()?);
        }
        Ok(puzzles)
    }

    /// Remove revealed cells in random order while the solver can still
    /// reconstruct the solution, stopping at the difficulty's reveal target.
    ///
    /// Each candidate removal is tried on a scratch copy; the working grid is
    /// only touched once the removal is proven safe. The result is therefore
    /// always solvable by pure deduction, though it may end up with more
    /// revealed cells than the target.
    fn reduce_clues(&mut self, solution: &Grid, clues: &Clues) -> Grid {
        let size = solution.size();
        let target = self.config.difficulty.reveal_target(self.config.grid_size);
        let solver = Solver::new();

        let mut player = solution.clone();
        let mut revealed = size * size;

        let mut coords: Vec<Position> = Position::all(size).collect();
        coords.shuffle(&mut self.rng);

        for pos in coords {
            if revealed <= target {
                break;
            }
            if player.get(pos) == CellState::Empty {
                continue;
            }

            let mut trial = player.clone();
            trial.set(pos, CellState::Empty);
            if solver.reconstructs(&trial, clues, solution) {
                player.set(pos, CellState::Empty);
                revealed -= 1;
            }
        }

        // A zero clue trivially reveals its whole line; show it as water
        // outright rather than leaving the player to re-derive it.
        for line in 0..size {
            if clues.rows[line] == 0 {
                for pos in player.row_positions(line).collect::<Vec<_>>() {
                    player.set(pos, CellState::Water);
                }
            }
            if clues.cols[line] == 0 {
                for pos in player.col_positions(line).collect::<Vec<_>>() {
                    player.set(pos, CellState::Water);
                }
            }
        }

        debug!(
            "reduction stopped at {} revealed cells (target {})",
            player.count(CellState::Ship) + player.count(CellState::Water),
            target
        );
        player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_solution_is_complete() {
        let mut generator = Generator::with_seed(42);
        let puzzle = generator.generate(GridSize::Eight, Difficulty::Medium).unwrap();

        assert!(puzzle.solution.is_fully_determined());
        assert_eq!(
            puzzle.solution.count(CellState::Ship),
            GridSize::Eight.total_ship_cells()
        );
        assert_eq!(puzzle.ships.len(), GridSize::Eight.fleet().len());
    }

    #[test]
    fn test_clue_conservation() {
        let mut generator = Generator::with_seed(42);
        for &size in GridSize::all() {
            let puzzle = generator.generate(size, Difficulty::Medium).unwrap();
            let row_sum: usize = puzzle.clues.rows.iter().sum();
            let col_sum: usize = puzzle.clues.cols.iter().sum();
            assert_eq!(row_sum, size.total_ship_cells());
            assert_eq!(col_sum, size.total_ship_cells());
        }
    }

    #[test]
    fn test_clue_round_trip() {
        let mut generator = Generator::with_seed(7);
        let puzzle = generator.generate(GridSize::Ten, Difficulty::Hard).unwrap();
        assert_eq!(Clues::derive(&puzzle.solution), puzzle.clues);
    }

    #[test]
    fn test_reducer_soundness() {
        // Hard invariant: the starting grid must always deduce back to the
        // exact solution, for every difficulty
        let solver = Solver::new();
        for seed in 0..10 {
            let mut generator = Generator::with_seed(seed);
            for &difficulty in Difficulty::all_levels() {
                let puzzle = generator.generate(GridSize::Eight, difficulty).unwrap();
                assert!(
                    solver.reconstructs(&puzzle.player, &puzzle.clues, &puzzle.solution),
                    "seed {} difficulty {} produced an unsolvable start",
                    seed,
                    difficulty
                );
            }
        }
    }

    #[test]
    fn test_reduction_respects_target() {
        let mut generator = Generator::with_seed(42);
        let puzzle = generator.generate(GridSize::Eight, Difficulty::Easy).unwrap();
        let target = Difficulty::Easy.reveal_target(GridSize::Eight);
        assert!(
            puzzle.revealed_count() >= target,
            "reduction went below the easy target: {} < {}",
            puzzle.revealed_count(),
            target
        );
    }

    #[test]
    fn test_zero_clue_lines_start_watered() {
        for seed in 0..5 {
            let mut generator = Generator::with_seed(seed);
            let puzzle = generator.generate(GridSize::Eight, Difficulty::Expert).unwrap();
            for row in 0..8 {
                if puzzle.clues.rows[row] == 0 {
                    for col in 0..8 {
                        assert_eq!(
                            puzzle.player.get(Position::new(row, col)),
                            CellState::Water
                        );
                    }
                }
            }
            for col in 0..8 {
                if puzzle.clues.cols[col] == 0 {
                    for row in 0..8 {
                        assert_eq!(
                            puzzle.player.get(Position::new(row, col)),
                            CellState::Water
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let mut first = Generator::with_seed(1234);
        let mut second = Generator::with_seed(1234);
        let a = first.generate(GridSize::Ten, Difficulty::Medium).unwrap();
        let b = second.generate(GridSize::Ten, Difficulty::Medium).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_generation() {
        let mut generator = Generator::with_seed(9);
        let cancel = AtomicBool::new(false);
        let puzzles = generator.generate_batch(3, &cancel).unwrap();
        assert_eq!(puzzles.len(), 3);
    }

    #[test]
    fn test_batch_cancellation_before_start() {
        let mut generator = Generator::with_seed(9);
        let cancel = AtomicBool::new(true);
        let puzzles = generator.generate_batch(100, &cancel).unwrap();
        assert!(puzzles.is_empty());
    }
}
