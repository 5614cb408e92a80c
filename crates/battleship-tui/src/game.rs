use crate::stats::format_time;
use battleship_core::{
    CellState, Deduction, Difficulty, GenerationError, Generator, GridSize, HintOutcome,
    MoveOutcome, Position, Puzzle, PuzzleSession,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default cap on the number of moves kept for undo
pub const DEFAULT_UNDO_DEPTH: usize = 50;

/// A single move in the game (for undo/redo)
#[derive(Debug, Clone)]
pub enum GameMove {
    SetCell {
        pos: Position,
        old_state: CellState,
        new_state: CellState,
        /// Cells watered by auto-fill as a side effect of this move
        auto_filled: Vec<Position>,
    },
    FillWater {
        filled: Vec<Position>,
    },
}

/// The game state
#[derive(Clone)]
pub struct Game {
    /// The live puzzle session
    session: PuzzleSession,
    /// Undo stack
    undo_stack: Vec<GameMove>,
    /// Redo stack
    redo_stack: Vec<GameMove>,
    /// Cap on the undo stack; oldest moves fall off first
    undo_depth: usize,
    /// Start time
    start_time: Instant,
    /// Elapsed time (for pause/resume)
    elapsed: Duration,
    /// Whether the game is paused
    paused: bool,
    /// Whether the game is finished
    completed: bool,
    /// Whether the game ended by revealing the solution
    gave_up: bool,
    /// Number of hints used
    hints_used: usize,
    /// Number of rejected ship marks under mistake mode
    mistakes: usize,
    /// Number of applied moves
    moves_count: usize,
    /// Whether satisfied lines are watered automatically after a ship mark
    auto_fill: bool,
}

impl Game {
    /// Start a new game using an existing generator, so seeded runs stay
    /// reproducible across consecutive games
    pub fn with_generator(
        generator: &mut Generator,
        size: GridSize,
        difficulty: Difficulty,
        mistake_mode: bool,
    ) -> Result<Self, GenerationError> {
        let puzzle = generator.generate(size, difficulty)?;
        Ok(Self::from_puzzle(puzzle, mistake_mode))
    }

    /// Wrap an already generated puzzle in a fresh game
    pub fn from_puzzle(puzzle: Puzzle, mistake_mode: bool) -> Self {
        let mut session = PuzzleSession::new(puzzle);
        session.set_mistake_mode(mistake_mode);
        Self {
            session,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_depth: DEFAULT_UNDO_DEPTH,
            start_time: Instant::now(),
            elapsed: Duration::from_secs(0),
            paused: false,
            completed: false,
            gave_up: false,
            hints_used: 0,
            mistakes: 0,
            moves_count: 0,
            auto_fill: true,
        }
    }

    pub fn session(&self) -> &PuzzleSession {
        &self.session
    }

    pub fn grid_size(&self) -> GridSize {
        self.session.puzzle().grid_size
    }

    pub fn difficulty(&self) -> Difficulty {
        self.session.puzzle().difficulty
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        if self.paused || self.completed {
            self.elapsed
        } else {
            self.elapsed + self.start_time.elapsed()
        }
    }

    /// Format the elapsed time for display
    pub fn elapsed_string(&self) -> String {
        format_time(self.elapsed().as_secs())
    }

    /// Check if the game is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Check if the game is finished, by solving or by giving up
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Check if the game was actually solved
    pub fn is_won(&self) -> bool {
        self.completed && !self.gave_up
    }

    pub fn gave_up(&self) -> bool {
        self.gave_up
    }

    /// Get hints used count
    pub fn hints_used(&self) -> usize {
        self.hints_used
    }

    /// Get mistakes count
    pub fn mistakes(&self) -> usize {
        self.mistakes
    }

    /// Get total moves made
    pub fn moves_count(&self) -> usize {
        self.moves_count
    }

    pub fn auto_fill(&self) -> bool {
        self.auto_fill
    }

    pub fn set_auto_fill(&mut self, enabled: bool) {
        self.auto_fill = enabled;
    }

    pub fn set_undo_depth(&mut self, depth: usize) {
        self.undo_depth = depth;
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.completed {
            return;
        }

        if self.paused {
            // Resume: reset start time, keeping elapsed
            self.start_time = Instant::now();
        } else {
            // Pause: save current elapsed
            self.elapsed += self.start_time.elapsed();
        }
        self.paused = !self.paused;
    }

    /// Cycle a cell through undetermined -> ship -> water -> undetermined.
    /// Returns None while input is ignored (paused or finished).
    pub fn cycle_cell(&mut self, pos: Position) -> Option<MoveOutcome> {
        if self.completed || self.paused {
            return None;
        }
        if !self.session.player().in_bounds(pos) {
            return Some(MoveOutcome::OutOfBounds);
        }

        let old_state = self.session.player().get(pos);
        let outcome = self.session.cycle(pos);
        Some(self.finish_move(pos, old_state, outcome))
    }

    /// Set a cell to an explicit state
    pub fn set_cell(&mut self, pos: Position, state: CellState) -> Option<MoveOutcome> {
        if self.completed || self.paused {
            return None;
        }
        if !self.session.player().in_bounds(pos) {
            return Some(MoveOutcome::OutOfBounds);
        }

        let old_state = self.session.player().get(pos);
        if old_state == state {
            return Some(MoveOutcome::Applied);
        }
        let outcome = self.session.set_cell(pos, state);
        Some(self.finish_move(pos, old_state, outcome))
    }

    /// Clear a cell back to undetermined
    pub fn clear_cell(&mut self, pos: Position) -> Option<MoveOutcome> {
        self.set_cell(pos, CellState::Empty)
    }

    fn finish_move(
        &mut self,
        pos: Position,
        old_state: CellState,
        outcome: MoveOutcome,
    ) -> MoveOutcome {
        match outcome {
            MoveOutcome::Applied | MoveOutcome::Completed => {
                self.moves_count += 1;
                let new_state = self.session.player().get(pos);
                let auto_filled = if self.auto_fill && new_state == CellState::Ship {
                    self.session.auto_water_fill()
                } else {
                    Vec::new()
                };
                self.push_move(GameMove::SetCell {
                    pos,
                    old_state,
                    new_state,
                    auto_filled,
                });
                if outcome == MoveOutcome::Completed {
                    self.finish();
                }
            }
            MoveOutcome::Conflict => {
                self.mistakes += 1;
            }
            MoveOutcome::OutOfBounds => {}
        }
        outcome
    }

    /// Water the remaining cells of every satisfied line, as one undoable
    /// move. Returns how many cells were filled.
    pub fn fill_water(&mut self) -> usize {
        if self.completed || self.paused {
            return 0;
        }

        let filled = self.session.auto_water_fill();
        let count = filled.len();
        if count > 0 {
            self.moves_count += 1;
            self.push_move(GameMove::FillWater { filled });
        }
        count
    }

    /// Reveal one solver-deduced cell, recording it as an undoable move
    pub fn hint(&mut self) -> Option<Deduction> {
        if self.completed || self.paused {
            return None;
        }

        match self.session.hint() {
            HintOutcome::Revealed(deduction) => {
                self.hints_used += 1;
                self.moves_count += 1;
                let auto_filled = if self.auto_fill && deduction.state == CellState::Ship {
                    self.session.auto_water_fill()
                } else {
                    Vec::new()
                };
                self.push_move(GameMove::SetCell {
                    pos: deduction.pos,
                    old_state: CellState::Empty,
                    new_state: deduction.state,
                    auto_filled,
                });
                if self.session.is_solved() {
                    self.finish();
                }
                Some(deduction)
            }
            HintOutcome::NoLogicalMoves => None,
        }
    }

    /// Reveal the full solution and end the game unsuccessfully
    pub fn give_up(&mut self) {
        if self.completed {
            return;
        }
        self.session.reveal_solution();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.gave_up = true;
        self.finish();
    }

    fn finish(&mut self) {
        self.completed = true;
        self.elapsed += self.start_time.elapsed();
    }

    fn push_move(&mut self, game_move: GameMove) {
        if self.undo_stack.len() >= self.undo_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(game_move);
        self.redo_stack.clear();
    }

    /// Undo the last move
    pub fn undo(&mut self) -> bool {
        if self.completed || self.paused {
            return false;
        }

        if let Some(game_move) = self.undo_stack.pop() {
            match &game_move {
                GameMove::SetCell {
                    pos,
                    old_state,
                    auto_filled,
                    ..
                } => {
                    for &filled in auto_filled {
                        self.session.clear_cell(filled);
                    }
                    self.session.set_cell(*pos, *old_state);
                }
                GameMove::FillWater { filled } => {
                    for &pos in filled {
                        self.session.clear_cell(pos);
                    }
                }
            }
            self.redo_stack.push(game_move);
            true
        } else {
            false
        }
    }

    /// Redo the last undone move
    pub fn redo(&mut self) -> bool {
        if self.completed || self.paused {
            return false;
        }

        if let Some(game_move) = self.redo_stack.pop() {
            match &game_move {
                GameMove::SetCell {
                    pos,
                    new_state,
                    auto_filled,
                    ..
                } => {
                    self.session.set_cell(*pos, *new_state);
                    for &filled in auto_filled {
                        self.session.set_cell(filled, CellState::Water);
                    }
                }
                GameMove::FillWater { filled } => {
                    for &pos in filled {
                        self.session.set_cell(pos, CellState::Water);
                    }
                }
            }
            self.undo_stack.push(game_move);
            true
        } else {
            false
        }
    }

    /// Serialize the game state for saving
    pub fn serialize(&self) -> String {
        let state = SaveState {
            session: self.session.clone(),
            elapsed_secs: self.elapsed().as_secs(),
            gave_up: self.gave_up,
            hints_used: self.hints_used,
            mistakes: self.mistakes,
            moves_count: self.moves_count,
            auto_fill: self.auto_fill,
        };
        serde_json::to_string(&state).unwrap_or_default()
    }

    /// Deserialize a saved game state
    pub fn deserialize(json: &str) -> Option<Self> {
        let state: SaveState = serde_json::from_str(json).ok()?;
        let completed = state.session.is_solved();

        Some(Self {
            session: state.session,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_depth: DEFAULT_UNDO_DEPTH,
            start_time: Instant::now(),
            elapsed: Duration::from_secs(state.elapsed_secs),
            paused: true, // Start paused when loading
            completed,
            gave_up: state.gave_up,
            hints_used: state.hints_used,
            mistakes: state.mistakes,
            moves_count: state.moves_count,
            auto_fill: state.auto_fill,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct SaveState {
    session: PuzzleSession,
    elapsed_secs: u64,
    /// Older saves predate this field
    #[serde(default)]
    gave_up: bool,
    hints_used: usize,
    mistakes: usize,
    moves_count: usize,
    auto_fill: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_game(mistake_mode: bool) -> Game {
        let mut generator = Generator::with_seed(7);
        let puzzle = generator
            .generate(GridSize::Eight, Difficulty::Easy)
            .expect("generation succeeds");
        Game::from_puzzle(puzzle, mistake_mode)
    }

    /// First undetermined cell whose solution is water
    fn empty_water_cell(game: &Game) -> Position {
        let puzzle = game.session().puzzle();
        Position::all(puzzle.solution.size())
            .find(|&pos| {
                puzzle.player.get(pos) == CellState::Empty
                    && puzzle.solution.get(pos) == CellState::Water
            })
            .expect("some water cell is still hidden")
    }

    #[test]
    fn test_cycle_undo_redo() {
        let mut game = seeded_game(false);
        game.set_auto_fill(false);
        let pos = empty_water_cell(&game);

        assert_eq!(game.cycle_cell(pos), Some(MoveOutcome::Applied));
        assert_eq!(game.session().player().get(pos), CellState::Ship);

        assert!(game.undo());
        assert_eq!(game.session().player().get(pos), CellState::Empty);
        assert!(!game.undo());

        assert!(game.redo());
        assert_eq!(game.session().player().get(pos), CellState::Ship);
        assert!(!game.redo());
    }

    #[test]
    fn test_mistake_mode_counts_conflicts() {
        let mut game = seeded_game(true);
        game.set_auto_fill(false);
        let pos = empty_water_cell(&game);

        assert_eq!(game.cycle_cell(pos), Some(MoveOutcome::Conflict));
        assert_eq!(game.session().player().get(pos), CellState::Empty);
        assert_eq!(game.mistakes(), 1);
        // A rejected move leaves nothing to undo
        assert!(!game.undo());
    }

    #[test]
    fn test_pause_blocks_input() {
        let mut game = seeded_game(false);
        let pos = empty_water_cell(&game);

        game.toggle_pause();
        assert!(game.is_paused());
        assert_eq!(game.cycle_cell(pos), None);
        assert!(!game.undo());

        game.toggle_pause();
        assert_eq!(game.cycle_cell(pos), Some(MoveOutcome::Applied));
    }

    #[test]
    fn test_undo_depth_cap() {
        let mut game = seeded_game(false);
        game.set_auto_fill(false);
        game.set_undo_depth(2);

        let puzzle = game.session().puzzle();
        let cells: Vec<Position> = Position::all(puzzle.player.size())
            .filter(|&pos| puzzle.player.get(pos) == CellState::Empty)
            .take(3)
            .collect();
        assert_eq!(cells.len(), 3);

        for &pos in &cells {
            game.set_cell(pos, CellState::Water);
        }

        assert!(game.undo());
        assert!(game.undo());
        assert!(!game.undo());
    }

    #[test]
    fn test_hint_applies_deduction() {
        let mut game = seeded_game(false);

        let deduction = game.hint().expect("a solvable puzzle always has a next move");
        assert_eq!(game.session().player().get(deduction.pos), deduction.state);
        assert_eq!(game.hints_used(), 1);

        assert!(game.undo());
        assert_eq!(
            game.session().player().get(deduction.pos),
            CellState::Empty
        );
    }

    #[test]
    fn test_give_up_is_not_a_win() {
        let mut game = seeded_game(false);
        game.give_up();

        assert!(game.is_completed());
        assert!(!game.is_won());
        assert!(game.session().is_solved());
        assert_eq!(game.cycle_cell(Position::new(0, 0)), None);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut game = seeded_game(false);
        game.set_auto_fill(false);
        let pos = empty_water_cell(&game);
        game.set_cell(pos, CellState::Water);

        let json = game.serialize();
        let loaded = Game::deserialize(&json).expect("valid save state");

        assert!(loaded.is_paused());
        assert!(!loaded.is_completed());
        assert_eq!(loaded.session().player(), game.session().player());
        assert_eq!(loaded.moves_count(), game.moves_count());
        assert_eq!(loaded.hints_used(), 0);
    }

    #[test]
    fn test_save_load_keeps_gave_up() {
        let mut game = seeded_game(false);
        game.give_up();

        let json = game.serialize();
        let loaded = Game::deserialize(&json).expect("valid save state");

        // A revealed game must not come back as a win
        assert!(loaded.gave_up());
        assert!(loaded.is_completed());
        assert!(!loaded.is_won());
    }
}
