use crate::game::Game;
use crate::stats::{GameResult, StatsManager};
use crate::theme::Theme;
use battleship_core::{
    CellState, Deduction, Difficulty, GenerationError, Generator, GridSize, MoveOutcome, Position,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use std::fs;
use std::path::PathBuf;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay
    Playing,
    /// Win screen
    Win,
    /// Statistics screen
    Stats,
}

/// Menu state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    None,
    /// Board size selection for a new game
    NewGame,
    /// Difficulty selection for a new game
    Difficulty,
    /// Theme selection
    Theme,
    /// Give-up confirmation
    Confirm,
}

/// Options collected from the command line
pub struct AppOptions {
    pub size: GridSize,
    pub difficulty: Difficulty,
    pub seed: Option<u64>,
    pub mistake_mode: bool,
    pub undo_depth: usize,
    pub theme: Theme,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            size: GridSize::Ten,
            difficulty: Difficulty::Medium,
            seed: None,
            mistake_mode: false,
            undo_depth: crate::game::DEFAULT_UNDO_DEPTH,
            theme: Theme::dark(),
        }
    }
}

/// The main application state
pub struct App {
    /// Current game
    pub game: Game,
    /// Puzzle generator, kept so seeded runs stay reproducible across games
    generator: Generator,
    /// Currently selected cell position
    pub cursor: Position,
    /// Current menu state
    pub menu: MenuState,
    /// Selected menu item
    pub menu_selection: usize,
    /// Board size picked in the new-game menu
    pub pending_size: GridSize,
    /// Mistake-mode policy applied to new games
    mistake_mode: bool,
    /// Undo-depth policy applied to new and loaded games
    undo_depth: usize,
    /// Color theme
    pub theme: Theme,
    /// Current hint to display
    pub current_hint: Option<Deduction>,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Statistics manager
    pub stats: StatsManager,
    /// Whether current game has been recorded (to avoid double recording)
    game_recorded: bool,
    /// Whether the last win set a new best time for its mode
    pub new_best: bool,
}

impl App {
    /// Create the app with an initial game per the command-line options
    pub fn new(options: AppOptions) -> Result<Self, GenerationError> {
        let mut generator = match options.seed {
            Some(seed) => Generator::with_seed(seed),
            None => Generator::new(),
        };
        let mut game = Game::with_generator(
            &mut generator,
            options.size,
            options.difficulty,
            options.mistake_mode,
        )?;
        game.set_undo_depth(options.undo_depth);

        Ok(Self {
            game,
            generator,
            cursor: Position::new(0, 0),
            menu: MenuState::None,
            menu_selection: 0,
            pending_size: options.size,
            mistake_mode: options.mistake_mode,
            undo_depth: options.undo_depth,
            theme: options.theme,
            current_hint: None,
            message: None,
            message_timer: 0,
            screen_state: ScreenState::Playing,
            stats: StatsManager::load(),
            game_recorded: false,
            new_best: false,
        })
    }

    /// Update timers and watch for completion (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        if self.screen_state == ScreenState::Playing && self.game.is_won() && !self.game_recorded
        {
            self.new_best = self.record_game(GameResult::Win);
            self.screen_state = ScreenState::Win;
        }
    }

    /// Record the current game to stats. Returns true on a new best time.
    fn record_game(&mut self, result: GameResult) -> bool {
        if self.game_recorded {
            return false;
        }
        self.game_recorded = true;

        self.stats.record_game(
            self.game.grid_size(),
            self.game.difficulty(),
            result,
            self.game.elapsed().as_secs(),
            self.game.hints_used(),
            self.game.mistakes(),
        )
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Win => self.handle_win_key(key),
            ScreenState::Stats => self.handle_stats_key(key),
            ScreenState::Playing => {
                // Clear hint on any key
                if self.current_hint.is_some() {
                    self.current_hint = None;
                }

                match self.menu {
                    MenuState::None => self.handle_game_key(key),
                    MenuState::NewGame
                    | MenuState::Difficulty
                    | MenuState::Theme
                    | MenuState::Confirm => self.handle_menu_key(key),
                }
            }
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            // Quit - record abandoned game if in progress
            KeyCode::Char('q') => {
                if !self.game.is_completed() && self.game.moves_count() > 0 {
                    self.record_game(GameResult::Abandoned);
                }
                return AppAction::Quit;
            }

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            // Cycle the selected cell
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(outcome) = self.game.cycle_cell(self.cursor) {
                    self.report_outcome(outcome);
                }
            }

            // Mark water directly
            KeyCode::Char('w') => {
                if let Some(outcome) = self.game.set_cell(self.cursor, CellState::Water) {
                    self.report_outcome(outcome);
                }
            }

            // Clear cell
            KeyCode::Char('x') | KeyCode::Char('0') | KeyCode::Delete | KeyCode::Backspace => {
                self.game.clear_cell(self.cursor);
            }

            // Water every satisfied line
            KeyCode::Char('f') => {
                let filled = self.game.fill_water();
                if filled > 0 {
                    self.show_message(&format!("Watered {} cells", filled));
                } else {
                    self.show_message("No satisfied lines to fill");
                }
            }

            // Toggle auto-fill after ship marks
            KeyCode::Char('a') => {
                let enabled = !self.game.auto_fill();
                self.game.set_auto_fill(enabled);
                self.show_message(if enabled {
                    "Auto-fill on"
                } else {
                    "Auto-fill off"
                });
            }

            // Undo/Redo
            KeyCode::Char('u') => {
                if self.game.undo() {
                    self.show_message("Undo");
                }
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.game.redo() {
                    self.show_message("Redo");
                }
            }

            // Hint: reveal one deduced cell
            KeyCode::Char('?') => {
                if let Some(deduction) = self.game.hint() {
                    self.cursor = deduction.pos;
                    self.current_hint = Some(deduction);
                } else {
                    self.show_message("No logical move available");
                }
            }

            // New game menu
            KeyCode::Char('n') => {
                self.menu = MenuState::NewGame;
                self.menu_selection = 0;
            }

            // Pause
            KeyCode::Char('p') => {
                self.game.toggle_pause();
                if self.game.is_paused() {
                    self.show_message("Paused");
                } else {
                    self.show_message("Resumed");
                }
            }

            // Theme menu
            KeyCode::Char('t') => {
                self.menu = MenuState::Theme;
                self.menu_selection = 0;
            }

            // Give up (asks for confirmation)
            KeyCode::Char('g') => {
                if !self.game.is_completed() {
                    self.menu = MenuState::Confirm;
                    self.menu_selection = 1; // default to No
                }
            }

            // Save
            KeyCode::Char('S') if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.save_game();
            }

            // Load
            KeyCode::Char('L') if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.load_game();
            }

            // Stats screen
            KeyCode::Char('i') => {
                self.screen_state = ScreenState::Stats;
            }

            _ => {}
        }

        AppAction::Continue
    }

    fn report_outcome(&mut self, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Conflict => {
                self.show_message("That cell is not a ship");
            }
            // The win screen takes over on the next tick
            MoveOutcome::Completed => {}
            MoveOutcome::Applied | MoveOutcome::OutOfBounds => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.menu = MenuState::None;
            }

            KeyCode::Up | KeyCode::Char('k') => {
                if self.menu_selection > 0 {
                    self.menu_selection -= 1;
                }
            }

            KeyCode::Down | KeyCode::Char('j') => {
                let max = match self.menu {
                    MenuState::NewGame => GridSize::all().len() - 1,
                    MenuState::Difficulty => Difficulty::all_levels().len() - 1,
                    MenuState::Theme => 2,
                    MenuState::Confirm => 1,
                    MenuState::None => 0,
                };
                if self.menu_selection < max {
                    self.menu_selection += 1;
                }
            }

            KeyCode::Enter | KeyCode::Char(' ') => match self.menu {
                MenuState::NewGame => {
                    self.pending_size = GridSize::all()[self.menu_selection];
                    self.menu = MenuState::Difficulty;
                    self.menu_selection = 0;
                }
                MenuState::Difficulty => {
                    let difficulty = Difficulty::all_levels()[self.menu_selection];
                    self.menu = MenuState::None;
                    self.start_new_game(self.pending_size, difficulty);
                }
                MenuState::Theme => {
                    self.theme = match self.menu_selection {
                        0 => Theme::dark(),
                        1 => Theme::light(),
                        _ => Theme::high_contrast(),
                    };
                    self.menu = MenuState::None;
                }
                MenuState::Confirm => {
                    if self.menu_selection == 0 {
                        self.game.give_up();
                        self.record_game(GameResult::Abandoned);
                        self.show_message("Solution revealed");
                    }
                    self.menu = MenuState::None;
                }
                MenuState::None => {}
            },

            _ => {}
        }

        AppAction::Continue
    }

    fn handle_win_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Char('n') => {
                // Full new game menu
                self.screen_state = ScreenState::Playing;
                self.menu = MenuState::NewGame;
                self.menu_selection = 0;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                // Quick restart with the same board size and difficulty
                let size = self.game.grid_size();
                let difficulty = self.game.difficulty();
                self.start_new_game(size, difficulty);
            }
            KeyCode::Char('i') => {
                self.screen_state = ScreenState::Stats;
            }
            KeyCode::Esc => {
                // Back to the (finished) board view
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_stats_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn start_new_game(&mut self, size: GridSize, difficulty: Difficulty) {
        match Game::with_generator(&mut self.generator, size, difficulty, self.mistake_mode) {
            Ok(mut game) => {
                game.set_undo_depth(self.undo_depth);
                self.game = game;
                self.cursor = Position::new(0, 0);
                self.game_recorded = false;
                self.new_best = false;
                self.screen_state = ScreenState::Playing;
                self.show_message(&format!("New {} {} game", size, difficulty));
            }
            Err(e) => {
                warn!("puzzle generation failed: {}", e);
                self.show_message("Could not generate a puzzle");
            }
        }
    }

    fn move_cursor(&mut self, row_delta: i32, col_delta: i32) {
        let max = self.game.grid_size().side() as i32 - 1;
        let new_row = (self.cursor.row as i32 + row_delta).clamp(0, max) as usize;
        let new_col = (self.cursor.col as i32 + col_delta).clamp(0, max) as usize;
        self.cursor = Position::new(new_row, new_col);
    }

    /// Get the save file path
    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("battleship_save.json")
    }

    /// Save the current game
    fn save_game(&mut self) {
        let json = self.game.serialize();
        match fs::write(Self::save_path(), json) {
            Ok(_) => self.show_message("Game saved"),
            Err(_) => self.show_message("Failed to save"),
        }
    }

    /// Load a saved game
    fn load_game(&mut self) {
        match fs::read_to_string(Self::save_path()) {
            Ok(json) => {
                if let Some(mut game) = Game::deserialize(&json) {
                    game.set_undo_depth(self.undo_depth);
                    self.game_recorded = game.is_completed();
                    self.game = game;
                    self.cursor = Position::new(0, 0);
                    self.screen_state = ScreenState::Playing;
                    self.show_message("Game loaded (paused)");
                } else {
                    self.show_message("Invalid save file");
                }
            }
            Err(_) => self.show_message("No save file found"),
        }
    }

    /// Check if a position shares a row or column with the cursor
    pub fn is_highlighted(&self, pos: Position) -> bool {
        pos.row == self.cursor.row || pos.col == self.cursor.col
    }
}
