#![allow(clippy::format_in_format_args)]

mod app;
mod game;
mod render;
mod stats;
mod theme;

use app::{App, AppOptions};
use battleship_core::{Difficulty, GridSize};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};
use theme::Theme;

#[derive(Parser, Debug)]
#[command(
    name = "battleship",
    version,
    about = "Battleship solitaire puzzles in the terminal"
)]
struct Options {
    /// Board side length
    #[arg(long, value_enum, default_value = "10")]
    size: SizeArg,

    /// Puzzle difficulty
    #[arg(long, value_enum, default_value = "medium")]
    difficulty: DifficultyArg,

    /// Seed for reproducible puzzle generation
    #[arg(long)]
    seed: Option<u64>,

    /// Reject ship marks that contradict the solution
    #[arg(long)]
    mistake_mode: bool,

    /// Number of moves kept for undo
    #[arg(long, default_value_t = game::DEFAULT_UNDO_DEPTH)]
    undo_depth: usize,

    /// Color theme
    #[arg(long, value_enum, default_value = "dark")]
    theme: ThemeArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    #[value(name = "8")]
    Eight,
    #[value(name = "10")]
    Ten,
    #[value(name = "12")]
    Twelve,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
    Expert,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
    HighContrast,
}

impl From<SizeArg> for GridSize {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Eight => GridSize::Eight,
            SizeArg::Ten => GridSize::Ten,
            SizeArg::Twelve => GridSize::Twelve,
        }
    }
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
            DifficultyArg::Expert => Difficulty::Expert,
        }
    }
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::dark(),
            ThemeArg::Light => Theme::light(),
            ThemeArg::HighContrast => Theme::high_contrast(),
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let options = Options::parse();

    let app_options = AppOptions {
        size: options.size.into(),
        difficulty: options.difficulty.into(),
        seed: options.seed,
        mistake_mode: options.mistake_mode,
        undo_depth: options.undo_depth,
        theme: options.theme.into(),
    };

    // Generate the first puzzle before touching the terminal
    let app = match App::new(app_options) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Run the app
    let result = run_app(&mut stdout, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(100);

    loop {
        // Render
        render::render(stdout, &app)?;
        stdout.flush()?;

        // Handle input with a short timeout so the timer stays live
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                // Handle Ctrl+C
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    app::AppAction::Continue => {}
                    app::AppAction::Quit => break,
                }
            }
        }

        // Tick the timer and message countdown
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
