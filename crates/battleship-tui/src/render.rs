use crate::app::{App, MenuState, ScreenState};
use crate::stats::format_time;
use battleship_core::{CellState, Difficulty, GridSize, Position};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, Clear(ClearType::All))?;

    match app.screen_state {
        ScreenState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
        ScreenState::Win => render_win_screen(stdout, app, term_width, term_height)?,
        ScreenState::Stats => render_stats_screen(stdout, app, term_width, term_height)?,
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    // Grid block: 3-wide row-clue gutter, border, 3 chars per cell, border.
    // A column clue line sits above the top border.
    let side = app.game.grid_size().side();
    let grid_width = (side * 3 + 5) as u16;
    let grid_height = (side + 3) as u16;

    let total_width = grid_width + 28; // grid + gap + info panel
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > grid_height + 8 { 2 } else { 1 };

    render_grid(stdout, app, start_x, start_y)?;

    let info_x = start_x + grid_width + 3;
    render_info_panel(stdout, app, info_x, start_y)?;

    let controls_y = start_y + grid_height + 1;
    render_controls(stdout, app, start_x, controls_y)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    if app.menu != MenuState::None {
        render_menu(stdout, app, term_width, term_height)?;
    }

    if let Some(ref deduction) = app.current_hint {
        let text = format!("{}: {}", deduction.rule, deduction.explanation);
        render_hint(stdout, app, &text, term_width, term_height)?;
    }

    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = app.game.session();
    let player = session.player();
    let clues = session.clues();
    let side = player.size();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    // Column clues above the grid, colored by their current state
    for col in 0..side {
        let color = if clues.col_overfilled(player, col) {
            theme.error
        } else if clues.col_satisfied(player, col) {
            theme.success
        } else {
            theme.clue
        };
        execute!(
            stdout,
            MoveTo(x + 4 + col as u16 * 3, y),
            SetForegroundColor(color),
            Print(format!("{:^3}", clues.cols[col]))
        )?;
    }

    // Top border
    execute!(
        stdout,
        MoveTo(x + 3, y + 1),
        SetForegroundColor(theme.border),
        Print(format!("┌{}┐", "─".repeat(side * 3)))
    )?;

    // Cell rows with row clues in the left gutter
    let found_cells = found_ship_cells(app);
    for row in 0..side {
        let row_y = y + 2 + row as u16;

        let color = if clues.row_overfilled(player, row) {
            theme.error
        } else if clues.row_satisfied(player, row) {
            theme.success
        } else {
            theme.clue
        };
        execute!(
            stdout,
            MoveTo(x, row_y),
            SetForegroundColor(color),
            Print(format!("{:>2} ", clues.rows[row]))
        )?;

        execute!(stdout, SetForegroundColor(theme.border), Print("│"))?;
        for col in 0..side {
            render_cell(stdout, app, Position::new(row, col), &found_cells)?;
        }
        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.border),
            Print("│")
        )?;
    }

    // Bottom border
    execute!(
        stdout,
        MoveTo(x + 3, y + 2 + side as u16),
        SetForegroundColor(theme.border),
        Print(format!("└{}┘", "─".repeat(side * 3)))
    )?;

    Ok(())
}

fn render_cell(
    stdout: &mut io::Stdout,
    app: &App,
    pos: Position,
    found_cells: &[Position],
) -> io::Result<()> {
    let theme = &app.theme;
    let state = app.game.session().player().get(pos);
    let is_cursor = pos == app.cursor;

    let bg = if is_cursor {
        theme.selected_bg
    } else if app.is_highlighted(pos) {
        theme.highlight_bg
    } else {
        theme.bg
    };

    let (glyph, fg) = match state {
        CellState::Empty => (" · ", theme.unknown),
        CellState::Water => (" ~ ", theme.water),
        CellState::Ship if found_cells.contains(&pos) => (" ■ ", theme.success),
        CellState::Ship => (" ■ ", theme.ship),
    };

    execute!(
        stdout,
        SetBackgroundColor(bg),
        SetForegroundColor(fg),
        Print(glyph)
    )?;

    Ok(())
}

/// Cells belonging to fleet ships the player has fully placed
fn found_ship_cells(app: &App) -> Vec<Position> {
    let session = app.game.session();
    let found = session.found_ships();
    session
        .puzzle()
        .ships
        .iter()
        .filter(|ship| found.contains(&ship.id))
        .flat_map(|ship| ship.segments.iter().copied())
        .collect()
}

/// Per-length fleet progress as (length, found, total), longest first
fn fleet_progress(app: &App) -> Vec<(usize, usize, usize)> {
    let session = app.game.session();
    let found = session.found_ships();
    let mut progress: Vec<(usize, usize, usize)> = Vec::new();
    for ship in &session.puzzle().ships {
        let is_found = found.contains(&ship.id) as usize;
        match progress.iter_mut().find(|entry| entry.0 == ship.length) {
            Some(entry) => {
                entry.1 += is_found;
                entry.2 += 1;
            }
            None => progress.push((ship.length, is_found, 1)),
        }
    }
    progress.sort_by(|a, b| b.0.cmp(&a.0));
    progress
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let game = &app.game;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    // Title
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ BATTLESHIP ═══")
    )?;

    // Time
    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Time: {:>12}", game.elapsed_string()))
    )?;

    // Board and difficulty
    execute!(
        stdout,
        MoveTo(x, y + 3),
        SetForegroundColor(theme.info),
        Print(format!("Board: {:>11}", format!("{}", game.grid_size())))
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(theme.info),
        Print(format!("Level: {:>11}", format!("{}", game.difficulty())))
    )?;

    // Status
    let (status, status_color) = if game.gave_up() {
        ("revealed", theme.error)
    } else if game.is_won() {
        ("solved!", theme.success)
    } else if game.is_paused() {
        ("paused", theme.key)
    } else {
        ("playing", theme.info)
    };
    execute!(
        stdout,
        MoveTo(x, y + 5),
        SetForegroundColor(theme.info),
        Print("Status: "),
        SetForegroundColor(status_color),
        Print(format!("{:>10}", status))
    )?;

    // Mistakes only mean something when mistake mode is on
    if game.session().mistake_mode() {
        let mistakes_color = if game.mistakes() > 0 {
            Color::Yellow
        } else {
            theme.info
        };
        execute!(
            stdout,
            MoveTo(x, y + 7),
            SetForegroundColor(mistakes_color),
            Print(format!("Mistakes: {:>8}", game.mistakes()))
        )?;
    }
    execute!(
        stdout,
        MoveTo(x, y + 8),
        SetForegroundColor(theme.info),
        Print(format!("Hints used: {:>6}", game.hints_used()))
    )?;

    // Separator
    execute!(
        stdout,
        MoveTo(x, y + 10),
        SetForegroundColor(theme.border),
        Print("──────────────────")
    )?;

    // Ship cell progress
    let placed = game.session().player().count(CellState::Ship);
    let total = game.grid_size().total_ship_cells();
    execute!(
        stdout,
        MoveTo(x, y + 11),
        SetForegroundColor(theme.info),
        Print(format!("Ship cells: {:>3}/{}", placed, total))
    )?;

    // Fleet checklist grouped by ship length
    execute!(
        stdout,
        MoveTo(x, y + 13),
        SetForegroundColor(theme.fg),
        Print("Fleet:")
    )?;
    let fleet = fleet_progress(app);
    for (i, &(length, found, total)) in fleet.iter().enumerate() {
        let color = if found == total {
            theme.success
        } else {
            theme.info
        };
        execute!(
            stdout,
            MoveTo(x + 2, y + 14 + i as u16),
            SetForegroundColor(color),
            Print(format!("{:<5} {}/{}", "■".repeat(length), found, total))
        )?;
    }

    // Current cell
    let cell_y = y + 15 + fleet.len() as u16;
    execute!(
        stdout,
        MoveTo(x, cell_y),
        SetForegroundColor(theme.info),
        Print(format!(
            "Cell: Row {} Col {}",
            app.cursor.row + 1,
            app.cursor.col + 1
        ))
    )?;

    // Auto-fill state
    let auto = if game.auto_fill() { "on" } else { "off" };
    execute!(
        stdout,
        MoveTo(x, cell_y + 1),
        SetForegroundColor(theme.info),
        Print(format!("Auto-fill: {:>7}", auto))
    )?;

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls = [
        ("hjkl", "Move"),
        ("Space", "Cycle"),
        ("w", "Water"),
        ("x/Del", "Clear"),
        ("f", "Fill lines"),
        ("a", "Auto-fill"),
        ("?", "Hint"),
        ("u", "Undo"),
        ("Ctrl+r", "Redo"),
        ("p", "Pause"),
        ("n", "New game"),
        ("g", "Give up"),
        ("S/L", "Save/Load"),
        ("i", "Stats"),
        ("t", "Theme"),
        ("q", "Quit"),
    ];

    // Display in 4 columns (4 items each)
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 4;
        let row = i % 4;
        let cx = x + (col as u16) * 18;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>7}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.len() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.selected_bg),
        Print(&padded)
    )?;

    Ok(())
}

fn render_menu(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;

    let num_options = match app.menu {
        MenuState::NewGame => GridSize::all().len(),
        MenuState::Difficulty => Difficulty::all_levels().len(),
        MenuState::Theme => 3,
        MenuState::Confirm => 2,
        MenuState::None => 0,
    };

    let menu_width: u16 = 30;
    let menu_height: u16 = (num_options + 5) as u16; // title + options + padding
    let x = (term_width.saturating_sub(menu_width)) / 2;
    let y = (term_height.saturating_sub(menu_height)) / 2;

    let bg = Color::Rgb {
        r: 30,
        g: 30,
        b: 40,
    };

    // Background
    for row in 0..menu_height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(bg),
            Print(" ".repeat(menu_width as usize))
        )?;
    }

    // Border
    execute!(
        stdout,
        SetForegroundColor(theme.border),
        SetBackgroundColor(bg)
    )?;
    execute!(
        stdout,
        MoveTo(x, y),
        Print("┌"),
        Print("─".repeat(menu_width as usize - 2)),
        Print("┐")
    )?;
    for row in 1..menu_height - 1 {
        execute!(stdout, MoveTo(x, y + row), Print("│"))?;
        execute!(stdout, MoveTo(x + menu_width - 1, y + row), Print("│"))?;
    }
    execute!(
        stdout,
        MoveTo(x, y + menu_height - 1),
        Print("└"),
        Print("─".repeat(menu_width as usize - 2)),
        Print("┘")
    )?;

    // Title
    let title = match app.menu {
        MenuState::NewGame => "Board Size",
        MenuState::Difficulty => "Select Difficulty",
        MenuState::Theme => "Select Theme",
        MenuState::Confirm => "Reveal the solution?",
        MenuState::None => "",
    };
    let title_x = x + (menu_width.saturating_sub(title.len() as u16)) / 2;
    execute!(
        stdout,
        MoveTo(title_x, y + 1),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(bg),
        Print(title)
    )?;

    // Options
    if app.menu == MenuState::Difficulty {
        let difficulties: Vec<(&str, Color)> = vec![
            ("Easy", Color::Green),
            ("Medium", Color::Yellow),
            (
                "Hard",
                Color::Rgb {
                    r: 255,
                    g: 165,
                    b: 0,
                },
            ),
            ("Expert", Color::Red),
        ];

        for (i, (name, color)) in difficulties.iter().enumerate() {
            let selected = i == app.menu_selection;
            let (fg, item_bg) = if selected {
                (Color::Black, *color)
            } else {
                (*color, bg)
            };

            execute!(
                stdout,
                MoveTo(x + 2, y + 3 + i as u16),
                SetForegroundColor(fg),
                SetBackgroundColor(item_bg),
                Print(format!(" {:^24} ", name))
            )?;
        }
    } else {
        let options: Vec<String> = match app.menu {
            MenuState::NewGame => GridSize::all()
                .iter()
                .map(|size| format!("{}", size))
                .collect(),
            MenuState::Theme => vec![
                "Dark".to_string(),
                "Light".to_string(),
                "High Contrast".to_string(),
            ],
            MenuState::Confirm => vec!["Yes".to_string(), "No".to_string()],
            _ => Vec::new(),
        };

        for (i, option) in options.iter().enumerate() {
            let selected = i == app.menu_selection;
            let (fg, item_bg) = if selected {
                (Color::Black, theme.key)
            } else {
                (theme.fg, bg)
            };

            execute!(
                stdout,
                MoveTo(x + 2, y + 3 + i as u16),
                SetForegroundColor(fg),
                SetBackgroundColor(item_bg),
                Print(format!(" {:^24} ", option))
            )?;
        }
    }

    Ok(())
}

fn render_hint(
    stdout: &mut io::Stdout,
    app: &App,
    hint: &str,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;

    let max_width = 45;
    let wrapped = wrap_text(hint, max_width);

    let box_width = (max_width + 4) as u16;
    let box_height = (wrapped.len() + 4) as u16;
    let x = term_width.saturating_sub(box_width) / 2;
    let y = term_height.saturating_sub(box_height) / 2;

    let bg = Color::Rgb {
        r: 25,
        g: 45,
        b: 25,
    };

    // Background
    for row in 0..box_height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(bg),
            Print(" ".repeat(box_width as usize))
        )?;
    }

    // Title
    execute!(
        stdout,
        MoveTo(x + 2, y + 1),
        SetForegroundColor(theme.success),
        SetBackgroundColor(bg),
        Print("💡 Hint")
    )?;

    // Text
    for (i, line) in wrapped.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x + 2, y + 3 + i as u16),
            SetForegroundColor(theme.fg),
            SetBackgroundColor(bg),
            Print(line)
        )?;
    }

    Ok(())
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_width && !current.is_empty() {
            lines.push(current);
            current = String::new();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn render_win_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let game = &app.game;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let center_y = term_height / 2;

    let banner = "≋ ≋ ≋  FLEET FOUND  ≋ ≋ ≋";
    let banner_x = term_width.saturating_sub(banner.chars().count() as u16) / 2;
    execute!(
        stdout,
        MoveTo(banner_x, center_y.saturating_sub(5)),
        SetForegroundColor(theme.success),
        Print(banner)
    )?;

    let summary = format!(
        "{} {} solved in {}",
        game.grid_size(),
        game.difficulty(),
        game.elapsed_string()
    );
    let summary_x = term_width.saturating_sub(summary.len() as u16) / 2;
    execute!(
        stdout,
        MoveTo(summary_x, center_y.saturating_sub(3)),
        SetForegroundColor(theme.fg),
        Print(summary)
    )?;

    if app.new_best {
        let best = "★ New best time! ★";
        let best_x = term_width.saturating_sub(best.chars().count() as u16) / 2;
        execute!(
            stdout,
            MoveTo(best_x, center_y.saturating_sub(1)),
            SetForegroundColor(theme.key),
            Print(best)
        )?;
    }

    let stats = format!(
        "Hints: {} | Mistakes: {} | Moves: {}",
        game.hints_used(),
        game.mistakes(),
        game.moves_count()
    );
    let stats_x = term_width.saturating_sub(stats.len() as u16 + 2) / 2;
    execute!(
        stdout,
        MoveTo(stats_x, center_y + 1),
        SetForegroundColor(Color::Grey),
        Print(format!(" {} ", stats))
    )?;

    let instr = "Enter: play again | n: new game | i: stats | q: quit";
    let instr_x = term_width.saturating_sub(instr.len() as u16) / 2;
    execute!(
        stdout,
        MoveTo(instr_x, center_y + 3),
        SetForegroundColor(Color::DarkYellow),
        Print(instr)
    )?;

    Ok(())
}

fn render_stats_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let player = &app.stats.player;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    // Title
    let title = "═══ STATISTICS ═══";
    let title_x = term_width.saturating_sub(title.chars().count() as u16) / 2;
    execute!(
        stdout,
        MoveTo(title_x, 1),
        SetForegroundColor(theme.key),
        Print(title)
    )?;

    let start_y = 3;
    let col1_x = 4u16;
    let col2_x = term_width / 2;

    // Overall stats (left column)
    execute!(
        stdout,
        MoveTo(col1_x, start_y),
        SetForegroundColor(theme.info),
        Print(format!("Total Games: {}", player.total_games))
    )?;
    execute!(
        stdout,
        MoveTo(col1_x, start_y + 1),
        SetForegroundColor(theme.success),
        Print(format!("Wins: {}", player.total_wins))
    )?;
    execute!(
        stdout,
        MoveTo(col1_x, start_y + 2),
        SetForegroundColor(theme.border),
        Print(format!("Abandoned: {}", player.total_abandoned))
    )?;
    execute!(
        stdout,
        MoveTo(col1_x, start_y + 4),
        SetForegroundColor(theme.fg),
        Print(format!("Win Rate: {:.1}%", player.overall_win_rate()))
    )?;

    let streak_color = if player.current_streak > 0 {
        theme.success
    } else {
        theme.info
    };
    execute!(
        stdout,
        MoveTo(col1_x, start_y + 5),
        SetForegroundColor(streak_color),
        Print(format!("Current Streak: {}", player.current_streak))
    )?;
    execute!(
        stdout,
        MoveTo(col1_x, start_y + 6),
        SetForegroundColor(theme.key),
        Print(format!("Best Streak: {} wins", player.best_streak))
    )?;

    // Per-mode stats (right column)
    execute!(
        stdout,
        MoveTo(col2_x, start_y),
        SetForegroundColor(theme.fg),
        Print("By Mode:")
    )?;

    let mut y = start_y + 2;
    let mut any = false;
    'modes: for &size in GridSize::all() {
        for &difficulty in Difficulty::all_levels() {
            let mode = player.mode_stats(size, difficulty);
            if mode.total_games == 0 {
                continue;
            }
            if y + 3 >= term_height {
                break 'modes;
            }
            any = true;

            let diff_color = match difficulty {
                Difficulty::Easy => Color::Green,
                Difficulty::Medium => Color::Yellow,
                Difficulty::Hard => Color::Rgb {
                    r: 255,
                    g: 165,
                    b: 0,
                },
                Difficulty::Expert => Color::Red,
            };

            execute!(
                stdout,
                MoveTo(col2_x, y),
                SetForegroundColor(diff_color),
                Print(format!("{} {}", size, difficulty))
            )?;

            let best_str = mode
                .best_time_secs
                .map(format_time)
                .unwrap_or_else(|| "--:--".to_string());
            let avg_str = mode
                .avg_win_time_secs()
                .map(format_time)
                .unwrap_or_else(|| "--:--".to_string());
            execute!(
                stdout,
                MoveTo(col2_x + 2, y + 1),
                SetForegroundColor(theme.info),
                Print(format!(
                    "Games: {} | Wins: {} ({:.0}%)",
                    mode.total_games,
                    mode.wins,
                    mode.win_rate()
                ))
            )?;
            execute!(
                stdout,
                MoveTo(col2_x + 2, y + 2),
                SetForegroundColor(theme.info),
                Print(format!("Best: {} | Avg: {}", best_str, avg_str))
            )?;

            y += 4;
        }
    }

    if !any {
        execute!(
            stdout,
            MoveTo(col2_x, start_y + 2),
            SetForegroundColor(theme.info),
            Print("No games recorded yet")
        )?;
    }

    // Footer
    execute!(
        stdout,
        MoveTo(col1_x, term_height.saturating_sub(2)),
        SetForegroundColor(theme.info),
        Print("Press q or Esc to return")
    )?;

    Ok(())
}
