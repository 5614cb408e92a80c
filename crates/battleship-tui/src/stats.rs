use battleship_core::{Difficulty, GridSize};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum number of finished games kept in the history log
const HISTORY_LIMIT: usize = 100;

/// Result of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Abandoned,
}

/// Aggregate statistics for one board size and difficulty combination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeStats {
    pub total_games: usize,
    pub wins: usize,
    pub abandoned: usize,
    pub best_time_secs: Option<u64>,
    pub total_win_time_secs: u64,
    pub total_hints: usize,
    pub total_mistakes: usize,
}

impl ModeStats {
    /// Win rate as a percentage
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.wins as f64 / self.total_games as f64) * 100.0
        }
    }

    /// Average solve time over won games
    pub fn avg_win_time_secs(&self) -> Option<u64> {
        if self.wins == 0 {
            None
        } else {
            Some(self.total_win_time_secs / self.wins as u64)
        }
    }
}

/// One finished game in the history log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub grid_size: GridSize,
    pub difficulty: Difficulty,
    pub result: GameResult,
    pub time_secs: u64,
    pub hints_used: usize,
    pub mistakes: usize,
    /// Unix timestamp of when the game finished
    pub timestamp: u64,
}

/// Overall player statistics across every mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_games: usize,
    pub total_wins: usize,
    pub total_abandoned: usize,
    pub current_streak: i32,
    pub best_streak: i32,
    /// Per-mode stats keyed by `mode_key`
    pub modes: HashMap<String, ModeStats>,
}

impl PlayerStats {
    /// Win rate across all modes as a percentage
    pub fn overall_win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.total_wins as f64 / self.total_games as f64) * 100.0
        }
    }

    /// Stats for one mode, empty if nothing has been played there yet
    pub fn mode_stats(&self, size: GridSize, difficulty: Difficulty) -> ModeStats {
        self.modes
            .get(&mode_key(size, difficulty))
            .cloned()
            .unwrap_or_default()
    }
}

/// Storage key for one board size and difficulty combination,
/// e.g. "battleship-10-medium"
pub fn mode_key(size: GridSize, difficulty: Difficulty) -> String {
    format!("battleship-{}-{}", size.side(), difficulty.key())
}

/// Loads, records, and persists player statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsManager {
    #[serde(default)]
    pub player: PlayerStats,
    #[serde(default)]
    pub history: Vec<GameRecord>,
}

impl StatsManager {
    /// Get the stats file path
    fn save_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("battleship_stats.json")
    }

    /// Load stats from file
    pub fn load() -> Self {
        match fs::read_to_string(Self::save_path()) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save stats to file
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(Self::save_path(), json);
        }
    }

    /// Record a finished game and persist the stats file.
    /// Returns true if a win set a new best time for its mode.
    pub fn record_game(
        &mut self,
        size: GridSize,
        difficulty: Difficulty,
        result: GameResult,
        time_secs: u64,
        hints_used: usize,
        mistakes: usize,
    ) -> bool {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let new_best = self.apply_record(GameRecord {
            grid_size: size,
            difficulty,
            result,
            time_secs,
            hints_used,
            mistakes,
            timestamp,
        });

        self.save();
        new_best
    }

    fn apply_record(&mut self, record: GameRecord) -> bool {
        let mode = self
            .player
            .modes
            .entry(mode_key(record.grid_size, record.difficulty))
            .or_default();
        mode.total_games += 1;
        mode.total_hints += record.hints_used;
        mode.total_mistakes += record.mistakes;

        let mut new_best = false;
        match record.result {
            GameResult::Win => {
                mode.wins += 1;
                mode.total_win_time_secs += record.time_secs;
                if mode.best_time_secs.map_or(true, |best| record.time_secs < best) {
                    mode.best_time_secs = Some(record.time_secs);
                    new_best = true;
                }
            }
            GameResult::Abandoned => {
                mode.abandoned += 1;
            }
        }

        self.player.total_games += 1;
        match record.result {
            GameResult::Win => {
                self.player.total_wins += 1;
                if self.player.current_streak >= 0 {
                    self.player.current_streak += 1;
                } else {
                    self.player.current_streak = 1;
                }
                self.player.best_streak =
                    self.player.best_streak.max(self.player.current_streak);
            }
            GameResult::Abandoned => {
                self.player.total_abandoned += 1;
                self.player.current_streak = 0;
            }
        }

        self.history.push(record);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }

        new_best
    }
}

/// Format seconds as MM:SS or HH:MM:SS
pub fn format_time(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(result: GameResult, time_secs: u64) -> GameRecord {
        GameRecord {
            grid_size: GridSize::Ten,
            difficulty: Difficulty::Medium,
            result,
            time_secs,
            hints_used: 1,
            mistakes: 0,
            timestamp: 0,
        }
    }

    #[test]
    fn test_mode_key_format() {
        assert_eq!(
            mode_key(GridSize::Ten, Difficulty::Medium),
            "battleship-10-medium"
        );
        assert_eq!(
            mode_key(GridSize::Eight, Difficulty::Expert),
            "battleship-8-expert"
        );
    }

    #[test]
    fn test_best_time_and_streak() {
        let mut manager = StatsManager::default();

        assert!(manager.apply_record(record(GameResult::Win, 120)));
        assert!(manager.apply_record(record(GameResult::Win, 90)));
        assert!(!manager.apply_record(record(GameResult::Win, 200)));

        let mode = manager
            .player
            .mode_stats(GridSize::Ten, Difficulty::Medium);
        assert_eq!(mode.wins, 3);
        assert_eq!(mode.best_time_secs, Some(90));
        assert_eq!(manager.player.current_streak, 3);
        assert_eq!(manager.player.best_streak, 3);

        assert!(!manager.apply_record(record(GameResult::Abandoned, 30)));
        assert_eq!(manager.player.current_streak, 0);
        assert_eq!(manager.player.best_streak, 3);
    }

    #[test]
    fn test_win_rate_and_avg() {
        let mut manager = StatsManager::default();
        manager.apply_record(record(GameResult::Win, 100));
        manager.apply_record(record(GameResult::Win, 200));
        manager.apply_record(record(GameResult::Abandoned, 50));

        let mode = manager
            .player
            .mode_stats(GridSize::Ten, Difficulty::Medium);
        assert!((mode.win_rate() - 66.66).abs() < 1.0);
        assert_eq!(mode.avg_win_time_secs(), Some(150));
        assert_eq!(manager.player.total_abandoned, 1);
    }

    #[test]
    fn test_history_capped() {
        let mut manager = StatsManager::default();
        for i in 0..(HISTORY_LIMIT + 10) {
            manager.apply_record(record(GameResult::Win, i as u64));
        }
        assert_eq!(manager.history.len(), HISTORY_LIMIT);
        // Oldest entries are dropped first
        assert_eq!(manager.history[0].time_secs, 10);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3600), "1:00:00");
        assert_eq!(format_time(3725), "1:02:05");
    }
}
