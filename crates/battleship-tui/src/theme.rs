use crossterm::style::Color;

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Default text color
    pub fg: Color,
    /// Grid border color
    pub border: Color,
    /// Unresolved clue color
    pub clue: Color,
    /// Ship segment color
    pub ship: Color,
    /// Water cell color
    pub water: Color,
    /// Undetermined cell color
    pub unknown: Color,
    /// Selected cell background
    pub selected_bg: Color,
    /// Highlighted cells (same row/col as cursor)
    pub highlight_bg: Color,
    /// Error/overfilled color
    pub error: Color,
    /// Success/satisfied color
    pub success: Color,
    /// Timer/info text color
    pub info: Color,
    /// Key binding text color
    pub key: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb { r: 12, g: 18, b: 28 },
            fg: Color::Rgb { r: 230, g: 230, b: 240 },
            border: Color::Rgb { r: 90, g: 105, b: 130 },
            clue: Color::Rgb { r: 200, g: 205, b: 215 },
            ship: Color::Rgb { r: 235, g: 235, b: 245 },
            water: Color::Rgb { r: 70, g: 150, b: 220 },
            unknown: Color::Rgb { r: 95, g: 100, b: 115 },
            selected_bg: Color::Rgb { r: 70, g: 90, b: 140 },
            highlight_bg: Color::Rgb { r: 25, g: 34, b: 50 },
            error: Color::Rgb { r: 255, g: 90, b: 90 },
            success: Color::Rgb { r: 90, g: 255, b: 130 },
            info: Color::Rgb { r: 160, g: 165, b: 185 },
            key: Color::Rgb { r: 255, g: 210, b: 100 },
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb { r: 248, g: 248, b: 252 },
            fg: Color::Rgb { r: 30, g: 30, b: 40 },
            border: Color::Rgb { r: 120, g: 130, b: 150 },
            clue: Color::Rgb { r: 50, g: 55, b: 70 },
            ship: Color::Rgb { r: 20, g: 20, b: 30 },
            water: Color::Rgb { r: 30, g: 110, b: 200 },
            unknown: Color::Rgb { r: 170, g: 175, b: 190 },
            selected_bg: Color::Rgb { r: 180, g: 200, b: 255 },
            highlight_bg: Color::Rgb { r: 230, g: 232, b: 242 },
            error: Color::Rgb { r: 220, g: 50, b: 50 },
            success: Color::Rgb { r: 40, g: 160, b: 60 },
            info: Color::Rgb { r: 90, g: 90, b: 110 },
            key: Color::Rgb { r: 200, g: 120, b: 20 },
        }
    }

    /// High contrast theme
    pub fn high_contrast() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            border: Color::Grey,
            clue: Color::White,
            ship: Color::Yellow,
            water: Color::Cyan,
            unknown: Color::Rgb { r: 150, g: 150, b: 150 },
            selected_bg: Color::Blue,
            highlight_bg: Color::Rgb { r: 30, g: 30, b: 30 },
            error: Color::Red,
            success: Color::Green,
            info: Color::Grey,
            key: Color::Yellow,
        }
    }
}
