use ratatui::style::Color;

use crate::models::Difficulty;

/// Palette for one colour mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub good: Color,
    pub fair: Color,
    pub poor: Color,
}

impl Theme {
    pub const DARK: Theme = Theme {
        background: Color::Reset,
        text: Color::White,
        muted: Color::DarkGray,
        accent: Color::Cyan,
        border: Color::DarkGray,
        good: Color::Green,
        fair: Color::Yellow,
        poor: Color::Red,
    };

    pub const LIGHT: Theme = Theme {
        background: Color::White,
        text: Color::Black,
        muted: Color::Gray,
        accent: Color::Blue,
        border: Color::Gray,
        good: Color::Green,
        fair: Color::Rgb(184, 134, 11),
        poor: Color::Red,
    };

    pub fn for_mode(dark: bool) -> Theme {
        if dark { Self::DARK } else { Self::LIGHT }
    }

    pub fn difficulty(&self, difficulty: Difficulty) -> Color {
        match difficulty {
            Difficulty::Easy => self.good,
            Difficulty::Medium => self.fair,
            Difficulty::Hard => self.poor,
        }
    }

    /// Colour for a score in the feedback view.
    pub fn score(&self, score: f64) -> Color {
        if score >= 8.0 {
            self.good
        } else if score >= 6.0 {
            self.fair
        } else {
            self.poor
        }
    }

    /// Colour for a completed entry in the history list.
    pub fn outcome(&self, score: f64) -> Color {
        if score >= 7.0 { self.good } else { self.poor }
    }
}
