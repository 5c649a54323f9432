//! Fixed palette for the chart viewer.
//!
//! Dark background, one accent for chrome, and a short cycle of line colors
//! that stay distinguishable on 256-color terminals.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    /// Borders and titles.
    pub accent: Color,
    /// Axes, cursor line, secondary text.
    pub muted: Color,
    pub text_primary: Color,
    pub warning: Color,
    /// Line colors, cycled by series position.
    pub series: [Color; 4],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::Rgb(255, 255, 255),
            warning: Color::Rgb(255, 140, 0),
            series: [
                Color::Rgb(0, 255, 128),
                Color::Rgb(255, 20, 147),
                Color::Rgb(147, 112, 219),
                Color::Rgb(255, 215, 0),
            ],
        }
    }
}

impl Theme {
    pub fn series_color(&self, index: usize) -> Color {
        self.series[index % self.series.len()]
    }

    pub fn series_style(&self, index: usize) -> Style {
        Style::default().fg(self.series_color(index))
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn axis(&self) -> Style {
        Style::default().fg(self.muted)
    }
}
