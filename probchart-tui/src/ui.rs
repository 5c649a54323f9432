//! Top-level layout — chart plus a one-line key bar.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use probchart_core::RangeWindow;

use crate::app::App;
use crate::chart::ChartPanel;
use crate::theme::Theme;

pub fn draw(f: &mut Frame, app: &mut App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    app.chart_area = chunks[0];
    f.render_widget(ChartPanel::new(app, theme), chunks[0]);
    f.render_widget(key_bar(app, theme), chunks[1]);
}

fn key_bar<'a>(app: &App, theme: &Theme) -> Paragraph<'a> {
    let mut spans = Vec::new();
    for (i, window) in RangeWindow::ALL_WINDOWS.iter().enumerate() {
        let style = if *window == app.window {
            theme.title()
        } else {
            theme.axis()
        };
        spans.push(Span::styled(format!(" {}:{} ", i + 1, window.label()), style));
    }
    let mode = if app.show_all { "all" } else { "top" };
    spans.push(Span::styled(
        format!(" | a:{mode}  ←/→ h/l move  H/L ×10  g/G ends  q quit"),
        Style::default().fg(theme.text_primary),
    ));
    Paragraph::new(Line::from(spans))
}
