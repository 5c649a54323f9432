//! Chart panel — step lines, hover cursor and tooltip labels.
//!
//! Each drawn series becomes a "stepAfter" polyline: horizontal to the next
//! sample's timestamp, then vertical to its value, extended to the right edge
//! with the last value. The cursor is a vertical line at the hover time; the
//! tooltip labels sit beside it at the height of each line, spread apart so
//! they never overlap. [`plot_geometry`] is shared with mouse input so a
//! pointer column maps back to the same time the chart drew there.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use probchart_core::layout::layout_labels;
use probchart_core::scale::{ticks, value_domain, LinearScale, TimeScale};
use probchart_core::Series;

use crate::app::App;
use crate::theme::Theme;

const TIME_LABEL: &str = "%m-%d %H:%M";

pub struct ChartPanel<'a> {
    app: &'a App,
    theme: &'a Theme,
}

impl<'a> ChartPanel<'a> {
    pub fn new(app: &'a App, theme: &'a Theme) -> Self {
        Self { app, theme }
    }
}

/// Plot rectangle inside the chart panel and its data-to-cell scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotGeometry {
    pub left: u16,
    pub top: u16,
    pub width: u16,
    pub height: u16,
    pub x_scale: TimeScale,
    pub y_scale: LinearScale,
}

impl PlotGeometry {
    /// Query time under a terminal cell; `None` outside the plot.
    pub fn time_at(&self, column: u16, row: u16) -> Option<i64> {
        let inside_x = column >= self.left && column - self.left < self.width;
        let inside_y = row >= self.top && row - self.top < self.height;
        (inside_x && inside_y).then(|| self.x_scale.time_at(f64::from(column - self.left)))
    }

    pub fn column_of(&self, t: i64) -> u16 {
        let x = self.x_scale.x_of(t).round().clamp(0.0, f64::from(self.width - 1));
        self.left + x as u16
    }
}

/// Time bounds of the x axis; a single timestamp is widened by one unit.
fn x_bounds(app: &App) -> Option<(i64, i64)> {
    let (&lo, &hi) = (app.timeline().first()?, app.timeline().last()?);
    Some(if hi > lo { (lo, hi) } else { (lo, lo.saturating_add(1)) })
}

/// Value-axis domain and tick labels for the drawn lines.
fn y_axis(app: &App) -> ((f64, f64), Vec<String>) {
    let owned: Vec<Series> = app.lines().into_iter().cloned().collect();
    let domain = value_domain(&owned, app.config.value_padding);
    let labels = ticks(domain, 3)
        .into_iter()
        .map(|v| format!("{v:.0}%"))
        .collect();
    (domain, labels)
}

fn label_width(labels: &[String]) -> u16 {
    labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16
}

/// Plot geometry of the chart panel drawn into `area`.
///
/// The plot is the bordered inner area minus the y-label column (plus axis
/// line) and the two bottom rows used by the x axis. `None` when there is no
/// data or no room to plot.
pub fn plot_geometry(app: &App, area: Rect) -> Option<PlotGeometry> {
    let (x_min, x_hi) = x_bounds(app)?;
    let ((y_lo, y_hi), labels) = y_axis(app);
    let y_label_width = label_width(&labels);

    let inner = Block::default().borders(Borders::ALL).inner(area);
    let width = inner.width.saturating_sub(y_label_width + 1);
    let height = inner.height.saturating_sub(2);
    if width < 2 || height < 1 {
        return None;
    }
    Some(PlotGeometry {
        left: inner.x + y_label_width + 1,
        top: inner.y,
        width,
        height,
        x_scale: TimeScale::new((x_min, x_hi), (0.0, f64::from(width - 1))),
        y_scale: LinearScale::new((y_lo, y_hi), (f64::from(height - 1), 0.0)),
    })
}

/// Step-after polyline for one series, held flat until `x_end`.
pub fn step_points(series: &Series, x_end: i64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(series.len() * 2 + 1);
    let mut prev: Option<f64> = None;
    for sample in &series.samples {
        let x = sample.timestamp as f64;
        if let Some(p) = prev {
            points.push((x, p));
        }
        points.push((x, sample.probability));
        prev = Some(sample.probability);
    }
    if let (Some(p), Some(last)) = (prev, series.last()) {
        if x_end > last.timestamp {
            points.push((x_end as f64, p));
        }
    }
    points
}

impl<'a> Widget for ChartPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.app;
        let theme = self.theme;
        let unit = app.config.time_unit;

        let cursor_time = app.cursor_time();
        let title = match cursor_time {
            Some(t) => format!(
                " {} | {} | {} ",
                app.title,
                app.window.label(),
                unit.format(t, "%Y-%m-%d %H:%M")
            ),
            None => format!(" {} | {} ", app.title, app.window.label()),
        };
        let block = Block::default()
            .title(Span::styled(title, theme.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.background));

        let (Some((x_min, x_hi)), Some(t)) = (x_bounds(app), cursor_time) else {
            Paragraph::new("No data available")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.warning))
                .block(block)
                .render(area, buf);
            return;
        };
        let x_max = app.timeline().last().copied().unwrap_or(x_min);
        let owned: Vec<Series> = app.lines().into_iter().cloned().collect();
        let ((y_lo, y_hi), tick_labels) = y_axis(app);

        let line_data: Vec<Vec<(f64, f64)>> =
            owned.iter().map(|s| step_points(s, x_max)).collect();
        let cursor_data = [(t as f64, y_lo), (t as f64, y_hi)];

        let mut datasets: Vec<Dataset<'_>> = owned
            .iter()
            .zip(&line_data)
            .enumerate()
            .map(|(i, (series, data))| {
                Dataset::default()
                    .name(series.name.clone())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(theme.series_style(i))
                    .data(data)
            })
            .collect();
        datasets.push(
            Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.axis())
                .data(&cursor_data),
        );

        let x_mid = ((i128::from(x_min) + i128::from(x_hi)) / 2) as i64;
        let x_labels = vec![
            Span::raw(unit.format(x_min, TIME_LABEL)),
            Span::raw(unit.format(x_mid, TIME_LABEL)),
            Span::raw(unit.format(x_hi, TIME_LABEL)),
        ];
        let y_labels: Vec<Span<'_>> = tick_labels.into_iter().map(Span::raw).collect();

        Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(theme.axis())
                    .bounds([x_min as f64, x_hi as f64])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(theme.axis())
                    .bounds([y_lo, y_hi])
                    .labels(y_labels),
            )
            .render(area, buf);

        // Chart has no annotation support, so tooltip labels are written
        // straight into the buffer.
        let Some(plot) = plot_geometry(app, area) else {
            return;
        };
        let plot_left = plot.left;
        let plot_top = plot.top;
        let plot_height = plot.height;
        let cursor_col = plot.column_of(t);

        let rows = app.tooltip();
        let anchors: Vec<f64> = rows.iter().map(|r| plot.y_scale.apply(r.bridge)).collect();
        let placed = layout_labels(
            &anchors,
            app.config.label_gap,
            (0.0, f64::from(plot_height - 1)),
        );

        let right_edge = plot.left + plot.width;
        for (row, pos) in rows.iter().zip(placed) {
            let text = format!(" {} {:.1}% ", row.name, row.value);
            let width = text.chars().count() as u16;
            let y = plot_top + pos.round().max(0.0) as u16;
            if y >= plot_top + plot_height {
                continue;
            }
            let x = if cursor_col + 1 + width <= right_edge {
                cursor_col + 1
            } else {
                cursor_col.saturating_sub(width).max(plot_left)
            };
            let style = Style::default()
                .fg(theme.background)
                .bg(theme.series_color(row.line))
                .add_modifier(Modifier::BOLD);
            buf.set_string(x, y, &text, style);
        }
    }
}
