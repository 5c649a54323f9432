//! Application state — single-owner, main-thread only.
//!
//! Holds the ingested series, the active range window and the hover cursor.
//! Everything the chart draws is derived from here on each frame.

use ratatui::layout::Rect;

use probchart_core::resolver::{bridge_points, resolve_at};
use probchart_core::{
    build_unified_timeline, rank_top_series, ChartConfig, CursorTime, RangeWindow, Series,
};

/// Where the hover cursor sits on the unified timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// Follows the newest timestamp.
    Latest,
    /// Index into the unified timeline.
    Index(usize),
}

/// One tooltip line for a drawn series.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    /// Position of the series among the drawn lines (color index).
    pub line: usize,
    pub name: String,
    /// Step value shown on the chart.
    pub value: f64,
    /// Linear bridge value used to place the label next to the cursor.
    pub bridge: f64,
}

pub struct App {
    pub config: ChartConfig,
    pub title: String,
    pub window: RangeWindow,
    pub show_all: bool,
    pub cursor: Cursor,
    pub running: bool,
    /// Where the chart panel was last drawn; mouse hover maps through it.
    pub chart_area: Rect,
    source: Vec<Series>,
    visible: Vec<Series>,
    timeline: Vec<i64>,
}

impl App {
    pub fn new(title: impl Into<String>, series: Vec<Series>, config: ChartConfig) -> Self {
        let mut app = Self {
            window: config.default_range,
            show_all: config.show_all_series,
            config,
            title: title.into(),
            cursor: Cursor::Latest,
            running: true,
            chart_area: Rect::default(),
            source: series,
            visible: Vec::new(),
            timeline: Vec::new(),
        };
        app.recompute();
        app
    }

    fn recompute(&mut self) {
        self.visible = self.window.apply(&self.source, self.config.time_unit);
        self.timeline = build_unified_timeline(&self.visible);
        if let Cursor::Index(i) = self.cursor {
            if i >= self.timeline.len() {
                self.cursor = Cursor::Latest;
            }
        }
    }

    pub fn timeline(&self) -> &[i64] {
        &self.timeline
    }

    pub fn has_data(&self) -> bool {
        !self.timeline.is_empty()
    }

    pub fn set_window(&mut self, window: RangeWindow) {
        if self.window != window {
            self.window = window;
            self.cursor = Cursor::Latest;
            self.recompute();
        }
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
    }

    /// Timestamp under the cursor; `None` when there is no data.
    pub fn cursor_time(&self) -> Option<i64> {
        match self.cursor {
            Cursor::Latest => self.timeline.last().copied(),
            Cursor::Index(i) => self.timeline.get(i).copied(),
        }
    }

    fn cursor_index(&self) -> Option<usize> {
        match self.cursor {
            _ if self.timeline.is_empty() => None,
            Cursor::Latest => Some(self.timeline.len() - 1),
            Cursor::Index(i) => Some(i.min(self.timeline.len() - 1)),
        }
    }

    /// Move the cursor by `delta` timeline steps, clamped to the ends.
    /// Landing on the last step switches back to following the latest.
    pub fn move_cursor(&mut self, delta: isize) {
        let Some(current) = self.cursor_index() else {
            return;
        };
        let last = self.timeline.len() - 1;
        let next = current.saturating_add_signed(delta).min(last);
        self.cursor = if next == last {
            Cursor::Latest
        } else {
            Cursor::Index(next)
        };
    }

    pub fn cursor_to_first(&mut self) {
        if self.timeline.len() > 1 {
            self.cursor = Cursor::Index(0);
        }
    }

    pub fn cursor_to_latest(&mut self) {
        self.cursor = Cursor::Latest;
    }

    /// Put the cursor on the timeline step nearest to `t` at or before it.
    pub fn cursor_to_time(&mut self, t: i64) {
        if self.timeline.is_empty() {
            return;
        }
        let idx = self
            .timeline
            .partition_point(|&x| x <= t)
            .saturating_sub(1);
        self.cursor = if idx == self.timeline.len() - 1 {
            Cursor::Latest
        } else {
            Cursor::Index(idx)
        };
    }

    /// Series drawn on the chart: every non-empty series, or the top
    /// `top_limit` by latest value.
    pub fn lines(&self) -> Vec<&Series> {
        if self.show_all {
            self.visible.iter().filter(|s| !s.is_empty()).collect()
        } else {
            rank_top_series(&self.visible, CursorTime::Latest, self.config.top_limit)
        }
    }

    /// Tooltip rows for the drawn lines at the cursor time.
    pub fn tooltip(&self) -> Vec<TooltipRow> {
        let Some(t) = self.cursor_time() else {
            return Vec::new();
        };
        let lines: Vec<Series> = self.lines().into_iter().cloned().collect();
        let bridges = bridge_points(&lines, t);

        lines
            .iter()
            .zip(bridges)
            .enumerate()
            .filter_map(|(line, (series, bridge))| {
                let step = resolve_at(series, t).ok()?;
                Some(TooltipRow {
                    line,
                    name: series.name.clone(),
                    value: step.value,
                    bridge: bridge.value,
                })
            })
            .collect()
    }
}
