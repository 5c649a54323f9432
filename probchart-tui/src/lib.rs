//! probchart TUI — terminal viewer for prediction-market probability charts.
//!
//! - Step lines for the top markets (or all of them)
//! - Hover cursor driven by keys or the mouse, snapped to the unified timeline
//! - Tooltip labels with each line's value at the cursor
//! - Range windows 1H through ALL

pub mod app;
pub mod chart;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::Theme;
