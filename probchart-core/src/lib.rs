//! probchart core — the computational side of a prediction-market
//! probability chart.
//!
//! - Domain types (samples, series, resolved values, cursor time)
//! - Step-hold resolver with left bisection, plus linear bridge points
//! - Unified timeline and multi-series alignment
//! - Top-N ranking at a cursor time
//! - Linear/time scales, value-axis domain, tooltip label layout
//! - Payload ingest with lenient coercion, range windows, CSV export
//! - TOML configuration and seeded synthetic data
//!
//! Everything here is synchronous and borrows its input; nothing mutates the
//! series it is given.

pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod ingest;
pub mod layout;
pub mod range;
pub mod ranking;
pub mod resolver;
pub mod scale;
pub mod synthetic;
pub mod timeline;

pub use config::{ChartConfig, ConfigError};
pub use domain::{CursorTime, ResolvedValue, Sample, Series, TimeUnit};
pub use error::ChartError;
pub use ingest::{IngestError, IngestOptions};
pub use range::RangeWindow;
pub use ranking::{rank_top_series, DEFAULT_TOP_LIMIT};
pub use resolver::{bridge_points, interpolate_at, resolve_at};
pub use timeline::{align_series, build_unified_timeline, AlignedTable};
