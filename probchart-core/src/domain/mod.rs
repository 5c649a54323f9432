//! Domain types for probchart

pub mod resolved;
pub mod sample;
pub mod series;

pub use resolved::{CursorTime, ResolvedValue};
pub use sample::{Sample, TimeUnit};
pub use series::Series;
