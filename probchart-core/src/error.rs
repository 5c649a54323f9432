//! Top-level error type for probchart-core.
//!
//! Module-level errors ([`IngestError`], [`ConfigError`]) convert into
//! [`ChartError`] so front ends can bubble any of them with `?`.

use thiserror::Error;

use crate::config::ConfigError;
use crate::ingest::IngestError;

#[derive(Debug, Error)]
pub enum ChartError {
    /// The resolver was handed a series without samples. Callers should show
    /// a "no data available" state instead of resolving.
    #[error("series '{id}' has no samples")]
    EmptySeries { id: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for ChartError {
    fn from(e: csv::Error) -> Self {
        ChartError::Export(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
