//! CSV export of an aligned table.
//!
//! Columns: `timestamp`, `datetime` (RFC 3339, UTC), then one column per
//! series id. Cells before a series' first sample are left empty.

use crate::domain::TimeUnit;
use crate::error::{ChartError, Result};
use crate::timeline::AlignedTable;

pub fn export_aligned_csv(table: &AlignedTable, unit: TimeUnit) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["timestamp".to_string(), "datetime".to_string()];
    header.extend(table.columns.iter().map(|c| c.series_id.clone()));
    wtr.write_record(&header)?;

    for (i, &ts) in table.timestamps.iter().enumerate() {
        let mut record = Vec::with_capacity(table.columns.len() + 2);
        record.push(ts.to_string());
        record.push(
            unit.to_datetime(ts)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default(),
        );
        for column in &table.columns {
            record.push(column.values[i].map(|v| v.to_string()).unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ChartError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ChartError::Export(e.to_string()))
}
