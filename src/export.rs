//! CSV export of the accumulated records.
//!
//! The table is written once at the end of a run: fixed column header, no
//! index column, truncating overwrite of any prior file.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::record::{COLUMNS, TestRecord};

/// Errors writing the output table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization or file I/O failed.
    #[error("failed to write output table: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the writer failed.
    #[error("failed to flush output table: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes the full record table to `path`, header included.
///
/// The header row is written even for an empty record set, and the file is
/// truncated first, so repeated runs produce byte-identical output for the
/// same records rather than accumulating.
///
/// # Errors
///
/// Returns [`ExportError`] when the file cannot be written.
pub fn write_csv(path: &Path, records: &[TestRecord]) -> Result<(), ExportError> {
    // Header is written explicitly so empty record sets still get one.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = records.len(), "saved records to CSV");
    Ok(())
}
