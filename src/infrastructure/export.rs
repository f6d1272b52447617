//! CSV persistence for the consolidated table
//!
//! Column order is fixed: `title, image link, url, brand, description`.
//! Absent values are written as empty fields and read back as absent.

use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::{ConsolidatedTable, ItemRecord};

/// Header row, in column order
pub const COLUMNS: [&str; 5] = ["title", "image link", "url", "brand", "description"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected CSV header: expected {expected:?}, found {found:?}")]
    Header { expected: Vec<String>, found: Vec<String> },
}

/// Write the table to `path`, replacing any existing file
pub fn write_table(path: &Path, table: &ConsolidatedTable) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    // written by hand so an empty table still gets a header
    wtr.write_record(COLUMNS)?;
    for record in table {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    info!("💾 Saved {} rows to {:?}", table.len(), path);
    Ok(())
}

/// Read a table previously written by [`write_table`]
pub fn read_table(path: &Path) -> Result<ConsolidatedTable, ExportError> {
    let mut rdr = csv::ReaderBuilder::new().from_path(path)?;

    let headers = rdr.headers()?;
    if !headers.iter().eq(COLUMNS) {
        return Err(ExportError::Header {
            expected: COLUMNS.iter().map(ToString::to_string).collect(),
            found: headers.iter().map(ToString::to_string).collect(),
        });
    }

    let rows = rdr
        .deserialize::<ItemRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    info!("📂 Loaded {} rows from {:?}", rows.len(), path);
    Ok(ConsolidatedTable::from(rows))
}
