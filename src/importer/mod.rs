// Offline spreadsheet import into the record store

pub mod spreadsheet;

use crate::core::error::ImportError;
use crate::stores::record_store::RecordStore;
use anyhow::Result;
use calamine::{Data, Range};
use spreadsheet::{read_first_sheet, ColumnIndex};
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub failed: usize,
}

/// Import every row of the first sheet of `path`.
///
/// Rows are independent: a bad row is logged and counted, never rolled back.
pub fn import_spreadsheet(store: &RecordStore, path: &Path) -> Result<ImportSummary, ImportError> {
    info!(path = %path.display(), "Importing spreadsheet");
    let range = read_first_sheet(path)?;
    import_range(store, &range)
}

/// Import a sheet whose first row is the header
pub fn import_range(store: &RecordStore, range: &Range<Data>) -> Result<ImportSummary, ImportError> {
    let mut rows = range.rows();
    let header = rows.next().ok_or(ImportError::MissingColumn("Day"))?;
    let columns = ColumnIndex::from_header(header)?;

    let mut summary = ImportSummary::default();

    // sheet row numbers are 1-based and the header is row 1
    for (offset, row) in rows.enumerate() {
        let row_num = offset + 2;

        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let record = match columns.record(row, row_num) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Skipping spreadsheet row");
                summary.failed += 1;
                continue;
            }
        };

        debug!(row = row_num, day = %record.day, age = %record.age, "Importing row");

        match store.insert(record) {
            Ok(_) => summary.inserted += 1,
            Err(e) => {
                warn!(row = row_num, error = %format!("{:#}", e), "Failed to store row");
                summary.failed += 1;
            }
        }
    }

    info!(
        inserted = summary.inserted,
        failed = summary.failed,
        total_records = store.len(),
        "Spreadsheet import finished"
    );

    Ok(summary)
}

/// Delete every usage record
pub fn clear_all(store: &RecordStore) -> Result<usize> {
    let removed = store.clear()?;
    info!(removed, "Cleared all usage records");
    Ok(removed)
}
