//! I/O layer: OOXML package and XML access, and readers turning input
//! spreadsheets (workbooks and `.csv`) into a [`DataTable`].
pub mod cellref;
pub mod csv_reader;
pub mod package;
pub mod table;
pub mod workbook;
pub mod xlsx;
pub mod xml;

pub use table::DataTable;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xla", "xlam", "xls", "ods"];

/// Read the first sheet of an input file. `.csv` files go through the CSV
/// reader; anything else is read as a workbook, its format detected from the
/// content.
pub fn read_table(path: &Path) -> Result<DataTable> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let table = match extension.as_deref() {
        Some("csv") => csv_reader::read_table(bytes.as_slice())?,
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => workbook::read_first_sheet(&bytes)?,
        _ => workbook::read_first_sheet(&bytes)
            .map_err(|_| Error::UnsupportedInput(path.to_path_buf()))?,
    };
    debug!(
        "Read {:?}: {} columns, {} rows",
        path,
        table.columns.len(),
        table.rows.len()
    );
    Ok(table)
}
