//! Reader for the first worksheet of an input workbook (`.xlsx`, `.xlsm`,
//! `.xlsb`, `.xls`, `.ods`), built on `calamine`.
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveTime;
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::table::DataTable;

/// Read the first sheet, in workbook order, of a workbook held in memory.
/// The format is detected from the content.
pub fn read_first_sheet(bytes: &[u8]) -> Result<DataTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    if let Some(name) = workbook.sheet_names().first() {
        debug!("Reading worksheet '{}'", name);
    }
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Package("workbook has no worksheets".to_string()))??;

    // ranges start at the first used cell; keep leading columns in place
    let leading = range.start().map_or(0, |(_, col)| col as usize);
    let rows = range.rows().map(|row| {
        std::iter::repeat_n(String::new(), leading)
            .chain(row.iter().map(cell_text))
            .collect::<Vec<_>>()
    });
    Ok(DataTable::from_rows(rows))
}

/// Text of one cell. Dates read as `YYYY-MM-DD`, with ` HH:MM:SS` when the
/// value has a time part.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(value) => match value.as_datetime() {
            Some(dt) if dt.time() == NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => value.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
