use std::io::Read;

use crate::error::Result;
use crate::io::table::DataTable;

/// Read comma separated text; the first record is the header row, ragged records are allowed.
pub fn read_table<R: Read>(reader: R) -> Result<DataTable> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(DataTable::from_rows(rows))
}
