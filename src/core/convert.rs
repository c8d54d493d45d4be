//! Reshape input tables and command-line pairs into tag entries.
use crate::core::tags::{Record, TagMap, TagValue};
use crate::error::{Error, Result};
use crate::io::DataTable;
use crate::types::InsertMode;

/// Add the contents of one input table to `tags` under the logical `name`.
///
/// - table: `name` → one record per row
/// - list: `name.column` → the column's values
/// - placeholder: `name.<column 0>` → column 1, one entry per row
pub fn insert_table(
    tags: &mut TagMap,
    name: &str,
    mode: InsertMode,
    table: &DataTable,
) -> Result<()> {
    match mode {
        InsertMode::Table => {
            let records = table
                .rows
                .iter()
                .map(|row| {
                    let mut record = Record::new();
                    for (column, value) in table.columns.iter().zip(row) {
                        record.push(column.as_str(), value.as_str());
                    }
                    record
                })
                .collect();
            tags.insert(name, TagValue::Table(records))
        }
        InsertMode::List => {
            for (index, column) in table.columns.iter().enumerate() {
                tags.insert(
                    format!("{name}.{column}"),
                    TagValue::List(table.column_values(index)),
                )?;
            }
            Ok(())
        }
        InsertMode::Placeholder => {
            if table.columns.len() < 2 {
                return Err(Error::Package(format!(
                    "placeholder mode needs a key and a value column, found {}",
                    table.columns.len()
                )));
            }
            for row in 0..table.rows.len() {
                tags.insert(
                    format!("{name}.{}", table.cell(row, 0)),
                    TagValue::Text(table.cell(row, 1).to_string()),
                )?;
            }
            Ok(())
        }
    }
}

/// Add command-line placeholder/value pairs as plain text entries.
pub fn insert_overrides(tags: &mut TagMap, pairs: &[(String, String)]) -> Result<()> {
    for (placeholder, value) in pairs {
        tags.insert(placeholder.as_str(), TagValue::Text(value.clone()))?;
    }
    Ok(())
}
