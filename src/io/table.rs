/// Tabular view of an input sheet: column names from the header row followed by
/// the data rows, every cell as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Build a table from raw rows, treating the first non-empty row as the header.
    ///
    /// Empty header cells become `Column{i}`, `i` being the zero-based column
    /// index. Repeated names get a `_{k}` suffix. Data rows are padded or cut
    /// to the column count and completely empty rows are skipped.
    pub fn from_rows<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut rows = raw
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.is_empty()));

        let Some(header) = rows.next() else {
            return Self::default();
        };
        let mut data: Vec<Vec<String>> = rows.collect();

        let width = data
            .iter()
            .map(|row| trimmed_len(row))
            .chain(std::iter::once(trimmed_len(&header)))
            .max()
            .unwrap_or(0);

        let mut columns: Vec<String> = Vec::with_capacity(width);
        for index in 0..width {
            let raw_name = header.get(index).map(|s| s.trim()).unwrap_or("");
            let base = if raw_name.is_empty() {
                format!("Column{}", index)
            } else {
                raw_name.to_string()
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while columns.contains(&name) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            columns.push(name);
        }

        for row in &mut data {
            row.resize(width, String::new());
        }

        Self {
            columns,
            rows: data,
        }
    }

    /// Cell text, empty when the row is shorter than the column index.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn column_values(&self, column: usize) -> Vec<String> {
        (0..self.rows.len())
            .map(|row| self.cell(row, column).to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn trimmed_len(row: &[String]) -> usize {
    row.iter()
        .rposition(|cell| !cell.is_empty())
        .map_or(0, |last| last + 1)
}
