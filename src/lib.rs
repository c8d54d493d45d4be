#![doc = r#"
docfill: fill `{{tag}}` placeholders in Word (`.docx`) and Excel (`.xlsx`) templates.

Tag values come either from placeholder/value pairs or from spreadsheet inputs
(`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`, `.csv`), each loaded under a
logical name in one of three insert modes:

- placeholder (`p`): the first column holds tag names, the second their values,
  giving `{{name.<key>}}` tags;
- list (`l`): every column becomes a list tag `{{name.<header>}}`;
- table (`t`): the sheet becomes a table `name`, whose fields are addressed as
  `{{name.<header>}}` inside a repeated row.

List and table values repeat the table row (document) or worksheet row
(workbook) that mentions them, once per value. The output file's extension
selects the backend: `.docx` renders a document, anything else a workbook.

Stability
---------
The library API mirrors what the CLI needs and may still change between minor
releases.

Quick start: fill a template from placeholder pairs
---------------------------------------------------
```rust,no_run
use std::path::PathBuf;
use docfill::{fill_template, DataSource, FillParams};

fn main() -> docfill::Result<()> {
    let params = FillParams {
        template: PathBuf::from("letter.docx"),
        output: PathBuf::from("letter-ada.docx"),
        source: DataSource::Overrides(vec![
            ("name".to_string(), "Ada".to_string()),
            ("city".to_string(), "London".to_string()),
        ]),
    };
    fill_template(&params)?;
    Ok(())
}
```

Spreadsheet inputs
------------------
```rust,no_run
use std::path::PathBuf;
use docfill::{fill_template, DataSource, FillParams, InputSpec, InsertMode};

fn main() -> docfill::Result<()> {
    let params = FillParams {
        template: PathBuf::from("report.xlsx"),
        output: PathBuf::from("report-q1.xlsx"),
        source: DataSource::Files(vec![
            InputSpec {
                path: PathBuf::from("orders.csv"),
                mode: InsertMode::Table,
                name: "orders".to_string(),
            },
            InputSpec {
                path: PathBuf::from("settings.xlsx"),
                mode: InsertMode::Placeholder,
                name: "doc".to_string(),
            },
        ]),
    };
    let tags = fill_template(&params)?;
    println!("{}", tags.to_json()?);
    Ok(())
}
```

Rendering in memory
-------------------
```rust,no_run
use docfill::{render_template, OutputKind, TagMap, TagValue};

fn main() -> docfill::Result<()> {
    let mut tags = TagMap::new();
    tags.insert("staff.Name", TagValue::List(vec!["Ada".into(), "Alan".into()]))?;
    let template = std::fs::read("staff.docx")?;
    let filled = render_template(&template, OutputKind::Docx, &tags)?;
    std::fs::write("staff-filled.docx", filled)?;
    Ok(())
}
```

Error handling
--------------
All public functions return `docfill::Result<T>`. Every [`Error`] maps to the
CLI exit code taxonomy through [`Error::exit_code`]:

```rust,no_run
use docfill::{build_tags, ExitCode, FillParams};

fn check(params: &FillParams) {
    match build_tags(params) {
        Ok(tags) => println!("{} tags", tags.len()),
        Err(e) if e.exit_code() == ExitCode::InvalidFilename => eprintln!("bad input: {e}"),
        Err(e) => eprintln!("error: {e}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level entry points.
- [`core`]: parameters, tag mapping and input conversion.
- [`io`]: OOXML package access and input readers.
- [`render`]: document and workbook backends.
- [`types`]: insert modes, output kinds and exit codes.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod render;
pub mod types;

// Curated public API surface
// Types
pub use core::params::{DataSource, FillParams, InputSpec};
pub use core::tags::{Record, TagMap, TagValue};
pub use error::{Error, Result};
pub use types::{ExitCode, InsertMode, OutputKind};

// Readers
pub use io::{DataTable, read_table};

// High-level API re-exports
pub use api::{build_tags, fill_template, render_template, render_to_path};
