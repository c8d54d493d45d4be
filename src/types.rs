//! Shared types and enums used across docfill.
//! Includes `InsertMode`, `OutputKind` and the process `ExitCode` taxonomy.
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the contents of an input spreadsheet populate tags
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum InsertMode {
    /// Column 0 is the key suffix, column 1 the value: `{{name.key}}`
    #[value(name = "p", alias = "placeholder")]
    Placeholder,
    /// One list per column: `{{name.column}}`
    #[value(name = "l", alias = "list")]
    List,
    /// One record per row under the input name: `{{name.column}}` in a repeated row
    #[value(name = "t", alias = "table")]
    Table,
}

impl std::fmt::Display for InsertMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertMode::Placeholder => write!(f, "placeholder"),
            InsertMode::List => write!(f, "list"),
            InsertMode::Table => write!(f, "table"),
        }
    }
}

/// Rendering backend, selected from the output file name
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OutputKind {
    Docx,
    Xlsx,
}

impl OutputKind {
    /// `.docx` selects the document engine, anything else the spreadsheet engine.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("docx") => OutputKind::Docx,
            _ => OutputKind::Xlsx,
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputKind::Docx => write!(f, "docx"),
            OutputKind::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// Process exit codes
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ExitCode {
    Success,
    InvalidFilename,
    FileAccessDenied,
    UnknownError,
    InvalidParameter,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::InvalidFilename => 2,
            ExitCode::FileAccessDenied => 5,
            ExitCode::UnknownError => 10,
            ExitCode::InvalidParameter => 328,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn output_kind_follows_extension() {
        assert_eq!(OutputKind::from_path(&PathBuf::from("out/letter.docx")), OutputKind::Docx);
        assert_eq!(OutputKind::from_path(&PathBuf::from("LETTER.DOCX")), OutputKind::Docx);
        assert_eq!(OutputKind::from_path(&PathBuf::from("report.xlsx")), OutputKind::Xlsx);
        assert_eq!(OutputKind::from_path(&PathBuf::from("report.xlsm")), OutputKind::Xlsx);
        assert_eq!(OutputKind::from_path(&PathBuf::from("no_extension")), OutputKind::Xlsx);
        assert_eq!(OutputKind::from_path(&PathBuf::from("archive.docx.bak")), OutputKind::Xlsx);
    }

    #[test]
    fn insert_mode_accepts_short_and_long_names() {
        assert_eq!(InsertMode::from_str("p", false), Ok(InsertMode::Placeholder));
        assert_eq!(InsertMode::from_str("list", false), Ok(InsertMode::List));
        assert_eq!(InsertMode::from_str("t", false), Ok(InsertMode::Table));
        assert!(InsertMode::from_str("x", false).is_err());
    }

    #[test]
    fn exit_codes_match_the_documented_values() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::InvalidFilename.code(), 2);
        assert_eq!(ExitCode::FileAccessDenied.code(), 5);
        assert_eq!(ExitCode::UnknownError.code(), 10);
        assert_eq!(ExitCode::InvalidParameter.code(), 328);
    }
}
