use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::InsertMode;

/// One auxiliary input spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub path: PathBuf,
    pub mode: InsertMode,
    /// Logical name used as the tag prefix (`{{name.column}}`)
    pub name: String,
}

/// Where tag values come from; the two sources are mutually exclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Files(Vec<InputSpec>),
    /// Placeholder name → value pairs given on the command line
    Overrides(Vec<(String, String)>),
}

/// Validated parameters of one fill run, suitable for job files and programmatic use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillParams {
    pub template: PathBuf,
    pub output: PathBuf,
    pub source: DataSource,
}

impl FillParams {
    /// Validate the raw argument lists.
    ///
    /// Exactly one of the file set (`inputs`, `modes`, `names`) and the
    /// command-line set (`placeholders`, `values`) must be given, and the lists
    /// within a set must have the same length.
    pub fn from_parts(
        template: PathBuf,
        output: PathBuf,
        inputs: Vec<PathBuf>,
        modes: Vec<InsertMode>,
        names: Vec<String>,
        placeholders: Vec<String>,
        values: Vec<String>,
    ) -> Result<Self> {
        let file_set = !(inputs.is_empty() && modes.is_empty() && names.is_empty());
        let cli_set = !(placeholders.is_empty() && values.is_empty());

        let source = match (file_set, cli_set) {
            (true, true) => {
                return Err(Error::InvalidParameter(
                    "input files and placeholders/variables cannot be combined".to_string(),
                ));
            }
            (false, false) => {
                return Err(Error::InvalidParameter(
                    "either input files or placeholders/variables are required".to_string(),
                ));
            }
            (true, false) => {
                if inputs.len() != modes.len() || inputs.len() != names.len() {
                    return Err(Error::InvalidParameter(format!(
                        "input files, input modes and input names have to match ({} files, {} modes, {} names)",
                        inputs.len(),
                        modes.len(),
                        names.len()
                    )));
                }
                if names.iter().any(|n| n.trim().is_empty()) {
                    return Err(Error::InvalidParameter(
                        "input names must not be empty".to_string(),
                    ));
                }
                DataSource::Files(
                    inputs
                        .into_iter()
                        .zip(modes)
                        .zip(names)
                        .map(|((path, mode), name)| InputSpec { path, mode, name })
                        .collect(),
                )
            }
            (false, true) => {
                if placeholders.len() != values.len() {
                    return Err(Error::InvalidParameter(format!(
                        "wrong length of placeholders and variables ({} placeholders, {} variables)",
                        placeholders.len(),
                        values.len()
                    )));
                }
                DataSource::Overrides(placeholders.into_iter().zip(values).collect())
            }
        };

        Ok(Self {
            template,
            output,
            source,
        })
    }
}
