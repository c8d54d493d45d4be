//! Template rendering backends and output writing.
//!
//! `docx` fills word-processing packages, `xlsx` fills workbooks; both share the
//! tag scanning in `text`. The backend is chosen from the output file type.
pub mod docx;
pub mod text;
pub mod xlsx;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::tags::TagMap;
use crate::error::{Error, Result};
use crate::types::OutputKind;

/// Render a template package held in memory with the backend for `kind`.
pub fn render(kind: OutputKind, template: &[u8], tags: &TagMap) -> Result<Vec<u8>> {
    match kind {
        OutputKind::Docx => docx::render(template, tags),
        OutputKind::Xlsx => xlsx::render(template, tags),
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// so an existing output is only replaced by a complete one.
pub fn save(path: &Path, bytes: &[u8]) -> Result<()> {
    let output_error = |source| Error::Output {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(output_error)?;
    file.write_all(bytes).map_err(output_error)?;
    file.flush().map_err(output_error)?;
    file.persist(path).map_err(|e| output_error(e.error))?;
    debug!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}
