//! High-level library API: build the tag mapping from validated parameters,
//! render templates in memory, or run a complete fill from template file to
//! output file. Prefer these entrypoints over the backend modules when
//! embedding docfill.
use std::fs;
use std::path::Path;

use tracing::info;

use crate::core::convert::{insert_overrides, insert_table};
use crate::core::params::{DataSource, FillParams};
use crate::core::tags::TagMap;
use crate::error::{Error, Result};
use crate::io;
use crate::render;
use crate::types::OutputKind;

/// Merge every configured data source into one tag mapping.
///
/// Every failure caused by an input file, including a tag it defines that an
/// earlier input already defined, is reported as [`Error::Input`]. A repeated
/// placeholder among CLI pairs is an [`Error::DuplicateTag`].
pub fn build_tags(params: &FillParams) -> Result<TagMap> {
    let mut tags = TagMap::new();
    match &params.source {
        DataSource::Files(inputs) => {
            for input in inputs {
                info!(
                    "Loading {:?} as '{}' ({} mode)",
                    input.path, input.name, input.mode
                );
                let table = io::read_table(&input.path).map_err(|e| Error::input(&input.path, e))?;
                insert_table(&mut tags, &input.name, input.mode, &table)
                    .map_err(|e| Error::input(&input.path, e))?;
            }
        }
        DataSource::Overrides(pairs) => insert_overrides(&mut tags, pairs)?,
    }
    info!("Tag mapping holds {} entries", tags.len());
    Ok(tags)
}

/// Render a template held in memory.
pub fn render_template(template: &[u8], kind: OutputKind, tags: &TagMap) -> Result<Vec<u8>> {
    render::render(kind, template, tags)
}

/// Render the template file at `template` and write the result to `output`.
/// The backend is chosen from the output file name.
pub fn render_to_path(template: &Path, output: &Path, tags: &TagMap) -> Result<()> {
    let bytes = fs::read(template).map_err(|source| Error::Template {
        path: template.to_path_buf(),
        source,
    })?;
    let kind = OutputKind::from_path(output);
    info!("Rendering {:?} -> {:?} with the {} backend", template, output, kind);
    let rendered = render_template(&bytes, kind, tags)?;
    render::save(output, &rendered)
}

/// Run a complete fill and return the tag mapping that was applied.
pub fn fill_template(params: &FillParams) -> Result<TagMap> {
    let tags = build_tags(params)?;
    render_to_path(&params.template, &params.output, &tags)?;
    Ok(tags)
}
