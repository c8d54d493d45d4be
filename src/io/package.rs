//! OOXML package (zip) access: read parts from a package and rewrite a package
//! part by part.
use std::io::{Cursor, Read, Seek, Write};

use tracing::debug;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Open a package held in memory.
pub fn open(bytes: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    Ok(ZipArchive::new(Cursor::new(bytes))?)
}

/// Read a part, `None` when the package does not contain it.
pub fn read_part_optional<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let mut bytes = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

pub fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    read_part_optional(archive, name)?
        .ok_or_else(|| Error::Package(format!("missing part {name}")))
}

/// Names of all file entries, in archive order.
pub fn part_names<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    archive.file_names().map(str::to_string).collect()
}

/// Copy every entry of `template` into a new package, passing each part through
/// `transform`. Returning `Some(bytes)` replaces the part, `None` keeps it as is.
pub fn rewrite<F>(template: &[u8], mut transform: F) -> Result<Vec<u8>>
where
    F: FnMut(&str, &[u8]) -> Result<Option<Vec<u8>>>,
{
    let mut archive = open(template)?;
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();
        if file.is_dir() {
            zip.add_directory(name, options)?;
            continue;
        }

        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;
        drop(file);

        zip.start_file(name.clone(), options)?;
        match transform(&name, &bytes)? {
            Some(replaced) => {
                debug!("Rewrote part {} ({} -> {} bytes)", name, bytes.len(), replaced.len());
                zip.write_all(&replaced)?;
            }
            None => zip.write_all(&bytes)?,
        }
    }

    Ok(zip.finish()?.into_inner())
}

/// Resolve a relationship target against the directory of its source part.
///
/// `resolve_target("xl/workbook.xml", "worksheets/sheet1.xml")` is `xl/worksheets/sheet1.xml`;
/// absolute targets (`/xl/...`) are taken from the package root.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
pub(crate) fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}
