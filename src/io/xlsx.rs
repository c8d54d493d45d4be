//! Workbook package parts needed to render `.xlsx` templates: relationships
//! and the shared string table.
use std::io::{Read, Seek};

use zip::ZipArchive;

use crate::error::Result;
use crate::io::package::{self, resolve_target};
use crate::io::xml::{Document, Element};

const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
const REL_SHARED_STRINGS: &str = "/sharedStrings";
const DEFAULT_WORKBOOK: &str = "xl/workbook.xml";

/// Relationship entry of a `.rels` part, target already resolved to a part name.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// `xl/workbook.xml` → `xl/_rels/workbook.xml.rels`
pub fn rels_part_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part}.rels"),
    }
}

pub fn read_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    source_part: &str,
) -> Result<Vec<Relationship>> {
    let Some(bytes) = package::read_part_optional(archive, &rels_part_for(source_part))? else {
        return Ok(Vec::new());
    };
    let doc = Document::parse(&bytes)?;
    Ok(doc
        .root
        .elements()
        .filter(|e| e.is("Relationship"))
        .filter(|e| e.attr("TargetMode") != Some("External"))
        .filter_map(|e| {
            Some(Relationship {
                id: e.attr("Id")?.to_string(),
                rel_type: e.attr("Type")?.to_string(),
                target: resolve_target(source_part, e.attr("Target")?),
            })
        })
        .collect())
}

fn find_rel<'a>(rels: &'a [Relationship], type_suffix: &str) -> Option<&'a Relationship> {
    rels.iter().find(|r| r.rel_type.ends_with(type_suffix))
}

/// Workbook part name and its relationships.
pub fn locate_workbook<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<(String, Vec<Relationship>)> {
    let root_rels = read_relationships(archive, "")?;
    let workbook_part = find_rel(&root_rels, REL_OFFICE_DOCUMENT)
        .map(|r| r.target.clone())
        .unwrap_or_else(|| DEFAULT_WORKBOOK.to_string());
    let workbook_rels = read_relationships(archive, &workbook_part)?;
    Ok((workbook_part, workbook_rels))
}

/// Shared string table of a workbook, empty when the workbook has none.
pub fn read_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    workbook_rels: &[Relationship],
) -> Result<Vec<String>> {
    let part = find_rel(workbook_rels, REL_SHARED_STRINGS)
        .map(|r| r.target.as_str())
        .unwrap_or("xl/sharedStrings.xml");
    match package::read_part_optional(archive, part)? {
        Some(bytes) => parse_shared_strings(&bytes),
        None => Ok(Vec::new()),
    }
}

/// Concatenated text of a shared string item or inline string, ignoring phonetic runs.
pub fn rich_text(element: &Element) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: &Element, out: &mut String) {
    for child in element.elements() {
        if child.is("rPh") {
            continue;
        }
        if child.is("t") {
            out.push_str(&child.text());
        } else {
            collect_text(child, out);
        }
    }
}

pub fn parse_shared_strings(bytes: &[u8]) -> Result<Vec<String>> {
    let doc = Document::parse(bytes)?;
    Ok(doc
        .root
        .elements()
        .filter(|e| e.is("si"))
        .map(rich_text)
        .collect())
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Minimal workbook builder for tests.
    use crate::io::cellref;
    use crate::io::package::build_zip;

    pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;
    pub const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;
    pub const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Data" sheetId="1" r:id="rId1"/></sheets></workbook>"#;
    pub const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#;

    /// Worksheet XML with inline strings for every cell.
    pub fn sheet_xml(rows: &[&[&str]]) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        );
        for (r, cells) in rows.iter().enumerate() {
            xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, value) in cells.iter().enumerate() {
                xml.push_str(&format!(
                    r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    cellref::format(c, r as u32 + 1),
                    value
                ));
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData></worksheet>");
        xml
    }

    pub fn workbook(sheet: &str, shared_strings: &str) -> Vec<u8> {
        build_zip(&[
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", ROOT_RELS.as_bytes()),
            ("xl/workbook.xml", WORKBOOK.as_bytes()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
            ("xl/sharedStrings.xml", shared_strings.as_bytes()),
            ("xl/worksheets/sheet1.xml", sheet.as_bytes()),
        ])
    }

    pub fn inline_workbook(rows: &[&[&str]]) -> Vec<u8> {
        workbook(
            &sheet_xml(rows),
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#,
        )
    }
}
