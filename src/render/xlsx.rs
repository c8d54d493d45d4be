//! Spreadsheet backend: fills `{{tag}}` placeholders in the worksheets of an
//! `.xlsx` package.
//!
//! Cells holding tags (shared or inline strings) are rewritten as inline
//! strings. A row mentioning a column-valued tag is expanded downwards, one
//! row per value, and every following row, cell reference and merged range is
//! shifted accordingly.
use tracing::{debug, info};

use crate::core::tags::TagMap;
use crate::error::{Error, Result};
use crate::io::cellref;
use crate::io::package;
use crate::io::xlsx::{locate_workbook, read_shared_strings, rich_text};
use crate::io::xml::{Document, Element, Node};
use crate::render::text;

const WORKSHEETS_DIR: &str = "xl/worksheets/";

pub fn is_worksheet_part(name: &str) -> bool {
    name.strip_prefix(WORKSHEETS_DIR)
        .is_some_and(|file| file.ends_with(".xml") && !file.contains('/'))
}

pub fn render(template: &[u8], tags: &TagMap) -> Result<Vec<u8>> {
    let shared_strings = {
        let mut archive = package::open(template)?;
        let (_, workbook_rels) = locate_workbook(&mut archive)?;
        read_shared_strings(&mut archive, &workbook_rels)?
    };

    let mut sheets = 0usize;
    let output = package::rewrite(template, |name, bytes| {
        if !is_worksheet_part(name) {
            return Ok(None);
        }
        sheets += 1;
        debug!("Rendering {}", name);
        render_sheet(bytes, &shared_strings, tags).map(Some)
    })?;
    if sheets == 0 {
        return Err(Error::Package(
            "template has no worksheets, it is not a spreadsheet".to_string(),
        ));
    }
    info!("Rendered xlsx template: {} worksheets, {} tags", sheets, tags.len());
    Ok(output)
}

/// Row number changes made while expanding rows: `(template row, rows added)`.
#[derive(Debug, Default)]
struct RowShifts {
    shifts: Vec<(u32, i64)>,
}

impl RowShifts {
    fn record(&mut self, row: u32, added: i64) {
        if added != 0 {
            self.shifts.push((row, added));
        }
    }

    /// New number of an original row.
    fn map(&self, row: u32) -> u32 {
        let delta: i64 = self
            .shifts
            .iter()
            .filter(|(template_row, _)| *template_row < row)
            .map(|(_, added)| added)
            .sum();
        (row as i64 + delta).max(1) as u32
    }
}

pub fn render_sheet(bytes: &[u8], shared_strings: &[String], tags: &TagMap) -> Result<Vec<u8>> {
    let mut doc = Document::parse(bytes)?;
    let Some(sheet_data) = doc.root.child_mut("sheetData") else {
        return doc.to_bytes();
    };

    let mut shifts = RowShifts::default();
    let mut next_row = 1u32;
    let rows = std::mem::take(&mut sheet_data.children);
    for node in rows {
        let Node::Element(mut row) = node else {
            sheet_data.children.push(node);
            continue;
        };
        if !row.is("row") {
            sheet_data.children.push(Node::Element(row));
            continue;
        }
        let number = row
            .attr("r")
            .and_then(|r| r.parse().ok())
            .unwrap_or(next_row);
        next_row = number + 1;
        let target = shifts.map(number);

        match row_repetitions(&row, shared_strings, tags) {
            Some(count) => {
                debug!("Expanding row {} into {} rows", number, count);
                for index in 0..count {
                    let mut copy = row.clone();
                    render_row(&mut copy, target + index as u32, shared_strings, tags, Some(index));
                    sheet_data.children.push(Node::Element(copy));
                }
                shifts.record(number, count as i64 - 1);
            }
            None => {
                render_row(&mut row, target, shared_strings, tags, None);
                sheet_data.children.push(Node::Element(row));
            }
        }
    }

    if !shifts.shifts.is_empty() {
        // the used range is recomputed by spreadsheet applications
        doc.root
            .children
            .retain(|c| !matches!(c, Node::Element(e) if e.is("dimension")));
        if let Some(merges) = doc.root.child_mut("mergeCells") {
            for merge in merges.elements_mut().filter(|e| e.is("mergeCell")) {
                if let Some(range) = merge.attr("ref").map(str::to_string) {
                    merge.set_attr("ref", cellref::map_rows(&range, |r| shifts.map(r)));
                }
            }
        }
    }

    doc.to_bytes()
}

/// Text shown by a cell when it is a string cell.
fn cell_string(cell: &Element, shared_strings: &[String]) -> Option<String> {
    match cell.attr("t")? {
        "s" => cell
            .child("v")
            .and_then(|v| v.text().trim().parse::<usize>().ok())
            .and_then(|i| shared_strings.get(i).cloned()),
        "inlineStr" => cell.child("is").map(rich_text),
        _ => None,
    }
}

fn row_repetitions(row: &Element, shared_strings: &[String], tags: &TagMap) -> Option<usize> {
    row.elements()
        .filter(|e| e.is("c"))
        .filter_map(|c| cell_string(c, shared_strings))
        .filter_map(|s| text::column_len(&s, tags))
        .max()
}

fn render_row(
    row: &mut Element,
    number: u32,
    shared_strings: &[String],
    tags: &TagMap,
    index: Option<usize>,
) {
    row.set_attr("r", number.to_string());
    let mut next_column = 0usize;
    for cell in row.elements_mut().filter(|e| e.is("c")) {
        let column = cell
            .attr("r")
            .and_then(cellref::parse)
            .map(|(col, _)| col)
            .unwrap_or(next_column);
        next_column = column + 1;
        if cell.attr("r").is_some() {
            cell.set_attr("r", cellref::format(column, number));
        }
        if let Some(copy) = index.filter(|&i| i > 0) {
            shift_formula(cell, copy as u32);
        }

        let Some(original) = cell_string(cell, shared_strings) else {
            continue;
        };
        if !text::has_tags(&original) {
            continue;
        }
        let rendered = text::render(&original, tags, index);
        if rendered == original {
            continue;
        }
        write_cell_value(cell, &original, &rendered);
    }
}

/// Point the formula of a repeated row copy at its own row. Shared formula
/// groups are split: the master's copy becomes a plain formula and the copies
/// of dependent cells lose theirs.
fn shift_formula(cell: &mut Element, delta: u32) {
    let Some(f) = cell.child_mut("f") else {
        return;
    };
    let formula = f.text();
    if formula.trim().is_empty() {
        cell.children
            .retain(|c| !matches!(c, Node::Element(e) if e.is("f")));
        return;
    }
    if f.attr("t") == Some("shared") {
        f.remove_attr("t");
        f.remove_attr("ref");
        f.remove_attr("si");
    } else if let Some(range) = f.attr("ref").map(str::to_string) {
        f.set_attr("ref", cellref::map_rows(&range, |r| r + delta));
    }
    f.set_text(cellref::shift_formula_rows(&formula, delta));
}

fn write_cell_value(cell: &mut Element, original: &str, rendered: &str) {
    cell.children
        .retain(|c| !matches!(c, Node::Element(e) if e.is("v") || e.is("f") || e.is("is")));

    let trimmed = rendered.trim();
    let numeric = text::single_tag(original).is_some()
        && trimmed
            .parse::<f64>()
            .is_ok_and(|n| n.is_finite() && n.to_string() == trimmed);

    if numeric {
        cell.remove_attr("t");
        let mut v = Element::new(cell.sibling_name("v"));
        v.set_text(trimmed);
        cell.children.push(Node::Element(v));
    } else {
        cell.set_attr("t", "inlineStr");
        let mut t = Element::new(cell.sibling_name("t"));
        t.set_attr("xml:space", "preserve");
        t.set_text(rendered);
        let mut is = Element::new(cell.sibling_name("is"));
        is.children.push(Node::Element(t));
        cell.children.push(Node::Element(is));
    }
}
