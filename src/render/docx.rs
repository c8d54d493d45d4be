//! Word-processing backend: fills `{{tag}}` placeholders in a `.docx` package.
//!
//! Tags are matched on the text of a whole paragraph, so a tag that Word split
//! over several runs is still found. The replacement goes into the run that
//! holds the start of the tag and keeps that run's formatting. Table rows that
//! mention a column-valued tag are repeated once per value.
use tracing::{debug, info};

use crate::core::tags::TagMap;
use crate::error::{Error, Result};
use crate::io::package;
use crate::io::xml::{Document, Element, Node};
use crate::render::text;

const MAIN_PART: &str = "word/document.xml";

/// Parts whose text is rendered; everything else is copied unchanged.
pub fn is_content_part(name: &str) -> bool {
    if name == MAIN_PART || name == "word/footnotes.xml" || name == "word/endnotes.xml" {
        return true;
    }
    match name.strip_prefix("word/") {
        Some(file) => {
            (file.starts_with("header") || file.starts_with("footer"))
                && file.ends_with(".xml")
                && !file.contains('/')
        }
        None => false,
    }
}

pub fn render(template: &[u8], tags: &TagMap) -> Result<Vec<u8>> {
    let mut found_main = false;
    let output = package::rewrite(template, |name, bytes| {
        if !is_content_part(name) {
            return Ok(None);
        }
        found_main |= name == MAIN_PART;
        debug!("Rendering {}", name);
        render_part(bytes, tags).map(Some)
    })?;
    if !found_main {
        return Err(Error::Package(format!(
            "template has no {MAIN_PART}, it is not a word-processing document"
        )));
    }
    info!("Rendered docx template with {} tags", tags.len());
    Ok(output)
}

pub fn render_part(bytes: &[u8], tags: &TagMap) -> Result<Vec<u8>> {
    let mut doc = Document::parse(bytes)?;
    render_element(&mut doc.root, tags, None);
    doc.to_bytes()
}

fn render_element(element: &mut Element, tags: &TagMap, row: Option<usize>) {
    if element.is("p") {
        render_paragraph(element, tags, row);
        return;
    }
    if element.is("tbl") && row.is_none() {
        render_table(element, tags);
        return;
    }
    for child in element.elements_mut() {
        render_element(child, tags, row);
    }
}

fn render_table(table: &mut Element, tags: &TagMap) {
    let children = std::mem::take(&mut table.children);
    for child in children {
        match child {
            Node::Element(mut tr) if tr.is("tr") => match row_repetitions(&tr, tags) {
                Some(count) => {
                    debug!("Repeating table row {} times", count);
                    for index in 0..count {
                        let mut copy = tr.clone();
                        render_element(&mut copy, tags, Some(index));
                        table.children.push(Node::Element(copy));
                    }
                }
                None => {
                    render_element(&mut tr, tags, None);
                    table.children.push(Node::Element(tr));
                }
            },
            Node::Element(mut other) => {
                render_element(&mut other, tags, None);
                table.children.push(Node::Element(other));
            }
            other => table.children.push(other),
        }
    }
}

fn row_repetitions(tr: &Element, tags: &TagMap) -> Option<usize> {
    let mut paragraphs = Vec::new();
    collect_paragraphs(tr, &mut paragraphs);
    paragraphs
        .into_iter()
        .filter_map(|p| text::column_len(&paragraph_text(p), tags))
        .max()
}

fn collect_paragraphs<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    for child in element.elements() {
        if child.is("p") {
            out.push(child);
        } else {
            collect_paragraphs(child, out);
        }
    }
}

/// Text of a paragraph's runs, not descending into nested paragraphs.
pub fn paragraph_text(p: &Element) -> String {
    fn walk(element: &Element, out: &mut String) {
        for child in element.elements() {
            if child.is("p") {
                continue;
            }
            if child.is("t") {
                out.push_str(&child.text());
            } else {
                walk(child, out);
            }
        }
    }
    let mut out = String::new();
    walk(p, &mut out);
    out
}

fn collect_text_nodes<'a>(element: &'a mut Element, out: &mut Vec<&'a mut String>) {
    for child in element.children.iter_mut() {
        let Node::Element(e) = child else {
            continue;
        };
        if e.is("p") {
            continue;
        }
        if e.is("t") {
            let text = e.children.iter_mut().find_map(|c| match c {
                Node::Text(t) => Some(t),
                _ => None,
            });
            if let Some(text) = text {
                out.push(text);
            }
        } else {
            collect_text_nodes(e, out);
        }
    }
}

fn render_paragraph(p: &mut Element, tags: &TagMap, row: Option<usize>) {
    {
        let mut segments = Vec::new();
        collect_text_nodes(p, &mut segments);
        let full: String = segments.iter().map(|s| s.as_str()).collect();
        let spans = text::find_tags(&full);

        if !spans.is_empty() {
            let mut offsets = Vec::with_capacity(segments.len());
            let mut offset = 0;
            for segment in &segments {
                offsets.push(offset);
                offset += segment.len();
            }
            let locate = |pos: usize| -> usize {
                offsets
                    .iter()
                    .zip(&segments)
                    .rposition(|(&start, s)| start <= pos && pos < start + s.len())
                    .unwrap_or(0)
            };
            let located: Vec<(usize, usize)> = spans
                .iter()
                .map(|span| (locate(span.start), locate(span.end - 1)))
                .collect();

            // right to left keeps the offsets of earlier spans valid
            for (span, (first, last)) in spans.iter().zip(located).rev() {
                let Some(value) = text::replacement(tags, &span.key, row) else {
                    continue;
                };
                let start = span.start - offsets[first];
                let end = span.end - offsets[last];
                if first == last {
                    segments[first].replace_range(start..end, &value);
                } else {
                    segments[first].replace_range(start.., &value);
                    for middle in &mut segments[first + 1..last] {
                        middle.clear();
                    }
                    segments[last].replace_range(..end, "");
                }
            }
        }
    }

    finish_runs(p);

    // paragraphs nested in text boxes
    for child in p.elements_mut() {
        render_nested(child, tags, row);
    }
}

fn render_nested(element: &mut Element, tags: &TagMap, row: Option<usize>) {
    if element.is("p") {
        render_paragraph(element, tags, row);
        return;
    }
    for child in element.elements_mut() {
        render_nested(child, tags, row);
    }
}

/// Turn line breaks inside `w:t` into `w:br` elements and preserve edge whitespace.
fn finish_runs(element: &mut Element) {
    let children = std::mem::take(&mut element.children);
    for child in children {
        match child {
            Node::Element(t) if t.is("t") && t.text().contains('\n') => {
                let full = t.text().replace('\r', "");
                for (index, line) in full.split('\n').enumerate() {
                    if index > 0 {
                        element
                            .children
                            .push(Node::Element(Element::new(t.sibling_name("br"))));
                    }
                    let mut piece = Element {
                        name: t.name.clone(),
                        attrs: t.attrs.clone(),
                        children: Vec::new(),
                    };
                    piece.set_text(line);
                    piece.set_attr("xml:space", "preserve");
                    element.children.push(Node::Element(piece));
                }
            }
            Node::Element(mut t) if t.is("t") => {
                let text = t.text();
                if text.trim() != text {
                    t.set_attr("xml:space", "preserve");
                }
                element.children.push(Node::Element(t));
            }
            Node::Element(mut other) if !other.is("p") => {
                finish_runs(&mut other);
                element.children.push(Node::Element(other));
            }
            other => element.children.push(other),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tags::{Record, TagValue};
    use pretty_assertions::assert_eq;

    fn tags() -> TagMap {
        let mut tags = TagMap::new();
        tags.insert("name", TagValue::Text("Ada Lovelace".into())).unwrap();
        tags.insert(
            "staff.City",
            TagValue::List(vec!["London".into(), "Paris".into()]),
        )
        .unwrap();
        let mut pen = Record::new();
        pen.push("Item", "Pen");
        pen.push("Qty", "2");
        let mut ink = Record::new();
        ink.push("Item", "Ink");
        ink.push("Qty", "5");
        tags.insert("orders", TagValue::Table(vec![pen, ink])).unwrap();
        tags
    }

    fn render_body(body: &str) -> Element {
        let bytes = render_part(fixtures::document_xml(body).as_bytes(), &tags()).unwrap();
        Document::parse(&bytes).unwrap().root
    }

    fn texts(root: &Element) -> Vec<String> {
        let mut paragraphs = Vec::new();
        collect_paragraphs(root, &mut paragraphs);
        paragraphs.into_iter().map(paragraph_text).collect()
    }

    #[test]
    fn replaces_tags_inside_a_single_run() {
        let root = render_body(r#"<w:p><w:r><w:t>Dear {{name}},</w:t></w:r></w:p>"#);
        assert_eq!(texts(&root), vec!["Dear Ada Lovelace,"]);
    }

    #[test]
    fn replaces_tags_split_across_runs_keeping_first_run_formatting() {
        let root = render_body(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Hello {{na</w:t></w:r><w:r><w:t>m</w:t></w:r><w:r><w:t>e}}!</w:t></w:r></w:p>"#,
        );
        let p = root.find("p").unwrap();
        let runs: Vec<String> = p.elements().map(|r| paragraph_text(r)).collect();
        assert_eq!(runs, vec!["Hello Ada Lovelace", "", "!"]);
        assert!(p.elements().next().unwrap().find("b").is_some());
    }

    #[test]
    fn unknown_tags_stay_in_place() {
        let root = render_body(r#"<w:p><w:r><w:t>{{missing}} {{name}}</w:t></w:r></w:p>"#);
        assert_eq!(texts(&root), vec!["{{missing}} Ada Lovelace"]);
    }

    #[test]
    fn repeats_table_rows_for_column_values() {
        let root = render_body(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Item</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Qty</w:t></w:r></w:p></w:tc></w:tr><w:tr><w:tc><w:p><w:r><w:t>{{orders.Item}}</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>{{ orders.Qty }} for {{name}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        let table = root.find("tbl").unwrap();
        assert_eq!(table.elements().filter(|e| e.is("tr")).count(), 3);
        assert_eq!(
            texts(&root),
            vec!["Item", "Qty", "Pen", "2 for Ada Lovelace", "Ink", "5 for Ada Lovelace"]
        );
    }

    #[test]
    fn empty_columns_remove_the_row() {
        let mut tags = TagMap::new();
        tags.insert("list.A", TagValue::List(Vec::new())).unwrap();
        let body = r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>{{list.A}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
        let bytes = render_part(fixtures::document_xml(body).as_bytes(), &tags).unwrap();
        let root = Document::parse(&bytes).unwrap().root;
        assert_eq!(root.find("tbl").unwrap().elements().count(), 0);
    }

    #[test]
    fn list_values_outside_tables_become_line_breaks() {
        let root = render_body(r#"<w:p><w:r><w:t>Cities: {{staff.City}}</w:t></w:r></w:p>"#);
        let run = root.find("r").unwrap();
        let names: Vec<&str> = run.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:t", "w:br", "w:t"]);
        let pieces: Vec<String> = run.elements().map(|e| e.text()).collect();
        assert_eq!(pieces, vec!["Cities: London", "", "Paris"]);
        assert_eq!(run.elements().next().unwrap().attr("xml:space"), Some("preserve"));
    }

    #[test]
    fn renders_a_whole_package() {
        let template = fixtures::docx(r#"<w:p><w:r><w:t>{{name}}</w:t></w:r></w:p>"#);
        let output = render(&template, &tags()).unwrap();
        let mut archive = package::open(&output).unwrap();
        let xml = String::from_utf8(package::read_part(&mut archive, MAIN_PART).unwrap()).unwrap();
        assert!(xml.contains("Ada Lovelace"));
        assert!(package::read_part(&mut archive, "[Content_Types].xml").is_ok());
    }

    #[test]
    fn rejects_packages_without_a_document_part() {
        let template = package::build_zip(&[("xl/workbook.xml", b"<workbook/>")]);
        assert!(matches!(render(&template, &tags()), Err(Error::Package(_))));
    }

    #[test]
    fn content_parts() {
        assert!(is_content_part("word/document.xml"));
        assert!(is_content_part("word/header1.xml"));
        assert!(is_content_part("word/footer2.xml"));
        assert!(!is_content_part("word/_rels/header1.xml.rels"));
        assert!(!is_content_part("word/styles.xml"));
        assert!(!is_content_part("word/media/header.png"));
    }
}
