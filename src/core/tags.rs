//! The tag mapping handed to the renderers, and tag resolution.
use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// One row of a table-mode input: column header → cell text, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.push((column.into(), value.into()));
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    List(Vec<String>),
    Table(Vec<Record>),
}

/// What a `{{key}}` resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    Scalar(&'a str),
    /// Ordered values; drives row repetition in the renderers.
    Column(Vec<&'a str>),
    /// A whole table named without a column.
    Table,
}

impl Resolved<'_> {
    /// Text for the `index`-th repetition of a row, or for a single occurrence when `None`.
    pub fn text(&self, index: Option<usize>) -> String {
        match (self, index) {
            (Resolved::Scalar(s), _) => s.to_string(),
            (Resolved::Column(values), Some(i)) => values.get(i).copied().unwrap_or("").to_string(),
            (Resolved::Column(values), None) => values.join("\n"),
            (Resolved::Table, _) => String::new(),
        }
    }

    pub fn column_len(&self) -> Option<usize> {
        match self {
            Resolved::Column(values) => Some(values.len()),
            _ => None,
        }
    }
}

/// Tag name → value. Keys are unique; inserting a key twice is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TagMap {
    entries: BTreeMap<String, TagValue>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: TagValue) -> Result<()> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateTag(key));
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TagValue)> {
        self.entries.iter()
    }

    /// Resolve a tag key.
    ///
    /// An exact key wins; otherwise `table.column` addresses a field of a
    /// table-valued entry, trying every `.` from the left so that table names
    /// and column headers may themselves contain dots. Any column of an empty
    /// table resolves to an empty column.
    pub fn resolve(&self, key: &str) -> Option<Resolved<'_>> {
        if let Some(value) = self.entries.get(key) {
            return Some(match value {
                TagValue::Text(s) => Resolved::Scalar(s),
                TagValue::List(values) => Resolved::Column(values.iter().map(String::as_str).collect()),
                TagValue::Table(_) => Resolved::Table,
            });
        }
        key.match_indices('.').find_map(|(dot, _)| {
            let (name, column) = (&key[..dot], &key[dot + 1..]);
            match self.entries.get(name)? {
                TagValue::Table(records)
                    if records.is_empty() || records.iter().any(|r| r.get(column).is_some()) =>
                {
                    Some(Resolved::Column(
                        records.iter().map(|r| r.get(column).unwrap_or("")).collect(),
                    ))
                }
                _ => None,
            }
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Error::package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(fields: &[(&str, &str)]) -> Record {
        let mut r = Record::new();
        for (c, v) in fields {
            r.push(*c, *v);
        }
        r
    }

    fn sample() -> TagMap {
        let mut tags = TagMap::new();
        tags.insert("title", TagValue::Text("Report".into())).unwrap();
        tags.insert(
            "staff.Name",
            TagValue::List(vec!["Ada".into(), "Alan".into()]),
        )
        .unwrap();
        tags.insert(
            "orders",
            TagValue::Table(vec![
                record(&[("Item", "Pen"), ("Qty", "2")]),
                record(&[("Item", "Ink"), ("Qty", "5")]),
            ]),
        )
        .unwrap();
        tags
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut tags = sample();
        let err = tags.insert("title", TagValue::Text("again".into())).unwrap_err();
        assert!(matches!(err, Error::DuplicateTag(ref k) if k == "title"));
        assert_eq!(tags.len(), 3);
    }

    #[test]
    fn resolves_scalars_lists_and_table_columns() {
        let tags = sample();
        assert_eq!(tags.resolve("title"), Some(Resolved::Scalar("Report")));
        assert_eq!(
            tags.resolve("staff.Name"),
            Some(Resolved::Column(vec!["Ada", "Alan"]))
        );
        assert_eq!(
            tags.resolve("orders.Qty"),
            Some(Resolved::Column(vec!["2", "5"]))
        );
        assert_eq!(tags.resolve("orders"), Some(Resolved::Table));
        assert_eq!(tags.resolve("orders.Price"), None);
        assert_eq!(tags.resolve("missing"), None);

        let mut empty = TagMap::new();
        empty.insert("orders", TagValue::Table(Vec::new())).unwrap();
        assert_eq!(empty.resolve("orders.Item"), Some(Resolved::Column(Vec::new())));
    }

    #[test]
    fn table_and_column_names_may_contain_dots() {
        let mut tags = TagMap::new();
        tags.insert("q1.orders", TagValue::Table(vec![record(&[("unit.price", "3")])]))
            .unwrap();
        assert_eq!(
            tags.resolve("q1.orders.unit.price"),
            Some(Resolved::Column(vec!["3"]))
        );
    }

    #[test]
    fn resolved_text_per_row() {
        let column = Resolved::Column(vec!["a", "b"]);
        assert_eq!(column.text(Some(1)), "b");
        assert_eq!(column.text(Some(5)), "");
        assert_eq!(column.text(None), "a\nb");
        assert_eq!(Resolved::Scalar("x").text(Some(3)), "x");
        assert_eq!(column.column_len(), Some(2));
        assert_eq!(Resolved::Table.text(None), "");
    }

    #[test]
    fn serializes_as_plain_json() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Report");
        assert_eq!(value["staff.Name"][1], "Alan");
        assert_eq!(value["orders"][1]["Item"], "Ink");
    }
}
