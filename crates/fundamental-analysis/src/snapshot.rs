//! Fundamental snapshot parsing.
//!
//! Snapshot documents are XML trees whose ratio nodes carry a field name and a
//! value under one of several attribute spellings. Every element is visited in
//! document order; the first occurrence of a name (compared case-insensitively)
//! wins.

use std::collections::HashMap;

/// Attribute spellings that carry the field name, in priority order
const NAME_ATTRIBUTES: &[&str] = &["FieldName", "fieldName", "Name", "name", "Tag", "tag"];

/// Attribute spellings that carry the value, in priority order
const VALUE_ATTRIBUTES: &[&str] = &["Value", "value", "v"];

/// Placeholder strings that mean "no value"
const MISSING_SENTINELS: &[&str] = &["N/A", "NA", "NONE", "NULL", "-"];

/// Flat, case-insensitive name -> value mapping parsed from a snapshot document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalSnapshot {
    metrics: HashMap<String, f64>,
}

impl FundamentalSnapshot {
    /// Parse a snapshot document. Empty or malformed input yields an empty snapshot.
    pub fn parse(document: &str) -> Self {
        let mut snapshot = Self::default();
        if document.trim().is_empty() {
            return snapshot;
        }

        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = match roxmltree::Document::parse_with_options(document, options) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Unparseable fundamental snapshot, treating as empty: {}", e);
                return snapshot;
            }
        };

        for node in doc.descendants().filter(|n| n.is_element()) {
            // The first non-empty spelling decides; a blank name after trimming skips the node.
            let Some(name) = NAME_ATTRIBUTES
                .iter()
                .filter_map(|attr| node.attribute(*attr))
                .find(|name| !name.is_empty())
                .map(str::trim)
                .filter(|name| !name.is_empty())
            else {
                continue;
            };

            // A present value attribute wins even when empty; inner text is the fallback.
            let raw_value = VALUE_ATTRIBUTES
                .iter()
                .find_map(|attr| node.attribute(*attr))
                .unwrap_or_else(|| node.text().unwrap_or(""));

            if let Some(value) = parse_number(raw_value) {
                snapshot.insert(name, value);
            }
        }

        tracing::debug!("Parsed {} snapshot fields", snapshot.len());
        snapshot
    }

    /// Build a snapshot from already-flattened pairs, keeping the first occurrence of each name.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut snapshot = Self::default();
        for (name, value) in pairs {
            if value.is_finite() {
                snapshot.insert(name, value);
            }
        }
        snapshot
    }

    fn insert(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_lowercase()).or_insert(value);
    }

    /// Case-insensitive lookup of a single field
    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.get(&name.to_lowercase()).copied()
    }

    /// Return the value of the first alias that is present
    pub fn get_any(&self, aliases: &[&str]) -> Option<f64> {
        aliases.iter().find_map(|alias| self.get(alias))
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// Coerce raw snapshot text to a finite number.
///
/// Thousands separators are stripped; sentinels and non-finite values are missing.
pub fn parse_number(raw: &str) -> Option<f64> {
    let text = raw.trim().replace(',', "");
    if text.is_empty()
        || MISSING_SENTINELS
            .iter()
            .any(|sentinel| text.eq_ignore_ascii_case(sentinel))
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}
