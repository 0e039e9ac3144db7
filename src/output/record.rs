//! Page records and the field names that make up the report schema

use crate::url::NormalizedUrl;
use std::collections::BTreeMap;
use std::fmt;

/// A column of the report
///
/// The derived ordering is the report's column ordering: the four base
/// fields first, then headings by tag level and 1-based occurrence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    StatusCode,
    Url,
    Title,
    MetaDescription,
    Heading { level: u8, index: usize },
}

impl Field {
    /// The fields every report carries, in column order
    pub const BASE: [Field; 4] = [
        Field::StatusCode,
        Field::Url,
        Field::Title,
        Field::MetaDescription,
    ];

    /// Heading field for the `index`-th (1-based) `<h{level}>` on a page
    pub fn heading(level: u8, index: usize) -> Self {
        Field::Heading { level, index }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::StatusCode => f.write_str("Status code"),
            Field::Url => f.write_str("URL"),
            Field::Title => f.write_str("Title"),
            Field::MetaDescription => f.write_str("META Description"),
            Field::Heading { level, index } => write!(f, "H{} - {}", level, index),
        }
    }
}

/// Metadata extracted from one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    fields: BTreeMap<Field, String>,
}

impl PageRecord {
    /// Creates a record with the mandatory URL and status code fields
    pub fn new(url: &NormalizedUrl, status_code: u16) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(Field::Url, url.as_str().to_string());
        fields.insert(Field::StatusCode, status_code.to_string());
        Self { fields }
    }

    /// Sets a field, replacing any earlier value
    pub fn insert(&mut self, field: Field, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    pub fn get(&self, field: &Field) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn url(&self) -> &str {
        self.get(&Field::Url).unwrap_or_default()
    }

    pub fn status_code(&self) -> Option<u16> {
        self.get(&Field::StatusCode)?.parse().ok()
    }

    /// Field names present in this record, in column order
    pub fn field_names(&self) -> impl Iterator<Item = &Field> {
        self.fields.keys()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
