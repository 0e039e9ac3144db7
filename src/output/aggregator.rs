//! Thread-safe accumulation of page records and the report schema
//!
//! The record list and the field-name set sit behind two independent locks,
//! neither shared with the frontier, so workers finishing at the same time
//! only contend for the few instructions each append takes.

use crate::output::record::{Field, PageRecord};
use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

/// Collects records from all workers of all passes
#[derive(Debug)]
pub struct Aggregator {
    rows: Mutex<Vec<PageRecord>>,
    fields: Mutex<BTreeSet<Field>>,
}

/// The finalized report: ordered columns and rows rendered in that order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub columns: Vec<Field>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    /// Column names as written in the header row
    pub fn header(&self) -> Vec<String> {
        self.columns.iter().map(Field::to_string).collect()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// Creates an aggregator whose schema already holds the base fields
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            fields: Mutex::new(Field::BASE.into_iter().collect()),
        }
    }

    /// Appends a finished record
    pub fn record(&self, record: PageRecord) {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Unions field names into the report schema
    pub fn merge_fields<'a, I>(&self, names: I)
    where
        I: IntoIterator<Item = &'a Field>,
    {
        let mut fields = self.fields.lock().unwrap_or_else(PoisonError::into_inner);
        for name in names {
            if !fields.contains(name) {
                fields.insert(name.clone());
            }
        }
    }

    /// Number of records collected so far
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the schema in column order
    pub fn columns(&self) -> Vec<Field> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Builds the report: ordered columns, one row per record, missing
    /// fields rendered empty
    pub fn finalize(&self) -> Report {
        let columns = self.columns();
        let rows = self
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();

        Report { columns, rows }
    }
}
