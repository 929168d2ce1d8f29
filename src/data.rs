//! Droptable - In-memory drop table
//!
//! A [`Dataset`] is built once from parsed text and never mutated afterwards.
//! Reloading means building a new one.

use serde::Serialize;
use std::collections::BTreeSet;

/// One catalog entry: an item, where it drops, and how often.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Display name of the item (not unique)
    pub name: String,
    /// Source the item is associated with
    pub location: String,
    /// Occurrence rate, non-negative
    pub percent: f64,
}

impl Row {
    pub fn new(name: impl Into<String>, location: impl Into<String>, percent: f64) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            percent,
        }
    }

    /// Percentage formatted the way the table shows it (`12.50%`)
    pub fn percent_display(&self) -> String {
        format!("{:.2}%", self.percent)
    }
}

/// All loaded rows plus the distinct set of locations they reference.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<Row>,
    locations: BTreeSet<String>,
    /// Header name of the location column, for display
    pub location_column: String,
}

impl Dataset {
    /// Build a dataset from rows, deriving the location set.
    pub fn from_rows(rows: Vec<Row>, location_column: impl Into<String>) -> Self {
        let locations = rows.iter().map(|r| r.location.clone()).collect();
        Self {
            rows,
            locations,
            location_column: location_column.into(),
        }
    }

    /// All rows in load order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct locations in sorted order, for building selection controls.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.locations.iter().map(String::as_str)
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn has_location(&self, location: &str) -> bool {
        self.locations.contains(location)
    }
}
