//! Droptable - Row ordering
//!
//! Stable sort by one column. Text columns compare their lowercase forms,
//! `Percent` compares numerically. Descending order negates the comparator
//! so rows with equal keys keep their original order in both directions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::data::Row;

/// Sortable table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Name,
    Location,
    Percent,
}

impl SortColumn {
    /// All columns in display order
    pub const ALL: [SortColumn; 3] = [SortColumn::Name, SortColumn::Location, SortColumn::Percent];

    /// Compare two rows by this column, ascending.
    pub fn compare(self, a: &Row, b: &Row) -> Ordering {
        match self {
            SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortColumn::Location => a.location.to_lowercase().cmp(&b.location.to_lowercase()),
            SortColumn::Percent => a.percent.partial_cmp(&b.percent).unwrap_or(Ordering::Equal),
        }
    }

    /// Compare in the given direction. Descending negates the result.
    pub fn compare_directed(self, a: &Row, b: &Row, ascending: bool) -> Ordering {
        let ordering = self.compare(a, b);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }

    /// Column header label; the location header comes from the file.
    pub fn label<'a>(self, location_column: &'a str) -> &'a str {
        match self {
            SortColumn::Name => "Name",
            SortColumn::Location => location_column,
            SortColumn::Percent => "Percent",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortColumn::Name => write!(f, "name"),
            SortColumn::Location => write!(f, "location"),
            SortColumn::Percent => write!(f, "percent"),
        }
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortColumn::Name),
            "location" => Ok(SortColumn::Location),
            "percent" => Ok(SortColumn::Percent),
            other => Err(format!(
                "unknown sort column '{}' (expected name, location or percent)",
                other
            )),
        }
    }
}

/// Return a sorted copy of `rows`. The input is left untouched.
pub fn sort<'a>(rows: &[&'a Row], column: SortColumn, ascending: bool) -> Vec<&'a Row> {
    sorted_by(rows, column, ascending, |row| *row)
}

/// Sort `indices` into `rows` the way [`sort`] orders the rows themselves.
pub fn sort_indices(
    rows: &[Row],
    indices: &[usize],
    column: SortColumn,
    ascending: bool,
) -> Vec<usize> {
    sorted_by(indices, column, ascending, |&i| &rows[i])
}

fn sorted_by<'r, T: Clone>(
    items: &[T],
    column: SortColumn,
    ascending: bool,
    row: impl Fn(&T) -> &'r Row,
) -> Vec<T> {
    let mut sorted = items.to_vec();
    // `sort_by` is stable; ties keep their input order
    sorted.sort_by(|a, b| column.compare_directed(row(a), row(b), ascending));
    sorted
}
