//! Droptable - View state and projection
//!
//! [`ViewState`] holds the user-controlled filter and sort parameters. The
//! displayed rows are always [`current_view`] of the full dataset: filtered
//! first, then sorted.

use std::collections::BTreeSet;

use crate::data::{Dataset, Row};
use crate::filter::{filter, filter_indices};
use crate::sort::{sort, sort_indices, SortColumn};

/// Current search, location selection and sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Free-text name search, empty matches everything
    pub search_term: String,
    /// Locations whose rows are shown
    pub selected_locations: BTreeSet<String>,
    pub sort_column: SortColumn,
    pub sort_ascending: bool,
}

impl ViewState {
    /// Initial state for a dataset: no search, every location selected,
    /// sorted by name ascending.
    pub fn new(dataset: &Dataset) -> Self {
        Self {
            search_term: String::new(),
            selected_locations: dataset.locations().map(str::to_string).collect(),
            sort_column: SortColumn::default(),
            sort_ascending: true,
        }
    }

    /// Header activation: the active column flips direction, any other
    /// column becomes active in ascending order.
    pub fn activate_column(&mut self, column: SortColumn) {
        if column == self.sort_column {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_column = column;
            self.sort_ascending = true;
        }
    }

    /// Flip one location in or out of the selection.
    pub fn toggle_location(&mut self, location: &str) {
        if !self.selected_locations.remove(location) {
            self.selected_locations.insert(location.to_string());
        }
    }

    pub fn is_selected(&self, location: &str) -> bool {
        self.selected_locations.contains(location)
    }

    pub fn select_all(&mut self, dataset: &Dataset) {
        self.selected_locations = dataset.locations().map(str::to_string).collect();
    }

    pub fn select_none(&mut self) {
        self.selected_locations.clear();
    }
}

/// Filter then sort the full dataset under `view`.
pub fn current_view<'a>(dataset: &'a Dataset, view: &ViewState) -> Vec<&'a Row> {
    let visible = filter(dataset, view);
    sort(&visible, view.sort_column, view.sort_ascending)
}

/// Same projection as [`current_view`], as indices into `dataset.rows()`.
pub fn current_view_indices(dataset: &Dataset, view: &ViewState) -> Vec<usize> {
    let visible = filter_indices(dataset, view);
    sort_indices(dataset.rows(), &visible, view.sort_column, view.sort_ascending)
}
