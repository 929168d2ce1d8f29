//! Droptable - Browser commands
//!
//! Every user input becomes a [`BrowserCommand`]. [`Browser::dispatch`]
//! applies it to the view state and recomputes the projection from the full
//! dataset before returning, so one command always finishes before the next
//! is read.

use tracing::debug;

use crate::data::{Dataset, Row};
use crate::sort::SortColumn;
use crate::view::{current_view_indices, ViewState};

/// Input events that change what the table shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCommand {
    /// Replace the search text (sent on every keystroke)
    SetSearch(String),

    /// Flip one location checkbox
    ToggleLocation(String),

    /// Check every location
    SelectAllLocations,

    /// Uncheck every location
    SelectNoLocations,

    /// A column header was activated
    ActivateColumn(SortColumn),
}

/// Owns the loaded dataset, the view state and the current projection.
#[derive(Debug)]
pub struct Browser {
    dataset: Dataset,
    view: ViewState,
    /// Indices into `dataset.rows()` in display order
    visible: Vec<usize>,
}

impl Browser {
    /// Wrap a freshly loaded dataset with the default view.
    pub fn new(dataset: Dataset) -> Self {
        let view = ViewState::new(&dataset);
        Self::with_view(dataset, view)
    }

    /// Start from an explicit view state.
    pub fn with_view(dataset: Dataset, view: ViewState) -> Self {
        let mut browser = Self {
            dataset,
            view,
            visible: Vec::new(),
        };
        browser.recompute();
        browser
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Apply a command and refresh the projection.
    pub fn dispatch(&mut self, command: BrowserCommand) {
        debug!("dispatch {:?}", command);
        match command {
            BrowserCommand::SetSearch(term) => self.view.search_term = term,
            BrowserCommand::ToggleLocation(location) => self.view.toggle_location(&location),
            BrowserCommand::SelectAllLocations => self.view.select_all(&self.dataset),
            BrowserCommand::SelectNoLocations => self.view.select_none(),
            BrowserCommand::ActivateColumn(column) => self.view.activate_column(column),
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = current_view_indices(&self.dataset, &self.view);
    }

    /// Number of rows currently shown
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// The row shown at display position `index`
    pub fn visible_row(&self, index: usize) -> Option<&Row> {
        self.visible.get(index).map(|&i| &self.dataset.rows()[i])
    }

    /// Shown rows in display order
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.visible.iter().map(|&i| &self.dataset.rows()[i])
    }

    /// Status line text for the current projection
    pub fn result_message(&self) -> String {
        format!("Found {} results.", self.visible.len())
    }
}

/// Shown in place of the table when nothing matches
pub const EMPTY_MESSAGE: &str = "No items match the current filters.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn browser() -> Browser {
        let text = "Name\tLocation\tPercent\n\
                    Sword\tTownA\t12.5%\n\
                    Shield\tTownB\t7%\n\
                    Sword\tTownB\t3%";
        Browser::new(parse(text).unwrap())
    }

    fn names(browser: &Browser) -> Vec<String> {
        browser.visible_rows().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_initial_projection() {
        let browser = browser();
        assert_eq!(browser.visible_count(), 3);
        assert_eq!(names(&browser), vec!["Shield", "Sword", "Sword"]);
        assert_eq!(browser.result_message(), "Found 3 results.");
    }

    #[test]
    fn test_every_keystroke_recomputes() {
        let mut browser = browser();
        browser.dispatch(BrowserCommand::SetSearch("s".into()));
        assert_eq!(browser.visible_count(), 3);
        browser.dispatch(BrowserCommand::SetSearch("sw".into()));
        assert_eq!(browser.visible_count(), 2);
        browser.dispatch(BrowserCommand::SetSearch("swx".into()));
        assert_eq!(browser.visible_count(), 0);
        browser.dispatch(BrowserCommand::SetSearch("sw".into()));
        assert_eq!(browser.visible_count(), 2);
    }

    #[test]
    fn test_location_toggles_and_bulk_actions() {
        let mut browser = browser();
        browser.dispatch(BrowserCommand::ToggleLocation("TownB".into()));
        assert_eq!(browser.visible_count(), 1);
        assert_eq!(browser.visible_row(0).map(|r| r.location.as_str()), Some("TownA"));

        browser.dispatch(BrowserCommand::SelectNoLocations);
        assert_eq!(browser.visible_count(), 0);
        assert!(browser.visible_row(0).is_none());

        browser.dispatch(BrowserCommand::SelectAllLocations);
        assert_eq!(browser.visible_count(), 3);
    }

    #[test]
    fn test_header_activation() {
        let mut browser = browser();
        browser.dispatch(BrowserCommand::ActivateColumn(SortColumn::Percent));
        let percents: Vec<f64> = browser.visible_rows().map(|r| r.percent).collect();
        assert_eq!(percents, vec![3.0, 7.0, 12.5]);

        browser.dispatch(BrowserCommand::ActivateColumn(SortColumn::Percent));
        let percents: Vec<f64> = browser.visible_rows().map(|r| r.percent).collect();
        assert_eq!(percents, vec![12.5, 7.0, 3.0]);
        assert!(!browser.view().sort_ascending);

        browser.dispatch(BrowserCommand::ActivateColumn(SortColumn::Location));
        assert!(browser.view().sort_ascending);
        assert_eq!(browser.view().sort_column, SortColumn::Location);
    }

    #[test]
    fn test_filters_combine_with_sort() {
        let mut browser = browser();
        browser.dispatch(BrowserCommand::ActivateColumn(SortColumn::Percent));
        browser.dispatch(BrowserCommand::SetSearch("SWORD".into()));
        let rows: Vec<_> = browser
            .visible_rows()
            .map(|r| (r.location.as_str(), r.percent))
            .collect();
        assert_eq!(rows, vec![("TownB", 3.0), ("TownA", 12.5)]);
    }
}
