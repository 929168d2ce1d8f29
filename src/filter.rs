//! Droptable - Row filtering
//!
//! A row is visible when its location is selected and its name contains the
//! search term, both compared after lowercasing.

use std::collections::BTreeSet;

use crate::data::{Dataset, Row};
use crate::view::ViewState;

/// Normalized search term: lowercased, surrounding whitespace removed.
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Test a single row against a normalized term and a location selection.
pub fn matches(row: &Row, term: &str, selected: &BTreeSet<String>) -> bool {
    selected.contains(&row.location) && (term.is_empty() || row.name.to_lowercase().contains(term))
}

/// Derive the visible subset of `dataset` in load order.
///
/// An empty selection yields nothing, whatever the search term.
pub fn filter<'a>(dataset: &'a Dataset, view: &ViewState) -> Vec<&'a Row> {
    let rows = dataset.rows();
    filter_indices(dataset, view)
        .into_iter()
        .map(|i| &rows[i])
        .collect()
}

/// Same as [`filter`], as ascending indices into `dataset.rows()`.
pub fn filter_indices(dataset: &Dataset, view: &ViewState) -> Vec<usize> {
    if view.selected_locations.is_empty() {
        return Vec::new();
    }

    let term = normalize_term(&view.search_term);
    dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| matches(row, &term, &view.selected_locations))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_rows(
            vec![
                Row::new("Sword", "TownA", 12.5),
                Row::new("Shield", "TownB", 7.0),
                Row::new("Sword", "TownB", 3.0),
                Row::new("Broadsword", "TownC", 0.5),
            ],
            "Location",
        )
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let dataset = sample();
        let mut view = ViewState::new(&dataset);
        view.search_term = "SWORD".into();

        let names: Vec<_> = filter(&dataset, &view).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Sword", "Sword", "Broadsword"]);
    }

    #[test]
    fn test_lowercase_search_finds_both_swords() {
        let dataset = sample();
        let mut view = ViewState::new(&dataset);
        view.search_term = "sword".into();
        view.selected_locations.remove("TownC");

        let rows = filter(&dataset, &view);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.name == "Sword"));
    }

    #[test]
    fn test_empty_term_matches_all() {
        let dataset = sample();
        let view = ViewState::new(&dataset);
        assert_eq!(filter(&dataset, &view).len(), dataset.len());
    }

    #[test]
    fn test_whitespace_term_matches_all() {
        let dataset = sample();
        let mut view = ViewState::new(&dataset);
        view.search_term = "   ".into();
        assert_eq!(filter(&dataset, &view).len(), dataset.len());
    }

    #[test]
    fn test_empty_selection_yields_nothing() {
        let dataset = sample();
        let mut view = ViewState::new(&dataset);
        view.selected_locations.clear();
        assert!(filter(&dataset, &view).is_empty());

        view.search_term = "sword".into();
        assert!(filter(&dataset, &view).is_empty());
    }

    #[test]
    fn test_location_selection() {
        let dataset = sample();
        let mut view = ViewState::new(&dataset);
        view.selected_locations = ["TownB".to_string()].into_iter().collect();

        let rows = filter(&dataset, &view);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.location == "TownB"));
    }

    #[test]
    fn test_result_is_subset_satisfying_both_predicates() {
        let dataset = sample();
        let mut view = ViewState::new(&dataset);
        view.search_term = "s".into();
        view.selected_locations.remove("TownA");

        let term = normalize_term(&view.search_term);
        for row in filter(&dataset, &view) {
            assert!(dataset.rows().contains(row));
            assert!(matches(row, &term, &view.selected_locations));
        }
    }

    #[test]
    fn test_filter_does_not_touch_inputs() {
        let dataset = sample();
        let mut view = ViewState::new(&dataset);
        view.search_term = "shield".into();
        let before = view.clone();

        let first = filter(&dataset, &view);
        let second = filter(&dataset, &view);
        assert_eq!(first, second);
        assert_eq!(view, before);
        assert_eq!(dataset.len(), 4);
    }

    #[test]
    fn test_filter_indices_point_at_filtered_rows() {
        let dataset = sample();
        let mut view = ViewState::new(&dataset);
        view.search_term = "sword".into();
        view.toggle_location("TownA");

        let indices = filter_indices(&dataset, &view);
        assert_eq!(indices, vec![2, 3]);
        let by_index: Vec<&Row> = indices.iter().map(|&i| &dataset.rows()[i]).collect();
        assert_eq!(by_index, filter(&dataset, &view));
    }
}
