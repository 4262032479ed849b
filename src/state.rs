use std::collections::BTreeSet;

use crate::data::filter::{FilterState, Range, filtered_indices, init_filter_state};
use crate::data::model::{CarDataset, CellValue, Column};

// ---------------------------------------------------------------------------
// Filter session state
// ---------------------------------------------------------------------------

/// Which column's distinct values the lookup list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupColumn {
    CarModel,
    Brand,
}

impl LookupColumn {
    pub const ALL: [LookupColumn; 2] = [LookupColumn::CarModel, LookupColumn::Brand];

    pub fn column(self) -> Column {
        match self {
            LookupColumn::CarModel => Column::CarModel,
            LookupColumn::Brand => Column::Brand,
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            LookupColumn::CarModel => "Car Models",
            LookupColumn::Brand => "Car Brands",
        }
    }
}

/// The Data Filtering page state, independent of rendering.
#[derive(Debug, Clone)]
pub struct FilterSession {
    /// Per-column filter selections.
    pub filters: FilterState,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Rows captured by the last "Submit"; `None` until first submit.
    pub submitted: Option<Vec<usize>>,

    pub lookup: LookupColumn,
}

impl FilterSession {
    /// Start with every row visible.
    pub fn new(dataset: &CarDataset) -> Self {
        Self {
            filters: init_filter_state(dataset),
            visible_indices: (0..dataset.len()).collect(),
            submitted: None,
            lookup: LookupColumn::CarModel,
        }
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self, dataset: &CarDataset) {
        self.visible_indices = filtered_indices(dataset, &self.filters);
    }

    /// Toggle a single value in a categorical column's filter.
    pub fn toggle_filter_value(&mut self, dataset: &CarDataset, column: Column, value: &CellValue) {
        let selected = self.filters.selected.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter(dataset);
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, dataset: &CarDataset, column: Column) {
        if let Some(all_vals) = dataset.unique_values.get(&column) {
            self.filters.selected.insert(column, all_vals.clone());
            self.refilter(dataset);
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, dataset: &CarDataset, column: Column) {
        self.filters.selected.insert(column, BTreeSet::new());
        self.refilter(dataset);
    }

    /// Constrain a numeric column; bounds are swapped if given reversed.
    pub fn set_range(&mut self, dataset: &CarDataset, column: Column, min: f64, max: f64) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.filters.ranges.insert(column, Range { min, max });
        self.refilter(dataset);
    }

    /// Restore the unfiltered view.
    pub fn reset(&mut self, dataset: &CarDataset) {
        self.filters = init_filter_state(dataset);
        self.refilter(dataset);
    }

    /// Snapshot the currently visible rows for the result table.
    pub fn submit(&mut self) {
        log::debug!("Filter submitted: {} rows", self.visible_indices.len());
        self.submitted = Some(self.visible_indices.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    #[test]
    fn toggling_and_select_all() {
        let ds = sample_dataset();
        let mut session = FilterSession::new(&ds);
        let hyundai = CellValue::Text("Hyundai".to_string());

        session.toggle_filter_value(&ds, Column::Brand, &hyundai);
        assert_eq!(session.visible_indices, [0, 2, 3, 4]);

        session.toggle_filter_value(&ds, Column::Brand, &hyundai);
        assert_eq!(session.visible_indices.len(), 5);

        session.select_none(&ds, Column::City);
        assert!(session.visible_indices.is_empty());
        session.select_all(&ds, Column::City);
        assert_eq!(session.visible_indices.len(), 5);
    }

    #[test]
    fn submit_snapshots_visible_rows() {
        let ds = sample_dataset();
        let mut session = FilterSession::new(&ds);
        assert!(session.submitted.is_none());

        session.set_range(&ds, Column::ProducedYear, 2019.0, 2016.0);
        assert_eq!(session.visible_indices, [0, 1, 2, 4]);
        session.submit();

        session.reset(&ds);
        assert_eq!(session.visible_indices.len(), 5);
        assert_eq!(session.submitted.as_deref(), Some(&[0, 1, 2, 4][..]));
    }
}
