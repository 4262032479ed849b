use std::collections::{BTreeMap, BTreeSet};

use super::model::{CarDataset, CellValue, Column, ColumnKind};

// ---------------------------------------------------------------------------
// Filter predicate: selected values per categorical column, ranges per
// numeric column
// ---------------------------------------------------------------------------

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// column → set of selected values. An empty set hides every row.
    pub selected: BTreeMap<Column, BTreeSet<CellValue>>,
    /// column → allowed range. An absent column is unconstrained.
    pub ranges: BTreeMap<Column, Range>,
}

/// Initialise a [`FilterState`] with everything selected (i.e., show everything).
pub fn init_filter_state(dataset: &CarDataset) -> FilterState {
    let mut state = FilterState::default();
    for column in Column::ALL {
        match column.kind() {
            ColumnKind::Categorical => {
                let values = dataset
                    .unique_values
                    .get(&column)
                    .cloned()
                    .unwrap_or_default();
                state.selected.insert(column, values);
            }
            ColumnKind::Numeric => {
                if let Some((min, max)) = dataset.numeric_bounds(column) {
                    state.ranges.insert(column, Range { min, max });
                }
            }
        }
    }
    state
}

/// Return indices of rows that pass all active filters.
///
/// A row passes a categorical column filter when:
/// * The column is not present in `filters.selected` → passes (no constraint)
/// * The selected set for that column is empty → nothing selected → fails
/// * The row's value for that column is in the selected set → passes
pub fn filtered_indices(dataset: &CarDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            for (column, selected) in &filters.selected {
                if selected.is_empty() {
                    return false;
                }
                // Check all unique values are selected → no effective filter
                if let Some(all_vals) = dataset.unique_values.get(column) {
                    if selected.len() == all_vals.len() {
                        continue;
                    }
                }
                if !selected.contains(&record.value(*column)) {
                    return false;
                }
            }
            filters.ranges.iter().all(|(column, range)| {
                record.numeric(*column).map_or(true, |v| range.contains(v))
            })
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn initial_state_shows_everything() {
        let ds = sample_dataset();
        let state = init_filter_state(&ds);
        assert_eq!(filtered_indices(&ds, &state), [0, 1, 2, 3, 4]);
        assert_eq!(state.selected.len(), 5);
        assert_eq!(
            state.ranges[&Column::Price],
            Range { min: 480_000.0, max: 1_100_000.0 }
        );
    }

    #[test]
    fn categorical_selection_narrows_rows() {
        let ds = sample_dataset();
        let mut state = init_filter_state(&ds);
        state
            .selected
            .insert(Column::Brand, BTreeSet::from([text("Maruti")]));
        assert_eq!(filtered_indices(&ds, &state), [0, 2, 4]);

        state
            .selected
            .insert(Column::City, BTreeSet::from([text("Delhi")]));
        assert_eq!(filtered_indices(&ds, &state), [4]);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let ds = sample_dataset();
        let mut state = init_filter_state(&ds);
        state.selected.insert(Column::FuelType, BTreeSet::new());
        assert!(filtered_indices(&ds, &state).is_empty());
    }

    #[test]
    fn numeric_range_is_inclusive() {
        let ds = sample_dataset();
        let mut state = init_filter_state(&ds);
        state
            .ranges
            .insert(Column::Price, Range { min: 550_000.0, max: 700_000.0 });
        assert_eq!(filtered_indices(&ds, &state), [0, 1, 2]);
    }
}
