use std::collections::BTreeSet;
use std::sync::Arc;

use eframe::egui::{self, DragValue, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::filter::Range;
use crate::data::model::{CarDataset, Column, ColumnKind};
use crate::resources::Resources;
use crate::router::PageView;
use crate::state::{FilterSession, LookupColumn};

use super::{colored_header, startup_error};

/// Data Filtering page: unique-value lookup, column filters, result table.
pub struct FilterView {
    resources: Arc<Resources>,
    session: Option<FilterSession>,
}

impl FilterView {
    pub fn new(resources: Arc<Resources>) -> Self {
        Self {
            resources,
            session: None,
        }
    }
}

impl PageView<Ui> for FilterView {
    fn render(&mut self, ui: &mut Ui) {
        colored_header(
            ui,
            "You are in Data Filtering page",
            "Filter the dataset based on specific columns.",
        );

        let resources = Arc::clone(&self.resources);
        let dataset = match resources.dataset() {
            Ok(ds) => ds,
            Err(err) => {
                startup_error(ui, err);
                return;
            }
        };
        let session = self
            .session
            .get_or_insert_with(|| FilterSession::new(dataset));

        lookup_section(ui, dataset, session);
        ui.separator();

        ui.strong("Filters");
        ScrollArea::vertical()
            .id_salt("filter_widgets")
            .max_height(260.0)
            .auto_shrink([false, true])
            .show(ui, |ui: &mut Ui| {
                filter_widgets(ui, dataset, session);
            });

        ui.horizontal(|ui: &mut Ui| {
            if ui.button("Submit").clicked() {
                session.submit();
            }
            if ui.button("Reset").clicked() {
                session.reset(dataset);
            }
            ui.label(format!(
                "{} of {} cars match",
                session.visible_indices.len(),
                dataset.len()
            ));
        });
        ui.separator();

        if let Some(rows) = &session.submitted {
            results_table(ui, dataset, rows);
        }
    }
}

// ---------------------------------------------------------------------------
// Unique value lookup
// ---------------------------------------------------------------------------

fn lookup_section(ui: &mut Ui, dataset: &CarDataset, session: &mut FilterSession) {
    egui::CollapsingHeader::new(RichText::new("Unique values").strong())
        .id_salt("lookup")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::ComboBox::from_label("Select a column to know unique values")
                .selected_text(session.lookup.column().header())
                .show_ui(ui, |ui: &mut Ui| {
                    for choice in LookupColumn::ALL {
                        ui.selectable_value(&mut session.lookup, choice, choice.column().header());
                    }
                });

            let values = dataset.distinct_text(session.lookup.column());
            ui.label(RichText::new(format!("{} ({})", session.lookup.heading(), values.len())).strong());
            ScrollArea::vertical()
                .id_salt("lookup_values")
                .max_height(180.0)
                .show(ui, |ui: &mut Ui| {
                    for value in values {
                        ui.label(value);
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Per-column filter widgets
// ---------------------------------------------------------------------------

fn filter_widgets(ui: &mut Ui, dataset: &CarDataset, session: &mut FilterSession) {
    for column in Column::ALL {
        match column.kind() {
            ColumnKind::Categorical => {
                let Some(all_values) = dataset.unique_values.get(&column) else {
                    continue;
                };
                let n_selected = session
                    .filters
                    .selected
                    .get(&column)
                    .map_or(0, BTreeSet::len);
                let header_text = format!("{column}  ({n_selected}/{})", all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(column.header())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                session.select_all(dataset, column);
                            }
                            if ui.small_button("None").clicked() {
                                session.select_none(dataset, column);
                            }
                        });

                        for val in all_values {
                            let mut checked = session
                                .filters
                                .selected
                                .get(&column)
                                .is_some_and(|selected| selected.contains(val));
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                session.toggle_filter_value(dataset, column, val);
                            }
                        }
                    });
            }
            ColumnKind::Numeric => {
                let Some((lo, hi)) = dataset.numeric_bounds(column) else {
                    continue;
                };
                let current = session
                    .filters
                    .ranges
                    .get(&column)
                    .copied()
                    .unwrap_or(Range { min: lo, max: hi });
                let (mut min, mut max) = (current.min, current.max);
                let speed = ((hi - lo) / 200.0).max(0.1);

                ui.horizontal(|ui: &mut Ui| {
                    ui.label(column.header());
                    let a = ui.add(DragValue::new(&mut min).range(lo..=hi).speed(speed));
                    ui.label("to");
                    let b = ui.add(DragValue::new(&mut max).range(lo..=hi).speed(speed));
                    if a.changed() || b.changed() {
                        session.set_range(dataset, column, min, max);
                    }
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result table
// ---------------------------------------------------------------------------

fn results_table(ui: &mut Ui, dataset: &CarDataset, rows: &[usize]) {
    ui.label(RichText::new(format!("{} rows", rows.len())).strong());

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(420.0)
        .columns(TableColumn::auto().at_least(70.0), Column::ALL.len())
        .header(22.0, |mut header| {
            for column in Column::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(column.header());
                });
            }
        })
        .body(|body| {
            body.rows(20.0, rows.len(), |mut row| {
                let record = &dataset.records[rows[row.index()]];
                for column in Column::ALL {
                    row.col(|ui: &mut Ui| {
                        ui.label(record.value(column).to_string());
                    });
                }
            });
        });
}
