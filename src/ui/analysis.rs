use std::sync::Arc;

use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::data::model::Column;
use crate::resources::Resources;
use crate::router::PageView;

use super::plot::{self, DEFAULT_BINS};
use super::{ACCENT, colored_header, startup_error};

/// Data Analysis page: price against a chosen column, brand availability.
pub struct AnalysisView {
    resources: Arc<Resources>,
    column: Column,
    bins: usize,
}

impl AnalysisView {
    pub fn new(resources: Arc<Resources>) -> Self {
        Self {
            resources,
            column: Column::CarModel,
            bins: DEFAULT_BINS,
        }
    }
}

/// Columns offered for exploration: everything but the target.
fn explorable_columns() -> impl Iterator<Item = Column> {
    Column::ALL.into_iter().filter(|c| *c != Column::Price)
}

impl PageView<Ui> for AnalysisView {
    fn render(&mut self, ui: &mut Ui) {
        colored_header(
            ui,
            "You are in Data Analysis page",
            "Analyze the dataset with visualizations.",
        );

        let resources = Arc::clone(&self.resources);
        let dataset = match resources.dataset() {
            Ok(ds) => ds,
            Err(err) => {
                startup_error(ui, err);
                return;
            }
        };
        if dataset.is_empty() {
            ui.label(RichText::new("The dataset has no rows to chart.").weak());
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    egui::ComboBox::from_label(RichText::new("Select an option to Explore").strong())
                        .selected_text(self.column.header())
                        .show_ui(ui, |ui: &mut Ui| {
                            for column in explorable_columns() {
                                ui.selectable_value(&mut self.column, column, column.header());
                            }
                        });
                    if !self.column.is_categorical() {
                        ui.add(egui::Slider::new(&mut self.bins, 1..=60).text("bins"));
                    }
                });

                ui.label(
                    RichText::new(format!("Car Price vs {}", self.column))
                        .heading()
                        .color(ACCENT),
                );
                let colors = dataset
                    .unique_values
                    .get(&self.column)
                    .filter(|_| self.column.is_categorical())
                    .map(ColorMap::new);
                let bars = plot::price_by_column(dataset, self.column, self.bins);
                plot::bar_chart(
                    ui,
                    "price_vs_column",
                    &bars,
                    self.column.header(),
                    Column::Price.header(),
                    colors.as_ref(),
                );

                ui.add_space(12.0);
                ui.label(
                    RichText::new("Which Car Brand is most available")
                        .heading()
                        .color(ACCENT),
                );
                let brand_colors = dataset.unique_values.get(&Column::Brand).map(ColorMap::new);
                plot::bar_chart(
                    ui,
                    "brand_counts",
                    &plot::brand_counts(dataset),
                    Column::Brand.header(),
                    "Count",
                    brand_colors.as_ref(),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_is_not_explorable() {
        let columns: Vec<_> = explorable_columns().collect();
        assert_eq!(columns.len(), Column::ALL.len() - 1);
        assert!(!columns.contains(&Column::Price));
    }
}
