use std::sync::Arc;

use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::data::model::{CarDataset, Column, Transmission};
use crate::predict::features::RawInputs;
use crate::predict::flow::{FlowState, Outcome, PredictionFlow};
use crate::resources::Resources;
use crate::router::PageView;

use super::startup_error;

/// Data Prediction page: the car form and the predicted price.
pub struct PredictView {
    resources: Arc<Resources>,
    form: Option<RawInputs>,
    flow: PredictionFlow,
}

impl PredictView {
    pub fn new(resources: Arc<Resources>) -> Self {
        Self {
            resources,
            form: None,
            flow: PredictionFlow::default(),
        }
    }
}

/// Form defaults: the first option of every select box.
fn initial_form(dataset: &CarDataset) -> RawInputs {
    let first = |column: Column| {
        dataset
            .distinct_text(column)
            .first()
            .map(|s| s.to_string())
            .unwrap_or_default()
    };
    let brand = first(Column::Brand);
    let car_model = dataset
        .models_for_brand(&brand)
        .first()
        .map(|s| s.to_string())
        .unwrap_or_default();
    let defaults = RawInputs::default();
    RawInputs {
        car_model,
        model_year: dataset
            .distinct_years()
            .first()
            .copied()
            .unwrap_or(defaults.model_year),
        city: first(Column::City),
        fuel_type: first(Column::FuelType),
        brand,
        ..defaults
    }
}

/// Keep the model selection consistent with the chosen brand.
fn sync_model_with_brand(form: &mut RawInputs, dataset: &CarDataset) {
    let models = dataset.models_for_brand(&form.brand);
    if !models.contains(&form.car_model.as_str()) {
        form.car_model = models.first().map(|s| s.to_string()).unwrap_or_default();
    }
}

impl PageView<Ui> for PredictView {
    fn render(&mut self, ui: &mut Ui) {
        ui.heading(RichText::new("Car Price Prediction").size(28.0).strong());
        ui.add_space(6.0);

        let resources = Arc::clone(&self.resources);
        let loaded = resources
            .dataset()
            .and_then(|ds| Ok((ds, resources.encoders()?, resources.model()?)));
        let (dataset, encoders, model) = match loaded {
            Ok(parts) => parts,
            Err(err) => {
                startup_error(ui, err);
                return;
            }
        };

        let form = self.form.get_or_insert_with(|| initial_form(dataset));
        let flow = &mut self.flow;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                let mut edited = false;

                egui::Grid::new("prediction_form")
                    .num_columns(2)
                    .spacing([16.0, 8.0])
                    .show(ui, |ui: &mut Ui| {
                        ui.label("Select Car Brand");
                        if select_text(ui, "brand", &mut form.brand, &dataset.distinct_text(Column::Brand)) {
                            sync_model_with_brand(form, dataset);
                            edited = true;
                        }
                        ui.end_row();

                        ui.label("Select Car Model");
                        let models = dataset.models_for_brand(&form.brand);
                        edited |= select_text(ui, "model", &mut form.car_model, &models);
                        ui.end_row();

                        ui.label("Select Car Year");
                        egui::ComboBox::from_id_salt("year")
                            .selected_text(form.model_year.to_string())
                            .show_ui(ui, |ui: &mut Ui| {
                                for year in dataset.distinct_years() {
                                    edited |= ui
                                        .selectable_value(&mut form.model_year, year, year.to_string())
                                        .changed();
                                }
                            });
                        ui.end_row();

                        ui.label("Select Transmission");
                        ui.horizontal(|ui: &mut Ui| {
                            for t in Transmission::ALL {
                                edited |= ui.radio_value(&mut form.transmission, t, t.label()).changed();
                            }
                        });
                        ui.end_row();

                        ui.label("Select Location");
                        edited |= select_text(ui, "city", &mut form.city, &dataset.distinct_text(Column::City));
                        ui.end_row();

                        ui.label("Enter Kilometers Driven");
                        edited |= ui
                            .add(
                                DragValue::new(&mut form.kilometers_driven)
                                    .range(0.0..=f64::MAX)
                                    .speed(100.0)
                                    .fixed_decimals(0),
                            )
                            .changed();
                        ui.end_row();

                        ui.label("Enter Engine CC");
                        edited |= ui
                            .add(
                                DragValue::new(&mut form.engine_cc)
                                    .range(0.0..=f64::MAX)
                                    .speed(10.0)
                                    .fixed_decimals(0),
                            )
                            .changed();
                        ui.end_row();

                        ui.label("Enter Mileage");
                        edited |= ui
                            .add(
                                DragValue::new(&mut form.mileage)
                                    .range(0.0..=f64::MAX)
                                    .speed(0.1)
                                    .max_decimals(2),
                            )
                            .changed();
                        ui.end_row();

                        ui.label("Select Fuel Type");
                        edited |= select_text(
                            ui,
                            "fuel",
                            &mut form.fuel_type,
                            &dataset.distinct_text(Column::FuelType),
                        );
                        ui.end_row();

                        ui.label("Enter Number of Owners");
                        edited |= ui
                            .add(DragValue::new(&mut form.owner_count).range(1..=u32::MAX))
                            .changed();
                        ui.end_row();

                        ui.label("Enter Number of Seats");
                        edited |= ui
                            .add(DragValue::new(&mut form.seat_count).range(2..=u32::MAX))
                            .changed();
                        ui.end_row();
                    });

                if edited {
                    flow.interact();
                }

                ui.add_space(8.0);
                if ui.button(RichText::new("Predict").strong()).clicked() {
                    flow.submit(form, encoders, model);
                }

                if let Some(outcome) = flow.outcome() {
                    let message = outcome.message(&resources.config().currency_symbol);
                    let color = match outcome {
                        Outcome::Rejected(_) => Color32::RED,
                        Outcome::Predicted { .. } => Color32::from_rgb(0x2e, 0xa0, 0x43),
                    };
                    // A price from before the latest edit is kept but dimmed.
                    let color = if is_stale(flow.state(), outcome) {
                        color.gamma_multiply(0.5)
                    } else {
                        color
                    };
                    ui.add_space(8.0);
                    ui.label(RichText::new(message).color(color).size(18.0).strong());
                }
            });
    }
}

fn is_stale(state: FlowState, outcome: &Outcome) -> bool {
    matches!(outcome, Outcome::Predicted { .. }) && state != FlowState::Displayed
}

/// Combo box over string options; returns whether the selection changed.
fn select_text(ui: &mut Ui, id: &str, current: &mut String, options: &[&str]) -> bool {
    let mut changed = false;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for &option in options {
                if ui.selectable_label(current.as_str() == option, option).clicked()
                    && current.as_str() != option
                {
                    *current = option.to_string();
                    changed = true;
                }
            }
        });
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_dataset;

    #[test]
    fn form_starts_on_first_options() {
        let form = initial_form(&sample_dataset());
        assert_eq!(form.brand, "Maruti");
        assert_eq!(form.car_model, "Swift");
        assert_eq!(form.model_year, 2018);
        assert_eq!(form.city, "Pune");
        assert_eq!(form.fuel_type, "Petrol");
        assert_eq!(form.owner_count, 1);
        assert_eq!(form.seat_count, 2);
    }

    #[test]
    fn brand_change_resets_foreign_model() {
        let ds = sample_dataset();
        let mut form = initial_form(&ds);
        form.brand = "Tata".to_string();
        sync_model_with_brand(&mut form, &ds);
        assert_eq!(form.car_model, "Nexon");

        form.brand = "Maruti".to_string();
        form.car_model = "Baleno".to_string();
        sync_model_with_brand(&mut form, &ds);
        assert_eq!(form.car_model, "Baleno");
    }

    #[test]
    fn edited_form_marks_price_stale() {
        use crate::predict::encoder::EncoderSet;
        use crate::predict::regressor::tests::FixedRegressor;

        let ds = sample_dataset();
        let encoders = EncoderSet::from_dataset(&ds);
        let model = FixedRegressor::new(500_000.0);
        let mut flow = PredictionFlow::default();
        let mut form = initial_form(&ds);
        form.kilometers_driven = 40_000.0;
        form.engine_cc = 1197.0;
        form.mileage = 19.0;

        let outcome = flow.submit(&form, &encoders, &model).clone();
        assert!(!is_stale(flow.state(), &outcome));
        flow.interact();
        assert!(is_stale(flow.state(), &outcome));

        form.mileage = 0.0;
        let rejected = flow.submit(&form, &encoders, &model).clone();
        assert!(!is_stale(flow.state(), &rejected));
    }

    #[test]
    fn empty_dataset_leaves_selections_blank() {
        let form = initial_form(&CarDataset::default());
        assert!(form.brand.is_empty());
        assert!(form.car_model.is_empty());
    }
}
