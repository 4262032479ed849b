use eframe::egui::{self, Color32, RichText, Ui};

use crate::resources::Resources;
use crate::router::Page;

use super::ACCENT;

// ---------------------------------------------------------------------------
// Left side panel – page menu
// ---------------------------------------------------------------------------

/// Render the single-choice page menu. `selected` holds the chosen title.
pub fn navigation_menu(ui: &mut Ui, pages: impl Iterator<Item = Page>, selected: &mut String) {
    ui.add_space(8.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new("💰").size(32.0));
        ui.heading(RichText::new("Car Resale Price Prediction").strong());
    });
    ui.separator();

    for page in pages {
        let is_selected = selected.as_str() == page.title();
        let mut text = RichText::new(format!("{}  {}", page.icon(), page.title())).size(16.0);
        if is_selected {
            text = text.color(Color32::WHITE);
        }
        let button = egui::Button::new(text)
            .fill(if is_selected { ACCENT } else { Color32::TRANSPARENT })
            .min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add(button).clicked() && !is_selected {
            log::debug!("Menu selection: {}", page.title());
            *selected = page.title().to_string();
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, resources: &Resources, selected: &str) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong(selected);
        ui.separator();

        let config = resources.config();
        ui.label(format!("Dataset: {}", config.dataset_path.display()));
        if let Some(summary) = resources.summary() {
            ui.label(RichText::new(summary).weak());
        }

        ui.separator();
        ui.label(format!("Model: {}", config.model_path.display()));
    });
}
