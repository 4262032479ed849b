use eframe::egui::{Color32, RichText, Ui};

use crate::error::StartupError;

pub mod analysis;
pub mod filter;
pub mod home;
pub mod panels;
pub mod plot;
pub mod predict;

pub const ACCENT: Color32 = Color32::from_rgb(0x1f, 0x6f, 0xeb);

/// Page heading with an accent rule and a one-line description underneath.
pub fn colored_header(ui: &mut Ui, label: &str, description: &str) {
    ui.heading(RichText::new(label).size(26.0).strong());
    let (rect, _) = ui.allocate_exact_size(
        eframe::egui::vec2(ui.available_width(), 3.0),
        eframe::egui::Sense::hover(),
    );
    ui.painter().rect_filled(rect, 0.0, ACCENT);
    ui.label(RichText::new(description).weak());
    ui.add_space(6.0);
}

/// Shown in place of a view whose dataset or model failed to load.
pub fn startup_error(ui: &mut Ui, err: &StartupError) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!("This page is unavailable.\n\n{err}"))
                .color(Color32::RED)
                .size(16.0),
        );
    });
}
