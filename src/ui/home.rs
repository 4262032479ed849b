use eframe::egui::{RichText, Ui};

use crate::router::PageView;

use super::colored_header;

const SECTIONS: [(&str, &str); 5] = [
    ("Project title", "CarDekho Used Car Price Prediction"),
    (
        "Skills take away From This Project",
        "Rust, Data Wrangling, EDA, Machine Learning, egui.",
    ),
    ("Domain", "Automobile"),
    (
        "Problem Statement",
        "The project aims to predict used car prices based on features such as car model, \
         mileage, engine CC, and more.",
    ),
    (
        "Results",
        "The result will empower users to make informed decisions while buying or selling \
         used cars.",
    ),
];

/// Static landing page.
#[derive(Debug, Default)]
pub struct HomeView;

impl PageView<Ui> for HomeView {
    fn render(&mut self, ui: &mut Ui) {
        colored_header(
            ui,
            "Welcome to Home Page 👋",
            "Welcome to CarDekho Used Car Price Prediction!",
        );
        for (title, body) in SECTIONS {
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("{title}:"))
                    .heading()
                    .color(super::ACCENT),
            );
            ui.label(RichText::new(body).italics().size(18.0));
        }
    }
}
