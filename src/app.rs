use std::sync::Arc;

use eframe::egui;

use crate::config::AppConfig;
use crate::resources::Resources;
use crate::router::{Page, PageRouter};
use crate::ui::analysis::AnalysisView;
use crate::ui::filter::FilterView;
use crate::ui::home::HomeView;
use crate::ui::panels;
use crate::ui::predict::PredictView;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CarResaleApp {
    resources: Arc<Resources>,
    router: PageRouter<egui::Ui>,
    /// Title chosen in the menu.
    selected: String,
}

impl CarResaleApp {
    pub fn new(config: AppConfig) -> Self {
        let resources = Arc::new(Resources::new(config));

        let mut router = PageRouter::new();
        router
            .register(Page::Home, HomeView)
            .register(Page::DataFiltering, FilterView::new(Arc::clone(&resources)))
            .register(Page::DataAnalysis, AnalysisView::new(Arc::clone(&resources)))
            .register(Page::DataPrediction, PredictView::new(Arc::clone(&resources)));
        log::debug!("Registered pages: {:?}", router.titles().collect::<Vec<_>>());

        Self {
            resources,
            router,
            selected: Page::Home.title().to_string(),
        }
    }
}

impl eframe::App for CarResaleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: status bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.resources, &self.selected);
        });

        // ---- Left side panel: page menu ----
        egui::SidePanel::left("navigation")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::navigation_menu(ui, self.router.pages(), &mut self.selected);
            });

        // ---- Central panel: selected page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            self.router.dispatch(&self.selected, ui);
        });
    }
}
