use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ExportDashApp {
    pub state: AppState,
}

impl ExportDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ExportDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current tab ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Overview => plot::overview_tab(ui, &self.state),
            Tab::Ranking => tables::ranking_tab(ui, &mut self.state),
            Tab::Statistics => plot::statistics_tab(ui, &self.state),
        });
    }
}
