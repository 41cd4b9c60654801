use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Export Dashboard");
    ui.separator();

    if state.dataset.is_empty() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let cities = state.options.cities.clone();
    let states = state.options.states.clone();
    let years = state.options.years.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(
                RichText::new("An empty selection means no filter. A city and a state that do not match leave nothing to show.")
                    .small()
                    .weak(),
            );
            ui.add_space(4.0);

            // ---- City (composite "City - UF") ----
            let header = format!("City  ({}/{})", state.filters.cities.len(), cities.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("city_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.clear_cities();
                    }
                    for city in &cities {
                        let mut checked = state.filters.cities.contains(city);
                        if ui.checkbox(&mut checked, city.as_str()).changed() {
                            state.toggle_city(city);
                        }
                    }
                });

            // ---- State ----
            let header = format!("State  ({}/{})", state.filters.states.len(), states.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("state_filter")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.clear_states();
                    }
                    for uf in &states {
                        let mut checked = state.filters.states.contains(uf);
                        if ui.checkbox(&mut checked, uf.as_str()).changed() {
                            state.toggle_state(uf);
                        }
                    }
                });

            // ---- Year ----
            let header = format!("Year  ({}/{})", state.filters.years.len(), years.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("year_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_years();
                        }
                        if ui.small_button("Clear").clicked() {
                            state.clear_years();
                        }
                    });
                    for year in &years {
                        let mut checked = state.filters.years.contains(year);
                        if ui.checkbox(&mut checked, year.to_string()).changed() {
                            state.toggle_year(*year);
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                if let Some(path) = state.source.clone() {
                    state.open(&path);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.tab, Tab::Overview, "Overview");
        ui.selectable_value(&mut state.tab, Tab::Ranking, "SH4 Ranking");
        ui.selectable_value(&mut state.tab, Tab::Statistics, "Statistics");

        ui.separator();

        if !state.dataset.is_empty() {
            ui.label(format!(
                "{} rows loaded, {} selected",
                state.dataset.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open export data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
