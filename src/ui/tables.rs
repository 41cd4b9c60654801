use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::dashboard::RankedProduct;
use crate::data::stats::ColumnSummary;
use crate::format::format_grouped;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Ranking tab
// ---------------------------------------------------------------------------

pub fn ranking_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Most exported SH4 products");
    ui.add_space(4.0);

    let max = state.ranking_len();
    let mut shown = state.shown_top_n();
    let slider = egui::Slider::new(&mut shown, 0..=max).text("Products to show");
    if ui.add(slider).changed() {
        state.top_n = shown;
    }
    ui.add_space(8.0);

    let top_n = state.shown_top_n();
    super::plot::section(ui, "Ranking", &state.dashboard.ranking, |ui, rows| {
        ranking_table(ui, &rows[..top_n.min(rows.len())])
    });
}

fn ranking_table(ui: &mut Ui, rows: &[RankedProduct]) {
    if rows.is_empty() {
        ui.label(RichText::new("Move the slider to list products.").weak());
        return;
    }
    ui.push_id("ranking_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::exact(40.0))
            .column(Column::remainder().at_least(200.0))
            .column(Column::auto().at_least(140.0))
            .header(ROW_HEIGHT, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("SH4 Description");
                });
                header.col(|ui| {
                    ui.strong("US$ FOB");
                });
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let item = &rows[row.index()];
                    let rank = row.index() + 1;
                    row.col(|ui| {
                        ui.label(rank.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&item.description);
                    });
                    row.col(|ui| {
                        ui.label(&item.fob_label)
                            .on_hover_text(format!("US$ {}", format_grouped(item.fob)));
                    });
                });
            });
    });
}

// ---------------------------------------------------------------------------
// Descriptive summary
// ---------------------------------------------------------------------------

/// One row per numeric column: count, mean, std, min, quartiles, max.
pub fn summary_table(ui: &mut Ui, rows: &[ColumnSummary]) {
    const HEADERS: [&str; 9] = ["Column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    ui.push_id("summary_table", |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::auto().at_least(120.0));
            for _ in 1..HEADERS.len() {
                builder = builder.column(Column::auto().at_least(90.0));
            }
            builder
                .header(ROW_HEIGHT, |mut header| {
                    for title in HEADERS {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for s in rows {
                        body.row(ROW_HEIGHT, |mut row| {
                            row.col(|ui| {
                                ui.label(&s.column);
                            });
                            row.col(|ui| {
                                ui.label(s.count.to_string());
                            });
                            for v in [s.mean, s.std, s.min, s.q1, s.median, s.q3, s.max] {
                                row.col(|ui| {
                                    ui.monospace(format_grouped(v));
                                });
                            }
                        });
                    }
                });
        });
    });
}
