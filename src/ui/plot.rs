use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, LineStyle, Plot, PlotPoint, PlotPoints,
    Points, Polygon, Text, VLine,
};

use crate::color::{generate_palette, heat_color_in};
use crate::dashboard::Section;
use crate::data::model::{FOB, Table};
use crate::data::options::list_options;
use crate::data::stats::{BoxStats, Histogram, LogLogPoints};
use crate::format::{format_dynamic, format_grouped};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;
const NO_DATA: &str = "No data for the selected filters.";

/// Render a section's notice, or its content through `show`.
pub fn section<T>(ui: &mut Ui, title: &str, section: &Section<T>, show: impl FnOnce(&mut Ui, &T)) {
    ui.heading(title);
    match section {
        Section::Ready(value) => show(ui, value),
        Section::NoData => {
            ui.label(RichText::new(NO_DATA).color(Color32::YELLOW));
        }
        Section::Failed(msg) => {
            ui.label(RichText::new(format!("Could not draw this chart: {msg}")).color(Color32::YELLOW));
        }
    }
    ui.add_space(12.0);
}

// ---------------------------------------------------------------------------
// Overview tab
// ---------------------------------------------------------------------------

pub fn overview_tab(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view exports  (File → Open…)");
        });
        return;
    }

    let d = &state.dashboard;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.filtered.is_empty() {
                ui.label(
                    RichText::new("No rows match the current filters. Try adjusting the selection.")
                        .color(Color32::YELLOW),
                );
                ui.add_space(12.0);
            }
            section(ui, "US$ FOB per year", &d.by_year, |ui, t| {
                value_bar_chart(ui, "by_year", t, Color32::from_rgb(0x1f, 0x77, 0xb4), false)
            });
            section(ui, "US$ FOB per state", &d.by_state, |ui, t| {
                value_bar_chart(ui, "by_state", t, Color32::from_rgb(0x37, 0x4b, 0x4a), true)
            });
            section(ui, "US$ FOB per city", &d.by_city, |ui, t| {
                value_bar_chart(ui, "by_city", t, Color32::from_rgb(0x09, 0xbc, 0x8a), true)
            });
            section(ui, "US$ FOB per city and SH2 description", &d.city_sh2, heat_map);
            section(
                ui,
                "Net weight vs US$ FOB (log-log)",
                &d.weight_vs_value,
                log_log_scatter,
            );
        });
}

/// Bars of the last column against the first, each labelled with its
/// scaled value.
fn value_bar_chart(ui: &mut Ui, id: &str, table: &Table, color: Color32, distinct_colors: bool) {
    let palette = generate_palette(table.len());
    let bars: Vec<Bar> = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let value = row.last().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let fill = if distinct_colors { palette[i] } else { color };
            Bar::new(i as f64, value)
                .name(row[0].to_string())
                .width(0.7)
                .fill(fill)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .include_y(0.0)
        .y_axis_label("US$ FOB")
        .show(ui, |plot_ui| {
            for bar in &bars {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(bar.argument, bar.value),
                        RichText::new(format_dynamic(bar.value)).strong(),
                    )
                    .anchor(eframe::egui::Align2::CENTER_BOTTOM),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(bar.argument, 0.0), bar.name.clone())
                        .anchor(eframe::egui::Align2::CENTER_TOP),
                );
            }
            plot_ui.bar_chart(BarChart::new(bars).color(color));
        });
}

/// City × SH2 grid; cell colour follows the summed FOB.
fn heat_map(ui: &mut Ui, table: &Table) {
    let cities = list_options(table, &table.columns()[0]);
    let descriptions = list_options(table, &table.columns()[1]);
    let values = table.numeric_column(FOB);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Plot::new("city_sh2")
        .height(CHART_HEIGHT.max(24.0 * descriptions.len() as f32))
        .show_axes([false, false])
        .show_grid([false, false])
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for row in table.rows() {
                let Some(x) = cities.iter().position(|c| *c == row[0]) else {
                    continue;
                };
                let Some(y) = descriptions.iter().position(|d| *d == row[1]) else {
                    continue;
                };
                let value = row[2].as_f64().unwrap_or(0.0);
                let (x, y) = (x as f64, y as f64);
                let cell = PlotPoints::new(vec![
                    [x, y],
                    [x + 1.0, y],
                    [x + 1.0, y + 1.0],
                    [x, y + 1.0],
                ]);
                plot_ui.polygon(
                    Polygon::new(cell)
                        .fill_color(heat_color_in(value, min, max))
                        .name(format!("{} / {}: {}", row[0], row[1], format_dynamic(value))),
                );
            }
            for (x, city) in cities.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(x as f64 + 0.5, -0.1), city.to_string())
                        .anchor(eframe::egui::Align2::CENTER_TOP),
                );
            }
            for (y, desc) in descriptions.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(-0.1, y as f64 + 0.5), desc.to_string())
                        .anchor(eframe::egui::Align2::RIGHT_CENTER),
                );
            }
        });
}

fn log_log_scatter(ui: &mut Ui, pts: &LogLogPoints) {
    if pts.skipped > 0 {
        ui.label(
            RichText::new(format!(
                "{} product(s) with zero weight or value are not shown on the log scale.",
                pts.skipped
            ))
            .weak(),
        );
    }
    Plot::new("weight_vs_value")
        .height(CHART_HEIGHT)
        .x_axis_label("log10 Net Weight")
        .y_axis_label("log10 US$ FOB")
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::new(pts.points.clone()))
                    .radius(3.0)
                    .color(Color32::from_rgb(0xf2, 0x8e, 0x2b))
                    .name("City / State / SH4"),
            );
        });
}

// ---------------------------------------------------------------------------
// Statistics tab
// ---------------------------------------------------------------------------

pub fn statistics_tab(ui: &mut Ui, state: &AppState) {
    let d = &state.dashboard;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(
                RichText::new("Statistics follow the active filters. Clear them to see the whole dataset.")
                    .weak(),
            );
            section(ui, "Descriptive summary", &d.summary, |ui, rows| {
                super::tables::summary_table(ui, rows)
            });
            section(ui, "US$ FOB distribution", &d.histogram, histogram);
            section(
                ui,
                "Net Weight (IQR outliers removed)",
                &d.net_weight_box,
                net_weight_box,
            );
            if let Some(report) = &state.report {
                egui_collapsing_report(ui, &report.to_string());
            }
        });
}

fn histogram(ui: &mut Ui, h: &Histogram) {
    let bars: Vec<Bar> = h
        .bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{} – {}", format_dynamic(b.start), format_dynamic(b.end)))
        })
        .collect();

    Plot::new("fob_histogram")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("US$ FOB")
        .y_axis_label("Frequency")
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(Color32::from_rgb(0x00, 0x80, 0x80))
                    .name("Rows"),
            );
            plot_ui.vline(
                VLine::new(h.mean)
                    .color(Color32::from_rgb(0xb2, 0x22, 0x22))
                    .style(LineStyle::dashed_loose())
                    .width(2.0)
                    .name(format!("Mean: US$ {}", format_grouped(h.mean))),
            );
            plot_ui.vline(
                VLine::new(h.median)
                    .color(Color32::from_rgb(0xff, 0x8c, 0x00))
                    .style(LineStyle::dashed_loose())
                    .width(2.0)
                    .name(format!("Median: US$ {}", format_grouped(h.median))),
            );
        });
}

fn net_weight_box(ui: &mut Ui, b: &BoxStats) {
    let elem = BoxElem::new(
        0.0,
        BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
    )
    .name("Net Weight");

    Plot::new("net_weight_box")
        .height(CHART_HEIGHT)
        .show_x(false)
        .y_axis_label("Net Weight")
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).name("Net Weight"));
        });
}

fn egui_collapsing_report(ui: &mut Ui, report: &str) {
    eframe::egui::CollapsingHeader::new("Dataset report")
        .id_salt("dataset_report")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.monospace(report);
        });
}
