use std::collections::BTreeSet;
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use rusty_dashboards::dashboard::cars::{self, CarFilters, CarOptions, CarSales};
use rusty_dashboards::dashboard::supermarket::{
    self, SupermarketFilters, SupermarketOptions, SupermarketSales,
};
use rusty_dashboards::dashboard::{Dashboard, ViewModel};
use rusty_dashboards::data::{loader, Selection, Value};
use rusty_dashboards::format;

use crate::color::ColorMap;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Per-dashboard filter widgets
// ---------------------------------------------------------------------------

/// The widgets that edit a dashboard's filter state.
pub trait FilterPanel: Dashboard + 'static {
    fn filter_widgets(
        ui: &mut Ui,
        options: &Self::Options,
        filters: &mut Self::Filters,
        colors: &ColorMap,
    );

    fn color_map(options: &Self::Options) -> ColorMap;
}

impl FilterPanel for CarSales {
    fn filter_widgets(ui: &mut Ui, options: &CarOptions, filters: &mut CarFilters, colors: &ColorMap) {
        multi_select(ui, "Pilih Merek", &options.brands, &mut filters.brands, Some(colors));
        multi_select(ui, "Pilih Tahun", &options.years, &mut filters.years, None);
        ui.separator();
        range_sliders(
            ui,
            "Pilih Range Harga",
            options.price,
            &mut filters.price,
            cars::PRICE_STEP,
            format::rupiah,
        );
    }

    fn color_map(options: &CarOptions) -> ColorMap {
        ColorMap::new(&options.brands)
    }
}

impl FilterPanel for SupermarketSales {
    fn filter_widgets(
        ui: &mut Ui,
        options: &SupermarketOptions,
        filters: &mut SupermarketFilters,
        colors: &ColorMap,
    ) {
        ui.strong("Pilih Kota");
        let current = filters
            .city
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        egui::ComboBox::from_id_salt("city")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for city in &options.cities {
                    ui.selectable_value(&mut filters.city, Some(city.clone()), city.to_string());
                }
            });
        ui.separator();

        multi_select(
            ui,
            "Pilih Product Line",
            &options.product_lines,
            &mut filters.product_lines,
            Some(colors),
        );
        ui.separator();

        range_sliders(
            ui,
            "Rentang Total Penjualan",
            options.total,
            &mut filters.total,
            0.0,
            format::dollars,
        );
        ui.separator();

        ui.strong("Pilih Gender");
        ui.radio_value(&mut filters.gender, Selection::All, supermarket::ALL_GENDERS);
        for gender in &options.genders {
            let text = RichText::new(gender.to_string()).color(colors.color_for(gender));
            ui.radio_value(&mut filters.gender, Selection::Only(gender.clone()), text);
        }
        ui.separator();

        multi_select(
            ui,
            "Pilih Metode Pembayaran",
            &options.payments,
            &mut filters.payments,
            None,
        );
        ui.separator();

        ui.strong("Cari Invoice ID");
        ui.text_edit_singleline(&mut filters.invoice_search);
    }

    fn color_map(options: &SupermarketOptions) -> ColorMap {
        ColorMap::new(options.product_lines.iter().chain(&options.genders))
            .with("Female", Color32::from_rgb(0xFF, 0x69, 0xB4))
            .with("Male", Color32::from_rgb(0x1E, 0x90, 0xFF))
    }
}

// -- Widget helpers --

/// Checkbox list with All / None buttons, collapsible.
fn multi_select(
    ui: &mut Ui,
    title: &str,
    options: &[Value],
    selected: &mut BTreeSet<Value>,
    colors: Option<&ColorMap>,
) {
    // Show count of selected / total in the header
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    selected.extend(options.iter().cloned());
                }
                if ui.small_button("None").clicked() {
                    selected.clear();
                }
            });

            for val in options {
                let mut text = RichText::new(val.to_string());
                if let Some(cm) = colors {
                    text = text.color(cm.color_for(val));
                }

                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, text).changed() {
                    if checked {
                        selected.insert(val.clone());
                    } else {
                        selected.remove(val);
                    }
                }
            }
        });
}

/// Inclusive range edited with a pair of sliders. `step` of 0 means continuous.
fn range_sliders(
    ui: &mut Ui,
    title: &str,
    bounds: (f64, f64),
    range: &mut (f64, f64),
    step: f64,
    fmt: fn(f64) -> String,
) {
    ui.strong(title);
    let (min, max) = bounds;
    ui.add(
        Slider::new(&mut range.0, min..=max)
            .step_by(step)
            .custom_formatter(move |v, _| fmt(v))
            .text("min"),
    );
    ui.add(
        Slider::new(&mut range.1, min..=max)
            .step_by(step)
            .custom_formatter(move |v, _| fmt(v))
            .text("max"),
    );
    if range.0 > range.1 {
        std::mem::swap(&mut range.0, &mut range.1);
    }
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel and refresh the view when a filter changed.
pub fn side_panel<D: FilterPanel>(ui: &mut Ui, state: &mut AppState<D>) {
    ui.heading("Filter Data");
    ui.separator();

    let before = state.filters.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            D::filter_widgets(ui, &state.options, &mut state.filters, &state.colors);
        });

    if state.filters != before {
        state.refresh();
    }
}

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

pub fn metrics(ui: &mut Ui, view: &ViewModel) {
    if view.metrics.is_empty() {
        return;
    }
    ui.columns(view.metrics.len(), |columns: &mut [Ui]| {
        for (ui, metric) in columns.iter_mut().zip(&view.metrics) {
            ui.label(RichText::new(&metric.label).weak());
            ui.label(RichText::new(&metric.value).size(26.0).strong());
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar<D: FilterPanel>(ui: &mut Ui, state: &mut AppState<D>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        if D::FILE_BACKED {
            ui.menu_button("File", |ui: &mut Ui| {
                if ui.button("Open…").clicked() {
                    open_file_dialog(state);
                    ui.close_menu();
                }
            });
            ui.separator();
        }

        ui.label(format!(
            "{} rows loaded, {} visible",
            state.table.len(),
            state.view.rows.len()
        ));

        ui.separator();

        if ui.button("Reset filters").clicked() {
            state.reset_filters();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog<D: FilterPanel>(state: &mut AppState<D>) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match loader::load_file::<D::Record>(&path) {
            Ok(table) => {
                log::info!("Switched dataset to {}", path.display());
                state.set_table(Arc::new(table));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
