use std::sync::Arc;

use eframe::egui::{self, RichText, ScrollArea, Ui};

use rusty_dashboards::data::Table;

use crate::state::AppState;
use crate::ui::panels::{self, FilterPanel};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp<D: FilterPanel> {
    pub state: AppState<D>,
}

impl<D: FilterPanel> DashboardApp<D> {
    pub fn new(table: Arc<Table<D::Record>>) -> Self {
        Self {
            state: AppState::new(table),
        }
    }
}

impl<D: FilterPanel> eframe::App for DashboardApp<D> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui: &mut Ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui: &mut Ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, data ----
        egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading(D::TITLE);
                    if !D::SUBTITLE.is_empty() {
                        ui.label(RichText::new(D::SUBTITLE).weak());
                    }
                    ui.separator();

                    panels::metrics(ui, &self.state.view);
                    ui.separator();

                    for chart in &self.state.view.charts {
                        plot::chart(ui, chart, &self.state.colors);
                        ui.add_space(12.0);
                    }
                    ui.separator();

                    table::data_table(ui, &self.state.table, &self.state.view.rows);
                });
        });
    }
}
