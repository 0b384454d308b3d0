mod app;
mod color;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use eframe::egui;

use rusty_dashboards::config::{Command, Config, DashboardKind, USAGE};
use rusty_dashboards::dashboard::cars::{self, CarSales};
use rusty_dashboards::dashboard::supermarket::{SupermarketSale, SupermarketSales};
use rusty_dashboards::data::{loader, Table};

use app::DashboardApp;
use ui::panels::FilterPanel;

fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::from_env()? {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Run(config) => config,
    };

    match config.dashboard {
        DashboardKind::Cars => run::<CarSales>(Arc::new(cars::load())),
        DashboardKind::Supermarket => {
            let table = loader::load_file::<SupermarketSale>(&config.data_path)
                .with_context(|| format!("loading {}", config.data_path.display()))
                .inspect_err(|e| log::error!("{e:#}"))?;
            run::<SupermarketSales>(Arc::new(table))
        }
    }
}

fn run<D: FilterPanel>(table: Arc<Table<D::Record>>) -> Result<()> {
    log::info!("Starting {} with {} rows", D::TITLE, table.len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        D::TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::<D>::new(table)))),
    )
    .map_err(|e| anyhow!("eframe failed: {e}"))
}
