//! Product Dashboard - Catalog Analytics Viewer
//!
//! Loads a product table from MySQL/MariaDB (or a CSV export of it), cleans it,
//! and shows discount, rating and price charts.

mod charts;
mod config;
mod data;
mod export;
mod gui;

use clap::Parser;
use config::AppConfig;
use data::{CsvSource, DataLoader, MySqlSource, ProductSource};
use eframe::egui;
use gui::DashboardApp;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "product-dashboard", version, about = "Product catalog analytics dashboard")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "DASHBOARD_CONFIG", default_value = "dashboard.toml")]
    config: PathBuf,

    /// Read products from this CSV file instead of the database
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Database password, overriding the configuration file
    #[arg(long, env = "DASHBOARD_DB_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(password) = cli.password {
        config.database.password = password;
    }

    let source: Arc<dyn ProductSource> = match cli.csv {
        Some(path) => Arc::new(CsvSource::new(path)),
        None => Arc::new(MySqlSource::new(config.database.clone())),
    };
    let loader = DataLoader::new(source);
    tracing::info!(source = %loader.describe_source(), "Starting dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Product Dashboard"),
        ..Default::default()
    };

    let export_dir = config.export.dir;
    eframe::run_native(
        "Product Dashboard",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, loader, export_dir)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}
