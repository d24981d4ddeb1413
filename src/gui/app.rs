//! Product Dashboard Main Application
//! Main window with control panel and dashboard page.

use crate::data::{CsvSource, DataLoader, LoadOutcome};
use crate::export::ReportExporter;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

/// Main application window.
pub struct DashboardApp {
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    export_dir: PathBuf,

    // Background load
    load_rx: Option<Receiver<LoadOutcome>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, loader: DataLoader, export_dir: PathBuf) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(loader.describe_source(), export_dir.clone()),
            loader,
            chart_viewer: ChartViewer::new(),
            export_dir,
            load_rx: None,
            is_loading: false,
        };
        app.start_load();
        app
    }

    /// Run a load pass on a worker thread.
    fn start_load(&mut self) {
        if self.is_loading {
            return;
        }

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.busy = true;
        self.control_panel.set_progress(10.0, "Loading data...");

        let loader = self.loader.clone();
        thread::spawn(move || {
            let _ = tx.send(loader.load());
        });
    }

    /// Check for a finished load
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(outcome) => {
                let rows = outcome.data.records.len();
                match &outcome.error {
                    Some(error) => self
                        .control_panel
                        .set_progress(0.0, &format!("Error: {}", error)),
                    None => self
                        .control_panel
                        .set_progress(100.0, &format!("Complete! Loaded {} rows", rows)),
                }
                self.control_panel.row_count = rows;
                self.chart_viewer.set_outcome(outcome);
                self.finish_load();
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                tracing::error!("Load worker exited without a result");
                self.control_panel
                    .set_progress(0.0, "Error: load worker stopped unexpectedly");
                self.finish_load();
            }
        }
    }

    fn finish_load(&mut self) {
        self.is_loading = false;
        self.control_panel.busy = false;
    }

    /// Switch to a CSV file picked by the user and reload.
    fn handle_open_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            tracing::info!(path = %path.display(), "Switching to CSV source");
            self.loader = DataLoader::new(Arc::new(CsvSource::new(path)));
            self.control_panel.source_description = self.loader.describe_source();
            self.start_load();
        }
    }

    fn handle_choose_export_dir(&mut self) {
        if let Some(dir) = rfd::FileDialog::new()
            .set_directory(&self.export_dir)
            .pick_folder()
        {
            self.export_dir = dir.clone();
            self.control_panel.export_dir = dir;
        }
    }

    /// Write charts, CSV and summary, then open the folder.
    fn handle_export_report(&mut self) {
        if self.chart_viewer.data.is_empty() {
            self.control_panel.set_progress(0.0, "No data to export");
            return;
        }

        self.control_panel.set_progress(30.0, "Exporting report...");

        match ReportExporter::export_all(&self.chart_viewer.data, &self.export_dir) {
            Ok(files) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!("Complete! Exported {} files", files.len()),
                );
                if let Err(e) = open::that(&self.export_dir) {
                    tracing::warn!(error = %e, "Could not open export folder");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Keep polling while the worker runs
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Refresh => self.start_load(),
                        ControlPanelAction::OpenCsv => self.handle_open_csv(),
                        ControlPanelAction::ChooseExportDir => self.handle_choose_export_dir(),
                        ControlPanelAction::ExportReport => self.handle_export_report(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard page
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
