//! Control Panel Widget
//! Left side panel with data source, export controls and status.

use egui::{Color32, RichText};
use std::path::PathBuf;

/// Left side control panel with source selection and export controls.
pub struct ControlPanel {
    pub source_description: String,
    pub export_dir: PathBuf,
    pub row_count: usize,
    pub progress: f32,
    pub status: String,
    pub busy: bool,
}

impl ControlPanel {
    pub fn new(source_description: String, export_dir: PathBuf) -> Self {
        Self {
            source_description,
            export_dir,
            row_count: 0,
            progress: 0.0,
            status: "Ready".to_string(),
            busy: false,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Product Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("🗄 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.source_description).size(12.0));
                ui.label(
                    RichText::new(format!("{} rows loaded", self.row_count))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });

        ui.add_space(8.0);

        ui.add_enabled_ui(!self.busy, |ui| {
            ui.horizontal(|ui| {
                if ui.button("🔄 Refresh").clicked() {
                    action = ControlPanelAction::Refresh;
                }
                if ui.button("📂 Open CSV").clicked() {
                    action = ControlPanelAction::OpenCsv;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Section =====
        ui.label(RichText::new("📁 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(self.export_dir.display().to_string())
                    .size(12.0)
                    .color(Color32::GRAY),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Change").clicked() {
                    action = ControlPanelAction::ChooseExportDir;
                }
            });
        });

        ui.add_space(8.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!self.busy && self.row_count > 0, |ui| {
                let button = egui::Button::new(RichText::new("📄 Export Report").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportReport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.busy),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Refresh,
    OpenCsv,
    ChooseExportDir,
    ExportReport,
}
