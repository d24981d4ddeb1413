//! Chart Viewer Widget
//! Central scrollable page: intro, the four charts, raw data and closing report.

use crate::charts::ChartPlotter;
use crate::data::{DashboardData, LoadOutcome, ProductRecord};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;
const RAW_ROW_HEIGHT: f32 = 18.0;
const RAW_TABLE_HEIGHT: f32 = 320.0;

const REPORT: [(&str, &str); 4] = [
    (
        "Top Discounts",
        "Displays the top 10 products with the highest current discounts, useful for identifying the best deals.",
    ),
    (
        "Product Distribution by Ratings",
        "Shows the distribution of products across different rating levels.",
    ),
    (
        "Discount Distribution",
        "Visualizes how discounts are distributed across products, highlighting the most common discount levels.",
    ),
    (
        "Price Distribution",
        "Groups products by price ranges to help understand the general price levels on the platform.",
    ),
];

/// The dashboard page for the most recent load.
#[derive(Default)]
pub struct ChartViewer {
    pub data: DashboardData,
    pub error: Option<String>,
    pub show_raw: bool,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the page content with a new load.
    pub fn set_outcome(&mut self, outcome: LoadOutcome) {
        self.data = outcome.data;
        self.error = outcome.error;
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("Jumia Product Dashboard").size(28.0).strong());
                ui.label(
                    "Analyze pricing trends and discover the best times to buy specific products on Jumia.",
                );

                if let Some(error) = &self.error {
                    ui.add_space(8.0);
                    egui::Frame::none()
                        .fill(Color32::from_rgb(248, 215, 218))
                        .rounding(5.0)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(error)
                                    .color(Color32::from_rgb(114, 28, 36))
                                    .size(13.0),
                            );
                        });
                }

                ui.add_space(SECTION_SPACING);
                ui.label(RichText::new("Top 10 Products with Highest Discounts").size(20.0).strong());
                ChartPlotter::draw_top_discounts(ui, &self.data.top_discounts);

                ui.add_space(SECTION_SPACING);
                ui.label(RichText::new("Product Distribution by Ratings").size(20.0).strong());
                ChartPlotter::draw_pie(ui, &self.data.rating_buckets);

                ui.add_space(SECTION_SPACING);
                ui.label(RichText::new("Discount Distribution").size(20.0).strong());
                ChartPlotter::draw_pie(ui, &self.data.discount_buckets);

                ui.add_space(SECTION_SPACING);
                ui.label(RichText::new("Price Distribution").size(20.0).strong());
                ChartPlotter::draw_bucket_bars(
                    ui,
                    "price_buckets",
                    &self.data.price_buckets,
                    "Price Range",
                    "Number of Products",
                );

                ui.add_space(SECTION_SPACING);
                ui.label(RichText::new("Raw Data").size(20.0).strong());
                ui.checkbox(&mut self.show_raw, "Show Raw Data");
                if self.show_raw {
                    ui.label(
                        RichText::new("Cleaned Name, Ratings, Discount and Current Price columns")
                            .small()
                            .color(Color32::GRAY),
                    );
                    Self::draw_raw_table(ui, &self.data.records);
                }

                ui.add_space(SECTION_SPACING);
                ui.label(
                    RichText::new("Report: Pricing Trends & Best Times to Buy")
                        .size(18.0)
                        .strong(),
                );
                for (title, text) in REPORT {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(RichText::new(format!("• {}:", title)).strong());
                        ui.label(text);
                    });
                }
                ui.add_space(SECTION_SPACING);
            });
    }

    fn draw_raw_table(ui: &mut egui::Ui, records: &[ProductRecord]) {
        if records.is_empty() {
            ui.label(RichText::new("No data").color(Color32::GRAY));
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("raw_data")
                    .max_height(RAW_TABLE_HEIGHT)
                    .show_rows(ui, RAW_ROW_HEIGHT, records.len(), |ui, row_range| {
                        egui::Grid::new("raw_data_grid")
                            .striped(true)
                            .min_col_width(80.0)
                            .spacing([12.0, 2.0])
                            .show(ui, |ui| {
                                ui.label(RichText::new("Name").strong());
                                ui.label(RichText::new("Ratings").strong());
                                ui.label(RichText::new("Discount").strong());
                                ui.label(RichText::new("Current Price").strong());
                                ui.end_row();

                                for record in &records[row_range] {
                                    ui.label(&record.name);
                                    ui.label(format!("{}", record.ratings));
                                    ui.label(format!("{}", record.discount));
                                    ui.label(
                                        record
                                            .current_price
                                            .map(|p| format!("{}", p))
                                            .unwrap_or_else(|| "-".to_string()),
                                    );
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
