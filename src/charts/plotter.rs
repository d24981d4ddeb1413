//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot and the egui painter.

use crate::data::{Bucket, ProductRecord};
use egui::{Align2, Color32, FontId, RichText, Sense, Shape, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Plot};
use std::f32::consts::{FRAC_PI_2, TAU};

pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const CHART_HEIGHT: f32 = 300.0;
const PIE_SIZE: f32 = 260.0;
const MAX_LABEL_CHARS: usize = 16;
// Largest angle drawn as one triangle, so every piece stays convex
const PIE_STEP: f32 = 0.1;

/// Draws the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the i-th category.
    pub fn get_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Shorten long product names for axis labels.
    pub fn short_label(name: &str) -> String {
        if name.chars().count() <= MAX_LABEL_CHARS {
            name.to_string()
        } else {
            let head: String = name.chars().take(MAX_LABEL_CHARS - 1).collect();
            format!("{}…", head)
        }
    }

    /// Bar chart: product name on x, discount percentage on y.
    pub fn draw_top_discounts(ui: &mut egui::Ui, products: &[ProductRecord]) {
        let labels: Vec<String> = products.iter().map(|p| Self::short_label(&p.name)).collect();
        let bars: Vec<Bar> = products
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Bar::new(i as f64, p.discount)
                    .width(0.6)
                    .name(format!("{} ({}%)", p.name, p.discount))
            })
            .collect();

        Self::show_bars(ui, "top_discounts", bars, labels, "Product Name", "Discount (%)");
    }

    /// Bar chart of bucket counts.
    pub fn draw_bucket_bars(
        ui: &mut egui::Ui,
        id: &str,
        buckets: &[Bucket],
        x_label: &str,
        y_label: &str,
    ) {
        let labels: Vec<String> = buckets.iter().map(|b| b.label.clone()).collect();
        let bars: Vec<Bar> = buckets
            .iter()
            .enumerate()
            .map(|(i, b)| {
                Bar::new(i as f64, b.count as f64)
                    .width(0.6)
                    .name(format!("{}: {}", b.label, b.count))
            })
            .collect();

        Self::show_bars(ui, id, bars, labels, x_label, y_label);
    }

    fn show_bars(
        ui: &mut egui::Ui,
        id: &str,
        bars: Vec<Bar>,
        x_labels: Vec<String>,
        x_label: &str,
        y_label: &str,
    ) {
        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if v < 0.0 || (v - v.round()).abs() > 1e-6 {
                    return String::new();
                }
                x_labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
            });
    }

    /// Pie chart of bucket counts with a legend alongside.
    pub fn draw_pie(ui: &mut egui::Ui, buckets: &[Bucket]) {
        let total: usize = buckets.iter().map(|b| b.count).sum();

        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(PIE_SIZE), Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = PIE_SIZE / 2.0 - 4.0;

            if total == 0 {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    "No data",
                    FontId::proportional(16.0),
                    ui.visuals().weak_text_color(),
                );
            } else {
                let mut angle = -FRAC_PI_2;
                for (i, bucket) in buckets.iter().enumerate() {
                    if bucket.count == 0 {
                        continue;
                    }
                    let sweep = TAU * bucket.count as f32 / total as f32;
                    let steps = ((sweep / PIE_STEP).ceil() as usize).max(1);
                    for s in 0..steps {
                        let a0 = angle + sweep * s as f32 / steps as f32;
                        let a1 = angle + sweep * (s + 1) as f32 / steps as f32;
                        painter.add(Shape::convex_polygon(
                            vec![
                                center,
                                center + radius * Vec2::angled(a0),
                                center + radius * Vec2::angled(a1),
                            ],
                            Self::get_color(i),
                            Stroke::NONE,
                        ));
                    }
                    angle += sweep;
                }
            }

            ui.add_space(12.0);

            ui.vertical(|ui| {
                for (i, bucket) in buckets.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (square, _) =
                            ui.allocate_exact_size(Vec2::splat(14.0), Sense::hover());
                        ui.painter().rect_filled(square, 3.0, Self::get_color(i));
                        ui.label(RichText::new(Self::legend_text(bucket, total)).size(13.0));
                    });
                }
            });
        });
    }

    fn legend_text(bucket: &Bucket, total: usize) -> String {
        if total == 0 {
            format!("{}: 0", bucket.label)
        } else {
            let pct = bucket.count as f64 * 100.0 / total as f64;
            format!("{}: {} ({:.1}%)", bucket.label, bucket.count, pct)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_shortened() {
        assert_eq!(ChartPlotter::short_label("Kettle"), "Kettle");
        let label = ChartPlotter::short_label("Samsung Galaxy A15 6.5\" 128GB Black");
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS);
        assert!(label.ends_with('…'));
    }

    #[test]
    fn legend_shows_share_of_total() {
        let bucket = Bucket {
            label: "3-4".to_string(),
            lower: 3.0,
            upper: 4.0,
            count: 1,
        };
        assert_eq!(ChartPlotter::legend_text(&bucket, 4), "3-4: 1 (25.0%)");

        let empty = Bucket { count: 0, ..bucket };
        assert_eq!(ChartPlotter::legend_text(&empty, 0), "3-4: 0");
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(ChartPlotter::get_color(0), ChartPlotter::get_color(PALETTE.len()));
    }
}
