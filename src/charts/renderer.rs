//! Static Chart Renderer
//! Draws the dashboard charts to PNG files with plotters.
//!
//! Layout of every image:
//! 1. Caption centered at the top
//! 2. Bar charts: categories on x, value labels above each bar
//! 3. Pie charts: slices start at 12 o'clock, category labels outside, percentages inside
//! 4. "No data" placeholder when there is nothing to draw

use crate::charts::ChartPlotter;
use crate::data::{Bucket, ProductRecord};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing error: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

const BAR_COLOR: RGBColor = RGBColor(52, 152, 219);
const MUTED: RGBColor = RGBColor(150, 150, 150);

const PALETTE: [RGBColor; 10] = [
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(255, 87, 34),
    RGBColor(121, 85, 72),
    RGBColor(96, 125, 139),
];

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Top discounted products as a bar chart.
    pub fn render_top_discounts(
        path: &Path,
        products: &[ProductRecord],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let labels: Vec<String> = products
            .iter()
            .map(|p| ChartPlotter::short_label(&p.name))
            .collect();
        let values: Vec<f64> = products.iter().map(|p| p.discount).collect();

        Self::render_bars(
            path,
            "Top 10 Products with Highest Discounts",
            &labels,
            &values,
            ("Product Name", "Discount (%)"),
            true,
            (width, height),
        )
    }

    /// Bucket counts as a bar chart.
    pub fn render_bucket_bars(
        path: &Path,
        title: &str,
        buckets: &[Bucket],
        axis_desc: (&str, &str),
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let labels: Vec<String> = buckets.iter().map(|b| b.label.clone()).collect();
        let values: Vec<f64> = buckets.iter().map(|b| b.count as f64).collect();
        let has_data = values.iter().any(|&v| v > 0.0);

        let values: &[f64] = if has_data { &values } else { &[] };
        Self::render_bars(path, title, &labels, values, axis_desc, false, (width, height))
    }

    fn render_bars(
        path: &Path,
        title: &str,
        labels: &[String],
        values: &[f64],
        (x_desc, y_desc): (&str, &str),
        rotate_labels: bool,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        if values.is_empty() {
            Self::draw_no_data(&root, title)?;
            return root.present().map_err(draw_err);
        }

        let n = values.len();
        let x_label_area = if rotate_labels { 130 } else { 50 };
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(x_label_area)
            .y_label_area_size(60)
            .build_cartesian_2d((0..n).into_segmented(), Self::y_range(values))
            .map_err(draw_err)?;

        let label_font = ("sans-serif", 13).into_font();
        let label_font = if rotate_labels {
            label_font.transform(FontTransform::Rotate90)
        } else {
            label_font
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_style(label_font)
            .x_label_formatter(&|v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, &v)| {
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
                    BAR_COLOR.filled(),
                );
                bar.set_margin(0, 0, 10, 10);
                bar
            }))
            .map_err(draw_err)?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, &v)| {
                Text::new(
                    Self::format_value(v),
                    (SegmentValue::CenterOf(i), v),
                    ("sans-serif", 14).into_font(),
                )
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)
    }

    /// Bucket counts as a pie chart. Empty buckets get no slice.
    pub fn render_pie(
        path: &Path,
        title: &str,
        buckets: &[Bucket],
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (sizes, colors, labels) = Self::pie_slices(buckets);
        if sizes.is_empty() {
            Self::draw_no_data(&root, title)?;
            return root.present().map_err(draw_err);
        }

        let area = root.titled(title, ("sans-serif", 26)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = w.min(h) as f64 * 0.32;

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(("sans-serif", 16).into_font().color(&BLACK));
        pie.percentages(("sans-serif", 14).into_font().color(&WHITE));
        area.draw(&pie).map_err(draw_err)?;

        root.present().map_err(draw_err)
    }

    /// Sizes, colors and labels of the non-empty buckets.
    /// Colors follow the bucket position so they match the on-screen legend.
    fn pie_slices(buckets: &[Bucket]) -> (Vec<f64>, Vec<RGBColor>, Vec<String>) {
        let mut sizes = Vec::new();
        let mut colors = Vec::new();
        let mut labels = Vec::new();
        for (i, bucket) in buckets.iter().enumerate() {
            if bucket.count == 0 {
                continue;
            }
            sizes.push(bucket.count as f64);
            colors.push(PALETTE[i % PALETTE.len()]);
            labels.push(bucket.label.clone());
        }
        (sizes, colors, labels)
    }

    fn draw_no_data(area: &DrawingArea<BitMapBackend<'_>, Shift>, title: &str) -> Result<(), RenderError> {
        let area = area.titled(title, ("sans-serif", 26)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        area.draw(&Text::new(
            "No data",
            (w as i32 / 2 - 40, h as i32 / 2),
            ("sans-serif", 24).into_font().color(&MUTED),
        ))
        .map_err(draw_err)
    }

    /// Top of the y axis: headroom above the tallest bar for its label.
    /// Value axis always spans 0, with headroom past the extremes so negative bars stay inside.
    fn y_range(values: &[f64]) -> std::ops::Range<f64> {
        let max = values.iter().copied().fold(0.0, f64::max);
        let min = values.iter().copied().fold(0.0, f64::min);
        let lower = min * 1.15;
        let upper = if max <= 0.0 && min >= 0.0 { 1.0 } else { max * 1.15 };
        lower..upper
    }

    fn format_value(v: f64) -> String {
        if v.fract() == 0.0 {
            format!("{}", v as i64)
        } else {
            format!("{:.1}", v)
        }
    }
}
