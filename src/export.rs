//! Report Export Module
//! Writes chart images, the cleaned dataset and the summaries to a directory.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::data::{Bucket, DashboardData, DataProcessor, ProductRecord};
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("CSV error: {0}")]
    Csv(#[from] PolarsError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub const CHART_WIDTH: u32 = 1200;
pub const CHART_HEIGHT: u32 = 800;

pub const CLEAN_CSV: &str = "products_clean.csv";
pub const SUMMARY_JSON: &str = "summary.json";

/// Summaries written next to the charts.
#[derive(Serialize)]
struct SummaryReport<'a> {
    row_count: usize,
    max_price: Option<f64>,
    top_discounts: &'a [ProductRecord],
    rating_buckets: &'a [Bucket],
    discount_buckets: &'a [Bucket],
    price_buckets: &'a [Bucket],
}

pub struct ReportExporter;

impl ReportExporter {
    /// Export everything into `dir`, creating it if needed. Returns the written files.
    pub fn export_all(data: &DashboardData, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(dir)?;

        let mut written = Self::render_charts(data, dir)?;

        let csv_path = dir.join(CLEAN_CSV);
        Self::write_csv(&data.records, &csv_path)?;
        written.push(csv_path);

        let json_path = dir.join(SUMMARY_JSON);
        Self::write_summary(data, &json_path)?;
        written.push(json_path);

        tracing::info!(dir = %dir.display(), files = written.len(), "Report exported");
        Ok(written)
    }

    /// Draw the four charts as PNG files.
    pub fn render_charts(data: &DashboardData, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let top = dir.join("top_discounts.png");
        StaticChartRenderer::render_top_discounts(&top, &data.top_discounts, CHART_WIDTH, CHART_HEIGHT)?;

        let ratings = dir.join("ratings.png");
        StaticChartRenderer::render_pie(
            &ratings,
            "Distribution of Products by Ratings",
            &data.rating_buckets,
            CHART_WIDTH,
            CHART_HEIGHT,
        )?;

        let discounts = dir.join("discounts.png");
        StaticChartRenderer::render_pie(
            &discounts,
            "Distribution of Products by Discount Levels",
            &data.discount_buckets,
            CHART_WIDTH,
            CHART_HEIGHT,
        )?;

        let prices = dir.join("prices.png");
        StaticChartRenderer::render_bucket_bars(
            &prices,
            "Price Distribution by Range",
            &data.price_buckets,
            ("Price Range", "Number of Products"),
            CHART_WIDTH,
            CHART_HEIGHT,
        )?;

        Ok(vec![top, ratings, discounts, prices])
    }

    /// Write the cleaned records as CSV.
    pub fn write_csv(records: &[ProductRecord], path: &Path) -> Result<(), ExportError> {
        let mut df = DataProcessor::to_dataframe(records)?;
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).finish(&mut df)?;
        Ok(())
    }

    /// Write the derived summaries as pretty JSON.
    pub fn write_summary(data: &DashboardData, path: &Path) -> Result<(), ExportError> {
        let report = SummaryReport {
            row_count: data.records.len(),
            max_price: DataProcessor::max_price(&data.records),
            top_discounts: &data.top_discounts,
            rating_buckets: &data.rating_buckets,
            discount_buckets: &data.discount_buckets,
            price_buckets: &data.price_buckets,
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &report)?;
        Ok(())
    }
}
