//! Data Processor Module
//! Cleans raw rows and derives the four chart summaries.

use crate::data::record::{
    ProductRecord, RawProductRow, DISCOUNT_COL, NAME_COL, PRICE_COL, RATINGS_COL,
};
use polars::prelude::*;
use serde::Serialize;

/// How many products the top-discount chart shows.
pub const TOP_DISCOUNT_COUNT: usize = 10;

const RATING_EDGES: [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
const RATING_LABELS: [&str; 5] = ["0-1", "1-2", "2-3", "3-4", "4-5"];

const DISCOUNT_EDGES: [f64; 7] = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 100.0];
const DISCOUNT_LABELS: [&str; 6] = ["0-10%", "10-20%", "20-30%", "30-40%", "40-50%", "50%+"];

/// Fixed price edges; the final edge is the highest observed price.
const PRICE_EDGES: [f64; 6] = [0.0, 1000.0, 5000.0, 10000.0, 20000.0, 50000.0];
const PRICE_LABELS: [&str; 6] = [
    "<1000",
    "1000-5000",
    "5000-10000",
    "10000-20000",
    "20000-50000",
    "50000+",
];

/// Count of values falling in `(lower, upper]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl Bucket {
    pub fn contains(&self, value: f64) -> bool {
        value > self.lower && value <= self.upper
    }
}

/// Everything the dashboard shows for one load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardData {
    pub records: Vec<ProductRecord>,
    pub top_discounts: Vec<ProductRecord>,
    pub rating_buckets: Vec<Bucket>,
    pub discount_buckets: Vec<Bucket>,
    pub price_buckets: Vec<Bucket>,
}

impl DashboardData {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Handles data cleaning and the derived summaries.
pub struct DataProcessor;

impl DataProcessor {
    /// Parse raw rows into cleaned records, keeping row order.
    pub fn clean(rows: &[RawProductRow]) -> Vec<ProductRecord> {
        rows.iter().map(ProductRecord::from_raw).collect()
    }

    /// Build every summary from cleaned records.
    pub fn summarize(records: Vec<ProductRecord>) -> DashboardData {
        DashboardData {
            top_discounts: Self::top_discounts(&records, TOP_DISCOUNT_COUNT),
            rating_buckets: Self::rating_buckets(&records),
            discount_buckets: Self::discount_buckets(&records),
            price_buckets: Self::price_buckets(&records),
            records,
        }
    }

    /// The `n` records with the largest discount.
    ///
    /// Equal discounts keep their original row order.
    pub fn top_discounts(records: &[ProductRecord], n: usize) -> Vec<ProductRecord> {
        let mut sorted: Vec<&ProductRecord> = records.iter().collect();
        sorted.sort_by(|a, b| b.discount.total_cmp(&a.discount));
        sorted.into_iter().take(n).cloned().collect()
    }

    pub fn rating_buckets(records: &[ProductRecord]) -> Vec<Bucket> {
        Self::bucketize(
            records.iter().map(|r| r.ratings),
            &RATING_EDGES,
            &RATING_LABELS,
        )
    }

    pub fn discount_buckets(records: &[ProductRecord]) -> Vec<Bucket> {
        Self::bucketize(
            records.iter().map(|r| r.discount),
            &DISCOUNT_EDGES,
            &DISCOUNT_LABELS,
        )
    }

    /// Price buckets; the last bucket ends at the highest price in `records`.
    ///
    /// With no priced records, or a maximum at or below the last fixed edge,
    /// the last bucket is empty.
    pub fn price_buckets(records: &[ProductRecord]) -> Vec<Bucket> {
        let last_fixed = PRICE_EDGES[PRICE_EDGES.len() - 1];
        let top = Self::max_price(records).unwrap_or(last_fixed);

        let mut edges = PRICE_EDGES.to_vec();
        edges.push(top);

        Self::bucketize(
            records.iter().filter_map(|r| r.current_price),
            &edges,
            &PRICE_LABELS,
        )
    }

    /// Highest price among records that have one.
    pub fn max_price(records: &[ProductRecord]) -> Option<f64> {
        records
            .iter()
            .filter_map(|r| r.current_price)
            .max_by(f64::total_cmp)
    }

    /// Count values into consecutive `(edges[i], edges[i + 1]]` intervals.
    ///
    /// Values outside every interval are dropped. All buckets are returned,
    /// in edge order, including empty ones.
    pub fn bucketize(
        values: impl Iterator<Item = f64>,
        edges: &[f64],
        labels: &[&str],
    ) -> Vec<Bucket> {
        let mut buckets: Vec<Bucket> = edges
            .windows(2)
            .zip(labels)
            .map(|(pair, label)| Bucket {
                label: label.to_string(),
                lower: pair[0],
                upper: pair[1],
                count: 0,
            })
            .collect();

        for value in values {
            if let Some(bucket) = buckets.iter_mut().find(|b| b.contains(value)) {
                bucket.count += 1;
            }
        }

        buckets
    }

    /// Cleaned records as a DataFrame, in the source table's column names.
    pub fn to_dataframe(records: &[ProductRecord]) -> PolarsResult<DataFrame> {
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        let ratings: Vec<f64> = records.iter().map(|r| r.ratings).collect();
        let discounts: Vec<f64> = records.iter().map(|r| r.discount).collect();
        let prices: Vec<Option<f64>> = records.iter().map(|r| r.current_price).collect();

        DataFrame::new(vec![
            Column::new(NAME_COL.into(), names),
            Column::new(RATINGS_COL.into(), ratings),
            Column::new(DISCOUNT_COL.into(), discounts),
            Column::new(PRICE_COL.into(), prices),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, ratings: f64, discount: f64, price: f64) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            ratings,
            discount,
            current_price: Some(price),
        }
    }

    fn counts(buckets: &[Bucket]) -> Vec<usize> {
        buckets.iter().map(|b| b.count).collect()
    }

    #[test]
    fn two_row_catalog_cleans_and_buckets() {
        let rows = vec![
            RawProductRow::new("Blender", "No ratings", "15", "1200"),
            RawProductRow::new("Iron", "3.5", "No discount", "800"),
        ];

        let records = DataProcessor::clean(&rows);
        assert_eq!(
            records,
            vec![
                record("Blender", 0.0, 15.0, 1200.0),
                record("Iron", 3.5, 0.0, 800.0),
            ]
        );

        let data = DataProcessor::summarize(records);
        assert_eq!(counts(&data.rating_buckets), vec![0, 0, 0, 1, 0]);
        assert_eq!(data.rating_buckets[3].label, "3-4");
        assert_eq!(counts(&data.discount_buckets), vec![0, 1, 0, 0, 0, 0]);
        assert_eq!(data.discount_buckets[1].label, "10-20%");
        assert_eq!(counts(&data.price_buckets), vec![1, 1, 0, 0, 0, 0]);
        assert_eq!(data.price_buckets[0].label, "<1000");
        assert_eq!(data.price_buckets[1].label, "1000-5000");
    }

    #[test]
    fn buckets_are_open_on_the_left_and_closed_on_the_right() {
        let buckets = DataProcessor::bucketize(
            [0.0, 1.0, 1.0001, 5.0, 5.5, -2.0].into_iter(),
            &RATING_EDGES,
            &RATING_LABELS,
        );
        assert_eq!(counts(&buckets), vec![1, 1, 0, 0, 1]);
    }

    #[test]
    fn rating_counts_cover_exactly_the_in_range_rows() {
        let ratings = [0.5, 1.0, 2.2, 3.9, 4.0, 5.0, 0.0, 6.0, 4.7];
        let records: Vec<ProductRecord> = ratings
            .iter()
            .map(|&r| record("p", r, 0.0, 10.0))
            .collect();

        let buckets = DataProcessor::rating_buckets(&records);
        let in_range = ratings.iter().filter(|&&r| r > 0.0 && r <= 5.0).count();
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), in_range);
        assert_eq!(buckets.len(), 5);
    }

    #[test]
    fn unrated_products_fall_in_no_rating_bucket() {
        let rows = vec![
            RawProductRow::new("Fan", "No ratings", "10", "900"),
            RawProductRow::new("Lamp", "0", "10", "900"),
            RawProductRow::new("Kettle", "0.5", "10", "900"),
        ];
        let buckets = DataProcessor::rating_buckets(&DataProcessor::clean(&rows));
        assert_eq!(counts(&buckets), vec![1, 0, 0, 0, 0]);
    }

    #[test]
    fn discount_buckets_include_zero_count_entries_in_order() {
        let records = vec![record("a", 1.0, 75.0, 1.0), record("b", 1.0, 100.0, 1.0)];
        let buckets = DataProcessor::discount_buckets(&records);

        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, DISCOUNT_LABELS.to_vec());
        assert_eq!(counts(&buckets), vec![0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn price_top_edge_follows_highest_price() {
        let records = vec![
            record("a", 1.0, 1.0, 500.0),
            record("b", 1.0, 1.0, 87_500.0),
            record("c", 1.0, 1.0, 60_000.0),
        ];
        let buckets = DataProcessor::price_buckets(&records);

        assert_eq!(buckets.last().unwrap().upper, 87_500.0);
        assert_eq!(buckets.last().unwrap().count, 2);
        assert_eq!(counts(&buckets), vec![1, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn price_top_bucket_is_empty_when_nothing_exceeds_fixed_edges() {
        let records = vec![record("a", 1.0, 1.0, 12_000.0)];
        let buckets = DataProcessor::price_buckets(&records);

        assert_eq!(buckets.last().unwrap().upper, 12_000.0);
        assert_eq!(counts(&buckets), vec![0, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn unpriced_records_are_left_out_of_price_buckets() {
        let mut unpriced = record("x", 1.0, 1.0, 0.0);
        unpriced.current_price = None;
        let records = vec![unpriced, record("a", 1.0, 1.0, 3000.0)];

        assert_eq!(DataProcessor::max_price(&records), Some(3000.0));
        let total: usize = DataProcessor::price_buckets(&records)
            .iter()
            .map(|b| b.count)
            .sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn top_discounts_picks_largest_and_caps_at_ten() {
        let records: Vec<ProductRecord> = (0..25)
            .map(|i| record(&format!("p{i}"), 1.0, ((i * 7) % 25) as f64, 100.0))
            .collect();

        let top = DataProcessor::top_discounts(&records, TOP_DISCOUNT_COUNT);
        assert_eq!(top.len(), 10);

        let min_selected = top.iter().map(|r| r.discount).fold(f64::INFINITY, f64::min);
        let selected: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        for r in records.iter().filter(|r| !selected.contains(&r.name.as_str())) {
            assert!(min_selected >= r.discount);
        }
    }

    #[test]
    fn top_discount_ties_keep_row_order() {
        let records = vec![
            record("first", 1.0, 30.0, 1.0),
            record("second", 1.0, 50.0, 1.0),
            record("third", 1.0, 30.0, 1.0),
            record("fourth", 1.0, 30.0, 1.0),
        ];

        let top = DataProcessor::top_discounts(&records, 3);
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first", "third"]);
    }

    #[test]
    fn empty_dataset_yields_empty_summaries() {
        let data = DataProcessor::summarize(Vec::new());

        assert!(data.is_empty());
        assert!(data.top_discounts.is_empty());
        assert_eq!(data.rating_buckets.len(), 5);
        assert_eq!(data.discount_buckets.len(), 6);
        assert_eq!(data.price_buckets.len(), 6);
        assert!(data
            .rating_buckets
            .iter()
            .chain(&data.discount_buckets)
            .chain(&data.price_buckets)
            .all(|b| b.count == 0));
    }

    #[test]
    fn dataframe_uses_table_column_names() {
        let df = DataProcessor::to_dataframe(&[record("a", 4.0, 20.0, 999.0)]).unwrap();
        assert_eq!(df.height(), 1);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec![NAME_COL, RATINGS_COL, DISCOUNT_COL, PRICE_COL]);
    }
}
