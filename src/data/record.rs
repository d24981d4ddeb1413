//! Product Record Module
//! Raw rows as delivered by a data source, and the cleaned typed record.

use serde::Serialize;

/// Placeholder text used by the catalog when a product has no rating.
pub const NO_RATINGS: &str = "No ratings";
/// Placeholder text used by the catalog when a product has no discount.
pub const NO_DISCOUNT: &str = "No discount";

/// Column names expected in the product table.
pub const NAME_COL: &str = "Name";
pub const RATINGS_COL: &str = "Ratings";
pub const DISCOUNT_COL: &str = "Discount";
pub const PRICE_COL: &str = "Current Price";

/// One row as read from the source, every cell still text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProductRow {
    pub name: Option<String>,
    pub ratings: Option<String>,
    pub discount: Option<String>,
    pub current_price: Option<String>,
}

#[cfg(test)]
impl RawProductRow {
    pub fn new(name: &str, ratings: &str, discount: &str, current_price: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ratings: Some(ratings.to_string()),
            discount: Some(discount.to_string()),
            current_price: Some(current_price.to_string()),
        }
    }
}

/// A cleaned catalog item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub name: String,
    pub ratings: f64,
    pub discount: f64,
    /// `None` when the source value was missing or not a number.
    pub current_price: Option<f64>,
}

impl ProductRecord {
    pub fn from_raw(raw: &RawProductRow) -> Self {
        Self {
            name: raw.name.clone().unwrap_or_default(),
            ratings: parse_measure(raw.ratings.as_deref(), NO_RATINGS),
            discount: parse_measure(raw.discount.as_deref(), NO_DISCOUNT),
            current_price: parse_number(raw.current_price.as_deref()),
        }
    }
}

/// Coerce a measurement cell to a number.
///
/// The sentinel, missing cells and anything that does not parse all become 0.
pub fn parse_measure(value: Option<&str>, sentinel: &str) -> f64 {
    match value.map(str::trim) {
        Some(v) if v == sentinel => 0.0,
        other => parse_number(other).unwrap_or(0.0),
    }
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
