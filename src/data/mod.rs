//! Data module - Product loading, cleaning and summaries

mod loader;
mod processor;
mod record;
mod source;

pub use loader::{DataLoader, LoadOutcome};
pub use processor::{Bucket, DashboardData, DataProcessor};
pub use record::ProductRecord;
pub use source::{CsvSource, MySqlSource, ProductSource};
