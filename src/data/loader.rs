//! Data Loader Module
//! Runs one load pass: fetch rows from the source, clean them, derive summaries.

use crate::data::processor::{DashboardData, DataProcessor};
use crate::data::source::ProductSource;
use std::sync::Arc;
use std::time::Instant;

/// Result of a load pass.
///
/// A failed fetch still produces (empty) data, with the error kept for display.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub data: DashboardData,
    pub error: Option<String>,
}

/// Loads the product table through an injected source.
#[derive(Clone)]
pub struct DataLoader {
    source: Arc<dyn ProductSource>,
}

impl DataLoader {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self { source }
    }

    pub fn describe_source(&self) -> String {
        self.source.describe()
    }

    /// Fetch, clean and summarize. Never fails: a source error yields an empty dataset.
    pub fn load(&self) -> LoadOutcome {
        let started = Instant::now();
        tracing::info!(source = %self.source.describe(), "Loading product data");

        let (rows, error) = match self.source.fetch_all() {
            Ok(rows) => (rows, None),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load product data");
                (Vec::new(), Some(e.to_string()))
            }
        };

        let records = DataProcessor::clean(&rows);
        let data = DataProcessor::summarize(records);

        tracing::info!(
            rows = data.records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Load complete"
        );

        LoadOutcome { data, error }
    }
}
