//! # Ledger Report
//!
//! A library for turning a labeled monthly ledger (rows are accounting line
//! items, columns are months) into summary metrics and month-aligned series
//! tables ready for a presentation layer.
//!
//! ## Core Concepts
//!
//! - **Ledger**: Immutable table of monthly values keyed by normalized label
//!   (trimmed, upper-cased). Missing cells stay missing, never zero.
//! - **Required lines**: The rows feeding scalar metrics. Their absence is an error.
//! - **Optional lines**: Rows in comparison and breakdown views. Absent ones are
//!   skipped and recorded; if none are present the view is an explicit empty result.
//! - **Break-even threshold**: A flat reference series overlaid on the
//!   revenue/profit trend.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ledger_report::*;
//!
//! let raw = read_csv_path("ledger.csv", DEFAULT_LABEL_COLUMN)?;
//! let ledger = Ledger::build(&raw)?;
//! let engine = ReportEngine::new(ReportConfig::default())?;
//!
//! let metrics = engine.summarize(&ledger)?;
//! println!("Revenue: {:.2}", metrics.total_revenue_current.value);
//!
//! match engine.revenue_detail(&ledger) {
//!     SeriesResult::Table(table) => println!("{:?}", table.series_names()),
//!     SeriesResult::Empty(empty) => println!("{}", empty.message()),
//! }
//! ```

pub mod engine;
pub mod error;
pub mod ingestion;
pub mod ledger;
pub mod metrics;
pub mod schema;
pub mod series;
pub mod utils;

pub use engine::{Report, ReportEngine};
pub use error::{LedgerReportError, Result};
pub use ingestion::{read_csv, read_csv_path, DEFAULT_LABEL_COLUMN};
pub use ledger::{Ledger, RowView, Selection};
pub use metrics::{Metric, MetricSet, MetricUnit};
pub use schema::*;
pub use series::{EmptySeriesResult, Series, SeriesResult, SeriesTable};
pub use utils::normalize_label;

use log::info;

pub struct LedgerReportProcessor;

impl LedgerReportProcessor {
    /// Builds a ledger from `raw` and computes every report view with `config`.
    pub fn process(raw: &RawTable, config: &ReportConfig) -> Result<Report> {
        info!(
            "Processing ledger report from {} records",
            raw.records.len()
        );

        let ledger = Ledger::build(raw)?;
        let engine = ReportEngine::new(config.clone())?;
        engine.report(&ledger)
    }

    /// Like [`Self::process`], reading the table from a CSV file.
    pub fn process_csv_path(
        path: impl AsRef<std::path::Path>,
        label_column: &str,
        config: &ReportConfig,
    ) -> Result<Report> {
        let raw = read_csv_path(path, label_column)?;
        Self::process(&raw, config)
    }
}

pub fn process_ledger_report(raw: &RawTable, config: &ReportConfig) -> Result<Report> {
    LedgerReportProcessor::process(raw, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table() -> RawTable {
        let columns = ["Unnamed: 0", "JAN", "FEB", "MAR"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        RawTable::new("Unnamed: 0", columns)
            .with_record(vec![
                "1. SOMA DAS VENDAS".into(),
                1000.0.into(),
                1500.0.into(),
                2500.0.into(),
            ])
            .with_record(vec![
                "SOMA DAS VENDAS EM 2023".into(),
                900.0.into(),
                1200.0.into(),
                RawCell::Missing,
            ])
            .with_record(vec![
                "2. SOMA DAS DESPESAS".into(),
                700.0.into(),
                800.0.into(),
                900.0.into(),
            ])
            .with_record(vec![
                "6. LUCRO/PREJUIZO CONSOLIDADO".into(),
                300.0.into(),
                700.0.into(),
                1600.0.into(),
            ])
            .with_record(vec![
                "7. MARGEM".into(),
                30.0.into(),
                46.0.into(),
                RawCell::Missing,
            ])
    }

    #[test]
    fn test_end_to_end_processing() {
        let report = process_ledger_report(&raw_table(), &ReportConfig::default()).unwrap();

        assert_eq!(report.metrics.total_revenue_current.value, 5000.0);
        assert_eq!(report.metrics.total_revenue_prior.value, 2100.0);
        assert_eq!(report.metrics.revenue_delta.value, 2900.0);
        assert_eq!(report.metrics.total_expenses.value, 2400.0);
        assert_eq!(report.metrics.average_margin.value, 38.0);
        assert_eq!(report.metrics.total_consolidated_profit.value, 2600.0);

        assert_eq!(
            report.year_comparison.skipped(),
            &["SOMA DAS VENDAS EM 2022"]
        );
        assert!(report.revenue_detail.is_empty());
        assert!(report.expense_detail.is_empty());
    }

    #[test]
    fn test_processing_fails_without_label_column() {
        let mut raw = raw_table();
        raw.label_column = "Label".to_string();

        assert!(matches!(
            LedgerReportProcessor::process(&raw, &ReportConfig::default()),
            Err(LedgerReportError::Schema(_))
        ));
    }
}
