use crate::schema::LayoutHint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Originating ledger label, or the caller-supplied alias.
    pub name: String,
    /// One value per column; `None` where the ledger cell was missing.
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// A flat reference line, e.g. a break-even threshold.
    pub fn constant(name: impl Into<String>, value: f64, len: usize) -> Self {
        Self::new(name, vec![Some(value); len])
    }
}

/// Month-aligned pivot of one or more ledger rows.
///
/// Every series holds exactly `columns.len()` values, positionally aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    pub columns: Vec<String>,
    pub series: Vec<Series>,
    /// Requested labels that were absent from the ledger.
    #[serde(default)]
    pub skipped: Vec<String>,
    pub layout: LayoutHint,
}

impl SeriesTable {
    pub fn new(columns: Vec<String>, series: Vec<Series>, layout: LayoutHint) -> Self {
        debug_assert!(series.iter().all(|s| s.values.len() == columns.len()));
        Self {
            columns,
            series,
            skipped: Vec::new(),
            layout,
        }
    }

    pub fn with_skipped(mut self, skipped: Vec<String>) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn push_series(&mut self, series: Series) {
        debug_assert_eq!(series.values.len(), self.columns.len());
        self.series.push(series);
    }

    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Values of every series at one column, in series order.
    pub fn column_values(&self, column: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.columns.iter().position(|c| c == column)?;
        Some(
            self.series
                .iter()
                .map(|s| s.values.get(idx).copied().flatten())
                .collect(),
        )
    }
}

/// Typed "no data" marker for optional label sets where none of the labels
/// exist in the ledger. Not an error: callers render a notice instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptySeriesResult {
    pub requested: Vec<String>,
}

impl EmptySeriesResult {
    pub fn message(&self) -> String {
        format!(
            "None of the requested lines were found in the ledger: {}",
            self.requested.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesResult {
    Table(SeriesTable),
    Empty(EmptySeriesResult),
}

impl SeriesResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, SeriesResult::Empty(_))
    }

    pub fn table(&self) -> Option<&SeriesTable> {
        match self {
            SeriesResult::Table(table) => Some(table),
            SeriesResult::Empty(_) => None,
        }
    }

    pub fn into_table(self) -> Option<SeriesTable> {
        match self {
            SeriesResult::Table(table) => Some(table),
            SeriesResult::Empty(_) => None,
        }
    }

    /// Labels absent from the ledger, whether the result is partial or empty.
    pub fn skipped(&self) -> &[String] {
        match self {
            SeriesResult::Table(table) => &table.skipped,
            SeriesResult::Empty(empty) => &empty.requested,
        }
    }
}
