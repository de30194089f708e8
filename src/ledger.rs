use crate::error::{LedgerReportError, Result};
use crate::schema::{LayoutHint, RawCell, RawTable, SeriesLabel};
use crate::series::{Series, SeriesTable};
use crate::utils::{is_blank, normalize_label, parse_numeric_text};
use log::{debug, info};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
struct LedgerRow {
    label: String,
    values: Vec<Option<f64>>,
}

/// Immutable, label-indexed table of monthly values.
///
/// Labels are stored normalized (trimmed, upper-cased) and every row holds
/// exactly one value per month. Missing cells stay `None`.
#[derive(Debug, Clone)]
pub struct Ledger {
    months: Vec<String>,
    rows: Vec<LedgerRow>,
    index: HashMap<String, usize>,
}

/// Borrowed view of a single ledger row, aligned to the ledger's months.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    label: &'a str,
    months: &'a [String],
    values: &'a [Option<f64>],
}

impl<'a> RowView<'a> {
    pub fn label(&self) -> &'a str {
        self.label
    }

    pub fn values(&self) -> &'a [Option<f64>] {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, month: &str) -> Option<Option<f64>> {
        self.months
            .iter()
            .position(|m| m == month)
            .map(|idx| self.values[idx])
    }

    /// `(month, value)` pairs in canonical month order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<f64>)> + 'a {
        self.months
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Rows found by [`Ledger::select`], plus the requested labels that were absent.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub rows: Vec<(&'a SeriesLabel, RowView<'a>)>,
    pub skipped: Vec<String>,
}

impl Ledger {
    pub fn build(raw: &RawTable) -> Result<Self> {
        let label_idx = raw
            .columns
            .iter()
            .position(|c| c.trim() == raw.label_column.trim())
            .ok_or_else(|| {
                LedgerReportError::Schema(format!(
                    "Label column '{}' not found among columns {:?}",
                    raw.label_column, raw.columns
                ))
            })?;

        let month_columns: Vec<(usize, String)> = raw
            .columns
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != label_idx)
            .map(|(idx, name)| (idx, name.trim().to_string()))
            .collect();

        let mut seen_months = HashSet::with_capacity(month_columns.len());
        for (_, month) in &month_columns {
            if !seen_months.insert(month.as_str()) {
                return Err(LedgerReportError::Schema(format!(
                    "Duplicate month column '{}'",
                    month
                )));
            }
        }

        if month_columns.is_empty() {
            return Err(LedgerReportError::EmptySource(
                "Table has no month columns".to_string(),
            ));
        }

        if raw.records.is_empty() {
            return Err(LedgerReportError::EmptySource(
                "Table has no rows".to_string(),
            ));
        }

        let mut rows = Vec::with_capacity(raw.records.len());
        let mut index = HashMap::with_capacity(raw.records.len());

        for (record_idx, record) in raw.records.iter().enumerate() {
            if record.len() > raw.columns.len() {
                return Err(LedgerReportError::Schema(format!(
                    "Row #{} has {} cells but the table has {} columns",
                    record_idx,
                    record.len(),
                    raw.columns.len()
                )));
            }

            let label = match record.get(label_idx) {
                Some(RawCell::Text(text)) if !is_blank(text) => normalize_label(text),
                Some(RawCell::Number(n)) if !n.is_nan() => {
                    return Err(LedgerReportError::Schema(format!(
                        "Row #{} has numeric label {}; labels must be text",
                        record_idx, n
                    )))
                }
                _ => {
                    debug!("Skipping row #{} with blank label", record_idx);
                    continue;
                }
            };

            let mut values = Vec::with_capacity(month_columns.len());
            for (col_idx, month) in &month_columns {
                let value = match record.get(*col_idx) {
                    None | Some(RawCell::Missing) => None,
                    Some(RawCell::Number(n)) => Some(*n).filter(|v| !v.is_nan()),
                    Some(RawCell::Text(text)) if is_blank(text) => None,
                    Some(RawCell::Text(text)) => match parse_numeric_text(text) {
                        Some(n) => Some(n).filter(|v| !v.is_nan()),
                        None => {
                            return Err(LedgerReportError::InvalidCell {
                                label,
                                column: month.clone(),
                                value: text.clone(),
                            })
                        }
                    },
                };
                values.push(value);
            }

            if let Some(&first) = index.get(&label) {
                return Err(LedgerReportError::DuplicateLabel {
                    label,
                    first,
                    second: record_idx,
                });
            }

            index.insert(label.clone(), record_idx);
            rows.push(LedgerRow { label, values });
        }

        if rows.is_empty() {
            return Err(LedgerReportError::EmptySource(
                "Table has no labeled rows".to_string(),
            ));
        }

        // `index` was keyed by source record for error messages; remap to row positions.
        let index = rows
            .iter()
            .enumerate()
            .map(|(pos, row)| (row.label.clone(), pos))
            .collect();

        let months: Vec<String> = month_columns.into_iter().map(|(_, m)| m).collect();

        info!(
            "Built ledger with {} rows across {} months",
            rows.len(),
            months.len()
        );

        Ok(Self {
            months,
            rows,
            index,
        })
    }

    pub fn months(&self) -> &[String] {
        &self.months
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Normalized labels in source order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.label.as_str())
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.index.contains_key(&normalize_label(label))
    }

    pub fn row(&self, label: &str) -> Result<RowView<'_>> {
        let key = normalize_label(label);
        let pos = self
            .index
            .get(&key)
            .copied()
            .ok_or_else(|| LedgerReportError::LabelNotFound(key))?;
        Ok(self.view(pos))
    }

    /// Rows in the caller's order. Fails on the first absent label.
    pub fn rows<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<RowView<'_>>> {
        labels.iter().map(|l| self.row(l.as_ref())).collect()
    }

    /// Order-preserving split of `labels` into present rows and skipped labels.
    pub fn select<'a>(&'a self, labels: &'a [SeriesLabel]) -> Selection<'a> {
        let mut rows = Vec::new();
        let mut skipped = Vec::new();

        for requested in labels {
            match self.row(&requested.label) {
                Ok(view) => rows.push((requested, view)),
                Err(_) => skipped.push(requested.label.clone()),
            }
        }

        Selection { rows, skipped }
    }

    /// The whole ledger as a series table, rows in source order.
    pub fn to_series_table(&self) -> SeriesTable {
        let series = self
            .rows
            .iter()
            .map(|r| Series::new(r.label.clone(), r.values.clone()))
            .collect();

        SeriesTable::new(self.months.clone(), series, LayoutHint::Table)
    }

    fn view(&self, pos: usize) -> RowView<'_> {
        let row = &self.rows[pos];
        RowView {
            label: &row.label,
            months: &self.months,
            values: &row.values,
        }
    }
}
