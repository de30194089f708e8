use crate::error::{LedgerReportError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single cell of the raw input table, as handed over by a loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
    /// Explicit missing marker, distinct from zero. Serialized as `null`.
    Missing,
}

impl From<f64> for RawCell {
    fn from(value: f64) -> Self {
        RawCell::Number(value)
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<Option<f64>> for RawCell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(RawCell::Missing, RawCell::Number)
    }
}

/// Two-dimensional table produced by an external loader.
///
/// `columns` holds every header in source order, including the label column.
/// Each record holds its cells positionally aligned to `columns`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RawTable {
    #[schemars(description = "Header of the column holding the line item labels")]
    pub label_column: String,

    #[schemars(description = "All column headers in source order, label column included")]
    pub columns: Vec<String>,

    #[schemars(description = "Data rows, cells aligned to `columns`")]
    pub records: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(label_column: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            label_column: label_column.into(),
            columns,
            records: Vec::new(),
        }
    }

    pub fn push_record(&mut self, record: Vec<RawCell>) {
        self.records.push(record);
    }

    pub fn with_record(mut self, record: Vec<RawCell>) -> Self {
        self.push_record(record);
        self
    }
}

/// Rendering hint attached to a series table. The engine never acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum LayoutHint {
    /// Side-by-side bars per month.
    Grouped,
    /// Bars stacked into one column per month.
    Stacked,
    /// Bars and lines drawn over each other, e.g. revenue vs. profit vs. threshold.
    Overlay,
    Line,
    /// Plain spreadsheet dump.
    Table,
}

/// A ledger label requested for a series view, optionally renamed in the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeriesLabel {
    #[schemars(description = "Ledger line item label. Matched after trimming and upper-casing.")]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Series name to use in the output instead of the label")]
    pub alias: Option<String>,
}

impl SeriesLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            alias: None,
        }
    }

    pub fn aliased(label: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            alias: Some(alias.into()),
        }
    }

    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.label)
    }
}

impl From<&str> for SeriesLabel {
    fn from(label: &str) -> Self {
        SeriesLabel::new(label)
    }
}

pub fn label_set<I, S>(labels: I) -> Vec<SeriesLabel>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(SeriesLabel::new).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReportConfig {
    #[schemars(description = "Row holding monthly revenue for the current year")]
    pub total_revenue_label: String,

    #[schemars(description = "Row holding monthly revenue for the prior year")]
    pub prior_year_revenue_label: String,

    #[schemars(description = "Row holding total monthly expenses")]
    pub total_expense_label: String,

    #[schemars(description = "Row holding the monthly margin, in percent")]
    pub margin_label: String,

    #[schemars(description = "Row holding the monthly consolidated profit or loss")]
    pub consolidated_profit_label: String,

    #[schemars(
        description = "Ordered rows compared year over year. Absent rows are skipped, not fatal."
    )]
    pub year_comparison_labels: Vec<SeriesLabel>,

    #[schemars(description = "Ordered revenue breakdown rows for the stacked composition view")]
    pub revenue_detail_labels: Vec<SeriesLabel>,

    #[schemars(description = "Ordered expense breakdown rows for the stacked composition view")]
    pub expense_detail_labels: Vec<SeriesLabel>,

    #[schemars(description = "Flat reference value overlaid on the revenue/profit trend")]
    pub break_even_threshold: f64,

    #[schemars(description = "Series name of the revenue line in the trend view")]
    pub revenue_series_name: String,

    #[schemars(description = "Series name of the profit line in the trend view")]
    pub profit_series_name: String,

    #[schemars(description = "Series name of the break-even reference line")]
    pub break_even_series_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            total_revenue_label: "1. SOMA DAS VENDAS".to_string(),
            prior_year_revenue_label: "SOMA DAS VENDAS EM 2023".to_string(),
            total_expense_label: "2. SOMA DAS DESPESAS".to_string(),
            margin_label: "7. MARGEM".to_string(),
            consolidated_profit_label: "6. LUCRO/PREJUIZO CONSOLIDADO".to_string(),
            year_comparison_labels: vec![
                SeriesLabel::aliased("SOMA DAS VENDAS EM 2022", "2022"),
                SeriesLabel::aliased("SOMA DAS VENDAS EM 2023", "2023"),
                SeriesLabel::aliased("1. SOMA DAS VENDAS", "2024"),
            ],
            // Double spaces are part of the source labels; only the ends are trimmed.
            revenue_detail_labels: label_set([
                "1.1  VENDA EMPRESA",
                "1.2  VENDA COELHO",
                "1.5  VENDA ENCOMENDADAS",
            ]),
            expense_detail_labels: label_set([
                "2.1 DESPESA COM MERCADORIAS",
                "2.2 DESPESA COM EMBALAGENS",
                "3. DEPESAS GERAIS E ADMNIST.",
                "3.1 MARIANA",
                "3.2 ADESIVO",
                "3.3 UBER",
                "3.4 ALUGUEL DE CARRO",
                "3.5 ÔNIBUS",
                "3.6 TARIFA BANCO",
                "3.6 DANS MEI",
            ]),
            break_even_threshold: 2000.0,
            revenue_series_name: "Monthly Revenue".to_string(),
            profit_series_name: "Consolidated Profit".to_string(),
            break_even_series_name: "Break-even".to_string(),
        }
    }
}

impl ReportConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let scalar_labels = [
            ("total_revenue_label", &self.total_revenue_label),
            ("prior_year_revenue_label", &self.prior_year_revenue_label),
            ("total_expense_label", &self.total_expense_label),
            ("margin_label", &self.margin_label),
            ("consolidated_profit_label", &self.consolidated_profit_label),
        ];

        for (field, label) in scalar_labels {
            if label.trim().is_empty() {
                return Err(LedgerReportError::InvalidConfig(format!(
                    "{} must not be blank",
                    field
                )));
            }
        }

        let label_sets = [
            ("year_comparison_labels", &self.year_comparison_labels),
            ("revenue_detail_labels", &self.revenue_detail_labels),
            ("expense_detail_labels", &self.expense_detail_labels),
        ];

        for (field, labels) in label_sets {
            if let Some(idx) = labels.iter().position(|l| l.label.trim().is_empty()) {
                return Err(LedgerReportError::InvalidConfig(format!(
                    "{} entry #{} has a blank label",
                    field, idx
                )));
            }
        }

        if !self.break_even_threshold.is_finite() {
            return Err(LedgerReportError::InvalidConfig(format!(
                "break_even_threshold must be finite, got {}",
                self.break_even_threshold
            )));
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ReportConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = ReportConfig::schema_as_json().unwrap();
        assert!(schema_json.contains("total_revenue_label"));
        assert!(schema_json.contains("year_comparison_labels"));
        assert!(schema_json.contains("break_even_threshold"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ReportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.break_even_threshold, 2000.0);
        assert_eq!(config.year_comparison_labels.len(), 3);
        assert_eq!(config.year_comparison_labels[2].display_name(), "2024");
        assert_eq!(config.expense_detail_labels.len(), 10);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = ReportConfig::from_json_str(
            r#"{
                "break_even_threshold": 3500.0,
                "revenue_detail_labels": [
                    { "label": "Online" },
                    { "label": "Retail", "alias": "Stores" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.break_even_threshold, 3500.0);
        assert_eq!(config.total_revenue_label, "1. SOMA DAS VENDAS");
        assert_eq!(config.revenue_detail_labels[0].display_name(), "Online");
        assert_eq!(config.revenue_detail_labels[1].display_name(), "Stores");
    }

    #[test]
    fn test_blank_scalar_label_rejected() {
        let config = ReportConfig {
            margin_label: "   ".to_string(),
            ..ReportConfig::default()
        };

        match config.validate() {
            Err(LedgerReportError::InvalidConfig(msg)) => assert!(msg.contains("margin_label")),
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_set_entry_rejected() {
        let config = ReportConfig {
            expense_detail_labels: label_set(["Rent", ""]),
            ..ReportConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(LedgerReportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let config = ReportConfig {
            break_even_threshold: f64::INFINITY,
            ..ReportConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_raw_table_serialization() {
        let table = RawTable::new(
            "Unnamed: 0",
            vec!["Unnamed: 0".to_string(), "JAN".to_string(), "FEB".to_string()],
        )
        .with_record(vec!["Sales".into(), 10.0.into(), RawCell::Missing]);

        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("null"));

        let back: RawTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.records[0][0], RawCell::Text("Sales".to_string()));
        assert_eq!(back.records[0][1], RawCell::Number(10.0));
        assert_eq!(back.records[0][2], RawCell::Missing);
    }
}
