use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerReportError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Empty source: {0}")]
    EmptySource(String),

    #[error("Label not found in ledger: {0}")]
    LabelNotFound(String),

    #[error("Duplicate label after normalization: '{label}' (rows {first} and {second})")]
    DuplicateLabel {
        label: String,
        first: usize,
        second: usize,
    },

    #[error("Invalid cell in row '{label}', column '{column}': '{value}' is not numeric")]
    InvalidCell {
        label: String,
        column: String,
        value: String,
    },

    #[error("Invalid report configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerReportError>;
