use crate::error::Result;
use crate::schema::{RawCell, RawTable};
use crate::utils::{is_blank, parse_numeric_text};
use log::debug;
use std::io::Read;
use std::path::Path;

/// Header a spreadsheet export gives an unnamed first column, which is where
/// line item labels usually live.
pub const DEFAULT_LABEL_COLUMN: &str = "Unnamed: 0";

/// Reads a CSV export into a [`RawTable`].
///
/// Blank headers are named `Unnamed: {index}`. Blank cells become
/// [`RawCell::Missing`]. Cells of `label_column` are always kept as
/// [`RawCell::Text`], so labels like `3.10` or `007` survive verbatim. Other
/// numeric cells become [`RawCell::Number`], anything else stays text for the
/// ledger to judge.
pub fn read_csv<R: Read>(reader: R, label_column: &str) -> Result<RawTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = csv_reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            if is_blank(header) {
                format!("Unnamed: {}", idx)
            } else {
                header.to_string()
            }
        })
        .collect();

    let label_idx = columns
        .iter()
        .position(|c| c.trim() == label_column.trim());

    let mut table = RawTable::new(label_column, columns);

    for record in csv_reader.records() {
        let record = record?;
        let cells = record
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                if Some(idx) == label_idx {
                    parse_label_cell(field)
                } else {
                    parse_cell(field)
                }
            })
            .collect();
        table.push_record(cells);
    }

    debug!(
        "Read CSV table with {} columns and {} records",
        table.columns.len(),
        table.records.len()
    );

    Ok(table)
}

pub fn read_csv_path(path: impl AsRef<Path>, label_column: &str) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    read_csv(file, label_column)
}

fn parse_label_cell(field: &str) -> RawCell {
    if is_blank(field) {
        RawCell::Missing
    } else {
        RawCell::Text(field.to_string())
    }
}

fn parse_cell(field: &str) -> RawCell {
    if is_blank(field) {
        return RawCell::Missing;
    }
    match parse_numeric_text(field) {
        Some(value) => RawCell::Number(value),
        None => RawCell::Text(field.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_header_gets_pandas_name() {
        let data = ",JAN,FEB\n1. SOMA DAS VENDAS,100,200\n";
        let table = read_csv(data.as_bytes(), DEFAULT_LABEL_COLUMN).unwrap();

        assert_eq!(table.columns, vec!["Unnamed: 0", "JAN", "FEB"]);
        assert_eq!(table.label_column, "Unnamed: 0");
        assert_eq!(
            table.records[0],
            vec![
                RawCell::Text("1. SOMA DAS VENDAS".to_string()),
                RawCell::Number(100.0),
                RawCell::Number(200.0),
            ]
        );
    }

    #[test]
    fn test_cells_are_classified() {
        let data = "Item,JAN,FEB,MAR\nMargin, 12.5 ,,n/a\n";
        let table = read_csv(data.as_bytes(), "Item").unwrap();

        assert_eq!(
            table.records[0],
            vec![
                RawCell::Text("Margin".to_string()),
                RawCell::Number(12.5),
                RawCell::Missing,
                RawCell::Text("n/a".to_string()),
            ]
        );
    }

    #[test]
    fn test_numeric_looking_labels_stay_text() {
        let data = ",JAN,FEB\n3.10,1,2\n007,3,4\nNaN,5,6\n,7,8\n";
        let table = read_csv(data.as_bytes(), DEFAULT_LABEL_COLUMN).unwrap();

        let labels: Vec<_> = table.records.iter().map(|r| r[0].clone()).collect();
        assert_eq!(
            labels,
            vec![
                RawCell::Text("3.10".to_string()),
                RawCell::Text("007".to_string()),
                RawCell::Text("NaN".to_string()),
                RawCell::Missing,
            ]
        );
        assert_eq!(table.records[0][1], RawCell::Number(1.0));
    }

    #[test]
    fn test_short_records_are_accepted() {
        let data = "Item,JAN,FEB\nSales,1\n";
        let table = read_csv(data.as_bytes(), "Item").unwrap();

        assert_eq!(table.records[0].len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_csv_path("/definitely/not/here.csv", DEFAULT_LABEL_COLUMN);
        assert!(matches!(
            result,
            Err(crate::error::LedgerReportError::IoError(_))
        ));
    }
}
