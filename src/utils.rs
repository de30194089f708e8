/// Canonical form of a line item label: surrounding whitespace trimmed, upper-cased.
///
/// Inner whitespace is preserved, so `"1.1  VENDA"` and `"1.1 VENDA"` stay distinct.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_uppercase()
}

/// Sum of the present values. Missing cells contribute nothing; an all-missing
/// row sums to `0.0`.
pub fn sum_present(values: &[Option<f64>]) -> f64 {
    values.iter().flatten().sum()
}

/// Arithmetic mean over present values only.
///
/// Returns `NaN` when no value is present, so callers can tell "no data" apart
/// from a real zero average.
pub fn mean_present(values: &[Option<f64>]) -> f64 {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

pub fn count_present(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| v.is_some()).count()
}

pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Parses a spreadsheet cell's text into a number, `None` if it is not numeric.
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}
