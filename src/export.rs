//! Export Module
//! Serializes a filtered or pivoted table for the "Download Data" action.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Exported CSV was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render a table as comma-separated UTF-8 text with a header row, the
/// payload handed to the browser download.
pub fn to_csv_string(df: &DataFrame) -> Result<String, ExportError> {
    let mut out = df.clone();
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut out)?;
    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_are_emitted() {
        let df = DataFrame::new(vec![
            Column::new("Province".into(), vec!["Kandal", "Battambang"]),
            Column::new("Indicator Value".into(), vec![100.0f64, 200.0]),
        ])
        .unwrap();
        let csv = to_csv_string(&df).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Province,Indicator Value"));
        assert_eq!(lines.next(), Some("Kandal,100.0"));
        assert_eq!(lines.next(), Some("Battambang,200.0"));
    }

    #[test]
    fn empty_table_still_has_a_header() {
        let df = DataFrame::new(vec![Column::new(
            "Province".into(),
            Vec::<String>::new(),
        )])
        .unwrap();
        let csv = to_csv_string(&df).unwrap();
        assert_eq!(csv.trim_end(), "Province");
    }
}
