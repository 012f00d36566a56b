//! Data Loader Module
//! Materializes a full table from one of the Data Hub's snapshot sources:
//! a CSV export, a spreadsheet workbook sheet, or a SQLite database table.
//! Loading happens once at process start; failures here are fatal.

use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use rusqlite::{types::ValueRef, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("No such sheet or table: {0}")]
    Schema(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Failed to read database: {0}")]
    Database(#[from] rusqlite::Error),
}

/// A cell as read from a spreadsheet or database row, before the column's
/// dtype is settled.
enum RawCell {
    Null,
    Num(f64),
    Text(String),
}

/// Load a CSV export using Polars.
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::SourceNotFound(path.to_path_buf()));
    }

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    info!(rows = df.height(), path = %path.display(), "loaded csv");
    Ok(df)
}

/// Load a named sheet from a spreadsheet workbook.
pub fn load_sheet(path: impl AsRef<Path>, sheet: &str) -> Result<DataFrame, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::SourceNotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|s| s.as_str() == sheet) {
        return Err(LoaderError::Schema(sheet.to_string()));
    }
    let range = workbook.worksheet_range(sheet)?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let text = cell_to_string(cell);
            if text.is_empty() {
                format!("Column {i}")
            } else {
                text
            }
        })
        .collect();

    let mut cells: Vec<Vec<RawCell>> = names.iter().map(|_| Vec::new()).collect();
    for row in rows {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(match row.get(i) {
                None | Some(Data::Empty) => RawCell::Null,
                Some(Data::Float(v)) => RawCell::Num(*v),
                Some(Data::Int(v)) => RawCell::Num(*v as f64),
                Some(Data::String(s)) if s.trim().is_empty() => RawCell::Null,
                Some(Data::String(s)) => RawCell::Text(s.clone()),
                Some(Data::Bool(b)) => RawCell::Text(b.to_string()),
                Some(Data::DateTime(dt)) => RawCell::Num(dt.as_f64()),
                Some(other) => RawCell::Text(other.to_string()),
            });
        }
    }

    let df = build_dataframe(names, cells)?;
    info!(rows = df.height(), sheet, "loaded workbook sheet");
    Ok(df)
}

/// Load a full table from a SQLite database file, opened read-only.
pub fn load_table(path: impl AsRef<Path>, table: &str) -> Result<DataFrame, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::SourceNotFound(path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(LoaderError::Schema(table.to_string()));
    }

    let mut stmt = conn.prepare(&format!("SELECT * FROM \"{table}\""))?;
    let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let mut cells: Vec<Vec<RawCell>> = names.iter().map(|_| Vec::new()).collect();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(match row.get_ref(i)? {
                ValueRef::Null => RawCell::Null,
                ValueRef::Integer(v) => RawCell::Num(v as f64),
                ValueRef::Real(v) => RawCell::Num(v),
                ValueRef::Text(t) => RawCell::Text(String::from_utf8_lossy(t).into_owned()),
                // Blobs never appear in the Data Hub snapshots.
                ValueRef::Blob(_) => RawCell::Null,
            });
        }
    }

    let df = build_dataframe(names, cells)?;
    info!(rows = df.height(), table, "loaded database table");
    Ok(df)
}

/// Settle each column's dtype: numeric when every non-null cell is
/// numeric, string otherwise.
fn build_dataframe(
    names: Vec<String>,
    cells: Vec<Vec<RawCell>>,
) -> Result<DataFrame, PolarsError> {
    let mut columns = Vec::with_capacity(names.len());
    for (name, column) in names.into_iter().zip(cells) {
        let has_text = column.iter().any(|c| matches!(c, RawCell::Text(_)));
        if has_text {
            let values: Vec<Option<String>> = column
                .iter()
                .map(|c| match c {
                    RawCell::Null => None,
                    RawCell::Num(v) => Some(format_number(*v)),
                    RawCell::Text(s) => Some(s.clone()),
                })
                .collect();
            columns.push(Column::new(name.into(), values));
        } else {
            let values: Vec<Option<f64>> = column
                .iter()
                .map(|c| match c {
                    RawCell::Num(v) => Some(*v),
                    _ => None,
                })
                .collect();
            columns.push(Column::new(name.into(), values));
        }
    }
    DataFrame::new(columns)
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(v) => format_number(*v),
        Data::Int(v) => v.to_string(),
        other => other.to_string(),
    }
}
