//! Data module - source loading, the read-only table context, reshaping

mod context;
mod loader;
mod reshape;

pub use context::DataContext;
pub use loader::{load_csv, load_sheet, load_table, LoaderError};
pub use reshape::{pivot, DuplicatePolicy, ReshapeError};

use polars::prelude::AnyValue;

/// Render a cell for grouping keys and dropdown options. Polars quotes
/// string values in its `Display` output; nulls become the empty string.
pub(crate) fn any_value_to_string(value: &AnyValue) -> String {
    if value.is_null() {
        String::new()
    } else {
        value.to_string().trim_matches('"').to_string()
    }
}
