//! Cascading Filter Resolver Module
//! Sequential equality filtering plus the distinct-value queries that
//! repopulate dependent dropdowns.

use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use super::constraint::{ConstraintSet, FilterValue};
use crate::data::any_value_to_string;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Unknown constraint column: {0}")]
    UnknownColumn(String),
}

/// Is this a dtype an equality constraint should compare numerically?
fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Build the literal for an equality predicate, coercing across the
/// string/numeric boundary. Dropdowns deliver every selection as a string,
/// but columns like `Year` are stored numerically.
fn literal_for(value: &FilterValue, dtype: &DataType) -> Expr {
    match value {
        FilterValue::Str(s) => {
            if is_numeric(dtype) {
                if let Ok(v) = s.parse::<f64>() {
                    return lit(v);
                }
            }
            lit(s.clone())
        }
        FilterValue::Int(i) => {
            if matches!(dtype, DataType::String) {
                lit(i.to_string())
            } else {
                lit(*i)
            }
        }
        FilterValue::Float(v) => {
            if matches!(dtype, DataType::String) {
                lit(v.to_string())
            } else {
                lit(*v)
            }
        }
    }
}

/// Filter a table down to the rows matching every bound constraint.
///
/// Constraints are applied as an equality intersection, so application
/// order never changes the result. Columns left entirely null by the
/// filtering are dropped, narrowing the output schema the way the
/// dashboard pages expect. Zero matching rows is a valid result, not an
/// error; the schema is kept intact in that case.
pub fn filter(df: &DataFrame, constraints: &ConstraintSet) -> Result<DataFrame, FilterError> {
    let mut lf = df.clone().lazy();

    for (column, value) in constraints.bound() {
        let dtype = df
            .column(column)
            .map_err(|_| FilterError::UnknownColumn(column.to_string()))?
            .dtype()
            .clone();
        lf = lf.filter(col(column).eq(literal_for(value, &dtype)));
    }

    let filtered = lf.collect()?;
    debug!(rows = filtered.height(), "filter applied");

    if filtered.height() == 0 {
        return Ok(filtered);
    }

    let empty_cols: Vec<String> = filtered
        .get_columns()
        .iter()
        .filter(|c| c.null_count() == c.len())
        .map(|c| c.name().to_string())
        .collect();

    let mut out = filtered;
    for name in empty_cols {
        out = out.drop(&name)?;
    }
    Ok(out)
}

/// Distinct non-null values a dropdown for `column` should offer, given
/// every other current selection. The column's own constraint is excluded
/// so the dropdown never pins itself to a single stale option. Values come
/// back in first-occurrence order; an empty vec means nothing matches.
pub fn options_for(
    df: &DataFrame,
    column: &str,
    constraints: &ConstraintSet,
) -> Result<Vec<String>, FilterError> {
    let subset = filter(df, &constraints.without(column))?;

    // The column may have been dropped as all-null by the filter pass.
    let Ok(col) = subset.column(column) else {
        return Ok(Vec::new());
    };

    let series = col.as_materialized_series();
    let mut seen = std::collections::HashSet::new();
    let mut options = Vec::new();
    for value in series.iter() {
        if value.is_null() {
            continue;
        }
        let text = any_value_to_string(&value);
        if seen.insert(text.clone()) {
            options.push(text);
        }
    }
    Ok(options)
}

/// Guarded fallback for "select the first available option": `None` when
/// the options list is empty instead of indexing into it.
pub fn default_option(options: &[String]) -> Option<&String> {
    options.first()
}
