//! Table Reshaper Module
//! Pivots long-format rows (one row per indicator) into the wide table the
//! Data Hub grid displays (one column per indicator).

use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

use super::any_value_to_string;

#[derive(Error, Debug)]
pub enum ReshapeError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Column not found: {0}")]
    MissingColumn(String),
    #[error("Duplicate value for indicator {indicator:?} within one identity group")]
    DuplicateEntry { indicator: String },
}

/// What to do when the same (identity, indicator) pair appears twice.
/// The snapshot data is expected to hold at most one row per pair, so a
/// duplicate usually signals a data-quality problem upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first row's value and log each discarded duplicate.
    #[default]
    First,
    /// Fail with [`ReshapeError::DuplicateEntry`].
    Error,
}

struct GroupRow {
    identity: Vec<String>,
    values: HashMap<String, f64>,
}

/// Pivot a long-format table wide.
///
/// Rows group by every column other than `indicator_col` and `value_col`;
/// the output has one row per group and one column per distinct indicator,
/// both in first-occurrence order. Values are cast to f64. Indicator
/// columns that end up with no value in any output row are dropped.
pub fn pivot(
    df: &DataFrame,
    indicator_col: &str,
    value_col: &str,
    policy: DuplicatePolicy,
) -> Result<DataFrame, ReshapeError> {
    let identity_cols: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|c| c != indicator_col && c != value_col)
        .collect();

    let indicator_series = df
        .column(indicator_col)
        .map_err(|_| ReshapeError::MissingColumn(indicator_col.to_string()))?
        .as_materialized_series()
        .clone();
    let value_f64 = df
        .column(value_col)
        .map_err(|_| ReshapeError::MissingColumn(value_col.to_string()))?
        .cast(&DataType::Float64)?;
    let value_ca = value_f64.f64()?;

    let identity_series: Vec<Series> = identity_cols
        .iter()
        .map(|c| df.column(c).map(|col| col.as_materialized_series().clone()))
        .collect::<Result<_, _>>()?;

    let mut groups: Vec<GroupRow> = Vec::new();
    let mut group_index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut indicators: Vec<String> = Vec::new();

    for i in 0..df.height() {
        let indicator = match indicator_series.get(i) {
            Ok(v) if !v.is_null() => any_value_to_string(&v),
            _ => continue,
        };
        let identity: Vec<String> = identity_series
            .iter()
            .map(|s| s.get(i).map(|v| any_value_to_string(&v)))
            .collect::<Result<_, _>>()?;

        if !indicators.contains(&indicator) {
            indicators.push(indicator.clone());
        }

        let idx = *group_index.entry(identity.clone()).or_insert_with(|| {
            groups.push(GroupRow {
                identity,
                values: HashMap::new(),
            });
            groups.len() - 1
        });

        let Some(value) = value_ca.get(i) else {
            continue;
        };
        if groups[idx].values.contains_key(&indicator) {
            match policy {
                DuplicatePolicy::First => {
                    warn!(indicator, row = i, "duplicate indicator value discarded");
                    continue;
                }
                DuplicatePolicy::Error => {
                    return Err(ReshapeError::DuplicateEntry { indicator });
                }
            }
        }
        groups[idx].values.insert(indicator, value);
    }

    let mut columns: Vec<Column> = Vec::with_capacity(identity_cols.len() + indicators.len());
    for (pos, name) in identity_cols.iter().enumerate() {
        let values: Vec<String> = groups.iter().map(|g| g.identity[pos].clone()).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }
    for indicator in &indicators {
        let values: Vec<Option<f64>> =
            groups.iter().map(|g| g.values.get(indicator).copied()).collect();
        // Mirror the dashboard's post-step: a column empty in every row is noise.
        if values.iter().all(|v| v.is_none()) {
            continue;
        }
        columns.push(Column::new(indicator.as_str().into(), values));
    }

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_table() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "Sector".into(),
                vec!["Agriculture", "Agriculture", "Agriculture"],
            ),
            Column::new(
                "Province".into(),
                vec!["Kandal", "Kandal", "Battambang"],
            ),
            Column::new(
                "Indicator".into(),
                vec!["AreaPlanted", "Yield", "AreaPlanted"],
            ),
            Column::new("Indicator Value".into(), vec![100.0f64, 50.0, 200.0]),
        ])
        .unwrap()
    }

    #[test]
    fn one_row_per_identity_one_column_per_indicator() {
        let wide = pivot(&long_table(), "Indicator", "Indicator Value", DuplicatePolicy::First)
            .unwrap();
        assert_eq!(wide.height(), 2);
        assert_eq!(
            wide.get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
            vec!["Sector", "Province", "AreaPlanted", "Yield"]
        );

        let area = wide.column("AreaPlanted").unwrap().f64().unwrap();
        assert_eq!(area.get(0), Some(100.0));
        assert_eq!(area.get(1), Some(200.0));
        let yield_col = wide.column("Yield").unwrap().f64().unwrap();
        assert_eq!(yield_col.get(0), Some(50.0));
        assert_eq!(yield_col.get(1), None);
    }

    #[test]
    fn round_trips_clean_data_without_loss() {
        let wide = pivot(&long_table(), "Indicator", "Indicator Value", DuplicatePolicy::Error)
            .unwrap();
        // Melt back by hand and compare the value multiset.
        let mut values = Vec::new();
        for name in ["AreaPlanted", "Yield"] {
            let ca = wide.column(name).unwrap().f64().unwrap();
            values.extend(ca.into_iter().flatten());
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(values, vec![50.0, 100.0, 200.0]);
    }

    #[test]
    fn duplicate_policy_first_keeps_the_first_row() {
        let df = DataFrame::new(vec![
            Column::new("Province".into(), vec!["Kandal", "Kandal"]),
            Column::new("Indicator".into(), vec!["Yield", "Yield"]),
            Column::new("Indicator Value".into(), vec![1.0f64, 2.0]),
        ])
        .unwrap();
        let wide = pivot(&df, "Indicator", "Indicator Value", DuplicatePolicy::First).unwrap();
        assert_eq!(wide.height(), 1);
        assert_eq!(wide.column("Yield").unwrap().f64().unwrap().get(0), Some(1.0));
    }

    #[test]
    fn duplicate_policy_error_rejects_the_table() {
        let df = DataFrame::new(vec![
            Column::new("Province".into(), vec!["Kandal", "Kandal"]),
            Column::new("Indicator".into(), vec!["Yield", "Yield"]),
            Column::new("Indicator Value".into(), vec![1.0f64, 2.0]),
        ])
        .unwrap();
        assert!(matches!(
            pivot(&df, "Indicator", "Indicator Value", DuplicatePolicy::Error),
            Err(ReshapeError::DuplicateEntry { .. })
        ));
    }

    #[test]
    fn indicators_with_no_values_are_dropped() {
        let df = DataFrame::new(vec![
            Column::new("Province".into(), vec!["Kandal", "Kandal"]),
            Column::new("Indicator".into(), vec!["Yield", "Ghost"]),
            Column::new("Indicator Value".into(), vec![Some(1.0f64), None]),
        ])
        .unwrap();
        let wide = pivot(&df, "Indicator", "Indicator Value", DuplicatePolicy::First).unwrap();
        assert!(wide.column("Ghost").is_err());
        assert!(wide.column("Yield").is_ok());
    }

    #[test]
    fn missing_pivot_columns_are_reported() {
        assert!(matches!(
            pivot(&long_table(), "Nope", "Indicator Value", DuplicatePolicy::First),
            Err(ReshapeError::MissingColumn(_))
        ));
    }
}
