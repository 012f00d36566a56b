//! Data Context Module
//! The read-only set of tables a dashboard process serves from. Built once
//! at startup and passed by reference into every filter/reshape call, so
//! no page module owns hidden global state.

use polars::functions::concat_df_diagonal;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;

use super::loader::{load_table, LoaderError};

/// Named, immutable tables loaded from the snapshot sources.
#[derive(Debug, Default)]
pub struct DataContext {
    tables: HashMap<String, DataFrame>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the given tables from one SQLite database file, the layout the
    /// Data Hub ships (`agriculture_data`, `economic_data`,
    /// `education_data` side by side in `data.db`).
    pub fn from_database(
        path: impl AsRef<Path>,
        tables: &[&str],
    ) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let mut ctx = Self::new();
        for table in tables {
            ctx.insert(*table, load_table(path, table)?);
        }
        Ok(ctx)
    }

    pub fn insert(&mut self, name: impl Into<String>, df: DataFrame) {
        self.tables.insert(name.into(), df);
    }

    pub fn table(&self, name: &str) -> Option<&DataFrame> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Stack several tables into one, unioning their columns; missing
    /// columns fill with null. The explorer page queries education and
    /// agriculture as a single combined table.
    pub fn combined(&self, names: &[&str]) -> Result<DataFrame, LoaderError> {
        let mut parts = Vec::with_capacity(names.len());
        for name in names {
            let df = self
                .table(name)
                .ok_or_else(|| LoaderError::Schema(name.to_string()))?;
            parts.push(df.clone());
        }
        if parts.is_empty() {
            return Ok(DataFrame::empty());
        }
        Ok(concat_df_diagonal(&parts)?)
    }
}
