//! Constraint Set Module
//! The per-interaction selection state assembled from dropdown values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel the UI layer sends for an unconstrained dropdown.
pub const ALL: &str = "All";

/// A single selected filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Str(s) => write!(f, "{s}"),
            FilterValue::Int(i) => write!(f, "{i}"),
            FilterValue::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Str(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Str(s)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Int(i)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Float(v)
    }
}

/// One column's constraint. `Any` unifies the source data's two spellings
/// of "no constraint" (the `"All"` sentinel and a missing selection).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Constraint {
    #[default]
    Any,
    Equals(FilterValue),
}

impl Constraint {
    /// Interpret a raw dropdown selection: `None` and `"All"` both mean
    /// unconstrained, anything else is an equality constraint.
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection {
            None => Constraint::Any,
            Some(s) if s == ALL => Constraint::Any,
            Some(s) => Constraint::Equals(FilterValue::from(s)),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Constraint::Any)
    }
}

/// The current combination of user-selected filter values, one entry per
/// constrained column. Insertion order is preserved so dependent dropdowns
/// repopulate deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    entries: Vec<(String, Constraint)>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the constraint on a column.
    pub fn set(&mut self, column: impl Into<String>, constraint: Constraint) {
        let column = column.into();
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == column) {
            entry.1 = constraint;
        } else {
            self.entries.push((column, constraint));
        }
    }

    /// Builder-style equality constraint.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.set(column, Constraint::Equals(value.into()));
        self
    }

    /// Builder-style raw-selection constraint (`None`/`"All"` aware).
    pub fn with_selection(mut self, column: impl Into<String>, selection: Option<&str>) -> Self {
        self.set(column, Constraint::from_selection(selection));
        self
    }

    pub fn get(&self, column: &str) -> Option<&Constraint> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, constraint)| constraint)
    }

    /// A copy of this set with one column left unconstrained, used when
    /// recomputing that column's own dropdown options.
    pub fn without(&self, column: &str) -> ConstraintSet {
        ConstraintSet {
            entries: self
                .entries
                .iter()
                .filter(|(c, _)| c != column)
                .cloned()
                .collect(),
        }
    }

    /// Iterate the bound (non-`Any`) constraints in insertion order.
    pub fn bound(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().filter_map(|(c, constraint)| match constraint {
            Constraint::Any => None,
            Constraint::Equals(value) => Some((c.as_str(), value)),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
