//! Query module - constraint sets, cascading filters, fuzzy lookup

mod constraint;
mod filter;
mod lookup;

pub use constraint::{Constraint, ConstraintSet, FilterValue, ALL};
pub use filter::{default_option, filter, options_for, FilterError};
pub use lookup::{best_match, constraints_from_query, similarity};
