//! Visualization-support module - choropleth class breaks, dataset kinds

mod breaks;
mod kind;

pub use breaks::{compute_breaks, compute_breaks_for_column, DEFAULT_CLASSES};
pub use kind::VizKind;
