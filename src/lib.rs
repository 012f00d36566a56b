//! CDRI Data Hub Core
//!
//! The data layer behind the Data Hub dashboard pages: loading tabular
//! snapshots, cascading categorical filters, choropleth class breaks,
//! fuzzy free-text lookup, and long-to-wide pivoting. Rendering and the
//! web callback layer live outside this crate; everything here is a pure
//! function over immutable [`polars`] DataFrames loaded once at startup.

pub mod data;
pub mod export;
pub mod query;
pub mod viz;

pub use data::{pivot, DataContext, DuplicatePolicy, LoaderError, ReshapeError};
pub use export::{to_csv_string, ExportError};
pub use query::{
    best_match, constraints_from_query, default_option, filter, options_for, similarity,
    Constraint, ConstraintSet, FilterError, FilterValue, ALL,
};
pub use viz::{compute_breaks, compute_breaks_for_column, VizKind, DEFAULT_CLASSES};
