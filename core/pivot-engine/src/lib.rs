//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot Table aggregation engine.
//!
//! This crate turns a fixed-schema record set and a zone configuration
//! (group by / sub-group by / values plus an aggregation operator) into a
//! nested column tree and flat aggregated rows for a grid renderer.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot table IS)
//! - `cache`: Interned source records and accumulators (HOW we compute)
//! - `view`: Renderable output for the grid (WHAT we display)
//! - `engine`: Calculation engine (HOW we calculate)
//! - `format`: Display formatting of aggregated cells

pub mod definition;
pub mod cache;
pub mod view;
pub mod engine;
pub mod format;
pub mod error;

pub use definition::*;
pub use cache::*;
pub use view::*;
pub use engine::{
    aggregate_rows, build_column_schema, calculate_pivot, field_id, select_values,
    AggregatedCell, AggregatedRow, AggregationResult, PivotCalculator, VALUES_KEY,
};
pub use format::{format_cell_value, format_locale_number};
pub use error::{PivotError, PivotResult};
