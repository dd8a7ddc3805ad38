//! FILENAME: app/src/pivot/types.rs
use pivot_engine::{AggregationOperator, ColumnNode, Field, PivotRow, Zone};
use serde::Serialize;

/// Response containing the pivot view for the renderer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotViewResponse {
    /// Configuration version the shown view was computed from
    pub version: u64,
    /// Current configuration version (ahead of `version` while stale)
    pub config_version: u64,
    pub operator: AggregationOperator,
    pub columns: Vec<ColumnNode>,
    pub rows: Vec<PivotRow>,
    /// True when the last recompute was skipped because the group or
    /// value zone is empty; the rows are from an earlier configuration
    pub is_stale: bool,
    pub row_count: usize,
}

/// One entry of the draggable field palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub name: String,
    pub label: String,
    pub is_numeric: bool,
    /// Zone the field is currently placed in, if any
    pub zone: Option<Zone>,
}

impl FieldInfo {
    pub fn new(field: Field, zone: Option<Zone>) -> Self {
        FieldInfo {
            name: field.name().to_string(),
            label: field.label(),
            is_numeric: field.is_numeric(),
            zone,
        }
    }
}
