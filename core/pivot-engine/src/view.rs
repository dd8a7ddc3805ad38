//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - Renderable output for the grid widget.
//!
//! This module holds what the external grid renders:
//! - A column tree (pinned row-key columns, then nested sub-group columns)
//! - Flat rows keyed by column field identifiers
//! - Visual hints (row striping)

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::cache::RecordValue;
use crate::definition::{AggregationOperator, Field};
use crate::format::format_cell_value;

// ============================================================================
// COLUMN TREE
// ============================================================================

/// What a leaf column displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnKind {
    /// Group field value, one per group-by field.
    RowKey,
    /// Aggregated value of one value field within one sub-group path.
    Value,
}

/// Side a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinnedSide {
    Left,
}

/// A column that maps to a row entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafColumn {
    pub header_name: String,

    /// Row entry this column reads: a group field name, or
    /// `"<sub-key path>-<value field>"` for value columns.
    pub field: String,

    pub kind: ColumnKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<PinnedSide>,
}

/// A header spanning its child columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGroup {
    pub header_name: String,
    pub children: Vec<ColumnNode>,
}

/// A node in the column tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnNode {
    Leaf(LeafColumn),
    Group(ColumnGroup),
}

impl ColumnNode {
    /// Pinned column showing a group field.
    pub fn row_key(field: Field) -> Self {
        ColumnNode::Leaf(LeafColumn {
            header_name: field.label(),
            field: field.name().to_string(),
            kind: ColumnKind::RowKey,
            pinned: Some(PinnedSide::Left),
        })
    }

    /// Column showing one aggregated value field.
    pub fn value(field_id: String, value_field: Field) -> Self {
        ColumnNode::Leaf(LeafColumn {
            header_name: value_field.label(),
            field: field_id,
            kind: ColumnKind::Value,
            pinned: None,
        })
    }

    pub fn group(header_name: String, children: Vec<ColumnNode>) -> Self {
        ColumnNode::Group(ColumnGroup { header_name, children })
    }

    pub fn header_name(&self) -> &str {
        match self {
            ColumnNode::Leaf(leaf) => &leaf.header_name,
            ColumnNode::Group(group) => &group.header_name,
        }
    }

    pub fn children(&self) -> &[ColumnNode] {
        match self {
            ColumnNode::Leaf(_) => &[],
            ColumnNode::Group(group) => &group.children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ColumnNode::Leaf(_))
    }

    /// Appends every leaf under this node, left to right.
    pub fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafColumn>) {
        match self {
            ColumnNode::Leaf(leaf) => out.push(leaf),
            ColumnNode::Group(group) => {
                for child in &group.children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Number of header levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            ColumnNode::Leaf(_) => 1,
            ColumnNode::Group(group) => {
                1 + group.children.iter().map(ColumnNode::depth).max().unwrap_or(0)
            }
        }
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// Background hint alternating by row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStripe {
    Even,
    Odd,
}

impl RowStripe {
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            RowStripe::Even
        } else {
            RowStripe::Odd
        }
    }
}

/// One aggregated value cell of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotCell {
    /// Composite column identifier, `"<sub-key path>-<value field>"`.
    pub field: String,
    pub value: f64,
}

/// One row of the rendered pivot table.
///
/// Serializes as a flat object: group field names map to their values and
/// each composite field identifier maps to its scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    /// Group field values, in group field order.
    pub group_values: Vec<(Field, RecordValue)>,

    /// Final scalar per composite field identifier, in first-seen order.
    pub cells: Vec<PivotCell>,

    pub stripe: RowStripe,
}

impl PivotRow {
    pub fn group_value(&self, field: Field) -> Option<&RecordValue> {
        self.group_values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    /// Scalar stored under a composite field identifier.
    pub fn value(&self, field_id: &str) -> Option<f64> {
        self.cells
            .iter()
            .find(|cell| cell.field == field_id)
            .map(|cell| cell.value)
    }

    /// Display text of a value column. Absent cells render as "0".
    pub fn formatted(&self, field_id: &str) -> String {
        format_cell_value(self.value(field_id))
    }
}

impl Serialize for PivotRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.group_values.len() + self.cells.len()))?;
        for (field, value) in &self.group_values {
            map.serialize_entry(field.name(), value)?;
        }
        for cell in &self.cells {
            map.serialize_entry(&cell.field, &cell.value)?;
        }
        map.end()
    }
}

// ============================================================================
// MAIN VIEW STRUCT
// ============================================================================

/// The complete renderable pivot output: column tree plus rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PivotView {
    /// Version of the configuration this view was computed from.
    pub version: u64,

    pub operator: AggregationOperator,

    pub columns: Vec<ColumnNode>,

    pub rows: Vec<PivotRow>,
}

impl PivotView {
    /// A view with nothing to show, used before the first computation.
    pub fn empty() -> Self {
        PivotView::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All leaf columns, left to right.
    pub fn leaf_columns(&self) -> Vec<&LeafColumn> {
        let mut leaves = Vec::new();
        for column in &self.columns {
            column.collect_leaves(&mut leaves);
        }
        leaves
    }

    /// Identifiers of the value columns, left to right.
    pub fn value_field_ids(&self) -> Vec<&str> {
        self.leaf_columns()
            .into_iter()
            .filter(|leaf| leaf.kind == ColumnKind::Value)
            .map(|leaf| leaf.field.as_str())
            .collect()
    }

    /// Number of header rows the column tree needs.
    pub fn header_depth(&self) -> usize {
        self.columns.iter().map(ColumnNode::depth).max().unwrap_or(0)
    }
}
