//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that transforms data into a renderable view.
//!
//! This module takes a PivotConfig (configuration) and a Dataset (data)
//! and produces a PivotView (column tree + rows ready for rendering).
//!
//! Algorithm:
//! 1. Build the column tree: pinned group columns, then the sub-group
//!    nesting with one leaf per value field under every sub-group path
//! 2. Create one row shell per distinct group key (first record wins)
//! 3. Fold every record into the accumulator of its (row, sub-key, value field)
//! 4. Project each accumulator to a scalar with the selected operator
//!
//! Every configuration change reruns all four steps from the source records.

use rustc_hash::FxHashMap;

use crate::cache::{AggregateAccumulator, CacheRecord, Dataset, GroupKey, RecordValue};
use crate::definition::{AggregationOperator, Field, PivotConfig};
use crate::view::{ColumnNode, PivotCell, PivotRow, PivotView, RowStripe};

/// Sub-key used when no sub-group fields are configured.
pub const VALUES_KEY: &str = "Values";

/// Composite identifier of a value column: `"<sub-key path>-<value field>"`.
pub fn field_id(sub_key_path: &str, value_field: Field) -> String {
    format!("{}-{}", sub_key_path, value_field.name())
}

// ============================================================================
// SUB-GROUP NESTING
// ============================================================================

/// One level of the sub-group nesting.
/// Children are keyed by display label and kept in first-seen order, so
/// values that display alike share a column group.
#[derive(Debug, Default)]
struct SubGroupLevel {
    order: Vec<String>,
    children: FxHashMap<String, SubGroupLevel>,
}

impl SubGroupLevel {
    fn child_mut(&mut self, label: String) -> &mut SubGroupLevel {
        if !self.children.contains_key(&label) {
            self.order.push(label.clone());
        }
        self.children.entry(label).or_default()
    }
}

// ============================================================================
// INTERMEDIATE AGGREGATES
// ============================================================================

/// An accumulator together with the column it feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedCell {
    /// Composite column identifier.
    pub field: String,
    pub accumulator: AggregateAccumulator,
}

/// A row before operator selection: group values plus raw accumulators.
#[derive(Debug, Clone)]
pub struct AggregatedRow {
    /// `-`-joined group field values.
    pub key: String,

    /// Group field values taken from the first record seen for this key.
    pub group_values: Vec<(Field, RecordValue)>,

    /// Accumulators in creation order.
    pub cells: Vec<AggregatedCell>,

    /// (sub-key index, value field index) -> position in `cells`.
    cell_index: FxHashMap<(usize, usize), usize>,
}

impl AggregatedRow {
    fn shell(key: String, group_values: Vec<(Field, RecordValue)>) -> Self {
        AggregatedRow {
            key,
            group_values,
            cells: Vec::new(),
            cell_index: FxHashMap::default(),
        }
    }

    /// Looks up the accumulator of a bucket, creating it on first use.
    fn accumulator_mut(
        &mut self,
        sub_key: usize,
        value_field: usize,
        field: impl FnOnce() -> String,
    ) -> &mut AggregateAccumulator {
        let position = match self.cell_index.get(&(sub_key, value_field)) {
            Some(&position) => position,
            None => {
                let position = self.cells.len();
                self.cells.push(AggregatedCell {
                    field: field(),
                    accumulator: AggregateAccumulator::new(),
                });
                self.cell_index.insert((sub_key, value_field), position);
                position
            }
        };
        &mut self.cells[position].accumulator
    }

    /// Accumulator feeding the given column, if any record reached it.
    pub fn accumulator(&self, field_id: &str) -> Option<&AggregateAccumulator> {
        self.cells
            .iter()
            .find(|cell| cell.field == field_id)
            .map(|cell| &cell.accumulator)
    }
}

/// Output of the row aggregator.
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    /// Rows in first-seen row key order.
    pub rows: Vec<AggregatedRow>,

    /// `-`-joined path of every sub-key, in first-seen order.
    pub sub_key_paths: Vec<String>,
}

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// The main calculation engine for the pivot table.
pub struct PivotCalculator<'a> {
    config: &'a PivotConfig,
    dataset: &'a Dataset,
}

impl<'a> PivotCalculator<'a> {
    /// Creates a new calculator instance.
    pub fn new(config: &'a PivotConfig, dataset: &'a Dataset) -> Self {
        PivotCalculator { config, dataset }
    }

    /// Executes the full calculation.
    /// Returns `None` when either the group or the value zone is empty.
    pub fn calculate(&self) -> Option<PivotView> {
        if !self.config.is_computable() {
            return None;
        }

        let columns = self.build_column_schema();
        let aggregated = self.aggregate_rows();
        let rows = select_values(&aggregated, self.config.operator);

        Some(PivotView {
            version: self.config.version,
            operator: self.config.operator,
            columns,
            rows,
        })
    }

    // ========================================================================
    // COLUMN SCHEMA
    // ========================================================================

    /// Builds the column tree: one pinned column per group field,
    /// followed by the sub-group columns.
    pub fn build_column_schema(&self) -> Vec<ColumnNode> {
        let mut columns: Vec<ColumnNode> = self
            .config
            .group_fields
            .iter()
            .map(|&field| ColumnNode::row_key(field))
            .collect();

        columns.extend(self.build_sub_group_columns());
        columns
    }

    fn build_sub_group_columns(&self) -> Vec<ColumnNode> {
        let sub_fields = &self.config.sub_group_fields;

        if sub_fields.is_empty() {
            return vec![self.value_columns(VALUES_KEY, VALUES_KEY)];
        }

        let mut root = SubGroupLevel::default();
        for record in &self.dataset.records {
            let mut current = &mut root;
            for &field in sub_fields {
                current = current.child_mut(self.dataset.label(field, record.value_id(field)));
            }
        }

        self.level_to_columns(&root, 0, "")
    }

    /// Recursively converts one nesting level into column groups.
    fn level_to_columns(&self, level: &SubGroupLevel, depth: usize, path: &str) -> Vec<ColumnNode> {
        let is_last = depth + 1 == self.config.sub_group_fields.len();

        level
            .order
            .iter()
            .filter_map(|label| {
                let child = level.children.get(label)?;
                let child_path = if path.is_empty() {
                    label.clone()
                } else {
                    format!("{}-{}", path, label)
                };

                let node = if is_last {
                    self.value_columns(label, &child_path)
                } else {
                    ColumnNode::group(
                        label.to_uppercase(),
                        self.level_to_columns(child, depth + 1, &child_path),
                    )
                };
                Some(node)
            })
            .collect()
    }

    /// The innermost group: one leaf per value field, in drop order.
    fn value_columns(&self, label: &str, sub_key_path: &str) -> ColumnNode {
        let leaves = self
            .config
            .value_fields
            .iter()
            .map(|&vf| ColumnNode::value(field_id(sub_key_path, vf), vf))
            .collect();
        ColumnNode::group(label.to_uppercase(), leaves)
    }

    // ========================================================================
    // ROW AGGREGATION
    // ========================================================================

    /// `-`-joined display text of `record` over `fields`.
    /// Buckets are identified by this text, the same string column
    /// identifiers are built from.
    fn bucket_key(&self, record: &CacheRecord, fields: &[Field]) -> String {
        self.dataset.key_path(fields, &GroupKey::for_record(record, fields))
    }

    /// Scans the records into per-bucket accumulators.
    pub fn aggregate_rows(&self) -> AggregationResult {
        let group_fields = &self.config.group_fields;
        let sub_fields = &self.config.sub_group_fields;
        let value_fields = &self.config.value_fields;

        let mut rows: Vec<AggregatedRow> = Vec::new();
        let mut row_index: FxHashMap<String, usize> = FxHashMap::default();

        // Pass 1: row shells, first record for a key wins
        for record in &self.dataset.records {
            let key = self.bucket_key(record, group_fields);
            if row_index.contains_key(&key) {
                continue;
            }
            let group_values = group_fields
                .iter()
                .map(|&f| (f, self.dataset.value(record, f).clone()))
                .collect();
            row_index.insert(key.clone(), rows.len());
            rows.push(AggregatedRow::shell(key, group_values));
        }

        // Pass 2: fold value fields into (row, sub-key) buckets
        let mut sub_key_paths: Vec<String> = Vec::new();
        let mut sub_key_index: FxHashMap<String, usize> = FxHashMap::default();

        for record in &self.dataset.records {
            let row_key = self.bucket_key(record, group_fields);
            let row_idx = match row_index.get(&row_key) {
                Some(&idx) => idx,
                None => continue,
            };

            let sub_key = if sub_fields.is_empty() {
                VALUES_KEY.to_string()
            } else {
                self.bucket_key(record, sub_fields)
            };
            let sub_idx = match sub_key_index.get(&sub_key) {
                Some(&idx) => idx,
                None => {
                    let idx = sub_key_paths.len();
                    sub_key_paths.push(sub_key.clone());
                    sub_key_index.insert(sub_key, idx);
                    idx
                }
            };

            let row = &mut rows[row_idx];
            for (vf_idx, &vf) in value_fields.iter().enumerate() {
                let value = self.dataset.value(record, vf).as_number();
                let path = &sub_key_paths[sub_idx];
                row.accumulator_mut(sub_idx, vf_idx, || field_id(path, vf))
                    .add_number(value);
            }
        }

        AggregationResult { rows, sub_key_paths }
    }
}

// ============================================================================
// AGGREGATION SELECTION
// ============================================================================

/// Projects every accumulator to its displayed scalar.
/// The accumulators themselves are left untouched.
pub fn select_values(result: &AggregationResult, operator: AggregationOperator) -> Vec<PivotRow> {
    result
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| PivotRow {
            group_values: row.group_values.clone(),
            cells: row
                .cells
                .iter()
                .map(|cell| PivotCell {
                    field: cell.field.clone(),
                    value: cell.accumulator.compute(operator),
                })
                .collect(),
            stripe: RowStripe::for_index(index),
        })
        .collect()
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Calculates the pivot view from configuration and dataset.
/// This is the main entry point for the calculation engine.
///
/// Returns `None` without computing anything when the configuration has no
/// group field or no value field; callers keep their previous view.
pub fn calculate_pivot(config: &PivotConfig, dataset: &Dataset) -> Option<PivotView> {
    PivotCalculator::new(config, dataset).calculate()
}

/// Builds only the column tree for a configuration.
pub fn build_column_schema(config: &PivotConfig, dataset: &Dataset) -> Vec<ColumnNode> {
    PivotCalculator::new(config, dataset).build_column_schema()
}

/// Runs only the row aggregator for a configuration.
pub fn aggregate_rows(config: &PivotConfig, dataset: &Dataset) -> AggregationResult {
    PivotCalculator::new(config, dataset).aggregate_rows()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Record;
    use crate::definition::Zone;
    use crate::view::ColumnKind;

    fn record(department: &str, status: &str, location: &str, employees: f64) -> Record {
        Record::new()
            .with(Field::Department, department)
            .with(Field::Status, status)
            .with(Field::Location, location)
            .with(Field::Employees, employees)
    }

    fn create_test_records() -> Vec<Record> {
        vec![
            record("Sales", "Active", "NY", 10.0),
            record("Sales", "Closed", "LA", 20.0),
            record("HR", "Active", "NY", 5.0),
            record("Sales", "Active", "LA", 7.0),
            record("IT", "Pending", "NY", 12.0),
            record("HR", "Closed", "LA", 3.0),
        ]
    }

    fn config(group: &[Field], sub: &[Field], values: &[Field]) -> PivotConfig {
        let mut config = PivotConfig::new();
        for &f in group {
            config = config.with_field_dropped(Zone::GroupBy, f).unwrap();
        }
        for &f in sub {
            config = config.with_field_dropped(Zone::SubGroupBy, f).unwrap();
        }
        for &f in values {
            config = config.with_field_dropped(Zone::Values, f).unwrap();
        }
        config
    }

    fn row_value(view: &PivotView, department: &str, field_id: &str) -> Option<f64> {
        view.rows
            .iter()
            .find(|r| r.group_value(Field::Department) == Some(&RecordValue::text(department)))
            .and_then(|r| r.value(field_id))
    }

    #[test]
    fn test_operator_scenario() {
        let dataset = Dataset::from_records(vec![
            Record::new().with(Field::Department, "A").with(Field::Employees, 10.0),
            Record::new().with(Field::Department, "A").with(Field::Employees, 20.0),
            Record::new().with(Field::Department, "B").with(Field::Employees, 5.0),
        ]);
        let base = config(&[Field::Department], &[], &[Field::Employees]);

        let expected = [
            (AggregationOperator::Sum, 30.0, 5.0),
            (AggregationOperator::Avg, 15.0, 5.0),
            (AggregationOperator::Count, 2.0, 1.0),
            (AggregationOperator::Min, 10.0, 5.0),
            (AggregationOperator::Max, 20.0, 5.0),
        ];

        for (operator, a, b) in expected {
            let view = calculate_pivot(&base.with_operator(operator), &dataset).unwrap();
            assert_eq!(row_value(&view, "A", "Values-employees"), Some(a), "{} of A", operator);
            assert_eq!(row_value(&view, "B", "Values-employees"), Some(b), "{} of B", operator);
        }
    }

    #[test]
    fn test_avg_rounds_to_two_decimals() {
        let dataset = Dataset::from_records(vec![
            Record::new().with(Field::Department, "A").with(Field::Employees, 1.0),
            Record::new().with(Field::Department, "A").with(Field::Employees, 1.0),
            Record::new().with(Field::Department, "A").with(Field::Employees, 2.0),
        ]);
        let cfg = config(&[Field::Department], &[], &[Field::Employees])
            .with_operator(AggregationOperator::Avg);

        let view = calculate_pivot(&cfg, &dataset).unwrap();
        assert_eq!(row_value(&view, "A", "Values-employees"), Some(1.33));
    }

    #[test]
    fn test_guard_without_group_or_value_fields() {
        let dataset = Dataset::from_records(create_test_records());

        assert!(calculate_pivot(&PivotConfig::new(), &dataset).is_none());
        assert!(calculate_pivot(&config(&[Field::Department], &[], &[]), &dataset).is_none());
        assert!(calculate_pivot(&config(&[], &[Field::Status], &[Field::Employees]), &dataset).is_none());
    }

    #[test]
    fn test_columns_without_sub_groups() {
        let dataset = Dataset::from_records(create_test_records());
        let cfg = config(&[Field::Department, Field::Location], &[], &[Field::Employees, Field::Pcs]);

        let columns = build_column_schema(&cfg, &dataset);

        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].header_name(), "DEPARTMENT");
        assert_eq!(columns[1].header_name(), "LOCATION");
        assert_eq!(columns[2].header_name(), "VALUES");

        let leaves: Vec<&str> = columns[2].children().iter().map(|c| c.header_name()).collect();
        assert_eq!(leaves, vec!["EMPLOYEES", "PCS"]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();
        assert_eq!(view.value_field_ids(), vec!["Values-employees", "Values-pcs"]);
        assert_eq!(view.header_depth(), 2);
    }

    #[test]
    fn test_sub_group_columns_in_first_seen_order() {
        let dataset = Dataset::from_records(create_test_records());
        let cfg = config(&[Field::Department], &[Field::Status], &[Field::Employees]);

        let columns = build_column_schema(&cfg, &dataset);
        let headers: Vec<&str> = columns.iter().map(|c| c.header_name()).collect();

        // Not sorted: scan order of first appearance
        assert_eq!(headers, vec!["DEPARTMENT", "ACTIVE", "CLOSED", "PENDING"]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();
        assert_eq!(
            view.value_field_ids(),
            vec!["Active-employees", "Closed-employees", "Pending-employees"]
        );
    }

    #[test]
    fn test_nested_sub_groups() {
        let dataset = Dataset::from_records(create_test_records());
        let cfg = config(&[Field::Department], &[Field::Status, Field::Location], &[Field::Employees]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();

        assert_eq!(view.header_depth(), 3);
        assert_eq!(
            view.value_field_ids(),
            vec![
                "Active-NY-employees",
                "Active-LA-employees",
                "Closed-LA-employees",
                "Pending-NY-employees",
            ]
        );

        assert_eq!(row_value(&view, "Sales", "Active-NY-employees"), Some(10.0));
        assert_eq!(row_value(&view, "Sales", "Active-LA-employees"), Some(7.0));
        assert_eq!(row_value(&view, "Sales", "Closed-LA-employees"), Some(20.0));
        // Buckets never reached by a record are not materialized
        assert_eq!(row_value(&view, "Sales", "Pending-NY-employees"), None);
        assert_eq!(row_value(&view, "IT", "Pending-NY-employees"), Some(12.0));
    }

    #[test]
    fn test_completeness() {
        let dataset = Dataset::from_records(create_test_records());
        let cfg = config(&[Field::Department, Field::Status], &[Field::Location], &[Field::Employees]);

        let result = aggregate_rows(&cfg, &dataset);

        // Sales/Active, Sales/Closed, HR/Active, IT/Pending, HR/Closed
        assert_eq!(result.rows.len(), 5);
        assert_eq!(result.sub_key_paths, vec!["NY", "LA"]);

        let keys: std::collections::HashSet<&str> = result.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(result.rows[0].key, "Sales-Active");

        let columns = build_column_schema(&cfg, &dataset);
        let groups: Vec<&ColumnNode> = columns.iter().filter(|c| !c.is_leaf()).collect();
        assert_eq!(groups.len(), 2);
        for group in groups {
            assert_eq!(group.children().len(), 1);
        }
    }

    #[test]
    fn test_row_shell_holds_group_values() {
        let dataset = Dataset::from_records(create_test_records());
        let cfg = config(&[Field::Location, Field::Department], &[], &[Field::Employees]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();
        let first = &view.rows[0];

        assert_eq!(
            first.group_values,
            vec![
                (Field::Location, RecordValue::text("NY")),
                (Field::Department, RecordValue::text("Sales")),
            ]
        );
        assert_eq!(first.value("Values-employees"), Some(10.0));
    }

    #[test]
    fn test_missing_values_coerce_to_zero() {
        let dataset = Dataset::from_records(vec![
            Record::new().with(Field::Department, "A").with(Field::Employees, 4.0),
            Record::new().with(Field::Department, "A"),
            Record::new().with(Field::Department, "A").with(Field::Employees, "n/a"),
            Record::new().with(Field::Department, "A").with(Field::Employees, "6"),
        ]);
        let base = config(&[Field::Department], &[], &[Field::Employees]);

        let sum = calculate_pivot(&base, &dataset).unwrap();
        assert_eq!(row_value(&sum, "A", "Values-employees"), Some(10.0));

        let count = calculate_pivot(&base.with_operator(AggregationOperator::Count), &dataset).unwrap();
        assert_eq!(row_value(&count, "A", "Values-employees"), Some(4.0));

        let min = calculate_pivot(&base.with_operator(AggregationOperator::Min), &dataset).unwrap();
        assert_eq!(row_value(&min, "A", "Values-employees"), Some(0.0));
    }

    #[test]
    fn test_blank_group_values_form_their_own_row() {
        let dataset = Dataset::from_records(vec![
            Record::new().with(Field::Department, "A").with(Field::Employees, 1.0),
            Record::new().with(Field::Employees, 2.0),
        ]);
        let cfg = config(&[Field::Department], &[Field::Status], &[Field::Employees]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[1].group_values[0].1, RecordValue::Empty);
        assert_eq!(view.rows[1].value("(blank)-employees"), Some(2.0));
    }

    #[test]
    fn test_idempotent_rebuild() {
        let dataset = Dataset::from_records(create_test_records());
        let cfg = config(&[Field::Department], &[Field::Status], &[Field::Employees])
            .with_operator(AggregationOperator::Avg);

        let first = calculate_pivot(&cfg, &dataset).unwrap();
        let second = calculate_pivot(&cfg, &dataset).unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_scalars_independent_of_record_order() {
        let records = create_test_records();
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = Dataset::from_records(records);
        let backward = Dataset::from_records(reversed);
        let base = config(&[Field::Department], &[Field::Status], &[Field::Employees]);

        for operator in AggregationOperator::ALL {
            let cfg = base.with_operator(operator);
            let a = calculate_pivot(&cfg, &forward).unwrap();
            let b = calculate_pivot(&cfg, &backward).unwrap();

            for row in &a.rows {
                let department = row.group_value(Field::Department).unwrap();
                let other = b
                    .rows
                    .iter()
                    .find(|r| r.group_value(Field::Department) == Some(department))
                    .unwrap();
                for cell in &row.cells {
                    assert_eq!(other.value(&cell.field), Some(cell.value), "{} {}", operator, cell.field);
                }
            }
        }
    }

    #[test]
    fn test_column_and_row_order_follow_record_order() {
        let records = create_test_records();
        let mut reversed = records.clone();
        reversed.reverse();

        let cfg = config(&[Field::Department], &[Field::Status], &[Field::Employees]);
        let forward = calculate_pivot(&cfg, &Dataset::from_records(records)).unwrap();
        let backward = calculate_pivot(&cfg, &Dataset::from_records(reversed)).unwrap();

        let headers = |view: &PivotView| -> Vec<String> {
            view.columns.iter().map(|c| c.header_name().to_string()).collect()
        };
        assert_eq!(headers(&forward), vec!["DEPARTMENT", "ACTIVE", "CLOSED", "PENDING"]);
        assert_eq!(headers(&backward), vec!["DEPARTMENT", "CLOSED", "PENDING", "ACTIVE"]);

        let departments = |view: &PivotView| -> Vec<String> {
            view.rows
                .iter()
                .map(|r| r.group_values[0].1.display_text())
                .collect()
        };
        assert_eq!(departments(&forward), vec!["Sales", "HR", "IT"]);
        assert_eq!(departments(&backward), vec!["HR", "IT", "Sales"]);
    }

    #[test]
    fn test_value_columns_follow_drop_order() {
        let dataset = Dataset::from_records(create_test_records());
        let cfg = config(&[Field::Department], &[], &[Field::Pcs, Field::Employees]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();
        let kinds: Vec<ColumnKind> = view.leaf_columns().iter().map(|l| l.kind).collect();

        assert_eq!(kinds, vec![ColumnKind::RowKey, ColumnKind::Value, ColumnKind::Value]);
        assert_eq!(view.value_field_ids(), vec!["Values-pcs", "Values-employees"]);
        // pcs is missing from every record: folded as zeros
        assert_eq!(row_value(&view, "Sales", "Values-pcs"), Some(0.0));
    }

    #[test]
    fn test_select_values_keeps_accumulators() {
        let dataset = Dataset::from_records(create_test_records());
        let cfg = config(&[Field::Department], &[], &[Field::Employees]);
        let result = aggregate_rows(&cfg, &dataset);

        let sums = select_values(&result, AggregationOperator::Sum);
        let maxes = select_values(&result, AggregationOperator::Max);

        assert_eq!(sums[0].value("Values-employees"), Some(37.0));
        assert_eq!(maxes[0].value("Values-employees"), Some(20.0));

        let acc = result.rows[0].accumulator("Values-employees").unwrap();
        assert_eq!(acc.count, 3);
        assert_eq!(acc.min, 7.0);
    }

    #[test]
    fn test_row_stripes_alternate() {
        let dataset = Dataset::from_records(create_test_records());
        let cfg = config(&[Field::Department], &[], &[Field::Employees]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();
        let stripes: Vec<RowStripe> = view.rows.iter().map(|r| r.stripe).collect();

        assert_eq!(stripes, vec![RowStripe::Even, RowStripe::Odd, RowStripe::Even]);
    }

    #[test]
    fn test_dashed_values_share_joined_bucket() {
        let dataset = Dataset::from_records(vec![
            record("D", "A-B", "C", 1.0),
            record("D", "A", "B-C", 2.0),
        ]);
        let cfg = config(&[Field::Department], &[Field::Status, Field::Location], &[Field::Employees]);

        let result = aggregate_rows(&cfg, &dataset);
        assert_eq!(result.sub_key_paths, vec!["A-B-C".to_string()]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].cells.len(), 1);
        assert_eq!(view.rows[0].value("A-B-C-employees"), Some(3.0));

        let json = serde_json::to_value(&view.rows[0]).unwrap();
        assert_eq!(json["A-B-C-employees"], 3.0);
    }

    #[test]
    fn test_number_and_text_with_same_display_merge() {
        let dataset = Dataset::from_records(vec![
            Record::new()
                .with(Field::Department, 10.0)
                .with(Field::Status, 1.0)
                .with(Field::Employees, 1.0),
            Record::new()
                .with(Field::Department, "10")
                .with(Field::Status, "1")
                .with(Field::Employees, 2.0),
        ]);
        let cfg = config(&[Field::Department], &[Field::Status], &[Field::Employees]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].group_values[0].1, RecordValue::number(10.0));
        assert_eq!(view.rows[0].value("1-employees"), Some(3.0));

        let headers: Vec<&str> = view.columns.iter().map(|c| c.header_name()).collect();
        assert_eq!(headers, vec!["DEPARTMENT", "1"]);
        assert_eq!(view.value_field_ids(), vec!["1-employees"]);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::new();
        let cfg = config(&[Field::Department], &[Field::Status], &[Field::Employees]);

        let view = calculate_pivot(&cfg, &dataset).unwrap();

        assert!(view.rows.is_empty());
        assert_eq!(view.columns.len(), 1);
    }
}
