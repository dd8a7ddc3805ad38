//! FILENAME: core/pivot-engine/src/cache.rs
//! Pivot Cache - Internal representation of the source data.
//!
//! The cache is designed for:
//! - A single load of the source records, never mutated afterwards
//! - Memory-efficient storage via per-field value interning
//! - Bucket keys built from ids and resolved to their `-`-joined display text
//!
//! Architecture:
//! - Each unique value of a field is stored once and referenced by index
//! - Records are stored as vectors of indices into the unique value stores
//! - Accumulators are created per bucket by the engine, never stored here

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::definition::{AggregationOperator, Field, FIELD_COUNT};

// ============================================================================
// RECORD VALUES
// ============================================================================

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // 0.0 and -0.0 compare equal, so they must hash equal too
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

/// A single value of a source record, resolved once at load time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RecordValue {
    #[default]
    Empty,
    Number(OrderedFloat),
    Text(String),
}

impl RecordValue {
    pub fn number(n: f64) -> Self {
        RecordValue::Number(OrderedFloat(n))
    }

    pub fn text(s: impl Into<String>) -> Self {
        RecordValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RecordValue::Empty)
    }

    /// Coerces the value for aggregation.
    /// Missing, blank and non-numeric values count as 0.
    pub fn as_number(&self) -> f64 {
        match self {
            RecordValue::Empty => 0.0,
            RecordValue::Number(n) if n.0.is_finite() => n.0,
            RecordValue::Number(_) => 0.0,
            RecordValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
        }
    }

    /// Text used in bucket identifiers and column headers.
    pub fn display_text(&self) -> String {
        match self {
            RecordValue::Empty => "(blank)".to_string(),
            RecordValue::Number(n) => format!("{}", n.0),
            RecordValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for RecordValue {
    fn from(value: f64) -> Self {
        RecordValue::number(value)
    }
}

impl From<i64> for RecordValue {
    fn from(value: i64) -> Self {
        RecordValue::number(value as f64)
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        RecordValue::text(value)
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        RecordValue::Text(value)
    }
}

// ============================================================================
// SOURCE RECORD
// ============================================================================

/// One source data row: a value slot per known field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    values: SmallVec<[RecordValue; FIELD_COUNT]>,
}

impl Record {
    /// A record with every field empty.
    pub fn new() -> Self {
        Record {
            values: (0..FIELD_COUNT).map(|_| RecordValue::Empty).collect(),
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, field: Field, value: impl Into<RecordValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: Field, value: impl Into<RecordValue>) {
        if self.values.len() < FIELD_COUNT {
            self.values.resize(FIELD_COUNT, RecordValue::Empty);
        }
        self.values[field.index()] = value.into();
    }

    pub fn get(&self, field: Field) -> &RecordValue {
        self.values.get(field.index()).unwrap_or(&RecordValue::Empty)
    }
}

// ============================================================================
// VALUE INTERNING
// ============================================================================

/// A reference to an interned value within a field's unique value store.
pub type ValueId = u32;

/// Represents a missing value in the cache.
pub const VALUE_ID_EMPTY: ValueId = u32::MAX;

/// Unique value store for a single field.
/// Ids are handed out in first-seen order.
#[derive(Debug, Clone)]
pub struct FieldCache {
    pub field: Field,

    /// Map from value to its unique ID (for deduplication during build).
    value_to_id: FxHashMap<RecordValue, ValueId>,

    /// Ordered list of unique values (indexed by ValueId).
    id_to_value: Vec<RecordValue>,
}

impl FieldCache {
    pub fn new(field: Field) -> Self {
        FieldCache {
            field,
            value_to_id: FxHashMap::default(),
            id_to_value: Vec::new(),
        }
    }

    /// Interns a value and returns its ValueId.
    /// If the value already exists, returns the existing ID.
    pub fn intern(&mut self, value: &RecordValue) -> ValueId {
        if value.is_empty() {
            return VALUE_ID_EMPTY;
        }

        if let Some(&id) = self.value_to_id.get(value) {
            return id;
        }

        let id = self.id_to_value.len() as ValueId;
        self.id_to_value.push(value.clone());
        self.value_to_id.insert(value.clone(), id);
        id
    }

    /// Gets the value for a given ID.
    pub fn get_value(&self, id: ValueId) -> &RecordValue {
        if id == VALUE_ID_EMPTY {
            return &RecordValue::Empty;
        }
        self.id_to_value.get(id as usize).unwrap_or(&RecordValue::Empty)
    }

    /// Returns the number of unique values (excluding empty).
    pub fn unique_count(&self) -> usize {
        self.id_to_value.len()
    }
}

/// A source record stored as interned value IDs, indexed by field slot.
#[derive(Debug, Clone)]
pub struct CacheRecord {
    pub values: SmallVec<[ValueId; FIELD_COUNT]>,
}

impl CacheRecord {
    pub fn value_id(&self, field: Field) -> ValueId {
        self.values.get(field.index()).copied().unwrap_or(VALUE_ID_EMPTY)
    }
}

// ============================================================================
// GROUP KEY
// ============================================================================

/// A combination of field values as interned ids.
/// `Dataset::key_path` turns it into the text that identifies row and
/// sub-key buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GroupKey {
    pub values: SmallVec<[ValueId; 4]>,
}

impl GroupKey {
    /// Builds the key of `record` over `fields`, in field order.
    pub fn for_record(record: &CacheRecord, fields: &[Field]) -> Self {
        GroupKey {
            values: fields.iter().map(|&f| record.value_id(f)).collect(),
        }
    }
}

// ============================================================================
// AGGREGATE ACCUMULATOR
// ============================================================================

/// Running statistics of one bucket for one value field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
    pub min: f64,
    pub max: f64,
}

impl Default for AggregateAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        AggregateAccumulator {
            sum: 0.0,
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Folds a numeric value into the accumulator.
    pub fn add_number(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Computes the displayed value. Never mutates the accumulator.
    pub fn compute(&self, operator: AggregationOperator) -> f64 {
        match operator {
            AggregationOperator::Sum => self.sum,
            AggregationOperator::Avg => {
                if self.count > 0 {
                    round_to_cents(self.sum / self.count as f64)
                } else {
                    0.0
                }
            }
            AggregationOperator::Count => self.count as f64,
            AggregationOperator::Min => {
                if self.min == f64::INFINITY {
                    0.0
                } else {
                    self.min
                }
            }
            AggregationOperator::Max => {
                if self.max == f64::NEG_INFINITY {
                    0.0
                } else {
                    self.max
                }
            }
        }
    }
}

/// Rounds to two decimal places.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// MAIN CACHE STRUCT
// ============================================================================

/// The loaded source dataset.
/// Immutable once built; shared read-only across every rebuild.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Unique value store for each field, indexed by field slot.
    pub fields: Vec<FieldCache>,

    /// All source records, stored as interned value IDs.
    pub records: Vec<CacheRecord>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

impl Dataset {
    /// Creates a new empty dataset.
    pub fn new() -> Self {
        Dataset {
            fields: Field::ALL.iter().map(|&f| FieldCache::new(f)).collect(),
            records: Vec::new(),
        }
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut dataset = Dataset::new();
        for record in records {
            dataset.add_record(&record);
        }
        dataset
    }

    /// Reserves capacity for expected record count.
    pub fn reserve(&mut self, record_count: usize) {
        self.records.reserve(record_count);
    }

    /// Adds a record to the dataset.
    pub fn add_record(&mut self, record: &Record) {
        let values = Field::ALL
            .iter()
            .map(|&f| self.fields[f.index()].intern(record.get(f)))
            .collect();

        self.records.push(CacheRecord { values });
    }

    pub fn field(&self, field: Field) -> &FieldCache {
        &self.fields[field.index()]
    }

    /// Resolves a record's value for `field`.
    pub fn value(&self, record: &CacheRecord, field: Field) -> &RecordValue {
        self.field(field).get_value(record.value_id(field))
    }

    /// Display text of an interned value.
    pub fn label(&self, field: Field, id: ValueId) -> String {
        self.field(field).get_value(id).display_text()
    }

    /// `-`-joined display text of a group key over `fields`.
    pub fn key_path(&self, fields: &[Field], key: &GroupKey) -> String {
        fields
            .iter()
            .zip(key.values.iter())
            .map(|(&f, &id)| self.label(f, id))
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Returns the record count.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
