//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a pivot table.
//! These structures are designed to be:
//! - Serializable (sent to and from the host as JSON)
//! - Immutable snapshots of user intent: every UI event produces a new
//!   `PivotConfig` instead of mutating the current one

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PivotError, PivotResult};

/// Index of a field in a record's value slots (0-based).
pub type FieldIndex = usize;

/// Number of known fields. Records carry exactly this many slots.
pub const FIELD_COUNT: usize = 6;

// ============================================================================
// FIELDS
// ============================================================================

/// Whether a field can be aggregated or only grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// The closed set of fields known to the pivot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Department,
    Status,
    Location,
    Employees,
    Carats,
    Pcs,
}

impl Field {
    /// All fields, in palette order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Department,
        Field::Status,
        Field::Location,
        Field::Employees,
        Field::Carats,
        Field::Pcs,
    ];

    /// Slot of this field inside a record.
    pub fn index(self) -> FieldIndex {
        self as FieldIndex
    }

    /// Canonical lower-case name, as used by the source data.
    pub fn name(self) -> &'static str {
        match self {
            Field::Department => "department",
            Field::Status => "status",
            Field::Location => "location",
            Field::Employees => "employees",
            Field::Carats => "carats",
            Field::Pcs => "pcs",
        }
    }

    /// Fixed numeric/categorical classification.
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Employees | Field::Carats | Field::Pcs => FieldKind::Numeric,
            Field::Department | Field::Status | Field::Location => FieldKind::Categorical,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.kind() == FieldKind::Numeric
    }

    /// Header text shown by the renderer.
    pub fn label(self) -> String {
        self.name().to_uppercase()
    }

    /// Looks up a field by its canonical name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = PivotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Field::from_name(name).ok_or_else(|| PivotError::UnknownField(name.to_string()))
    }
}

// ============================================================================
// ZONES
// ============================================================================

/// The drop zones a field can be placed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Row identity (pinned left columns).
    GroupBy,
    /// Nested column groups.
    SubGroupBy,
    /// Aggregated cell values.
    Values,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::GroupBy, Zone::SubGroupBy, Zone::Values];

    pub fn name(self) -> &'static str {
        match self {
            Zone::GroupBy => "group_by",
            Zone::SubGroupBy => "sub_group_by",
            Zone::Values => "values",
        }
    }

    /// Acceptance predicate checked at drop time.
    /// Group zones take categorical fields only, the value zone numeric only.
    pub fn accepts(self, field: Field) -> PivotResult<()> {
        match (self, field.kind()) {
            (Zone::GroupBy | Zone::SubGroupBy, FieldKind::Numeric) => Err(PivotError::ZoneRejected {
                field,
                zone: self,
                reason: "numeric fields cannot be grouped on",
            }),
            (Zone::Values, FieldKind::Categorical) => Err(PivotError::ZoneRejected {
                field,
                zone: self,
                reason: "only numeric fields can be aggregated",
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "group_by" | "group" | "rows" => Ok(Zone::GroupBy),
            "sub_group_by" | "sub_group" | "subgroup" | "columns" => Ok(Zone::SubGroupBy),
            "values" | "value" => Ok(Zone::Values),
            other => Err(format!("Unknown zone: {}", other)),
        }
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation operators for value fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationOperator {
    #[default]
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl AggregationOperator {
    /// All operators, in menu order.
    pub const ALL: [AggregationOperator; 5] = [
        AggregationOperator::Sum,
        AggregationOperator::Avg,
        AggregationOperator::Count,
        AggregationOperator::Min,
        AggregationOperator::Max,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AggregationOperator::Sum => "sum",
            AggregationOperator::Avg => "avg",
            AggregationOperator::Count => "count",
            AggregationOperator::Min => "min",
            AggregationOperator::Max => "max",
        }
    }

    pub fn parse(name: &str) -> Option<AggregationOperator> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sum" => Some(AggregationOperator::Sum),
            "avg" | "average" => Some(AggregationOperator::Avg),
            "count" => Some(AggregationOperator::Count),
            "min" => Some(AggregationOperator::Min),
            "max" => Some(AggregationOperator::Max),
            _ => None,
        }
    }

    /// Resolves a menu selection. Unknown names fall back to `Sum`.
    pub fn from_name(name: &str) -> AggregationOperator {
        Self::parse(name).unwrap_or_default()
    }
}

impl fmt::Display for AggregationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// MAIN CONFIGURATION STRUCT
// ============================================================================

/// The complete configuration of the pivot table.
/// This is the single source of truth the engine is computed from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PivotConfig {
    /// Fields defining row identity, in drop order.
    pub group_fields: Vec<Field>,

    /// Fields defining nested column groups, outer to inner.
    pub sub_group_fields: Vec<Field>,

    /// Numeric fields being aggregated, in drop order.
    pub value_fields: Vec<Field>,

    /// The aggregation applied to every value cell.
    #[serde(default)]
    pub operator: AggregationOperator,

    /// Bumped whenever the configuration changes.
    #[serde(default)]
    pub version: u64,
}

impl PivotConfig {
    pub fn new() -> Self {
        PivotConfig::default()
    }

    /// Fields currently placed in `zone`.
    pub fn fields(&self, zone: Zone) -> &[Field] {
        match zone {
            Zone::GroupBy => &self.group_fields,
            Zone::SubGroupBy => &self.sub_group_fields,
            Zone::Values => &self.value_fields,
        }
    }

    fn fields_mut(&mut self, zone: Zone) -> &mut Vec<Field> {
        match zone {
            Zone::GroupBy => &mut self.group_fields,
            Zone::SubGroupBy => &mut self.sub_group_fields,
            Zone::Values => &mut self.value_fields,
        }
    }

    /// The zone a field is active in, if any.
    pub fn zone_of(&self, field: Field) -> Option<Zone> {
        Zone::ALL
            .iter()
            .copied()
            .find(|&zone| self.fields(zone).contains(&field))
    }

    /// Returns the configuration after `field` is dropped into `zone`.
    ///
    /// Dropping a field that is already in the zone returns an identical
    /// configuration. A field can be active in a single zone only.
    pub fn with_field_dropped(&self, zone: Zone, field: Field) -> PivotResult<PivotConfig> {
        zone.accepts(field)?;

        match self.zone_of(field) {
            Some(current) if current == zone => return Ok(self.clone()),
            Some(current) => {
                return Err(PivotError::FieldInOtherZone {
                    field,
                    zone: current,
                })
            }
            None => {}
        }

        let mut next = self.clone();
        next.fields_mut(zone).push(field);
        next.bump_version();
        Ok(next)
    }

    /// Returns the configuration after `field` is removed from `zone`.
    pub fn with_field_removed(&self, zone: Zone, field: Field) -> PivotConfig {
        if !self.fields(zone).contains(&field) {
            return self.clone();
        }
        let mut next = self.clone();
        next.fields_mut(zone).retain(|&f| f != field);
        next.bump_version();
        next
    }

    /// Returns the configuration with a different aggregation operator.
    pub fn with_operator(&self, operator: AggregationOperator) -> PivotConfig {
        if self.operator == operator {
            return self.clone();
        }
        let mut next = self.clone();
        next.operator = operator;
        next.bump_version();
        next
    }

    /// Whether the engine has enough configuration to produce output.
    /// Both a group field and a value field are required.
    pub fn is_computable(&self) -> bool {
        !self.group_fields.is_empty() && !self.value_fields.is_empty()
    }

    /// Increments the version (for cache invalidation).
    pub fn bump_version(&mut self) {
        self.version += 1;
    }
}
